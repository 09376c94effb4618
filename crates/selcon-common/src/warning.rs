//! Diagnostics with colored terminal output.
//!
//! Provides deduplication so that comparing the same pair of selectors
//! many times reports an undecidable case only once.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Whether warnings are printed at all. Recording still happens when disabled.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Warn about an undecidable or unsupported case (prints once per unique message).
///
/// Returns `true` if this was the first time the message was seen.
///
/// # Example
/// ```ignore
/// warn_once("Selectors", "cannot decide :nth-child(-n+3) against :nth-child(2n)");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if first_time && ENABLED.load(Ordering::Relaxed) {
        eprintln!("{YELLOW}[selcon {component}] ⚠ {message}{RESET}");
    }
    first_time
}

/// Enable or disable printing of warnings (the CLI's `--quiet` flag).
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

/// Number of distinct warnings recorded since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

/// Clear all recorded warnings.
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        set_enabled(false);
        let message = "duplicate check for the warning module";
        assert!(warn_once("Test", message));
        assert!(!warn_once("Test", message));
        assert!(warn_once("Other", message));
        assert!(warning_count() >= 2);
    }
}
