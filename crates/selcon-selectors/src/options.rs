//! Parser configuration.

/// Default cap on compound selectors in one complex selector.
pub const DEFAULT_MAX_COMPOUNDS: usize = 32;

/// Default cap on the length of normalized selector text, in bytes.
pub const DEFAULT_MAX_LEN: usize = 4096;

/// Limits applied while parsing.
///
/// Complex selectors are owned recursive chains and containment recurses
/// along them, so both limits bound the recursion depth of every later
/// operation on the parsed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of compound selectors in a single complex selector.
    pub max_compounds: usize,
    /// Maximum length of the normalized selector text, in bytes.
    pub max_len: usize,
}

impl ParseOptions {
    /// Options with the default limits.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_compounds: DEFAULT_MAX_COMPOUNDS,
            max_len: DEFAULT_MAX_LEN,
        }
    }

    /// Set the maximum number of compound selectors per complex selector.
    #[must_use]
    pub const fn with_max_compounds(mut self, max_compounds: usize) -> Self {
        self.max_compounds = max_compounds;
        self
    }

    /// Set the maximum normalized text length.
    #[must_use]
    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}
