//! Escape normalization.
//!
//! Runs once over raw selector text before parsing. Comments are removed and
//! every backslash escape is resolved, so the parser never sees a `\`.
//!
//! Escaped characters that carry meaning in the selector grammar cannot be
//! emitted as themselves (`.a\.b` must stay one class), so they are written as
//! their lowercase hex code point instead. The encoding is held back until the
//! next output character is known: before a hex digit the code point is padded
//! to six digits, and before whitespace a separating space is appended, so the
//! encoded form never merges with its neighbours.
//!
//! A `/` left directly in front of a `*` by a removed comment is encoded the
//! same way, so the output never opens a comment the input did not have.

/// Resolve the escapes and strip the comments in `input`.
#[must_use]
pub fn normalize(input: &str) -> String {
    EscapeNormalizer::new(input).run()
}

/// Single-pass escape normalizer.
///
/// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
pub struct EscapeNormalizer {
    /// The input being normalized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Normalized text produced so far
    output: String,
    /// Structural code point waiting for the next output character
    pending: Option<u32>,
}

impl EscapeNormalizer {
    /// Create a normalizer over the given raw selector text.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        let input: String = input.into();
        Self {
            output: String::with_capacity(input.len()),
            input: input.chars().collect(),
            position: 0,
            pending: None,
        }
    }

    /// Normalize the whole input and return the result.
    #[must_use]
    pub fn run(mut self) -> String {
        while let Some(c) = self.consume() {
            match c {
                '/' if self.peek() == Some('*') => {
                    self.consume_comment();
                    if self.pending.is_none()
                        && self.peek() == Some('*')
                        && self.output.ends_with('/')
                    {
                        let _ = self.output.pop();
                        self.emit_escaped('/');
                    }
                }
                '\\' => {
                    let resolved = self.consume_escaped_code_point();
                    self.emit_escaped(resolved);
                }
                _ => self.push_output(c),
            }
        }
        self.flush_pending(None);
        self.output
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Skip past the closing `*/`. An unterminated comment runs to the end.
    fn consume_comment(&mut self) {
        let _ = self.consume(); // '*'
        while let Some(c) = self.consume() {
            if c == '*' && self.peek() == Some('/') {
                let _ = self.consume();
                return;
            }
        }
    }

    /// Called with the backslash already consumed.
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::from(c);
                // at most six hex digits in total
                for _ in 0..5 {
                    match self.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            hex.push(d);
                            self.position += 1;
                        }
                        _ => break,
                    }
                }
                // a single whitespace terminates the escape and is swallowed
                if self.peek().is_some_and(char::is_whitespace) {
                    self.position += 1;
                }
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0);
                if code_point == 0 {
                    char::REPLACEMENT_CHARACTER
                } else {
                    // surrogates and out-of-range values are rejected by from_u32
                    char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER)
                }
            }
            Some(c) => c,
            None => char::REPLACEMENT_CHARACTER,
        }
    }

    fn push_output(&mut self, c: char) {
        self.flush_pending(Some(c));
        self.output.push(c);
    }

    fn emit_escaped(&mut self, c: char) {
        if !is_structural(c) {
            self.push_output(c);
            return;
        }
        // the new encoding starts with a hex digit
        self.flush_pending(Some('0'));
        self.pending = Some(u32::from(c));
    }

    fn flush_pending(&mut self, next: Option<char>) {
        let Some(code_point) = self.pending.take() else {
            return;
        };
        match next {
            Some(next) if next.is_ascii_hexdigit() => {
                self.output.push_str(&format!("{code_point:06x}"));
            }
            Some(next) if next.is_whitespace() => {
                self.output.push_str(&format!("{code_point:x} "));
            }
            _ => self.output.push_str(&format!("{code_point:x}")),
        }
    }
}

/// Characters the selector grammar reacts to.
fn is_structural(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            ',' | '\\'
                | '/'
                | '>'
                | '+'
                | '~'
                | '#'
                | '.'
                | ':'
                | '['
                | ']'
                | '('
                | ')'
                | '*'
                | '='
                | '"'
                | '\''
                | '^'
                | '$'
                | '|'
        )
}
