//! Shell-style file name patterns for directory includes.

use regex::Regex;

/// A compiled `*`/`?` pattern matched against a whole file name.
///
/// Matching is case-sensitive; every other character matches itself.
///
/// # Examples
/// ```
/// use component_bridge::pattern::NamePattern;
///
/// let pattern = NamePattern::new("*.xconf");
/// assert!(pattern.matches("cache.xconf"));
/// assert!(!pattern.matches("cache.xconf.bak"));
/// ```
#[derive(Debug, Clone)]
pub struct NamePattern {
    source: String,
    regex: Regex,
}

impl NamePattern {
    /// Compile a pattern.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push('^');
        for ch in pattern.chars() {
            match ch {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                _ => expr.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
            }
        }
        expr.push('$');

        #[allow(clippy::expect_used)] // Every literal is escaped, so the expression is valid
        let regex = Regex::new(&expr).expect("escaped pattern is a valid regex");
        Self {
            source: pattern.to_string(),
            regex,
        }
    }

    /// Check a file name against the pattern.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}
