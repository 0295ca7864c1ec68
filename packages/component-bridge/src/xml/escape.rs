//! Attribute and text escaping for generated documents.

use std::borrow::Cow;

/// Escape `&`, `<` and `>` with their entity references.
///
/// No other characters are touched. Returns the input unchanged (borrowed)
/// when nothing needs escaping.
///
/// # Examples
/// ```
/// use component_bridge::xml::escape;
///
/// assert_eq!(escape("a<b>&c"), "a&lt;b&gt;&amp;c");
/// assert_eq!(escape("plain"), "plain");
/// ```
pub fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>']) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}
