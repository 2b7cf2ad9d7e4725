//! Keys for formatted-hole edges.
//!
//! Two formatted holes share a trie edge only when their name, alignment and
//! format string are all equal.

use std::borrow::Cow;

/// Value-equality key for a formatted hole.
///
/// Names and formats are `Cow<'static, str>` so static call-site text is never
/// copied when building a key.
///
/// # Example
/// ```
/// use tracing_template_cache::FormatKey;
///
/// let key = FormatKey::new("elapsed").with_alignment(8).with_format("F2");
/// assert_eq!(key.name(), "elapsed");
/// assert_eq!(key.alignment(), Some(8));
/// assert_eq!(key.format(), Some("F2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormatKey {
    name: Cow<'static, str>,
    alignment: Option<i32>,
    format: Option<Cow<'static, str>>,
}

impl FormatKey {
    /// Create a key with no alignment and no format.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            alignment: None,
            format: None,
        }
    }

    /// Set the field width. Negative values left-align.
    pub fn with_alignment(mut self, alignment: i32) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Set the format string.
    pub fn with_format(mut self, format: impl Into<Cow<'static, str>>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Hole name, including any sigil.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alignment(&self) -> Option<i32> {
        self.alignment
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub(crate) fn name_cow(&self) -> &Cow<'static, str> {
        &self.name
    }

    pub(crate) fn format_cow(&self) -> Option<&Cow<'static, str>> {
        self.format.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equal_keys() {
        let a = FormatKey::new("x").with_alignment(5).with_format("F2");
        let b = FormatKey::new(String::from("x"))
            .with_alignment(5)
            .with_format(String::from("F2"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_keys() {
        let base = FormatKey::new("x").with_alignment(5).with_format("F2");
        let keys = [
            base.clone(),
            FormatKey::new("x").with_alignment(6).with_format("F2"),
            FormatKey::new("x").with_alignment(5).with_format("F3"),
            FormatKey::new("y").with_alignment(5).with_format("F2"),
            FormatKey::new("x").with_format("F2"),
            FormatKey::new("x").with_alignment(5),
            FormatKey::new("x"),
        ];

        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_sigil_is_part_of_name() {
        assert_ne!(FormatKey::new("@x"), FormatKey::new("x"));
    }
}
