//! Segment model for materialized templates.
//!
//! A template is an ordered list of segments: literal text spans and holes.
//! Holes carry their formatting metadata (alignment, format string) and the
//! capture mode signalled by a leading sigil on the hole name.

use std::borrow::Cow;
use std::fmt;

/// How a hole's value should be captured by the logging framework.
///
/// The mode is carried on the hole name as a leading sigil and is preserved
/// verbatim in the rendered template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Capture {
    /// No sigil; the framework picks its default capture behavior.
    #[default]
    Default,
    /// `@` - destructure the value into its structure.
    Destructure,
    /// `$` - capture the value as its string form.
    Stringify,
}

impl Capture {
    /// Parse a sigil character.
    pub fn from_sigil(c: char) -> Option<Self> {
        match c {
            '@' => Some(Capture::Destructure),
            '$' => Some(Capture::Stringify),
            _ => None,
        }
    }

    /// The sigil for this mode, if any.
    pub fn sigil(self) -> Option<char> {
        match self {
            Capture::Default => None,
            Capture::Destructure => Some('@'),
            Capture::Stringify => Some('$'),
        }
    }

    /// Split a hole name into its capture mode and bare name.
    ///
    /// Borrowed names stay borrowed.
    ///
    /// # Example
    /// ```
    /// use tracing_template_cache::Capture;
    ///
    /// let (capture, bare) = Capture::split(&"@user".into());
    /// assert_eq!(capture, Capture::Destructure);
    /// assert_eq!(bare, "user");
    /// ```
    pub fn split(name: &Cow<'static, str>) -> (Capture, Cow<'static, str>) {
        let capture = name
            .chars()
            .next()
            .and_then(Capture::from_sigil)
            .unwrap_or_default();

        if capture == Capture::Default {
            return (capture, name.clone());
        }

        // Sigils are single-byte ASCII.
        let bare = match name {
            Cow::Borrowed(s) => Cow::Borrowed(&s[1..]),
            Cow::Owned(s) => Cow::Owned(s[1..].to_owned()),
        };
        (capture, bare)
    }

    /// Prefix `name` with this mode's sigil unless it already carries one.
    ///
    /// # Example
    /// ```
    /// use tracing_template_cache::Capture;
    ///
    /// assert_eq!(Capture::Stringify.apply("user"), "$user");
    /// assert_eq!(Capture::Stringify.apply("@user"), "@user");
    /// assert_eq!(Capture::Default.apply("user"), "user");
    /// ```
    pub fn apply(self, name: impl Into<Cow<'static, str>>) -> Cow<'static, str> {
        let name = name.into();
        let has_sigil = name.chars().next().and_then(Capture::from_sigil).is_some();
        match self.sigil() {
            Some(sigil) if !has_sigil => Cow::Owned(format!("{}{}", sigil, name)),
            _ => name,
        }
    }
}

/// Formatting metadata for one hole in a template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HoleSegment {
    /// Hole name without its sigil
    pub name: Cow<'static, str>,
    /// Field width; negative values left-align
    pub alignment: Option<i32>,
    /// Framework-specific format string
    pub format: Option<Cow<'static, str>>,
    /// Capture mode
    pub capture: Capture,
}

impl HoleSegment {
    /// Write this hole in template syntax: `{[sigil]name[,alignment][:format]}`.
    pub fn write_syntax(&self, out: &mut String) {
        out.push('{');
        if let Some(sigil) = self.capture.sigil() {
            out.push(sigil);
        }
        out.push_str(&self.name);
        if let Some(alignment) = self.alignment {
            out.push(',');
            out.push_str(&alignment.to_string());
        }
        if let Some(format) = &self.format {
            out.push(':');
            out.push_str(format);
        }
        out.push('}');
    }
}

/// One piece of a materialized template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A literal text span.
    Literal {
        /// The text as supplied at the call site
        raw: Cow<'static, str>,
        /// The text with braces doubled, as it appears in the template string
        escaped: Cow<'static, str>,
    },
    /// A hole to be filled by a runtime value.
    Hole(HoleSegment),
}

impl Segment {
    /// Create a literal segment, computing its escaped form.
    pub fn literal(raw: Cow<'static, str>) -> Self {
        let escaped = match escape(&raw) {
            Cow::Borrowed(_) => raw.clone(),
            Cow::Owned(s) => Cow::Owned(s),
        };
        Segment::Literal { raw, escaped }
    }

    /// Returns true for hole segments.
    pub fn is_hole(&self) -> bool {
        matches!(self, Segment::Hole(_))
    }

    /// The hole metadata, if this is a hole.
    pub fn as_hole(&self) -> Option<&HoleSegment> {
        match self {
            Segment::Hole(hole) => Some(hole),
            Segment::Literal { .. } => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal { escaped, .. } => f.write_str(escaped),
            Segment::Hole(hole) => {
                let mut out = String::new();
                hole.write_syntax(&mut out);
                f.write_str(&out)
            }
        }
    }
}

/// Double every brace so that `text` reads as literal template text.
///
/// Borrows when there is nothing to escape.
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['{', '}']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_braces() {
        assert_eq!(escape("a{b"), "a{{b");
        assert_eq!(escape("}{"), "}}{{");
        assert_eq!(escape("{{x}}"), "{{{{x}}}}");
    }

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
        assert!(matches!(escape(""), Cow::Borrowed(_)));
    }

    #[test]
    fn test_literal_segment_keeps_raw() {
        let segment = Segment::literal(Cow::Borrowed("a{b"));
        match segment {
            Segment::Literal { raw, escaped } => {
                assert_eq!(raw, "a{b");
                assert_eq!(escaped, "a{{b");
            }
            Segment::Hole(_) => panic!("expected literal"),
        }
    }

    #[test]
    fn test_split_sigils() {
        assert_eq!(
            Capture::split(&Cow::Borrowed("@user")),
            (Capture::Destructure, Cow::Borrowed("user"))
        );
        assert_eq!(
            Capture::split(&Cow::Owned("$id".to_string())),
            (Capture::Stringify, Cow::Borrowed("id"))
        );
        assert_eq!(
            Capture::split(&Cow::Borrowed("plain")),
            (Capture::Default, Cow::Borrowed("plain"))
        );
    }

    #[test]
    fn test_split_empty_name() {
        assert_eq!(
            Capture::split(&Cow::Borrowed("")),
            (Capture::Default, Cow::Borrowed(""))
        );
        assert_eq!(
            Capture::split(&Cow::Borrowed("@")),
            (Capture::Destructure, Cow::Borrowed(""))
        );
    }

    #[test]
    fn test_apply_does_not_double_sigil() {
        assert_eq!(Capture::Destructure.apply("x"), "@x");
        assert_eq!(Capture::Destructure.apply("$x"), "$x");
        assert_eq!(Capture::Default.apply("@x"), "@x");
    }

    #[test]
    fn test_apply_keeps_borrowed_when_unchanged() {
        assert!(matches!(Capture::Default.apply("x"), Cow::Borrowed("x")));
        assert!(matches!(Capture::Stringify.apply("$x"), Cow::Borrowed("$x")));
    }

    #[test]
    fn test_hole_syntax() {
        let mut hole = HoleSegment {
            name: Cow::Borrowed("x"),
            alignment: None,
            format: None,
            capture: Capture::Default,
        };
        assert_eq!(Segment::Hole(hole.clone()).to_string(), "{x}");

        hole.alignment = Some(-3);
        assert_eq!(Segment::Hole(hole.clone()).to_string(), "{x,-3}");

        hole.format = Some(Cow::Borrowed("F2"));
        hole.capture = Capture::Destructure;
        assert_eq!(Segment::Hole(hole.clone()).to_string(), "{@x,-3:F2}");

        hole.alignment = None;
        assert_eq!(Segment::Hole(hole).to_string(), "{@x:F2}");
    }
}
