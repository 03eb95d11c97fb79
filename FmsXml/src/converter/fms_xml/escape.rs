//! XML escaping for FMS text
//!
//! Strings are written as escaped XML text and read back through the exact
//! inverse mapping. Unescaping is a single pass, so `&amp;lt;` becomes `&lt;`
//! rather than `<`.

use std::borrow::Cow;

use crate::error::{Error, Result};

/// Raw characters and their escape sequences. `&` comes first.
const ESCAPES: [(char, &str); 6] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&apos;"),
    ('\n', "&#xA;"),
];

fn escape_for(c: char) -> Option<&'static str> {
    ESCAPES
        .iter()
        .find(|(raw, _)| *raw == c)
        .map(|(_, seq)| *seq)
}

/// Escape characters that may appear in .fms strings but are illegal or
/// unstable in XML text (`& < > " '` and newline).
pub fn escape_text(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| escape_for(c).is_some()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match escape_for(c) {
            Some(seq) => out.push_str(seq),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Reverse [`escape_text`].
///
/// Sequences outside the table (other entities, numeric references) are
/// left untouched.
pub fn unescape_text(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some((raw, seq)) = ESCAPES.iter().find(|(_, seq)| rest.starts_with(seq)) {
            out.push(*raw);
            rest = &rest[seq.len()..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Reject text containing `\r`.
///
/// Only `\n` line breaks survive the XML representation.
pub fn ensure_no_carriage_return(text: &str, index: usize) -> Result<()> {
    if text.contains('\r') {
        return Err(Error::UnsupportedCarriageReturn { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all() {
        assert_eq!(
            escape_text("a&b<c>d\"e'f\ng"),
            "a&amp;b&lt;c&gt;d&quot;e&apos;f&#xA;g"
        );
    }

    #[test]
    fn test_escape_borrows_plain_text() {
        assert!(matches!(escape_text("Alain"), Cow::Borrowed("Alain")));
        assert!(matches!(unescape_text("Alain"), Cow::Borrowed("Alain")));
    }

    #[test]
    fn test_no_double_escape() {
        assert_eq!(escape_text("&lt;"), "&amp;lt;");
        assert_eq!(unescape_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_unescape_all() {
        assert_eq!(
            unescape_text("a&amp;b&lt;c&gt;d&quot;e&apos;f&#xA;g"),
            "a&b<c>d\"e'f\ng"
        );
    }

    #[test]
    fn test_unknown_sequences_pass_through() {
        assert_eq!(unescape_text("&nbsp; & &#10; &"), "&nbsp; & &#10; &");
    }

    #[test]
    fn test_inverse() {
        for text in [
            "",
            "plain",
            "Tom & Jerry",
            "<b>bold</b>",
            "line one\nline two\n",
            "it's \"quoted\"",
            "&amp; already escaped",
            "&&&;;;",
            "日本語のテキスト",
        ] {
            assert_eq!(unescape_text(&escape_text(text)), text);
        }
    }

    #[test]
    fn test_carriage_return() {
        assert!(ensure_no_carriage_return("a\nb", 0).is_ok());
        assert!(matches!(
            ensure_no_carriage_return("a\r\nb", 3),
            Err(Error::UnsupportedCarriageReturn { index: 3 })
        ));
    }
}
