//! IRC case-mapping functions.
//!
//! Nickname and channel comparisons are case-insensitive over a mapping the
//! server advertises through the `CASEMAPPING` ISUPPORT token. Until a server
//! says otherwise, `rfc1459` is assumed.

use std::str::FromStr;

/// A server-defined casemapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseMapping {
    /// Only `A-Z` fold to `a-z`.
    Ascii,
    /// ASCII plus `[]\~` folding to `{}|^`.
    #[default]
    Rfc1459,
    /// ASCII plus `[]\` folding to `{}|`; `~` and `^` stay distinct.
    StrictRfc1459,
}

impl CaseMapping {
    /// Lowercase a single character under this mapping.
    #[inline]
    pub const fn lower_char(self, c: char) -> char {
        match (self, c) {
            (_, 'A'..='Z') => (c as u8 + 32) as char,
            (CaseMapping::Ascii, _) => c,
            (_, '[') => '{',
            (_, ']') => '}',
            (_, '\\') => '|',
            (CaseMapping::Rfc1459, '~') => '^',
            _ => c,
        }
    }

    /// Lowercase a whole string under this mapping.
    pub fn to_lower(self, s: &str) -> String {
        s.chars().map(|c| self.lower_char(c)).collect()
    }

    /// Compare two strings case-insensitively under this mapping.
    pub fn eq(self, a: &str, b: &str) -> bool {
        if a.len() != b.len() {
            return false;
        }

        a.chars()
            .zip(b.chars())
            .all(|(ca, cb)| self.lower_char(ca) == self.lower_char(cb))
    }

    /// The ISUPPORT token value for this mapping.
    pub fn as_str(self) -> &'static str {
        match self {
            CaseMapping::Ascii => "ascii",
            CaseMapping::Rfc1459 => "rfc1459",
            CaseMapping::StrictRfc1459 => "strict-rfc1459",
        }
    }
}

/// Error returned for a `CASEMAPPING` value this crate does not implement.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported casemapping: {0}")]
pub struct UnknownCaseMapping(pub String);

impl FromStr for CaseMapping {
    type Err = UnknownCaseMapping;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" => Ok(CaseMapping::Ascii),
            "rfc1459" => Ok(CaseMapping::Rfc1459),
            "strict-rfc1459" => Ok(CaseMapping::StrictRfc1459),
            _ => Err(UnknownCaseMapping(s.to_owned())),
        }
    }
}

/// Convert a single character to IRC lowercase using RFC 1459 case mapping.
#[inline]
pub const fn irc_lower_char(c: char) -> char {
    CaseMapping::Rfc1459.lower_char(c)
}

/// Convert a string to IRC lowercase using RFC 1459 case mapping.
pub fn irc_to_lower(s: &str) -> String {
    CaseMapping::Rfc1459.to_lower(s)
}

/// Compare two strings using RFC 1459 case-insensitive comparison.
pub fn irc_eq(a: &str, b: &str) -> bool {
    CaseMapping::Rfc1459.eq(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_irc_lower_char() {
        assert_eq!(irc_lower_char('A'), 'a');
        assert_eq!(irc_lower_char('Z'), 'z');

        assert_eq!(irc_lower_char('['), '{');
        assert_eq!(irc_lower_char(']'), '}');
        assert_eq!(irc_lower_char('\\'), '|');
        assert_eq!(irc_lower_char('~'), '^');

        assert_eq!(irc_lower_char('a'), 'a');
        assert_eq!(irc_lower_char('#'), '#');
    }

    #[test]
    fn test_irc_to_lower() {
        assert_eq!(irc_to_lower("HELLO"), "hello");
        assert_eq!(irc_to_lower("#Channel[1]"), "#channel{1}");
        assert_eq!(irc_to_lower("Nick\\Away"), "nick|away");
        assert_eq!(irc_to_lower("Test~Name"), "test^name");
    }

    #[test]
    fn test_irc_eq() {
        assert!(irc_eq("hello", "HELLO"));
        assert!(irc_eq("#channel[1]", "#CHANNEL{1}"));
        assert!(!irc_eq("hello", "world"));
        assert!(!irc_eq("short", "longer"));
    }

    #[test]
    fn test_ascii_mapping_keeps_brackets() {
        let ascii = CaseMapping::Ascii;
        assert_eq!(ascii.to_lower("Nick[1]"), "nick[1]");
        assert!(!ascii.eq("a[", "a{"));
        assert!(ascii.eq("ABC", "abc"));
    }

    #[test]
    fn test_strict_mapping_keeps_tilde() {
        let strict = CaseMapping::StrictRfc1459;
        assert_eq!(strict.to_lower("A~[\\]"), "a~{|}");
        assert!(!strict.eq("x~", "x^"));
        assert!(CaseMapping::Rfc1459.eq("x~", "x^"));
    }

    #[test]
    fn test_parse_token() {
        assert_eq!("rfc1459".parse(), Ok(CaseMapping::Rfc1459));
        assert_eq!("ASCII".parse(), Ok(CaseMapping::Ascii));
        assert_eq!("strict-rfc1459".parse(), Ok(CaseMapping::StrictRfc1459));
        assert!("rfc7613".parse::<CaseMapping>().is_err());
        assert_eq!(CaseMapping::default().as_str(), "rfc1459");
    }
}
