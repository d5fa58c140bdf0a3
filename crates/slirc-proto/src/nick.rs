//! Nickname utilities.
//!
//! Validation per RFC 2812 and splitting of membership prefixes found in
//! `RPL_NAMREPLY` entries.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format (nickname definition)

/// Extension trait for checking if a string is a valid IRC nickname.
pub trait NickExt {
    /// Check if this string is a valid IRC nickname per RFC 2812.
    ///
    /// ```
    /// use slirc_proto::NickExt;
    ///
    /// assert!("Nick123".is_valid_nick());
    /// assert!("[cool]".is_valid_nick());
    /// assert!(!"123nick".is_valid_nick());
    /// assert!(!"nick name".is_valid_nick());
    /// ```
    fn is_valid_nick(&self) -> bool;

    /// Same as [`NickExt::is_valid_nick`] with an explicit length limit.
    fn is_valid_nick_len(&self, max_len: usize) -> bool;
}

/// Default maximum nickname length.
pub const DEFAULT_NICK_MAX_LEN: usize = 30;

/// Membership prefixes in descending rank: founder, admin, op, halfop, voice.
///
/// Used until the server's `PREFIX` ISUPPORT token says otherwise.
pub const MEMBERSHIP_PREFIXES: &str = "~&@%+";

#[inline]
fn is_special(c: char) -> bool {
    matches!(c, '[' | ']' | '\\' | '`' | '_' | '^' | '{' | '|' | '}')
}

impl NickExt for str {
    fn is_valid_nick(&self) -> bool {
        self.is_valid_nick_len(DEFAULT_NICK_MAX_LEN)
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        if self.is_empty() || self.len() > max_len {
            return false;
        }

        let mut chars = self.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || is_special(first) => {}
            _ => return false,
        }

        chars.all(|c| c.is_ascii_alphanumeric() || is_special(c) || c == '-')
    }
}

impl NickExt for String {
    fn is_valid_nick(&self) -> bool {
        self.as_str().is_valid_nick()
    }

    fn is_valid_nick_len(&self, max_len: usize) -> bool {
        self.as_str().is_valid_nick_len(max_len)
    }
}

/// Split a NAMES entry into its highest membership prefix and the nickname.
///
/// Servers with `multi-prefix` may send several prefixes (`@+nick`); only
/// the first, highest-ranked one is kept.
pub fn split_membership_prefix(entry: &str) -> (Option<char>, &str) {
    split_membership_prefix_with(entry, MEMBERSHIP_PREFIXES)
}

/// Same as [`split_membership_prefix`] for a server-specific prefix set.
pub fn split_membership_prefix_with<'a>(entry: &'a str, prefixes: &str) -> (Option<char>, &'a str) {
    let nick = entry.trim_start_matches(|c: char| prefixes.contains(c));
    let mode = entry.chars().next().filter(|c| prefixes.contains(*c));
    (mode, nick)
}
