//! ISUPPORT (RPL_ISUPPORT / 005) parsing.
//!
//! The client only consults a handful of tokens (`CASEMAPPING`, `PREFIX`,
//! `NETWORK`) but keeps every entry so later lookups stay cheap.
//!
//! # Reference
//! - Modern IRC documentation: <https://modern.ircdocs.horse/isupport.html>

use crate::casemap::CaseMapping;
use crate::command::Command;
use crate::response::Response;
use crate::Message;

/// A single ISUPPORT key-value entry.
///
/// Represents a token from an ISUPPORT line, which can be either:
/// - A bare key (e.g., `EXCEPTS`) indicating a feature is supported
/// - A key=value pair (e.g., `NETWORK=Libera.Chat`)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IsupportEntry<'a> {
    /// The token key (e.g., `NETWORK`, `CHANTYPES`).
    pub key: &'a str,
    /// The optional value (e.g., `Libera.Chat` for `NETWORK=Libera.Chat`).
    pub value: Option<&'a str>,
}

/// Tokens from one `RPL_ISUPPORT` reply.
///
/// # Example
///
/// ```
/// use slirc_proto::isupport::parse_params;
/// use slirc_proto::CaseMapping;
///
/// let isupport = parse_params(&["NETWORK=TestNet", "CASEMAPPING=ascii"]);
///
/// assert_eq!(isupport.network(), Some("TestNet"));
/// assert_eq!(isupport.casemapping(), Some(CaseMapping::Ascii));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Isupport<'a> {
    entries: Vec<IsupportEntry<'a>>,
}

impl<'a> Isupport<'a> {
    /// Parse ISUPPORT from raw `RPL_ISUPPORT` response arguments.
    ///
    /// Skips the first argument (target nickname) and trailing text.
    pub fn from_response_args(args: &[&'a str]) -> Option<Self> {
        let (_target, mut tokens) = args.split_first()?;

        if let Some(last) = tokens.last() {
            if last.contains(' ') {
                tokens = &tokens[..tokens.len() - 1];
            }
        }
        Some(parse_params(tokens))
    }

    /// Parse ISUPPORT from a message.
    ///
    /// Returns `None` if the message is not an `RPL_ISUPPORT` (005) reply.
    pub fn from_message(msg: &'a Message) -> Option<Self> {
        match &msg.command {
            Command::Numeric(code, args) if *code == Response::RPL_ISUPPORT.code() => {
                let borrowed: Vec<&'a str> = args.iter().map(String::as_str).collect();
                Self::from_response_args(&borrowed)
            }
            _ => None,
        }
    }

    /// Iterate over all parsed ISUPPORT entries.
    pub fn iter(&self) -> impl Iterator<Item = &IsupportEntry<'a>> {
        self.entries.iter()
    }

    /// Get the value for a specific ISUPPORT key.
    ///
    /// Returns `Some(Some(value))` if the key has a value,
    /// `Some(None)` if the key exists without a value,
    /// or `None` if the key is not present.
    pub fn get(&self, key: &str) -> Option<Option<&'a str>> {
        self.entries
            .iter()
            .rfind(|e| e.key.eq_ignore_ascii_case(key))
            .map(|e| e.value)
    }

    /// The advertised `CASEMAPPING`, if it is one we know.
    pub fn casemapping(&self) -> Option<CaseMapping> {
        self.get("CASEMAPPING")
            .flatten()
            .and_then(|v| v.parse().ok())
    }

    /// Get the `NETWORK` name (e.g., `Libera.Chat`).
    pub fn network(&self) -> Option<&'a str> {
        self.get("NETWORK").flatten()
    }

    /// The membership prefix symbols from `PREFIX`, highest rank first.
    ///
    /// `PREFIX=(ov)@+` yields `"@+"`.
    pub fn prefix_symbols(&self) -> Option<&'a str> {
        let value = self.get("PREFIX").flatten()?;
        let symbols = match value.split_once(')') {
            Some((_modes, symbols)) => symbols,
            None => value,
        };
        (!symbols.is_empty()).then_some(symbols)
    }
}

/// Parse ISUPPORT tokens from a slice of string parameters.
///
/// Tokens are parsed as `KEY` or `KEY=VALUE` pairs.
pub fn parse_params<'a>(params: &[&'a str]) -> Isupport<'a> {
    let mut entries = Vec::with_capacity(params.len());
    for &p in params {
        if p.starts_with(':') {
            break;
        }
        if p.is_empty() {
            continue;
        }
        let (key, value) = match p.split_once('=') {
            Some((k, v)) => (k, Some(v)),
            None => (p, None),
        };

        entries.push(IsupportEntry { key, value });
    }
    Isupport { entries }
}
