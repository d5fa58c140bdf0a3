//! Default value functions for configuration.

use rand::Rng;

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_host() -> String {
    "irc.freenode.net".to_string()
}

pub fn default_port() -> u16 {
    6667
}

pub fn default_max_line_len() -> usize {
    slirc_proto::DEFAULT_MAX_LINE_LEN
}

// =============================================================================
// Chat Defaults
// =============================================================================

pub fn default_channels() -> Vec<String> {
    vec!["#superpowers-html5".to_string()]
}

// =============================================================================
// Identity Defaults
// =============================================================================

/// A throwaway nickname of the form `supNNNNN`.
pub fn random_nickname() -> String {
    let n: u32 = rand::thread_rng().gen_range(10_000..100_000);
    format!("sup{n}")
}
