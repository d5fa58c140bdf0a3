//! Integration test common infrastructure.
//!
//! Provides an in-memory connector and a scripted server peer so the full
//! client can be driven without a network.

pub mod connector;
pub mod server;
pub mod sink;

#[allow(unused_imports)]
pub use connector::DuplexConnector;
#[allow(unused_imports)]
pub use server::TestPeer;
#[allow(unused_imports)]
pub use sink::{ChannelSink, SinkWatcher};

use slirc_chat::config::Config;

/// Config with a fixed nickname and no autojoin.
#[allow(dead_code)]
pub fn test_config(nick: &str) -> Config {
    format!("[identity]\nnickname = \"{nick}\"\n\n[chat]\nchannels = []")
        .parse()
        .expect("valid test config")
}
