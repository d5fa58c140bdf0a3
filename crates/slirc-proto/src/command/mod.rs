//! IRC commands used by the chat client.

mod parse;
mod serialize;
mod types;
pub(crate) mod util;

pub use self::types::Command;
