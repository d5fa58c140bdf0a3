//! IRC message source prefixes.
//!
//! # Reference
//! - RFC 2812 Section 2.3.1: Message format

mod serialize;
mod types;

pub use self::types::Prefix;
