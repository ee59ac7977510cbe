//! Codec module - JSON serialization for method payloads.
//!
//! - [`JsonCodec`] - decodes raw payloads into a method's input type and
//!   encodes handler outputs
//!
//! # Design
//!
//! The codec is a marker struct with static methods rather than a trait
//! object. Each registered method monomorphizes its own decode call for its
//! declared input type, so no type information is lost at dispatch time.

mod json;

pub use json::{JsonCodec, EMPTY_PAYLOAD};
