//! Episode Service Common Library
//!
//! Shared viewer and quality types used by both server and client.

pub mod types;

pub use types::*;
