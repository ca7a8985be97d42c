//! Data Models
//!
//! Serde data types shared by the cache stores and the wire protocol.

pub mod git;
pub mod protocol;
