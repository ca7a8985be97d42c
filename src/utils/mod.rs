//! Shared Utilities

pub mod error;
