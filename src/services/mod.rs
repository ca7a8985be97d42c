//! Services
//!
//! Business logic layer. The sync service owns every cached view of remote
//! git state and is the only writer to it.

pub mod sync;
