//! Command implementations.

pub mod delete;
pub mod list;
pub mod show;
pub mod sync;
pub mod version;
