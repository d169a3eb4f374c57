//! Utility modules for common functionality across the crate.

pub mod slug;
pub mod tracing_targets;
