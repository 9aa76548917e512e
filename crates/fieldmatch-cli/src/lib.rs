//! CLI library components for the field matcher.

pub mod logging;
pub mod summary;
