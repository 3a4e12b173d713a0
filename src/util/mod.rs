//! Utility functions.

pub mod env;
pub mod format;

pub use format::{format_count, format_ratio, or_dash, truncate};
