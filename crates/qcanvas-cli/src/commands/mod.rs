//! CLI command implementations.

pub mod common;
pub mod project;
pub mod validate;
pub mod version;
