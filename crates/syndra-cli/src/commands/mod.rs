//! CLI command implementations.

pub mod common;
pub mod eval;
pub mod sample;
pub mod session;
pub mod topology;
pub mod version;
