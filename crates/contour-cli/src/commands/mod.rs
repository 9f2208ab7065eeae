//! CLI command implementations.

pub mod modules;
pub mod render;
pub mod scenarios;
pub mod solve;
