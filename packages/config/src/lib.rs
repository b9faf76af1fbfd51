// ABOUTME: Configuration package for Planforge
// ABOUTME: Environment variable names and typed lookup helpers

pub mod constants;
pub mod env;

pub use env::{env_or, env_parse, env_secret};
