// ABOUTME: Planforge server binary support: configuration, HTTP layers, and startup
// ABOUTME: Shared by the `planforge` binary and its tests

pub mod config;
pub mod middleware;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_app, build_state, run_server};

#[cfg(test)]
mod tests;
