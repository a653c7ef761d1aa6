//! radarr-relay - glue between Unmanic and Radarr
//!
//! This library crate exposes the core functionality for integration testing.

pub mod arr;
pub mod config;
pub mod error;
pub mod notify;
pub mod routing;
pub mod server;
pub mod unmanic;

#[cfg(test)]
pub(crate) mod testing;
