mod client;
mod types;

pub use client::{RadarrApi, RadarrClient};
pub use types::*;
