mod client;
mod config;
pub(crate) mod models;

pub use client::*;
pub use config::*;
