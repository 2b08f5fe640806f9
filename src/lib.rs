pub mod common;
pub mod config;
pub mod digitalocean;
pub mod service;

pub use self::config::*;
