mod comparison;
mod config;
mod error;
mod models;

pub(crate) use comparison::*;
pub(crate) use config::*;
pub use error::*;
pub use models::*;
