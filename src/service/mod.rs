#[cfg(test)]
pub(crate) mod fake;
mod service;

pub use service::*;
