use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{message}"))]
    ValidationError { message: String },
    #[snafu(display("{message}"))]
    NotFoundError { message: String },
    #[snafu(display("{message}"))]
    ProviderError { status: u16, message: String },
    #[snafu(display("Domain {domain} has no root A record"))]
    ZoneRecordMissing { domain: String },
    #[snafu(display("{method} {url} failed: {source}"))]
    RequestError {
        url: String,
        method: String,
        source: ureq::Error,
    },
    #[snafu(display("{message}: {source}"))]
    DecodeError {
        message: String,
        source: Box<dyn std::error::Error>,
    },
    #[snafu(display("Invalid {prefix} configuration: {message}"))]
    ConfigError { message: String, prefix: String },
}

impl Error {
    /// Network and (de)serialization faults. These are the only failures
    /// reported with a full error chain.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::RequestError { .. } | Error::DecodeError { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
