use crate::common::Result;
use crate::digitalocean::DigitalOcean;

#[derive(Clone, Debug, Default)]
pub struct Config {
    pub digitalocean: crate::digitalocean::Config,
}

impl Config {
    /// Read DO_API_TOKEN, DO_API_KEY, DO_BASE_URL and DO_TIMEOUT_SECS.
    #[cfg(feature = "cli")]
    pub fn populate_from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("DO"))
    }

    #[cfg(feature = "cli")]
    fn from_source(source: config::Environment) -> Result<Self> {
        let digitalocean: crate::digitalocean::Config = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|err| {
                crate::common::ConfigSnafu {
                    message: err.to_string(),
                    prefix: "DO",
                }
                .build()
            })?;

        Ok(Self { digitalocean })
    }

    /// An explicitly passed token wins over the environment.
    pub fn with_api_token(mut self, api_token: Option<String>) -> Self {
        if api_token.is_some() {
            self.digitalocean.api_token = api_token;
        }
        self
    }

    pub fn into_client(self) -> Result<DigitalOcean> {
        DigitalOcean::try_from(self.digitalocean)
    }
}
