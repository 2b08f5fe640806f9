pub const DEFAULT_BASE_URL: &str = "https://api.digitalocean.com/v2/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> url::Url {
    url::Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid")
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Clone, serde::Deserialize)]
pub struct Config {
    /// Read from DO_API_TOKEN.
    pub api_token: Option<String>,
    /// Legacy name for the same v2 token, read from DO_API_KEY.
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: url::Url,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// The token to authenticate with, current name first.
    pub fn token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .or(self.api_key.as_deref())
            .filter(|t| !t.trim().is_empty())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &self.api_token.as_ref().map(|_| "<REDACTED>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<REDACTED>"))
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
