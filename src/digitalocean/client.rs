use std::time::Duration;

use snafu::prelude::*;

use crate::common::{
    key_file_or_string, ApiResponse, ConfigSnafu, DecodeSnafu, Error, RequestSnafu, Result,
    Transport, ValidationSnafu,
};

pub const CLIENT_NAME: &str = "DigitalOcean";

/// Blocking client for the DigitalOcean v2 API.
pub struct DigitalOcean {
    agent: ureq::Agent,
    api_token: String,
    base_url: url::Url,
}

impl std::fmt::Debug for DigitalOcean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOcean")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl DigitalOcean {
    pub fn new(api_token: String, mut base_url: url::Url, timeout: Duration) -> Self {
        // Url::join drops the last segment unless the base ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_token,
            base_url,
        }
    }

    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    pub(crate) fn url_for(&self, path: &str) -> Result<url::Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| {
                ValidationSnafu {
                    message: format!("Invalid API path {path}: {err}"),
                }
                .build()
            })
    }

    fn with_headers(&self, req: ureq::Request) -> ureq::Request {
        req.set("Authorization", &format!("Bearer {}", self.api_token))
            .set("Content-Type", "application/json")
    }

    fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<ApiResponse> {
        let url = self.url_for(path)?;
        tracing::debug!(
            url = url.as_str(),
            method = method,
            client = CLIENT_NAME,
            "Sending request"
        );

        let req = self.with_headers(self.agent.request_url(method, &url));
        let result = match body {
            Some(body) => req.send_json(body),
            None => req.call(),
        };

        // Error statuses are the provider's answer, not a transport fault.
        let resp = match result {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(err) => {
                return Err(err).context(RequestSnafu {
                    url: url.as_str(),
                    method,
                })
            }
        };

        let status = resp.status();
        let text = resp
            .into_string()
            .boxed_local()
            .context(DecodeSnafu {
                message: format!("Failed to read response to {method} {url}"),
            })?;

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)
                .boxed_local()
                .context(DecodeSnafu {
                    message: format!("Failed to deserialize response to {method} {url}"),
                })?
        };

        tracing::debug!(
            url = url.as_str(),
            method = method,
            status = status,
            client = CLIENT_NAME,
            "Received response"
        );

        Ok(ApiResponse { status, body })
    }
}

impl Transport for DigitalOcean {
    fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send("GET", path, None)
    }

    fn post(&self, path: &str, body: serde_json::Value) -> Result<ApiResponse> {
        self.send("POST", path, Some(body))
    }

    fn put(&self, path: &str, body: serde_json::Value) -> Result<ApiResponse> {
        self.send("PUT", path, Some(body))
    }

    fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send("DELETE", path, None)
    }
}

impl TryFrom<super::Config> for DigitalOcean {
    type Error = Error;

    fn try_from(value: super::Config) -> Result<Self> {
        let token = value.token().map(str::to_owned).context(ConfigSnafu {
            message: "an API token is required (DO_API_TOKEN or DO_API_KEY)",
            prefix: "digitalocean",
        })?;
        let api_token = key_file_or_string(token, "digitalocean")?;

        Ok(Self::new(
            api_token,
            value.base_url,
            Duration::from_secs(value.timeout_secs),
        ))
    }
}
