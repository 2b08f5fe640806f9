pub const RECORD_KIND_A: &str = "A";
pub const ROOT_RECORD_NAME: &str = "@";

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Domain {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(
        default,
        alias = "ip_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl Domain {
    /// Path segment addressing this domain in the API.
    pub fn key(&self) -> String {
        match self.id {
            Some(id) => id.to_string(),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DomainRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl DomainRecord {
    pub fn is_root_a(&self) -> bool {
        self.name == ROOT_RECORD_NAME && self.kind == RECORD_KIND_A
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
}

impl std::str::FromStr for DesiredState {
    type Err = super::Error;

    fn from_str(s: &str) -> super::Result<Self> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => super::ValidationSnafu {
                message: format!("state must be one of present, absent; got {other}"),
            }
            .fail(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Params {
    pub state: DesiredState,
    pub id: Option<u64>,
    pub name: Option<String>,
    pub ip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub changed: bool,
    pub domain: Option<Domain>,
}

/// What the caller gets back, success or failure.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Report {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<Domain>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl Report {
    pub fn is_failure(&self) -> bool {
        self.msg.is_some()
    }
}

impl From<super::Result<Outcome>> for Report {
    fn from(value: super::Result<Outcome>) -> Self {
        match value {
            Ok(outcome) => Report {
                changed: outcome.changed,
                domain: outcome.domain,
                msg: None,
                exception: None,
            },
            Err(err) => Report {
                changed: false,
                domain: None,
                msg: Some(err.to_string()),
                exception: err
                    .is_transport()
                    .then(|| snafu::Report::from_error(&err).to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The provider's error message, or the bare status when the body has none.
    pub fn message(&self) -> String {
        match self.body.get("message").and_then(|m| m.as_str()) {
            Some(message) => message.to_string(),
            None => format!("HTTP {}", self.status),
        }
    }
}

/// Minimal HTTP surface the reconciler needs from the provider API.
/// Paths are relative to the API base, e.g. `domains/`.
pub trait Transport {
    fn get(&self, path: &str) -> super::Result<ApiResponse>;
    fn post(&self, path: &str, body: serde_json::Value) -> super::Result<ApiResponse>;
    fn put(&self, path: &str, body: serde_json::Value) -> super::Result<ApiResponse>;
    fn delete(&self, path: &str) -> super::Result<ApiResponse>;
}
