//! Tokens, building blocks and statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media type meshStack expects for building block payloads.
pub const BUILDING_BLOCK_MEDIA_TYPE: &str =
    "application/vnd.meshcloud.api.meshbuildingblock.v1.hal+json;charset=UTF-8";

/// API key used to obtain an access token.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    /// Client id of the API key.
    pub client_id: String,
    /// Client secret of the API key.
    pub client_secret: String,
}

impl ApiKey {
    /// Create a new API key.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKey")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Bearer token returned by a login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a token value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` request header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(<redacted>)")
    }
}

/// A building block as listed for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingBlock {
    /// Building block UUID.
    pub uuid: String,
    /// Display name given at creation.
    pub name: String,
}

/// Lifecycle status of a building block.
///
/// meshStack may add statuses; unknown values are kept verbatim in
/// [`BuildingBlockStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildingBlockStatus {
    /// Waiting for input from another building block.
    WaitingForDependentInput,
    /// Waiting for an operator to supply input.
    WaitingForOperatorInput,
    /// Queued, not yet started.
    Pending,
    /// A run is in progress.
    InProgress,
    /// The last run succeeded.
    Succeeded,
    /// The last run failed.
    Failed,
    /// Any other status.
    Other(String),
}

impl BuildingBlockStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::WaitingForDependentInput => "WAITING_FOR_DEPENDENT_INPUT",
            Self::WaitingForOperatorInput => "WAITING_FOR_OPERATOR_INPUT",
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::Other(status) => status,
        }
    }

    /// Whether no further run is expected without a new trigger.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl From<String> for BuildingBlockStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "WAITING_FOR_DEPENDENT_INPUT" => Self::WaitingForDependentInput,
            "WAITING_FOR_OPERATOR_INPUT" => Self::WaitingForOperatorInput,
            "PENDING" => Self::Pending,
            "IN_PROGRESS" => Self::InProgress,
            "SUCCEEDED" => Self::Succeeded,
            "FAILED" => Self::Failed,
            _ => Self::Other(status),
        }
    }
}

impl From<BuildingBlockStatus> for String {
    fn from(status: BuildingBlockStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for BuildingBlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
