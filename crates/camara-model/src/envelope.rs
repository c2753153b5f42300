use serde::{Deserialize, Serialize};

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Shown when the proxy reports a failure without saying why.
pub const GENERIC_FAILURE: &str = "Erro ao consultar proposição";

/// Body of `GET /consulta/{identifier}`: `{status, data?, message?}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyEnvelope {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What a client does with an envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ProxyOutcome {
    /// Tagged report text to render.
    Report(String),
    /// A failure the backend chose to explain; displayed, not raised.
    Message(String),
}

impl ProxyEnvelope {
    pub fn success(data: impl Into<String>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data: Some(data.into()),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Any status other than `success` becomes a displayable message.
    pub fn into_outcome(self) -> ProxyOutcome {
        if self.is_success() {
            ProxyOutcome::Report(self.data.unwrap_or_default())
        } else {
            ProxyOutcome::Message(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            )
        }
    }
}
