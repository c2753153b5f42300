//! Error types for proposition lookups.
//!
//! Every variant's `Display` is the message the user sees in the error card,
//! so messages are written for people, not for logs.

use camara_model::IdentifierError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsultaError {
    /// Input did not look like `PL 2306/2020`.
    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    /// The search returned no propositions.
    #[error("Proposição não encontrada: {0}")]
    NotFound(String),

    /// Connection, TLS or body-read failure. The URL and cause go to the
    /// logs, not to the message.
    #[error("Erro de rede ao consultar proposição")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx answer.
    #[error("Erro ao consultar proposição (HTTP {status})")]
    Status { status: u16, url: String },

    /// Body was not the JSON shape the endpoint promises.
    #[error("Resposta inválida do servidor ao consultar proposição")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failure building the HTTP client itself.
    #[error("Falha ao preparar o cliente HTTP: {0}")]
    Client(#[from] reqwest::Error),
}

impl ConsultaError {
    pub(crate) fn network(url: &str, source: reqwest::Error) -> Self {
        tracing::warn!(url, error = %source, "Network failure");
        ConsultaError::Network {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn decode(url: &str, source: serde_json::Error) -> Self {
        tracing::warn!(url, error = %source, "Undecodable response");
        ConsultaError::Decode {
            url: url.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsultaError>;
