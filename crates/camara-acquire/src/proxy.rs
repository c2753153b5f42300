//! Proxy mode: ask a backend that already formats the report.

use camara_model::{ProxyEnvelope, ProxyOutcome};

use crate::config::USER_AGENT;
use crate::error::{ConsultaError, Result};

#[derive(Debug, Clone)]
pub struct ProxyResolver {
    http: reqwest::Client,
    base_url: String,
}

impl ProxyResolver {
    /// `base_url` is the backend origin, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /consulta/{query}`; `query` is percent-encoded as one path segment.
    pub fn consulta_url(&self, query: &str) -> String {
        format!("{}/consulta/{}", self.base_url, urlencoding::encode(query))
    }

    /// Fetch the envelope for an already whitespace-normalized query.
    pub async fn fetch(&self, query: &str) -> Result<ProxyOutcome> {
        let url = self.consulta_url(query);
        tracing::info!(url = %url, "Querying proxy");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| ConsultaError::network(&url, source))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "Proxy request failed");
            return Err(ConsultaError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ConsultaError::network(&url, source))?;
        let envelope: ProxyEnvelope =
            serde_json::from_str(&body).map_err(|source| ConsultaError::decode(&url, source))?;

        if !envelope.is_success() {
            tracing::info!(status = %envelope.status, "Proxy answered with a message");
        }
        Ok(envelope.into_outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consulta_url_encodes_whole_identifier() {
        let proxy = ProxyResolver::new("http://localhost:8000/").unwrap();
        assert_eq!(
            proxy.consulta_url("pl 2306 / 2020"),
            "http://localhost:8000/consulta/pl%202306%20%2F%202020"
        );
    }
}
