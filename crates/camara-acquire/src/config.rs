//! Endpoint configuration for the open-data API and the tracking site.

use std::time::Duration;

use camara_model::record::TRACKING_PAGE_BASE;

use crate::error::Result;

/// Public v2 API root.
pub const DEFAULT_API_BASE: &str = "https://dadosabertos.camara.leg.br/api/v2";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("camara-consulta/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root without trailing slash, e.g. `https://dadosabertos.camara.leg.br/api/v2`.
    pub api_base: String,
    /// Prefix the proposition id is appended to for the public tracking page.
    pub tracking_page_base: String,
    pub user_agent: String,
    /// No timeout unless set; requests otherwise wait on the platform default.
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            tracking_page_base: TRACKING_PAGE_BASE.to_string(),
            user_agent: USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_tracking_page_base(mut self, base: &str) -> Self {
        self.tracking_page_base = base.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the shared HTTP client for this configuration.
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(&self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}
