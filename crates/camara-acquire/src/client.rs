//! Thin typed client over the Câmara open-data API.

use camara_model::api::{
    ApiItem, ApiList, Author, Deputy, Organ, PropositionDetails, PropositionSummary, Tramitacao,
};
use camara_model::record::tracking_page_url;
use camara_model::BillType;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{ConsultaError, Result};

#[derive(Debug, Clone)]
pub struct CamaraClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl CamaraClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = config.build_http_client()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Public tracking page for a proposition id.
    pub fn tracking_url(&self, id: u64) -> String {
        tracking_page_url(&self.config.tracking_page_base, id)
    }

    /// `GET /proposicoes?siglaTipo=..&numero=..&ano=..`
    pub async fn search(
        &self,
        tipo: BillType,
        numero: &str,
        ano: &str,
    ) -> Result<Vec<PropositionSummary>> {
        let url = format!("{}/proposicoes", self.config.api_base);
        let list: ApiList<PropositionSummary> = self
            .get_json(
                &url,
                &[("siglaTipo", tipo.sigla()), ("numero", numero), ("ano", ano)],
            )
            .await?;
        tracing::debug!(tipo = %tipo, numero, ano, hits = list.dados.len(), "Search finished");
        Ok(list.dados)
    }

    /// `GET /proposicoes/{id}`
    pub async fn details(&self, id: u64) -> Result<PropositionDetails> {
        let url = format!("{}/proposicoes/{id}", self.config.api_base);
        let item: ApiItem<PropositionDetails> = self.get_json(&url, &[]).await?;
        Ok(item.dados)
    }

    /// `GET /proposicoes/{id}/tramitacoes`, in the order the API returns them.
    pub async fn history(&self, id: u64) -> Result<Vec<Tramitacao>> {
        let url = format!("{}/proposicoes/{id}/tramitacoes", self.config.api_base);
        let list: ApiList<Tramitacao> = self.get_json(&url, &[]).await?;
        Ok(list.dados)
    }

    /// `GET /proposicoes/{id}/autores`
    pub async fn authors(&self, id: u64) -> Result<Vec<Author>> {
        let url = format!("{}/proposicoes/{id}/autores", self.config.api_base);
        let list: ApiList<Author> = self.get_json(&url, &[]).await?;
        Ok(list.dados)
    }

    /// First organ matching `sigla` from `GET /orgaos?sigla=..`.
    pub async fn organ(&self, sigla: &str) -> Result<Option<Organ>> {
        let url = format!("{}/orgaos", self.config.api_base);
        let list: ApiList<Organ> = self.get_json(&url, &[("sigla", sigla)]).await?;
        Ok(list.dados.into_iter().next())
    }

    /// `GET /deputados/{id}`. A non-2xx answer means "unknown", not failure.
    pub async fn deputy(&self, id: &str) -> Result<Option<Deputy>> {
        let url = format!("{}/deputados/{id}", self.config.api_base);
        match self.get_json::<ApiItem<Deputy>>(&url, &[]).await {
            Ok(item) => Ok(Some(item.dados)),
            Err(ConsultaError::Status { status, .. }) => {
                tracing::debug!(id, status, "Deputy lookup returned no data");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch an HTML page (the public tracking site).
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.send(url, &[], "text/html").await?;
        response.text().await.map_err(|source| ConsultaError::network(url, source))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self.send(url, query, "application/json").await?;
        let body = response
            .text()
            .await
            .map_err(|source| ConsultaError::network(url, source))?;
        tracing::trace!(url, bytes = body.len(), "Received response body");

        serde_json::from_str(&body).map_err(|source| ConsultaError::decode(url, source))
    }

    async fn send(
        &self,
        url: &str,
        query: &[(&str, &str)],
        accept: &str,
    ) -> Result<reqwest::Response> {
        tracing::debug!(url, ?query, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
            .map_err(|source| ConsultaError::network(url, source))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, status = %status, "Request failed");
            return Err(ConsultaError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
