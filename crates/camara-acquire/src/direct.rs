//! Direct mode: query the open-data API from the client side.

use camara_model::{DisplayRecord, Identifier};

use crate::client::CamaraClient;
use crate::error::{ConsultaError, Result};
use crate::normalize;

#[derive(Debug, Clone)]
pub struct DirectResolver {
    client: CamaraClient,
}

impl DirectResolver {
    pub fn new(client: CamaraClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CamaraClient {
        &self.client
    }

    /// Search, then fetch details and history together, then merge.
    ///
    /// An empty search stops here with `NotFound`. Details and history are
    /// joined all-or-nothing: if either request fails the lookup fails.
    pub async fn lookup(&self, id: &Identifier) -> Result<DisplayRecord> {
        let tipo = id.tipo_or_default();
        tracing::info!(tipo = %tipo, numero = %id.numero, ano = %id.ano, "Searching proposition");

        let hits = self.client.search(tipo, &id.numero, &id.ano).await?;
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| ConsultaError::NotFound(id.label()))?;
        tracing::info!(id = hit.id, label = %hit.label(), "Found proposition");

        let (details, history) =
            tokio::try_join!(self.client.details(hit.id), self.client.history(hit.id))?;
        tracing::debug!(movements = history.len(), "Fetched details and history");

        let record = DisplayRecord::from_parts(
            &hit,
            &details,
            &history,
            self.client.tracking_url(hit.id),
        );
        Ok(record.map_text(normalize::normalize_text))
    }
}
