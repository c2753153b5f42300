use std::future::Future;

use camara_model::{normalize_query, DisplayRecord, Identifier, ProxyOutcome};
use serde::Serialize;

use crate::direct::DirectResolver;
use crate::error::Result;
use crate::proxy::ProxyResolver;

/// What a successful query produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Direct mode: a structured record.
    Record(DisplayRecord),
    /// Proxy mode: tagged report text.
    Report { text: String },
    /// Proxy mode: the backend explained why there is no report.
    Message { text: String },
}

/// Turn raw user input into something displayable.
pub trait Resolver {
    fn resolve(&self, input: &str) -> impl Future<Output = Result<Resolution>> + Send;

    /// Whether a "loading" placeholder is worth showing while resolving.
    fn shows_progress(&self) -> bool {
        false
    }
}

impl Resolver for DirectResolver {
    async fn resolve(&self, input: &str) -> Result<Resolution> {
        let id = Identifier::parse(input)?;
        Ok(Resolution::Record(self.lookup(&id).await?))
    }
}

impl Resolver for ProxyResolver {
    /// The input must have the identifier shape; what is sent is the
    /// whitespace-collapsed raw text, not the parsed parts.
    async fn resolve(&self, input: &str) -> Result<Resolution> {
        let query = normalize_query(input)?;
        Identifier::parse(&query)?;
        Ok(match self.fetch(&query).await? {
            ProxyOutcome::Report(text) => Resolution::Report { text },
            ProxyOutcome::Message(text) => Resolution::Message { text },
        })
    }

    fn shows_progress(&self) -> bool {
        true
    }
}

/// Runtime choice between the two modes.
#[derive(Debug, Clone)]
pub enum AnyResolver {
    Direct(DirectResolver),
    Proxy(ProxyResolver),
}

impl Resolver for AnyResolver {
    async fn resolve(&self, input: &str) -> Result<Resolution> {
        match self {
            AnyResolver::Direct(r) => r.resolve(input).await,
            AnyResolver::Proxy(r) => r.resolve(input).await,
        }
    }

    fn shows_progress(&self) -> bool {
        match self {
            AnyResolver::Direct(r) => r.shows_progress(),
            AnyResolver::Proxy(r) => r.shows_progress(),
        }
    }
}
