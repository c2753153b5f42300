//! Response schemas for the Câmara dos Deputados open-data API (v2).
//!
//! Every endpoint wraps its payload in `{"dados": ...}`. Fields the API may
//! omit are `Option`s defaulted at deserialization so downstream code never
//! has to check for missing keys.

use serde::{Deserialize, Deserializer, Serialize};

/// `{"dados": [...]}` from list endpoints (search, history, organs, authors).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiList<T> {
    #[serde(default = "Vec::new")]
    pub dados: Vec<T>,
}

/// `{"dados": {...}}` from single-resource endpoints (details, deputy).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiItem<T> {
    pub dados: T,
}

/// One hit from `GET /proposicoes?siglaTipo=..&numero=..&ano=..`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropositionSummary {
    pub id: u64,
    #[serde(default)]
    pub sigla_tipo: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub numero: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub ano: String,
    #[serde(default)]
    pub ementa: Option<String>,
}

impl PropositionSummary {
    /// `PL 2306/2020`
    pub fn label(&self) -> String {
        format!("{} {}/{}", self.sigla_tipo, self.numero, self.ano)
    }
}

/// `GET /proposicoes/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropositionDetails {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub sigla_tipo: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub numero: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub ano: Option<String>,
    #[serde(default)]
    pub ementa: Option<String>,
    #[serde(default)]
    pub status_proposicao: PropositionStatus,
    #[serde(default)]
    pub url_inteiro_teor: Option<String>,
}

/// The `statusProposicao` block of the details response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropositionStatus {
    #[serde(default)]
    pub data_hora: Option<String>,
    #[serde(default)]
    pub sigla_orgao: Option<String>,
    #[serde(default)]
    pub regime: Option<String>,
    #[serde(default)]
    pub descricao_tramitacao: Option<String>,
    #[serde(default)]
    pub descricao_situacao: Option<String>,
    #[serde(default)]
    pub despacho: Option<String>,
}

/// One procedural movement from `GET /proposicoes/{id}/tramitacoes`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tramitacao {
    #[serde(default)]
    pub data_hora: Option<String>,
    #[serde(default)]
    pub sequencia: Option<u32>,
    #[serde(default)]
    pub sigla_orgao: Option<String>,
    #[serde(default)]
    pub despacho: Option<String>,
    #[serde(default)]
    pub descricao_tramitacao: Option<String>,
}

/// One hit from `GET /orgaos?sigla=..`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organ {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub sigla: Option<String>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub tipo_orgao: Option<String>,
}

/// One entry from `GET /proposicoes/{id}/autores`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
}

impl Author {
    /// Deputy id when `uri` points at `/deputados/{id}`.
    pub fn deputy_id(&self) -> Option<&str> {
        let uri = self.uri.as_deref()?;
        let (_, tail) = uri.rsplit_once("/deputados/")?;
        let id = tail.trim_end_matches('/');
        (!id.is_empty() && id.chars().all(|c| c.is_ascii_digit())).then_some(id)
    }
}

/// `GET /deputados/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deputy {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub ultimo_status: DeputyStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeputyStatus {
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub sigla_partido: Option<String>,
    #[serde(default)]
    pub sigla_uf: Option<String>,
}

impl Deputy {
    /// `PT/SP`, or `None` unless both party and state are known.
    pub fn party_uf(&self) -> Option<String> {
        let partido = self.ultimo_status.sigla_partido.as_deref().filter(|s| !s.is_empty())?;
        let uf = self.ultimo_status.sigla_uf.as_deref().filter(|s| !s.is_empty())?;
        Some(format!("{partido}/{uf}"))
    }
}

/// The API serves `numero`/`ano` as JSON numbers; accept strings too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_or_number(deserializer)?.unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
