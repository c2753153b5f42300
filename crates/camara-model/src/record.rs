use serde::{Deserialize, Serialize};

use crate::api::{PropositionDetails, PropositionSummary, Tramitacao};

/// Placeholder shown for any field the API did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Public tracking page, keyed by the API's opaque proposition id.
pub const TRACKING_PAGE_BASE: &str =
    "https://www.camara.leg.br/proposicoesWeb/fichadetramitacao?idProposicao=";

/// Build the tracking-page URL for a proposition id.
pub fn tracking_page_url(base: &str, id: u64) -> String {
    format!("{base}{id}")
}

/// Flat, display-ready view of one proposition.
///
/// Built fresh for each query from the search hit, the details response and
/// the movement history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayRecord {
    pub proposicao: String,
    pub ementa: String,
    pub status: String,
    pub orgao: String,
    /// Date of the first history entry, as the API sent it.
    pub data: String,
    pub despacho: String,
    pub descricao: String,
    pub regime: String,
    pub link_pagina: String,
    /// Full-text URL straight from the details response; not defaulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_texto: Option<String>,
}

impl DisplayRecord {
    /// Merge the three API responses into one record.
    ///
    /// History entry 0 is taken as the latest movement. Its date, dispatch and
    /// description fall back to [`NOT_AVAILABLE`] when the list is empty or the
    /// field is absent.
    pub fn from_parts(
        hit: &PropositionSummary,
        details: &PropositionDetails,
        history: &[Tramitacao],
        link_pagina: String,
    ) -> Self {
        let status = &details.status_proposicao;
        let latest = history.first();

        Self {
            proposicao: hit.label(),
            ementa: or_na(hit.ementa.as_deref().or(details.ementa.as_deref())),
            status: or_na(status.descricao_situacao.as_deref()),
            orgao: or_na(status.sigla_orgao.as_deref()),
            data: or_na(latest.and_then(|t| t.data_hora.as_deref())),
            despacho: or_na(latest.and_then(|t| t.despacho.as_deref())),
            descricao: or_na(latest.and_then(|t| t.descricao_tramitacao.as_deref())),
            regime: or_na(status.regime.as_deref()),
            link_pagina,
            link_texto: details.url_inteiro_teor.clone(),
        }
    }

    /// Apply a text transformation to every free-text field.
    pub fn map_text(mut self, f: impl Fn(&str) -> String) -> Self {
        for field in [
            &mut self.proposicao,
            &mut self.ementa,
            &mut self.status,
            &mut self.orgao,
            &mut self.despacho,
            &mut self.descricao,
            &mut self.regime,
        ] {
            *field = f(field.as_str());
        }
        self
    }
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PropositionStatus;
    use pretty_assertions::assert_eq;

    fn hit() -> PropositionSummary {
        PropositionSummary {
            id: 123,
            sigla_tipo: "PL".into(),
            numero: "2306".into(),
            ano: "2020".into(),
            ementa: Some("Dispõe sobre a transparência".into()),
        }
    }

    fn details() -> PropositionDetails {
        PropositionDetails {
            status_proposicao: PropositionStatus {
                descricao_situacao: Some("Aguardando Parecer".into()),
                sigla_orgao: Some("CCJC".into()),
                regime: Some("Ordinário".into()),
                ..Default::default()
            },
            url_inteiro_teor: Some("https://www.camara.leg.br/inteiroTeor/123.pdf".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_history_falls_back() {
        let record = DisplayRecord::from_parts(
            &hit(),
            &details(),
            &[],
            tracking_page_url(TRACKING_PAGE_BASE, 123),
        );

        assert_eq!(record.proposicao, "PL 2306/2020");
        assert_eq!(record.status, "Aguardando Parecer");
        assert_eq!(record.orgao, "CCJC");
        assert_eq!(record.regime, "Ordinário");
        assert_eq!(record.data, "N/A");
        assert_eq!(record.despacho, "N/A");
        assert_eq!(record.descricao, "N/A");
        assert_eq!(
            record.link_pagina,
            "https://www.camara.leg.br/proposicoesWeb/fichadetramitacao?idProposicao=123"
        );
        assert_eq!(
            record.link_texto.as_deref(),
            Some("https://www.camara.leg.br/inteiroTeor/123.pdf")
        );
    }

    #[test]
    fn test_first_history_entry_is_used() {
        let history = vec![
            Tramitacao {
                data_hora: Some("2020-04-29T18:00".into()),
                despacho: Some("Às Comissões".into()),
                descricao_tramitacao: None,
                ..Default::default()
            },
            Tramitacao {
                data_hora: Some("2020-04-28T10:00".into()),
                despacho: Some("Apresentação".into()),
                descricao_tramitacao: Some("Recebimento".into()),
                ..Default::default()
            },
        ];
        let record = DisplayRecord::from_parts(&hit(), &details(), &history, "x".into());

        assert_eq!(record.data, "2020-04-29T18:00");
        assert_eq!(record.despacho, "Às Comissões");
        assert_eq!(record.descricao, "N/A");
    }

    #[test]
    fn test_missing_full_text_is_not_defaulted() {
        let mut d = details();
        d.url_inteiro_teor = None;
        let record = DisplayRecord::from_parts(&hit(), &d, &[], "x".into());
        assert_eq!(record.link_texto, None);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("link_texto").is_none());
    }

    #[test]
    fn test_map_text_leaves_links_alone() {
        let record = DisplayRecord::from_parts(&hit(), &details(), &[], "http://a".into())
            .map_text(|s| s.to_uppercase());
        assert_eq!(record.status, "AGUARDANDO PARECER");
        assert_eq!(record.link_pagina, "http://a");
        assert_eq!(record.data, "N/A");
    }
}
