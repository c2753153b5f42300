//! Backend report composition for the proxy endpoint.
//!
//! Given whatever the user typed, produce the sections of a tagged report:
//! a full proposition report, a list of candidates when a type-less number
//! matches several types, or the search help when nothing matches.

use camara_model::api::{Author, PropositionSummary, Tramitacao};
use camara_model::{BillType, Identifier, Section, NOT_AVAILABLE};
use chrono::NaiveDateTime;

use crate::client::CamaraClient;
use crate::error::Result;
use crate::normalize;

/// Authors listed by name before collapsing the rest into "e outros".
const MAX_NAMED_AUTHORS: usize = 2;

const API_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y às %H:%M";

/// Build the report sections for one user query.
///
/// Unparseable input and empty searches both answer with the help text rather
/// than an error; only transport and decode failures are errors.
pub async fn consultar(client: &CamaraClient, input: &str) -> Result<Vec<Section>> {
    let Ok(id) = Identifier::parse(input) else {
        tracing::info!(input, "Unrecognized query, answering with help");
        return Ok(help_sections());
    };

    let hits = find_candidates(client, &id).await?;
    match hits.as_slice() {
        [] => {
            tracing::info!(query = %id, "No proposition found");
            Ok(help_sections())
        }
        [hit] => report_sections(client, hit).await,
        many => {
            tracing::info!(query = %id, candidates = many.len(), "Ambiguous number");
            Ok(candidate_sections(many))
        }
    }
}

/// One hit per type: a typed query searches its own type, a bare
/// `numero/ano` walks every known type.
async fn find_candidates(client: &CamaraClient, id: &Identifier) -> Result<Vec<PropositionSummary>> {
    let types: Vec<BillType> = match id.tipo {
        Some(t) => vec![t],
        None => BillType::ALL.to_vec(),
    };

    let mut hits = Vec::new();
    for tipo in types {
        if let Some(hit) = client
            .search(tipo, &id.numero, &id.ano)
            .await?
            .into_iter()
            .next()
        {
            hits.push(hit);
        }
    }
    Ok(hits)
}

async fn report_sections(client: &CamaraClient, hit: &PropositionSummary) -> Result<Vec<Section>> {
    let (details, mut history, authors) = tokio::try_join!(
        client.details(hit.id),
        client.history(hit.id),
        client.authors(hit.id),
    )?;

    let status = &details.status_proposicao;
    let organ = match status.sigla_orgao.as_deref() {
        Some(sigla) if !sigla.is_empty() => client.organ(sigla).await?,
        _ => None,
    };

    sort_newest_first(&mut history);
    let latest = history.first();

    let (author_label, author_names) = describe_authors(client, &authors).await?;

    let ementa = details
        .ementa
        .as_deref()
        .or(hit.ementa.as_deref())
        .map(normalize::clean_field)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let organ_line = format!(
        "{} - {}",
        status.sigla_orgao.as_deref().unwrap_or(NOT_AVAILABLE),
        organ
            .as_ref()
            .and_then(|o| o.nome.as_deref())
            .map(normalize::normalize_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );

    Ok(vec![
        Section::title(hit.label()),
        Section::paragraph(ementa),
        Section::subtitle("Informações"),
        Section::item(author_label, author_names),
        Section::item("Status", or_na(status.descricao_situacao.as_deref())),
        Section::item("Órgão", organ_line),
        Section::item("Regime", or_na(status.regime.as_deref())),
        Section::subtitle("Última atualização"),
        Section::paragraph(
            latest
                .and_then(|t| t.data_hora.as_deref())
                .map(format_api_date)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        Section::paragraph(or_na(latest.and_then(|t| t.despacho.as_deref()))),
        Section::subtitle("Links"),
        Section::Links {
            pagina: Some(client.tracking_url(hit.id)),
            texto: details.url_inteiro_teor.clone(),
        },
    ])
}

/// `("Autores", "Fulano (PT/SP), Beltrana (PL/RJ), e outros")`.
///
/// The label is plural for several names, feminine when the sole author is
/// a "Deputada".
async fn describe_authors(client: &CamaraClient, authors: &[Author]) -> Result<(String, String)> {
    let mut parts = Vec::new();

    for (i, author) in authors.iter().enumerate() {
        if i >= MAX_NAMED_AUTHORS {
            parts.push("e outros".to_string());
            break;
        }

        let name = author
            .nome
            .as_deref()
            .map(normalize::normalize_text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let party_uf = match author.deputy_id() {
            Some(dep_id) => client.deputy(dep_id).await?.and_then(|d| d.party_uf()),
            None => None,
        };

        parts.push(format!(
            "{name} ({})",
            party_uf.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
    }

    let first_is_deputada = authors
        .first()
        .and_then(|a| a.nome.as_deref())
        .map(|n| normalize::normalize_text(n).contains("Deputada"))
        .unwrap_or(false);

    let label = if parts.len() > 1 {
        "Autores"
    } else if first_is_deputada {
        "Autora"
    } else {
        "Autor"
    };

    let names = if parts.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        parts.join(", ")
    };

    Ok((label.to_string(), names))
}

fn sort_newest_first(history: &mut [Tramitacao]) {
    // ISO timestamps sort lexically; entries without a date go last.
    history.sort_by(|a, b| b.data_hora.cmp(&a.data_hora));
}

/// `2020-04-29T18:00` → `29/04/2020 às 18:00`; anything else is shown as is.
pub fn format_api_date(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw, API_DATE_FORMAT) {
        Ok(dt) => dt.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .map(normalize::normalize_text)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Several types share the same number/year: ask which one.
pub fn candidate_sections(hits: &[PropositionSummary]) -> Vec<Section> {
    let mut sections = vec![
        Section::title("Proposições encontradas"),
        Section::paragraph("Encontramos várias proposições com este número:"),
    ];
    sections.extend(hits.iter().map(|h| Section::paragraph(format!("• {}", h.label()))));
    sections.push(Section::paragraph(
        "Por favor, especifique o tipo (ex: PL, PEC, etc)",
    ));
    sections
}

/// How to phrase a query, with the list of known types.
pub fn help_sections() -> Vec<Section> {
    let mut info = String::from(
        "\nDigite o tipo e número da proposição ou apenas o número para ver todas as opções.\n\n\
         Exemplos de busca:\n\
         • PL 2306/2020 (Projeto de Lei)\n\
         • PEC 45/2019 (Proposta de Emenda à Constituição)\n\
         • REQ 123/2024 (Requerimento)\n\
         • MPV 1172/2023 (Medida Provisória)\n\
         • 2306/2020 (busca em todos os tipos)\n\n\
         Tipos disponíveis:\n",
    );
    for tipo in BillType::ALL {
        info.push_str(&format!("• {:<3} - {}\n", tipo.sigla(), tipo.name()));
    }

    vec![
        Section::title("Como pesquisar proposições"),
        Section::info(info),
    ]
}
