//! Movement history scraped from the public tracking page.
//!
//! The tracking page (`fichadetramitacao`) lists movements in an HTML table
//! with date, organ and dispatch columns. It sometimes carries entries the API
//! history lacks, so it is offered as a separate view.

use camara_model::Section;
use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

use crate::client::CamaraClient;
use crate::error::Result;
use crate::normalize;

/// Rows shown by [`history_sections`].
pub const RECENT_LIMIT: usize = 5;

/// One row of the tracking-page table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebMovement {
    /// Date cell as printed (`dd/mm/YYYY`).
    pub data: String,
    #[serde(skip)]
    pub date: Option<NaiveDate>,
    pub orgao: String,
    pub despacho: String,
}

/// Fetch and parse the tracking page for a proposition id, newest first.
pub async fn fetch(client: &CamaraClient, id: u64) -> Result<Vec<WebMovement>> {
    let url = client.tracking_url(id);
    tracing::info!(url = %url, "Fetching tracking page");
    let html = client.fetch_page(&url).await?;
    tracing::info!(bytes = html.len(), "Received HTML");

    let movements = parse_history_page(&html);
    tracing::info!(rows = movements.len(), "Parsed movement table");
    Ok(movements)
}

/// Extract movements from the tracking page, sorted newest first.
///
/// Looks for `table#content-tramitacao`, falling back to the first
/// `table.table`. The header row and rows with fewer than three cells are
/// skipped. Rows whose date does not parse sort last.
pub fn parse_history_page(html: &str) -> Vec<WebMovement> {
    let document = Html::parse_document(html);

    let primary = Selector::parse("table#content-tramitacao").expect("valid selector");
    let fallback = Selector::parse("table.table").expect("valid selector");
    let tr_sel = Selector::parse("tr").expect("valid selector");
    let td_sel = Selector::parse("td").expect("valid selector");

    let Some(table) = document
        .select(&primary)
        .next()
        .or_else(|| document.select(&fallback).next())
    else {
        tracing::debug!("No movement table on page");
        return Vec::new();
    };

    let mut movements: Vec<WebMovement> = table
        .select(&tr_sel)
        .skip(1)
        .filter_map(|tr| {
            let tds: Vec<ElementRef> = tr.select(&td_sel).collect();
            if tds.len() < 3 {
                tracing::debug!(cols = tds.len(), "Skipping row with < 3 columns");
                return None;
            }
            let data = cell_text(tds[0]);
            Some(WebMovement {
                date: NaiveDate::parse_from_str(&data, "%d/%m/%Y").ok(),
                data,
                orgao: cell_text(tds[1]),
                despacho: cell_text(tds[2]),
            })
        })
        .collect();

    // Stable sort keeps page order among equal dates.
    movements.sort_by(|a, b| b.date.cmp(&a.date));
    movements
}

fn cell_text(cell: ElementRef) -> String {
    let raw = cell.text().collect::<Vec<_>>().join(" ");
    normalize::normalize_text(&raw.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Report sections for the most recent movements, or nothing at all when
/// the table was empty.
pub fn history_sections(movements: &[WebMovement], limit: usize) -> Vec<Section> {
    if movements.is_empty() {
        return Vec::new();
    }

    let mut sections = vec![Section::subtitle("Histórico de tramitações")];
    for movement in movements.iter().take(limit) {
        sections.push(Section::paragraph(format!("📅 {}", movement.data)));
        sections.push(Section::paragraph(format!("📍 {}", movement.orgao)));
        if !movement.despacho.trim().is_empty() {
            sections.push(Section::paragraph(format!("📝 {}", movement.despacho)));
        }
        sections.push(Section::paragraph("---"));
    }
    sections
}
