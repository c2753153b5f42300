//! Plain-text rendering for terminals.

use camara_acquire::Resolution;
use camara_model::{tagged, DisplayRecord, Section};

/// Every line newline-terminated; no lines gives an empty string.
fn join_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn underline(text: &str, ch: char) -> String {
    ch.to_string().repeat(text.chars().count())
}

/// A record laid out like the card, without markup.
pub fn record_text(record: &DisplayRecord) -> String {
    let mut lines = vec![
        record.proposicao.clone(),
        record.ementa.clone(),
        String::new(),
        "Situação atual".to_string(),
        format!("  Status: {}", record.status),
        format!("  Órgão atual: {}", record.orgao),
        String::new(),
        "Última tramitação".to_string(),
        format!("  Data: {}", record.data),
        format!("  Despacho: {}", record.despacho),
        format!("  Descrição: {}", record.descricao),
        String::new(),
        "Regime de tramitação".to_string(),
        format!("  {}", record.regime),
        String::new(),
        format!("Página da proposição: {}", record.link_pagina),
    ];
    if let Some(url) = &record.link_texto {
        lines.push(format!("Texto completo: {url}"));
    }
    join_lines(lines)
}

/// Sections with titles underlined and markers dropped.
pub fn sections_text(sections: &[Section]) -> String {
    let mut lines: Vec<String> = Vec::new();
    for section in sections {
        match section {
            Section::Title { text } => {
                lines.push(text.clone());
                lines.push(underline(text, '='));
            }
            Section::Subtitle { text } => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(text.clone());
                lines.push(underline(text, '-'));
            }
            Section::Paragraph { text } | Section::Info { text } => lines.extend(
                text.lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(str::to_string),
            ),
            Section::Item { label, value } => {
                lines.push(format!("{} {label}: {value}", tagged::BULLET));
            }
            Section::Links { pagina, texto } => {
                if let Some(url) = pagina {
                    lines.push(format!("Página da proposição: {url}"));
                }
                if let Some(url) = texto {
                    lines.push(format!("Texto completo: {url}"));
                }
            }
        }
    }
    join_lines(lines)
}

pub fn render_text(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Record(record) => record_text(record),
        Resolution::Report { text } => sections_text(&tagged::parse(text)),
        Resolution::Message { text } => format!("{text}\n"),
    }
}
