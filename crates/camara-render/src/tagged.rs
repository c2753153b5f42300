//! HTML for backend reports, from the marker string or from typed sections.

use std::sync::LazyLock;

use camara_model::tagged::{self as markers, Section};
use regex::Regex;

use crate::html::escape;

struct MarkerRule {
    pattern: Regex,
    replacement: &'static str,
}

fn rule(marker: &str, replacement: &'static str) -> MarkerRule {
    let pattern = format!(
        r"(?s)\[{m}\](.*?)\[/{m}\]",
        m = regex::escape(marker)
    );
    MarkerRule {
        pattern: Regex::new(&pattern).expect("valid regex"),
        replacement,
    }
}

static MARKER_RULES: LazyLock<Vec<MarkerRule>> = LazyLock::new(|| {
    vec![
        rule(markers::TITLE, r#"<h2 class="resultado-titulo">$1</h2>"#),
        rule(markers::SUBTITLE, r#"<h3 class="resultado-subtitulo">$1</h3>"#),
        rule(markers::INFO, r#"<div class="info-box">$1</div>"#),
        rule(markers::LINKS, r#"<div class="links-container">$1</div>"#),
        rule(
            markers::LINK_PAGE,
            r#"<a href="$1" target="_blank" class="link-proposicao">📄 Página da proposição</a>"#,
        ),
        rule(
            markers::LINK_TEXT,
            r#"<a href="$1" target="_blank" class="link-texto">📑 Texto completo</a>"#,
        ),
    ]
});

/// `• label:` up to the first colon on the same line.
static BULLET_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"•\s([^:<\n]+):").expect("valid regex"));

const BULLET_REPLACEMENT: &str = r#"<span class="item">$1:</span>"#;

/// Convert a marker-format report to HTML.
///
/// Every marker pair is replaced wherever it occurs, then newlines become
/// `<br>` and `• label:` bullets get a label span. Text between markers
/// arrives already escaped by `tagged::emit` on the backend and is not
/// escaped again. Feeding the output back in returns it unchanged.
pub fn render_tagged(text: &str) -> String {
    let mut html = text.to_string();
    for rule in MARKER_RULES.iter() {
        html = rule
            .pattern
            .replace_all(&html, rule.replacement)
            .into_owned();
    }
    let html = html.replace('\n', "<br>");
    highlight_bullets(&html)
}

fn highlight_bullets(html: &str) -> String {
    BULLET_LABEL
        .replace_all(html, BULLET_REPLACEMENT)
        .into_owned()
}

fn escape_block(text: &str) -> String {
    highlight_bullets(&escape(text).replace('\n', "<br>"))
}

fn link(url: &str, class: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" class="{class}">{label}</a>"#,
        escape(url)
    )
}

/// Render typed sections without going through the marker string.
///
/// Produces the same markup as `render_tagged(&tagged::emit(sections))`,
/// except that section text is escaped.
pub fn render_sections(sections: &[Section]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(sections.len());

    for section in sections {
        let part = match section {
            Section::Title { text } => {
                format!(r#"<h2 class="resultado-titulo">{}</h2>"#, escape(text))
            }
            Section::Subtitle { text } => {
                if !parts.is_empty() {
                    parts.push(String::new());
                }
                format!(r#"<h3 class="resultado-subtitulo">{}</h3>"#, escape(text))
            }
            Section::Paragraph { text } => escape_block(text),
            Section::Item { label, value } => format!(
                r#"<span class="item">{}:</span> {}"#,
                escape(label),
                escape(value)
            ),
            Section::Info { text } => {
                format!(r#"<div class="info-box">{}</div>"#, escape_block(text))
            }
            Section::Links { pagina, texto } => {
                let anchors = [
                    pagina
                        .as_deref()
                        .map(|u| link(u, "link-proposicao", "📄 Página da proposição")),
                    texto
                        .as_deref()
                        .map(|u| link(u, "link-texto", "📑 Texto completo")),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
                format!(r#"<div class="links-container">{anchors}</div>"#)
            }
        };
        parts.push(part);
    }

    parts.join("<br>")
}
