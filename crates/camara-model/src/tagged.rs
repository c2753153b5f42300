//! The bracket-marker report format the proxy backend sends as `data`.
//!
//! The backend builds a `Vec<Section>` and serializes it with [`emit`]; the
//! string form (`[TITULO]...[/TITULO]`, `[INFO]...[/INFO]`, ...) exists for
//! interop with clients that only understand the markers. [`parse`] reads it
//! back. Markers never nest, except `[LINK_PAGINA]`/`[LINK_TEXTO]` inside
//! `[LINKS]`.
//!
//! Section text is HTML-escaped on the way out, brackets included, so API
//! text can carry neither markup nor markers of its own. [`parse`] undoes it.

use serde::{Deserialize, Serialize};

/// Marker names, in the form `[NAME]...[/NAME]`.
pub const TITLE: &str = "TITULO";
pub const SUBTITLE: &str = "SUBTITULO";
pub const INFO: &str = "INFO";
pub const LINKS: &str = "LINKS";
pub const LINK_PAGE: &str = "LINK_PAGINA";
pub const LINK_TEXT: &str = "LINK_TEXTO";

const TOP_LEVEL: [&str; 6] = [TITLE, SUBTITLE, INFO, LINKS, LINK_PAGE, LINK_TEXT];

/// Bullet prefix used for `label: value` lines.
pub const BULLET: char = '•';

/// One typed piece of a backend report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Title { text: String },
    Subtitle { text: String },
    /// Free text; may span several lines.
    Paragraph { text: String },
    /// A `• label: value` bullet line.
    Item { label: String, value: String },
    /// Boxed help or notice text.
    Info { text: String },
    Links {
        #[serde(skip_serializing_if = "Option::is_none")]
        pagina: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        texto: Option<String>,
    },
}

impl Section {
    pub fn title(text: impl Into<String>) -> Self {
        Section::Title { text: text.into() }
    }

    pub fn subtitle(text: impl Into<String>) -> Self {
        Section::Subtitle { text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Section::Paragraph { text: text.into() }
    }

    pub fn item(label: impl Into<String>, value: impl Into<String>) -> Self {
        Section::Item {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Section::Info { text: text.into() }
    }
}

/// HTML entities, plus `[`/`]` so bracketed text can never close a marker.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '[' => out.push_str("&#91;"),
            ']' => out.push_str("&#93;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Inverse of [`escape_text`]. `&amp;` goes last so `&amp;lt;` stays `&lt;`.
pub fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&amp;", "&")
}

fn wrap(marker: &str, content: &str) -> String {
    format!("[{marker}]{}[/{marker}]", escape_text(content))
}

/// Serialize sections to the marker format, one section per line, with a
/// blank line ahead of every subtitle.
pub fn emit(sections: &[Section]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(sections.len());

    for section in sections {
        match section {
            Section::Title { text } => lines.push(wrap(TITLE, text)),
            Section::Subtitle { text } => {
                if !lines.is_empty() {
                    lines.push(String::new());
                }
                lines.push(wrap(SUBTITLE, text));
            }
            Section::Paragraph { text } => lines.push(escape_text(text)),
            Section::Item { label, value } => lines.push(format!(
                "{BULLET} {}: {}",
                escape_text(label),
                escape_text(value)
            )),
            Section::Info { text } => lines.push(wrap(INFO, text)),
            Section::Links { pagina, texto } => {
                let inner = [
                    pagina.as_deref().map(|u| wrap(LINK_PAGE, u)),
                    texto.as_deref().map(|u| wrap(LINK_TEXT, u)),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
                lines.push(format!("[{LINKS}]{inner}[/{LINKS}]"));
            }
        }
    }

    lines.join("\n")
}

/// Read the marker format back into sections.
///
/// Text outside markers becomes one `Paragraph` per non-blank line, or an
/// `Item` when the line is a `• label: value` bullet. An opening marker with
/// no closing partner is kept as plain text.
pub fn parse(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut rest = text;

    loop {
        let next = TOP_LEVEL
            .iter()
            .filter_map(|m| rest.find(&format!("[{m}]")).map(|pos| (pos, *m)))
            .min_by_key(|(pos, _)| *pos);

        let Some((start, marker)) = next else {
            push_plain(rest, &mut sections);
            break;
        };

        let open = format!("[{marker}]");
        let close = format!("[/{marker}]");
        let after_open = &rest[start + open.len()..];

        let Some(end) = after_open.find(&close) else {
            push_plain(rest, &mut sections);
            break;
        };

        push_plain(&rest[..start], &mut sections);
        let content = &after_open[..end];

        sections.push(match marker {
            TITLE => Section::title(unescape_text(content)),
            SUBTITLE => Section::subtitle(unescape_text(content)),
            INFO => Section::info(unescape_text(content)),
            LINKS => Section::Links {
                pagina: inner_marker(content, LINK_PAGE),
                texto: inner_marker(content, LINK_TEXT),
            },
            LINK_PAGE => Section::Links {
                pagina: Some(unescape_text(content)),
                texto: None,
            },
            _ => Section::Links {
                pagina: None,
                texto: Some(unescape_text(content)),
            },
        });

        rest = &after_open[end + close.len()..];
    }

    sections
}

fn inner_marker(content: &str, marker: &str) -> Option<String> {
    let open = format!("[{marker}]");
    let close = format!("[/{marker}]");
    let start = content.find(&open)? + open.len();
    let end = content[start..].find(&close)?;
    Some(unescape_text(&content[start..start + end]))
}

fn push_plain(text: &str, sections: &mut Vec<Section>) {
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let bullet = line
            .strip_prefix(BULLET)
            .map(str::trim_start)
            .and_then(|body| body.split_once(':'));
        match bullet {
            Some((label, value)) if !label.trim().is_empty() => sections.push(Section::item(
                unescape_text(label.trim()),
                unescape_text(value.trim()),
            )),
            _ => sections.push(Section::paragraph(unescape_text(line))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn report() -> Vec<Section> {
        vec![
            Section::title("PL 2306/2020"),
            Section::paragraph("Altera o Código de Trânsito."),
            Section::subtitle("Informações"),
            Section::item("Status", "Aguardando Parecer"),
            Section::item("Órgão", "CCJC - Comissão de Constituição e Justiça"),
            Section::subtitle("Links"),
            Section::Links {
                pagina: Some("https://camara.leg.br/p?id=1".into()),
                texto: Some("https://camara.leg.br/t.pdf".into()),
            },
        ]
    }

    #[test]
    fn test_emit_layout() {
        let text = emit(&report());
        assert_eq!(
            text,
            "[TITULO]PL 2306/2020[/TITULO]\n\
             Altera o Código de Trânsito.\n\
             \n\
             [SUBTITULO]Informações[/SUBTITULO]\n\
             • Status: Aguardando Parecer\n\
             • Órgão: CCJC - Comissão de Constituição e Justiça\n\
             \n\
             [SUBTITULO]Links[/SUBTITULO]\n\
             [LINKS][LINK_PAGINA]https://camara.leg.br/p?id=1[/LINK_PAGINA] \
             [LINK_TEXTO]https://camara.leg.br/t.pdf[/LINK_TEXTO][/LINKS]"
        );
    }

    #[test]
    fn test_parse_reads_emitted_report() {
        assert_eq!(parse(&emit(&report())), report());
    }

    #[test]
    fn test_parse_multiline_info_and_bare_link() {
        let text = "[INFO]\nlinha 1\nlinha 2\n[/INFO]\n[LINK_TEXTO]http://t[/LINK_TEXTO]";
        assert_eq!(
            parse(text),
            vec![
                Section::info("\nlinha 1\nlinha 2\n"),
                Section::Links {
                    pagina: None,
                    texto: Some("http://t".into())
                },
            ]
        );
    }

    #[test]
    fn test_parse_unterminated_marker_is_text() {
        assert_eq!(
            parse("[TITULO]sem fim"),
            vec![Section::paragraph("[TITULO]sem fim")]
        );
    }

    #[test]
    fn test_api_text_cannot_inject_markup_or_markers() {
        let ementa = "<img src=x onerror=alert(1)> e [TITULO]falso[/TITULO]";
        let sections = vec![
            Section::title("PL 1/2020"),
            Section::paragraph(ementa),
            Section::item("Status", "A & B"),
        ];
        let text = emit(&sections);

        assert!(!text.contains("<img"));
        assert_eq!(text.matches("[TITULO]").count(), 1);
        assert!(text.contains("&lt;img src=x onerror=alert(1)&gt; e &#91;TITULO&#93;falso"));
        assert!(text.contains("• Status: A &amp; B"));
        assert_eq!(parse(&text), sections);
    }

    #[test]
    fn test_link_urls_keep_query_strings() {
        let sections = vec![Section::Links {
            pagina: Some("http://p?a=1&b=2".into()),
            texto: None,
        }];
        let text = emit(&sections);
        assert_eq!(
            text,
            "[LINKS][LINK_PAGINA]http://p?a=1&amp;b=2[/LINK_PAGINA][/LINKS]"
        );
        assert_eq!(parse(&text), sections);
    }

    #[test]
    fn test_unescape_amp_last() {
        assert_eq!(unescape_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_section_json_shape() {
        let json = serde_json::to_value(Section::item("Status", "Arquivada")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "item", "label": "Status", "value": "Arquivada"})
        );
    }
}
