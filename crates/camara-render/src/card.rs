use camara_model::DisplayRecord;

use crate::html::escape;

/// Render a record as the result card.
///
/// API text is escaped. The full-text link is left out when the details
/// response carried no `urlInteiroTeor`.
pub fn render_card(record: &DisplayRecord) -> String {
    let texto_link = match record.link_texto.as_deref() {
        Some(url) => format!(
            "\n            <p><a href=\"{}\" target=\"_blank\">📑 Texto completo</a></p>",
            escape(url)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="card">
    <div class="card-header">
        <h2>{proposicao}</h2>
    </div>
    <div class="card-body">
        <p>{ementa}</p>

        <div class="info-section">
            <h3>Situação atual</h3>
            <p><strong>Status:</strong> {status}</p>
            <p><strong>Órgão atual:</strong> {orgao}</p>
        </div>

        <div class="info-section">
            <h3>Última tramitação</h3>
            <p><strong>Data:</strong> {data}</p>
            <p><strong>Despacho:</strong> {despacho}</p>
            <p><strong>Descrição:</strong> {descricao}</p>
        </div>

        <div class="info-section">
            <h3>Regime de tramitação</h3>
            <p>{regime}</p>
        </div>

        <div class="card-links" style="margin-top: 1rem;">
            <p><a href="{link_pagina}" target="_blank">📄 Página da proposição</a></p>{texto_link}
        </div>
    </div>
</div>"#,
        proposicao = escape(&record.proposicao),
        ementa = escape(&record.ementa),
        status = escape(&record.status),
        orgao = escape(&record.orgao),
        data = escape(&record.data),
        despacho = escape(&record.despacho),
        descricao = escape(&record.descricao),
        regime = escape(&record.regime),
        link_pagina = escape(&record.link_pagina),
    )
}
