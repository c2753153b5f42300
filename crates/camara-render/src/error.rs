use crate::html::escape;

const ERROR_COLOR: &str = "#dc3545";

/// The red card shown in place of a result when a query fails.
///
/// Holds nothing but the message.
pub fn error_card(message: &str) -> String {
    format!(
        r#"<div class="card" style="border-color: {ERROR_COLOR};">
    <div class="card-body">
        <p style="color: {ERROR_COLOR};">{}</p>
    </div>
</div>"#,
        escape(message)
    )
}

/// A message the backend sent instead of a report.
pub fn upstream_message(message: &str) -> String {
    format!(r#"<div class="error">{}</div>"#, escape(message))
}

/// Placeholder written while a proxy request is in flight.
pub fn loading() -> &'static str {
    r#"<div class="loading">Consultando...</div>"#
}
