//! Turning lookup results into HTML or terminal text.

pub mod card;
pub mod error;
pub mod html;
pub mod tagged;
pub mod text;
pub mod widget;

use camara_acquire::Resolution;

pub use card::render_card;
pub use error::{error_card, loading, upstream_message};
pub use tagged::{render_sections, render_tagged};
pub use text::render_text;
pub use widget::{ConsultaWidget, HtmlBuffer, ResultContainer};

/// HTML for whatever a resolver produced.
pub fn render_resolution(resolution: &Resolution) -> String {
    match resolution {
        Resolution::Record(record) => render_card(record),
        Resolution::Report { text } => render_tagged(text),
        Resolution::Message { text } => upstream_message(text),
    }
}
