//! The query box: resolve the input, then overwrite the result container.

use camara_acquire::{ConsultaError, Resolution, Resolver};
use tracing::{debug, warn};

use crate::error::{error_card, loading};
use crate::render_resolution;

/// Where rendered HTML goes. Each write replaces the whole content.
pub trait ResultContainer {
    fn set_html(&mut self, html: String);
}

impl<C: ResultContainer + ?Sized> ResultContainer for &mut C {
    fn set_html(&mut self, html: String) {
        (**self).set_html(html);
    }
}

/// In-memory container; keeps the last write.
#[derive(Debug, Default, Clone)]
pub struct HtmlBuffer {
    pub html: String,
    pub writes: usize,
}

impl ResultContainer for HtmlBuffer {
    fn set_html(&mut self, html: String) {
        self.html = html;
        self.writes += 1;
    }
}

pub struct ConsultaWidget<R, C> {
    resolver: R,
    container: C,
}

impl<R: Resolver, C: ResultContainer> ConsultaWidget<R, C> {
    pub fn new(resolver: R, container: C) -> Self {
        Self {
            resolver,
            container,
        }
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn into_container(self) -> C {
        self.container
    }

    /// Run one query and write its outcome.
    ///
    /// Any failure is written as an error card and also returned, so callers
    /// can pick an exit status.
    pub async fn submit(&mut self, input: &str) -> Result<Resolution, ConsultaError> {
        if self.resolver.shows_progress() && !input.trim().is_empty() {
            self.container.set_html(loading().to_string());
        }

        match self.resolver.resolve(input).await {
            Ok(resolution) => {
                debug!("Rendering {input:?}");
                self.container.set_html(render_resolution(&resolution));
                Ok(resolution)
            }
            Err(e) => {
                warn!("Query {input:?} failed: {e}");
                self.container.set_html(error_card(&e.to_string()));
                Err(e)
            }
        }
    }
}
