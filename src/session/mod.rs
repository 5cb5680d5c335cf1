mod state;

#[cfg(test)]
mod tests;

pub use state::{AnnotationBucket, ChatExchange, Document, SessionPhase, SessionState};

use crate::backend::PageRenderer;
use crate::config::Config;
use crate::error::CoreResult;
use crate::extract::{CacheCounters, ExtractionCache, StructureExtractor};
use crate::layout::{ElementIndex, OverlayRect};

/// One user's reading session: owns the mutable session state and the
/// extraction cache. This is the narrow surface the presentation layer
/// calls; it never touches cache files directly.
pub struct Session {
    state: SessionState,
    cache: ExtractionCache,
    config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            cache: ExtractionCache::from_config(&config.cache),
            state: SessionState::new(),
            config,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache_counters(&self) -> CacheCounters {
        self.cache.counters()
    }

    /// Full upload flow: fingerprint + cache/extract the layout, render the
    /// pages, then bring the session to `DocumentReady`. On any failure the
    /// session falls back to `NoDocument` and the error is surfaced.
    pub fn open_document(
        &mut self,
        bytes: &[u8],
        renderer: &dyn PageRenderer,
        extractor: &dyn StructureExtractor,
    ) -> CoreResult<()> {
        self.state.begin_upload();
        match self.load_document(bytes, renderer, extractor) {
            Ok(document) => {
                self.state.complete_upload(document);
                Ok(())
            }
            Err(err) => {
                self.state.abort_upload();
                Err(err)
            }
        }
    }

    fn load_document(
        &mut self,
        bytes: &[u8],
        renderer: &dyn PageRenderer,
        extractor: &dyn StructureExtractor,
    ) -> CoreResult<Document> {
        let extracted = self.cache.get_or_extract(bytes, extractor)?;
        let rendered = renderer.render(bytes, self.config.display.width_px)?;
        let index = ElementIndex::from_record(&extracted.record);
        Document::new(
            extracted.fingerprint,
            extracted.asset_dir,
            rendered.dimensions_pts,
            rendered.pages,
            index,
        )
    }

    /// Overlay boxes for the page the session is currently on.
    pub fn overlay_rects_for_current_page(&self) -> CoreResult<Vec<OverlayRect>> {
        let document = self.state.ready_document()?;
        document.overlay_rects(self.state.current_page(), self.config.display.width_px)
    }
}
