use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::backend::PageRaster;
use crate::error::{CoreError, CoreResult};
use crate::fingerprint::Fingerprint;
use crate::generate::{TextGenerator, chat_prompt, summary_prompt};
use crate::layout::{ElementIndex, OverlayRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NoDocument,
    DocumentLoading,
    DocumentReady,
}

/// Last question/answer pair for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub question: String,
    pub answer: String,
}

/// Per-element scratch state. Created lazily on first access, discarded
/// wholesale on re-upload, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationBucket {
    pub chat: Option<ChatExchange>,
    pub notes: String,
    pub summary: Option<String>,
}

/// One fully loaded document: rasters, page dimensions and the element
/// index, all immutable for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct Document {
    fingerprint: Fingerprint,
    asset_dir: PathBuf,
    page_dimensions_pts: Vec<(f32, f32)>,
    rendered_pages: Vec<PageRaster>,
    index: ElementIndex,
}

impl Document {
    pub fn new(
        fingerprint: Fingerprint,
        asset_dir: PathBuf,
        page_dimensions_pts: Vec<(f32, f32)>,
        rendered_pages: Vec<PageRaster>,
        index: ElementIndex,
    ) -> CoreResult<Self> {
        if page_dimensions_pts.len() != rendered_pages.len() {
            return Err(CoreError::configuration(format!(
                "{} page dimensions for {} rendered pages",
                page_dimensions_pts.len(),
                rendered_pages.len()
            )));
        }
        if rendered_pages.is_empty() {
            return Err(CoreError::configuration("document has no pages"));
        }

        Ok(Self {
            fingerprint,
            asset_dir,
            page_dimensions_pts,
            rendered_pages,
            index,
        })
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn asset_dir(&self) -> &Path {
        &self.asset_dir
    }

    pub fn page_count(&self) -> usize {
        self.rendered_pages.len()
    }

    pub fn index(&self) -> &ElementIndex {
        &self.index
    }

    pub fn rendered_page(&self, page: usize) -> CoreResult<&PageRaster> {
        self.rendered_pages.get(page).ok_or_else(|| {
            CoreError::configuration(format!("no rendered raster for page {page}"))
        })
    }

    pub fn page_dimensions(&self, page: usize) -> CoreResult<(f32, f32)> {
        self.page_dimensions_pts.get(page).copied().ok_or_else(|| {
            CoreError::configuration(format!("no page dimensions entry for page {page}"))
        })
    }

    /// Overlay boxes for every boxed element on `page`, in raster pixels.
    pub fn overlay_rects(&self, page: usize, display_width_px: u32) -> CoreResult<Vec<OverlayRect>> {
        let dimensions = self.page_dimensions(page)?;
        let raster = self.rendered_page(page)?;
        self.index
            .overlay_rects(page, dimensions, raster.height, display_width_px)
    }
}

/// Mutable state of one reading session.
///
/// Lifecycle: `NoDocument → DocumentLoading → DocumentReady`, with re-upload
/// looping back through `DocumentLoading`. Annotations and selection belong
/// to exactly one document; `begin_upload` discards both so nothing leaks
/// across documents.
#[derive(Debug, Default)]
pub struct SessionState {
    phase: SessionPhase,
    document: Option<Document>,
    current_page: usize,
    active_element: Option<usize>,
    annotations: HashMap<usize, AnnotationBucket>,
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::NoDocument
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn active_element(&self) -> Option<usize> {
        self.active_element
    }

    pub fn ready_document(&self) -> CoreResult<&Document> {
        match (&self.phase, self.document.as_ref()) {
            (SessionPhase::DocumentReady, Some(document)) => Ok(document),
            _ => Err(CoreError::invalid_argument("no document is ready")),
        }
    }

    /// Starts loading a (new) upload. Everything scoped to the previous
    /// document is discarded here, before any extraction runs.
    pub fn begin_upload(&mut self) {
        debug!("session: begin upload, discarding previous document state");
        self.phase = SessionPhase::DocumentLoading;
        self.document = None;
        self.current_page = 0;
        self.active_element = None;
        self.annotations.clear();
    }

    pub fn complete_upload(&mut self, document: Document) {
        info!(
            "session: document {} ready with {} pages, {} elements",
            document.fingerprint(),
            document.page_count(),
            document.index().len()
        );
        self.phase = SessionPhase::DocumentReady;
        self.document = Some(document);
        self.current_page = 0;
        self.active_element = None;
    }

    pub fn abort_upload(&mut self) {
        debug!("session: upload aborted");
        self.phase = SessionPhase::NoDocument;
        self.document = None;
    }

    /// Moves by `delta` pages, clamped to the document. Any successful
    /// navigation clears the selection; it never carries across pages.
    pub fn navigate(&mut self, delta: isize) -> CoreResult<usize> {
        let last_page = self.ready_document()?.page_count() - 1;
        let target = (self.current_page as isize).saturating_add(delta);
        self.current_page = target.clamp(0, last_page as isize) as usize;
        self.active_element = None;
        Ok(self.current_page)
    }

    pub fn jump_to_page(&mut self, page: usize) -> CoreResult<usize> {
        let last_page = self.ready_document()?.page_count() - 1;
        self.current_page = page.min(last_page);
        self.active_element = None;
        Ok(self.current_page)
    }

    /// Selects an element by id. An id outside the current document's
    /// element set reports `ElementNotFound` and leaves the selection
    /// untouched.
    pub fn select_element(&mut self, id: usize) -> CoreResult<()> {
        self.ready_document()?.index().resolve(id)?;
        self.active_element = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.active_element = None;
    }

    /// Lazily creates the element's annotation bucket. Ids are not validated
    /// here: after a re-upload, any previously used id simply starts a fresh
    /// empty bucket.
    pub fn bucket(&mut self, id: usize) -> &mut AnnotationBucket {
        self.annotations.entry(id).or_default()
    }

    pub fn annotation(&self, id: usize) -> Option<&AnnotationBucket> {
        self.annotations.get(&id)
    }

    pub fn set_notes(&mut self, id: usize, notes: impl Into<String>) {
        self.bucket(id).notes = notes.into();
    }

    /// Returns the element's summary, generating and memoizing it on first
    /// call. Failures are surfaced and not memoized; a later call generates
    /// again.
    pub fn summarize(&mut self, id: usize, generator: &dyn TextGenerator) -> CoreResult<String> {
        let text = self.ready_document()?.index().resolve(id)?.text.clone();
        if text.trim().is_empty() {
            return Err(CoreError::invalid_argument(format!(
                "element {id} has no extracted text to summarize"
            )));
        }

        if let Some(summary) = self.annotations.get(&id).and_then(|b| b.summary.clone()) {
            return Ok(summary);
        }

        let summary = generator.generate(&summary_prompt(&text))?;
        self.bucket(id).summary = Some(summary.clone());
        Ok(summary)
    }

    /// Asks a question about one element. The answer replaces the bucket's
    /// last exchange; a generation failure leaves the bucket as it was.
    pub fn ask(
        &mut self,
        id: usize,
        question: &str,
        generator: &dyn TextGenerator,
    ) -> CoreResult<String> {
        let text = self.ready_document()?.index().resolve(id)?.text.clone();
        let prior = self
            .annotations
            .get(&id)
            .and_then(|bucket| bucket.chat.clone());
        let prompt = chat_prompt(
            &text,
            prior
                .as_ref()
                .map(|exchange| (exchange.question.as_str(), exchange.answer.as_str())),
            question,
        );

        let answer = generator.generate(&prompt)?;
        self.bucket(id).chat = Some(ChatExchange {
            question: question.to_string(),
            answer: answer.clone(),
        });
        Ok(answer)
    }
}
