use crate::error::{CoreError, CoreResult};
use crate::extract::ExtractionRecord;

use super::mapper::{Bounds, PixelRect, to_pixel_rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Table,
    Figure,
    Other,
}

/// Classifies an element from its structural path. Total over any input
/// string; the presentation layer keys rendering affordances off the result.
pub fn classify(path: &str, has_text: bool) -> ElementKind {
    if path.contains("/Figure") {
        ElementKind::Figure
    } else if path.contains("/Table") {
        ElementKind::Table
    } else if has_text {
        ElementKind::Text
    } else {
        ElementKind::Other
    }
}

/// One structural unit of the document.
///
/// `id` is the element's position in the canonical extraction output. It is
/// assigned once when the index is built and never recomputed, so it stays
/// stable across reruns for the life of a cached extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: usize,
    pub page: Option<usize>,
    pub kind: ElementKind,
    pub bounds: Option<Bounds>,
    pub text: String,
    pub asset_paths: Vec<String>,
}

/// An element's overlay box on a rendered page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub id: usize,
    pub kind: ElementKind,
    pub rect: PixelRect,
}

/// Stable-identity view over a document's extracted elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementIndex {
    elements: Vec<Element>,
}

impl ElementIndex {
    pub fn from_record(record: &ExtractionRecord) -> Self {
        let elements = record
            .elements
            .iter()
            .enumerate()
            .map(|(id, raw)| {
                let text = raw.text.clone().unwrap_or_default();
                Element {
                    id,
                    page: raw.page,
                    kind: classify(&raw.path, !text.trim().is_empty()),
                    bounds: raw.bounds.map(Bounds::from),
                    text,
                    asset_paths: raw.file_paths.clone(),
                }
            })
            .collect();
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn contains(&self, id: usize) -> bool {
        id < self.elements.len()
    }

    pub fn resolve(&self, id: usize) -> CoreResult<&Element> {
        self.elements
            .get(id)
            .ok_or(CoreError::ElementNotFound { id })
    }

    /// Elements anchored to `page` that carry a bounding box, in original
    /// extraction order (ascending id). Elements without bounds are never
    /// rendered as overlays and are skipped here.
    pub fn by_page(&self, page: usize) -> Vec<&Element> {
        self.elements
            .iter()
            .filter(|element| element.page == Some(page) && element.bounds.is_some())
            .collect()
    }

    /// Joins `by_page` with the coordinate mapper for overlay rendering.
    pub fn overlay_rects(
        &self,
        page: usize,
        page_pts: (f32, f32),
        rendered_height_px: u32,
        display_width_px: u32,
    ) -> CoreResult<Vec<OverlayRect>> {
        self.by_page(page)
            .into_iter()
            .map(|element| {
                let bounds = element
                    .bounds
                    .expect("by_page only yields elements with bounds");
                let rect = to_pixel_rect(bounds, page_pts, rendered_height_px, display_width_px)?;
                Ok(OverlayRect {
                    id: element.id,
                    kind: element.kind,
                    rect,
                })
            })
            .collect()
    }
}
