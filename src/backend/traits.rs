use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// One rendered page at the fixed display width, RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRaster {
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
}

impl PageRaster {
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

/// Renderer output for a whole document: one raster and one page size in
/// document units (points) per page, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub pages: Vec<PageRaster>,
    pub dimensions_pts: Vec<(f32, f32)>,
}

impl RenderedDocument {
    pub fn new(pages: Vec<PageRaster>, dimensions_pts: Vec<(f32, f32)>) -> CoreResult<Self> {
        if pages.len() != dimensions_pts.len() {
            return Err(CoreError::configuration(format!(
                "renderer produced {} rasters but {} page dimensions",
                pages.len(),
                dimensions_pts.len()
            )));
        }
        Ok(Self {
            pages,
            dimensions_pts,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Rendering collaborator: turns raw document bytes into page rasters at a
/// fixed display width, plus per-page dimensions in document units.
pub trait PageRenderer: Send {
    fn render(&self, bytes: &[u8], display_width_px: u32) -> CoreResult<RenderedDocument>;
}
