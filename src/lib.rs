//! Core of a research-paper reading companion: content-addressed caching of
//! extracted document layout, document-to-raster coordinate mapping, and the
//! session state machine behind navigation, selection and per-element
//! annotations. Extraction, page rendering and text generation are external
//! collaborators reached through trait seams.

pub mod backend;
pub mod config;
pub mod error;
pub mod extract;
pub mod fingerprint;
pub mod generate;
pub mod layout;
pub mod session;

pub use backend::{PageRaster, PageRenderer, RenderedDocument};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use extract::{ExtractedDocument, ExtractionCache, StructureExtractor};
pub use fingerprint::Fingerprint;
pub use generate::{Prompt, TextGenerator};
pub use layout::{
    Bounds, Element, ElementIndex, ElementKind, OverlayRect, PixelRect, classify, to_pixel_rect,
};
pub use session::{Document, Session, SessionPhase, SessionState};
