mod traits;

pub use traits::{PageRaster, PageRenderer, RenderedDocument};
