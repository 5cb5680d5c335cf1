mod index;
mod mapper;

pub use index::{Element, ElementIndex, ElementKind, OverlayRect, classify};
pub use mapper::{Bounds, PixelRect, to_pixel_rect};
