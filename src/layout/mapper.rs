use crate::error::{CoreError, CoreResult};

/// Element bounding box in document units: origin bottom-left, points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Bounds {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }
}

impl From<[f64; 4]> for Bounds {
    fn from(raw: [f64; 4]) -> Self {
        Self::new(raw[0] as f32, raw[1] as f32, raw[2] as f32, raw[3] as f32)
    }
}

/// Rectangle in raster space: origin top-left, pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Maps a document-space bounding box onto the page's rendered raster.
///
/// The raster is produced at a fixed display width, so horizontal and
/// vertical scale factors may differ; the mismatch is accepted as-is.
/// Pure: identical inputs yield bit-identical output.
pub fn to_pixel_rect(
    bounds: Bounds,
    page_pts: (f32, f32),
    rendered_height_px: u32,
    display_width_px: u32,
) -> CoreResult<PixelRect> {
    let (page_width_pts, page_height_pts) = page_pts;
    if !page_width_pts.is_finite()
        || !page_height_pts.is_finite()
        || page_width_pts <= 0.0
        || page_height_pts <= 0.0
    {
        return Err(CoreError::configuration(format!(
            "page has non-renderable dimensions {page_width_pts}x{page_height_pts} pts"
        )));
    }

    let scale_x = display_width_px as f32 / page_width_pts;
    let scale_y = rendered_height_px as f32 / page_height_pts;

    Ok(PixelRect {
        x: bounds.left * scale_x,
        y: (page_height_pts - bounds.top) * scale_y,
        width: (bounds.right - bounds.left) * scale_x,
        height: (bounds.top - bounds.bottom) * scale_y,
    })
}
