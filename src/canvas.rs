//! Fixed-size canvas for rasterizing vector documents.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Parse SVG / SVGZ | `usvg::Tree::from_data` (gunzips SVGZ itself) |
//! | Composite | `resvg::render` under a per-call scale transform |
//! | Surface | `tiny_skia::Pixmap` (ARGB32, premultiplied) |
//! | Encode → PNG | `Pixmap::save_png` / `Pixmap::encode_png` |
//!
//! The canvas dimensions are fixed at construction. Each render composites
//! onto whatever is already on the surface; nothing clears between calls.
//! The scale transform mapping the document's intrinsic box onto the canvas
//! is passed per render call, so no transform state survives into the next
//! call.

use crate::error::{ImagingError, Result};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use std::path::Path;

/// One ARGB32 drawing surface plus the parse options bound to it.
pub struct VectorCanvas {
    pixmap: Pixmap,
    options: Options<'static>,
}

impl VectorCanvas {
    /// Allocate a surface of exactly `width × height` pixels.
    ///
    /// Fails with [`ImagingError::Allocation`] for zero dimensions or when
    /// the pixel buffer cannot be allocated.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            ImagingError::Allocation(format!("cannot allocate a {width}x{height} ARGB32 surface"))
        })?;
        Ok(Self {
            pixmap,
            options: Options::default(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Parse a vector document and composite it onto the surface.
    ///
    /// `document` is raw SVG bytes, optionally gzip-compressed (SVGZ); the
    /// parse layer detects and decompresses gzip itself. The document's
    /// intrinsic box is mapped onto the full canvas with an independent
    /// per-axis scale, top-left to top-left, no centering.
    pub fn render_vector(&mut self, document: &[u8]) -> Result<()> {
        let tree = Tree::from_data(document, &self.options)
            .map_err(|e| ImagingError::Parse(e.to_string()))?;

        let intrinsic = tree.size();
        let scale_x = self.pixmap.width() as f32 / intrinsic.width();
        let scale_y = self.pixmap.height() as f32 / intrinsic.height();
        if !scale_x.is_finite() || !scale_y.is_finite() {
            return Err(ImagingError::Render(format!(
                "degenerate intrinsic size {}x{}",
                intrinsic.width(),
                intrinsic.height()
            )));
        }

        resvg::render(
            &tree,
            Transform::from_scale(scale_x, scale_y),
            &mut self.pixmap.as_mut(),
        );
        Ok(())
    }

    /// Serialize the current surface contents to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.pixmap.save_png(path).map_err(|e| {
            ImagingError::Encode(format!("{}: {e}", path.display()))
        })
    }

    /// Serialize the current surface contents to in-memory PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| ImagingError::Encode(e.to_string()))
    }
}
