//! Raster image decode, scale, and PNG serialization.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, GIF) | `image` crate (pure Rust decoders) |
//! | Scale | `DynamicImage::resize_exact` with `Triangle` (bilinear) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! A [`RasterImage`] owns exactly one decoded bitmap. Scale operations
//! resample into a fresh buffer and swap it in only once the resample has
//! succeeded, so a failed scale leaves the instance exactly as it was.
//! Decode/encode failure text travels through the per-thread relay slot in
//! [`diag`](crate::diag) and ends up appended to the caller-facing error.

use crate::diag::{self, DiagnosticSink, LogSink};
use crate::error::{ImagingError, Result};
use crate::format::SourceFormat;
use crate::geometry::{self, FitAxis};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// One decoded bitmap plus the sink its diagnostics flow to.
///
/// Width and height are always read from the live bitmap, never cached, so
/// they reflect the current handle state after any number of scales.
pub struct RasterImage {
    image: DynamicImage,
    sink: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish_non_exhaustive()
    }
}

/// Base name for error messages; falls back to the full path when the
/// path has no final component.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Append this thread's relayed library message to a context prefix.
fn with_relay(context: String) -> String {
    match diag::take() {
        Some(message) => format!("{context}: {message}"),
        None => context,
    }
}

impl RasterImage {
    /// Decode a bitmap from a file, sending diagnostics to the default
    /// [`LogSink`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_sink(path, Arc::new(LogSink))
    }

    /// Decode a bitmap from a file with an injected diagnostic sink.
    ///
    /// Fails with [`ImagingError::Decode`] when the file is missing or the
    /// data cannot be parsed; the message carries the file's base name plus
    /// any text the decoder relayed.
    pub fn open_with_sink(path: impl AsRef<Path>, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        let path = path.as_ref();
        let decoded = ImageReader::open(path)
            .map_err(image::ImageError::IoError)
            .and_then(|reader| reader.decode());
        match decoded {
            Ok(image) => Ok(Self { image, sink }),
            Err(e) => {
                diag::report(&*sink, e.to_string());
                Err(ImagingError::Decode(with_relay(base_name(path))))
            }
        }
    }

    /// Decode a bitmap from an in-memory buffer with a caller-declared
    /// format, sending diagnostics to the default [`LogSink`].
    pub fn from_bytes(bytes: &[u8], format: SourceFormat) -> Result<Self> {
        Self::from_bytes_with_sink(bytes, format, Arc::new(LogSink))
    }

    /// Decode from memory with an injected diagnostic sink.
    ///
    /// Only PNG, JPEG, and GIF are valid declared formats here; SVG, SVGZ,
    /// and UNKNOWN fail with [`ImagingError::UnsupportedFormat`] before any
    /// bytes are looked at.
    pub fn from_bytes_with_sink(
        bytes: &[u8],
        format: SourceFormat,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        let image_format = format
            .to_image_format()
            .ok_or(ImagingError::UnsupportedFormat(format))?;
        match image::load_from_memory_with_format(bytes, image_format) {
            Ok(image) => Ok(Self { image, sink }),
            Err(e) => {
                diag::report(&*sink, e.to_string());
                Err(ImagingError::Decode(with_relay(format!(
                    "in-memory {format} buffer"
                ))))
            }
        }
    }

    /// Wrap an already-decoded bitmap from a neighbouring pipeline stage.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            sink: Arc::new(LogSink),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Resample to exactly `width × height` with bilinear interpolation.
    ///
    /// The resampled buffer replaces the owned bitmap only after the
    /// resample has succeeded; on failure the instance keeps its prior
    /// bitmap unmodified.
    pub fn scale(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(ImagingError::Scale(format!(
                "target dimensions {width}x{height} must be positive"
            )));
        }
        let resampled = self.image.resize_exact(width, height, FilterType::Triangle);
        self.image = resampled;
        Ok(())
    }

    /// Scale to `new_width`, deriving the height from the current aspect
    /// ratio (`floor(height * new_width / width)`).
    ///
    /// A zero current width has no aspect ratio to preserve and fails with
    /// [`ImagingError::InvalidState`].
    pub fn scale_to_width(&mut self, new_width: u32) -> Result<()> {
        let new_height = geometry::height_for_width(self.dimensions(), new_width)
            .ok_or_else(|| invalid_aspect_basis("width"))?;
        self.scale(new_width, new_height)
    }

    /// Scale to `new_height`, deriving the width from the current aspect
    /// ratio. Mirror of [`scale_to_width`](Self::scale_to_width).
    pub fn scale_to_height(&mut self, new_height: u32) -> Result<()> {
        let new_width = geometry::width_for_height(self.dimensions(), new_height)
            .ok_or_else(|| invalid_aspect_basis("height"))?;
        self.scale(new_width, new_height)
    }

    /// Make the longer dimension exactly `size`, shrinking the shorter one
    /// proportionally. Square images go through the width path.
    pub fn scale_to_fit(&mut self, size: u32) -> Result<()> {
        match geometry::fit_axis(self.dimensions()) {
            FitAxis::Height => self.scale_to_height(size),
            FitAxis::Width => self.scale_to_width(size),
        }
    }

    /// Serialize the current bitmap as PNG to a file, preserving alpha.
    pub fn save_png(&self, destination: impl AsRef<Path>) -> Result<()> {
        let destination = destination.as_ref();
        std::fs::File::create(destination)
            .map_err(image::ImageError::IoError)
            .and_then(|file| {
                self.image
                    .write_with_encoder(PngEncoder::new(BufWriter::new(file)))
            })
            .map_err(|e| {
                diag::report(&*self.sink, e.to_string());
                ImagingError::Encode(with_relay(base_name(destination)))
            })
    }

    /// Serialize the current bitmap as PNG to an open writable stream.
    pub fn write_png(&self, writer: impl Write) -> Result<()> {
        let encoder = PngEncoder::new(writer);
        self.image.write_with_encoder(encoder).map_err(|e| {
            diag::report(&*self.sink, e.to_string());
            ImagingError::Encode(with_relay("PNG stream".to_string()))
        })
    }
}

fn invalid_aspect_basis(axis: &str) -> ImagingError {
    ImagingError::InvalidState(format!(
        "cannot derive aspect ratio from a zero-{axis} bitmap"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

    fn test_bitmap(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 200])
        })
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = test_bitmap(width, height);
        let mut out = Vec::new();
        PngEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
            .unwrap();
        out
    }

    fn create_test_png(path: &Path, width: u32, height: u32) {
        std::fs::write(path, png_bytes(width, height)).unwrap();
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(test_bitmap(width, height)).to_rgb8();
        let mut out = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut out)
            .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
            .unwrap();
        out
    }

    fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = test_bitmap(width, height);
        let mut out = Vec::new();
        {
            let mut encoder = image::codecs::gif::GifEncoder::new(&mut out);
            encoder
                .encode(img.as_raw(), width, height, ExtendedColorType::Rgba8)
                .unwrap();
        }
        out
    }

    #[test]
    fn open_reads_intrinsic_dimensions() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fixture.png");
        create_test_png(&path, 134, 132);

        let img = RasterImage::open(&path).unwrap();
        assert_eq!(img.width(), 134);
        assert_eq!(img.height(), 132);
    }

    #[test]
    fn open_missing_file_names_the_file() {
        let err = RasterImage::open("/nonexistent/missing.png").unwrap_err();
        match err {
            ImagingError::Decode(message) => assert!(
                message.contains("missing.png"),
                "message should carry the base name: {message}"
            ),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn open_garbage_file_is_decode_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("noise.png");
        std::fs::write(&path, b"not a png at all").unwrap();

        assert!(matches!(
            RasterImage::open(&path),
            Err(ImagingError::Decode(_))
        ));
    }

    #[test]
    fn from_bytes_decodes_each_raster_format() {
        let png = RasterImage::from_bytes(&png_bytes(40, 30), SourceFormat::Png).unwrap();
        assert_eq!(png.dimensions(), (40, 30));

        let jpeg = RasterImage::from_bytes(&jpeg_bytes(40, 30), SourceFormat::Jpeg).unwrap();
        assert_eq!(jpeg.dimensions(), (40, 30));

        let gif = RasterImage::from_bytes(&gif_bytes(40, 30), SourceFormat::Gif).unwrap();
        assert_eq!(gif.dimensions(), (40, 30));
    }

    #[test]
    fn from_bytes_rejects_non_raster_declarations() {
        for format in [SourceFormat::Svg, SourceFormat::Svgz, SourceFormat::Unknown] {
            let result = RasterImage::from_bytes(&png_bytes(10, 10), format);
            assert!(
                matches!(result, Err(ImagingError::UnsupportedFormat(f)) if f == format),
                "{format} should be rejected before decoding"
            );
        }
    }

    #[test]
    fn from_bytes_mismatched_declaration_is_decode_error() {
        // Valid GIF bytes declared as PNG.
        let result = RasterImage::from_bytes(&gif_bytes(10, 10), SourceFormat::Png);
        assert!(matches!(result, Err(ImagingError::Decode(_))));
    }

    #[test]
    fn scale_sets_exact_dimensions() {
        let mut img = RasterImage::from_bytes(&png_bytes(134, 132), SourceFormat::Png).unwrap();
        img.scale(64, 64).unwrap();
        assert_eq!(img.dimensions(), (64, 64));
    }

    #[test]
    fn scale_to_zero_fails_and_keeps_the_bitmap() {
        let mut img = RasterImage::from_bytes(&png_bytes(100, 80), SourceFormat::Png).unwrap();
        assert!(matches!(img.scale(0, 50), Err(ImagingError::Scale(_))));
        assert_eq!(img.dimensions(), (100, 80));
    }

    #[test]
    fn scale_to_width_preserves_aspect() {
        let mut img = RasterImage::from_bytes(&png_bytes(134, 132), SourceFormat::Png).unwrap();
        img.scale_to_width(64).unwrap();
        // 132 * 64/134 = 63.04 → 63
        assert_eq!(img.dimensions(), (64, 63));
    }

    #[test]
    fn scale_to_height_preserves_aspect() {
        let mut img = RasterImage::from_bytes(&png_bytes(800, 600), SourceFormat::Png).unwrap();
        img.scale_to_height(300).unwrap();
        assert_eq!(img.dimensions(), (400, 300));
    }

    #[test]
    fn scale_to_width_uses_current_dimensions_as_basis() {
        let mut img = RasterImage::from_bytes(&png_bytes(800, 600), SourceFormat::Png).unwrap();
        img.scale(400, 400).unwrap();
        // Basis is now 400x400, not the original 800x600.
        img.scale_to_width(200).unwrap();
        assert_eq!(img.dimensions(), (200, 200));
    }

    #[test]
    fn scale_to_fit_pins_the_longer_dimension() {
        let mut portrait = RasterImage::from_bytes(&png_bytes(60, 80), SourceFormat::Png).unwrap();
        portrait.scale_to_fit(40).unwrap();
        assert_eq!(portrait.height(), 40);
        assert!(portrait.width() <= 40);

        let mut landscape =
            RasterImage::from_bytes(&png_bytes(80, 60), SourceFormat::Png).unwrap();
        landscape.scale_to_fit(40).unwrap();
        assert_eq!(landscape.width(), 40);
        assert!(landscape.height() <= 40);
    }

    #[test]
    fn scale_to_fit_square_goes_through_width() {
        let mut img = RasterImage::from_bytes(&png_bytes(50, 50), SourceFormat::Png).unwrap();
        img.scale_to_fit(25).unwrap();
        assert_eq!(img.dimensions(), (25, 25));
    }

    #[test]
    fn scale_to_width_on_empty_bitmap_is_invalid_state() {
        let mut img = RasterImage::from_image(DynamicImage::new_rgba8(0, 0));
        assert!(matches!(
            img.scale_to_width(64),
            Err(ImagingError::InvalidState(_))
        ));
        assert!(matches!(
            img.scale_to_height(64),
            Err(ImagingError::InvalidState(_))
        ));
    }

    #[test]
    fn save_png_preserves_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("alpha.png");

        let img = RasterImage::from_bytes(&png_bytes(20, 20), SourceFormat::Png).unwrap();
        img.save_png(&path).unwrap();

        let reloaded = image::open(&path).unwrap();
        assert!(reloaded.color().has_alpha());
        assert_eq!(reloaded.to_rgba8().get_pixel(3, 4).0[3], 200);
    }

    #[test]
    fn write_png_to_stream_roundtrips() {
        let img = RasterImage::from_bytes(&png_bytes(33, 21), SourceFormat::Png).unwrap();
        let mut out = Vec::new();
        img.write_png(&mut out).unwrap();

        let reloaded = RasterImage::from_bytes(&out, SourceFormat::Png).unwrap();
        assert_eq!(reloaded.dimensions(), (33, 21));
    }

    #[test]
    fn save_png_to_unwritable_path_is_encode_error() {
        let img = RasterImage::from_bytes(&png_bytes(10, 10), SourceFormat::Png).unwrap();
        assert!(matches!(
            img.save_png("/nonexistent/dir/out.png"),
            Err(ImagingError::Encode(_))
        ));
    }
}
