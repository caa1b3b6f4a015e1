//! Source format tags for incoming assets.
//!
//! Every input buffer or file the pipeline hands us is tagged with a
//! [`SourceFormat`]. Raster formats (PNG/JPEG/GIF) go through
//! [`RasterImage`](crate::raster::RasterImage); vector formats (SVG/SVGZ) go
//! through [`VectorCanvas`](crate::canvas::VectorCanvas). `Unknown` is a
//! valid tag but is accepted by neither decode path.

use std::fmt;

/// Extensions with a decoder compiled in, and the tag they map to.
const RASTER_CANDIDATES: &[(&str, SourceFormat)] = &[
    ("png", SourceFormat::Png),
    ("jpg", SourceFormat::Jpeg),
    ("jpeg", SourceFormat::Jpeg),
    ("gif", SourceFormat::Gif),
    ("svg", SourceFormat::Svg),
    ("svgz", SourceFormat::Svgz),
];

/// Declared format of an input file or byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    Png,
    Jpeg,
    Gif,
    Svg,
    /// Gzip-compressed SVG.
    Svgz,
    Unknown,
}

impl SourceFormat {
    /// Map a file extension (without dot, any case) to a format tag.
    ///
    /// # Examples
    /// ```
    /// # use pixelplate::SourceFormat;
    /// assert_eq!(SourceFormat::from_extension("JPG"), SourceFormat::Jpeg);
    /// assert_eq!(SourceFormat::from_extension("bmp"), SourceFormat::Unknown);
    /// ```
    pub fn from_extension(ext: &str) -> Self {
        RASTER_CANDIDATES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(ext))
            .map(|(_, format)| *format)
            .unwrap_or(SourceFormat::Unknown)
    }

    /// Sniff a format tag from leading magic bytes.
    ///
    /// A gzip header is classified as SVGZ because gzip-wrapped SVG is the
    /// only compressed input this pipeline feeds us. A leading `<` (after
    /// whitespace) is taken as uncompressed SVG.
    pub fn detect(bytes: &[u8]) -> Self {
        match bytes {
            [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, ..] => SourceFormat::Png,
            [0xff, 0xd8, 0xff, ..] => SourceFormat::Jpeg,
            [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => SourceFormat::Gif,
            [0x1f, 0x8b, ..] => SourceFormat::Svgz,
            _ if bytes
                .iter()
                .find(|b| !b.is_ascii_whitespace())
                .is_some_and(|b| *b == b'<') =>
            {
                SourceFormat::Svg
            }
            _ => SourceFormat::Unknown,
        }
    }

    /// Whether this tag is accepted by the raster decode path.
    pub fn is_raster(self) -> bool {
        matches!(
            self,
            SourceFormat::Png | SourceFormat::Jpeg | SourceFormat::Gif
        )
    }

    /// The `image` crate format for raster tags; `None` otherwise.
    pub(crate) fn to_image_format(self) -> Option<image::ImageFormat> {
        match self {
            SourceFormat::Png => Some(image::ImageFormat::Png),
            SourceFormat::Jpeg => Some(image::ImageFormat::Jpeg),
            SourceFormat::Gif => Some(image::ImageFormat::Gif),
            SourceFormat::Svg | SourceFormat::Svgz | SourceFormat::Unknown => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceFormat::Png => "png",
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Gif => "gif",
            SourceFormat::Svg => "svg",
            SourceFormat::Svgz => "svgz",
            SourceFormat::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
