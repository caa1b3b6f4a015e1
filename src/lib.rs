//! # pixelplate
//!
//! In-process imaging core for an asset-processing pipeline: decode raster
//! images (PNG/JPEG/GIF) from files or byte buffers, scale them with the
//! aspect ratio intact, rasterize vector documents (SVG, gzip-compressed
//! SVGZ) onto a fixed-size canvas, and re-encode everything to PNG.
//!
//! The crate deliberately implements no codecs. Pixel work is delegated to
//! the `image` crate and vector rasterization to `resvg`/`tiny-skia`; what
//! lives here is the orchestration: one failure model across two very
//! different libraries, strict ownership of every pixel buffer and surface,
//! and rollback-safe in-place mutation.
//!
//! # Components
//!
//! ```text
//! RasterImage    one decoded bitmap   → query, scale in place, save PNG
//! VectorCanvas   one fixed surface    → render SVG/SVGZ onto it, save PNG
//! ```
//!
//! The two are independent leaves. An SVG input can go straight through
//! [`VectorCanvas`] to its final PNG without ever touching [`RasterImage`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`raster`] | [`RasterImage`]: decode, dimension queries, bilinear scaling, PNG output |
//! | [`canvas`] | [`VectorCanvas`]: fixed-size surface, SVG/SVGZ rasterization, PNG output |
//! | [`format`] | [`SourceFormat`] input tags, extension mapping, magic-byte sniffing |
//! | [`geometry`] | Pure aspect-ratio math shared by the scale operations |
//! | [`diag`] | [`DiagnosticSink`] collaborator and the per-thread error relay slot |
//! | [`error`] | [`ImagingError`] and the crate [`Result`] alias |
//!
//! # Design Decisions
//!
//! ## One error enum, two libraries
//!
//! The raster and vector stacks report failure differently (free-form
//! message text vs. typed parse/encode errors). Both are folded into
//! [`ImagingError`] at the API boundary; callers never see library types or
//! ambient error state. Library-emitted message text is staged in a
//! `thread_local!` relay slot ([`diag`]) and consumed immediately after the
//! call that produced it; a stale message is flushed to the injected
//! [`DiagnosticSink`] rather than dropped.
//!
//! ## Swap-after-success scaling
//!
//! Scale operations resample into a fresh buffer and only then replace the
//! owned bitmap. A failed scale leaves the instance exactly as it was, so a
//! pipeline retrying at a different size never works from a half-mutated
//! image.
//!
//! ## Ownership instead of manual release
//!
//! Every native resource (decoded bitmap, drawing surface, parsed document
//! tree) is owned by exactly one value and released exactly once by `Drop`,
//! on every exit path including early error returns. Intermediate handles
//! like the parsed tree and the per-render transform are scoped to the call
//! that uses them.

pub mod canvas;
pub mod diag;
pub mod error;
pub mod format;
pub mod geometry;
pub mod raster;

pub use canvas::VectorCanvas;
pub use diag::{DiagnosticSink, LogSink};
pub use error::{ImagingError, Result};
pub use format::SourceFormat;
pub use raster::RasterImage;
