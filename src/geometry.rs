//! Pure dimension math for aspect-preserving scales.
//!
//! All functions here are pure and testable without decoding a single pixel.

/// Which axis an aspect-preserving fit pins to the requested size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// Derive the height that preserves aspect ratio at `new_width`.
///
/// The factor is `new_width / current_width` applied to the current height,
/// floored, and clamped to at least one pixel so extreme downscales never
/// produce an empty bitmap. Returns `None` when the current width is zero
/// (no aspect ratio to preserve).
///
/// # Examples
/// ```
/// # use pixelplate::geometry::height_for_width;
/// assert_eq!(height_for_width((134, 132), 64), Some(63));
/// assert_eq!(height_for_width((0, 100), 64), None);
/// ```
pub fn height_for_width(current: (u32, u32), new_width: u32) -> Option<u32> {
    let (width, height) = current;
    if width == 0 {
        return None;
    }
    let factor = new_width as f64 / width as f64;
    Some(((height as f64 * factor).floor() as u32).max(1))
}

/// Derive the width that preserves aspect ratio at `new_height`.
///
/// Mirror of [`height_for_width`] with the basis on the current height.
pub fn width_for_height(current: (u32, u32), new_height: u32) -> Option<u32> {
    let (width, height) = current;
    if height == 0 {
        return None;
    }
    let factor = new_height as f64 / height as f64;
    Some(((width as f64 * factor).floor() as u32).max(1))
}

/// Pick the axis that makes the longer dimension fit within a bounding size.
///
/// Ties (square images) go through the width path.
pub fn fit_axis(current: (u32, u32)) -> FitAxis {
    let (width, height) = current;
    if height > width {
        FitAxis::Height
    } else {
        FitAxis::Width
    }
}
