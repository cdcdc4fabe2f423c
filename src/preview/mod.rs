// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page thumbnails.
//!
//! The renderer sketches a page's elements onto any [`RasterSurface`],
//! independent of how the drawing canvas paints them. Thumbnails are drawn
//! at `thumbnail_width / REFERENCE_WIDTH` of the page size.

pub mod render;
pub mod surface;
pub mod thumbnail;

pub use thumbnail::ThumbnailCache;

/// Width of the page coordinate space that thumbnails are scaled from.
pub const REFERENCE_WIDTH: f64 = 595.0;

/// Height of the page coordinate space; thumbnails keep this aspect ratio.
pub const REFERENCE_HEIGHT: f64 = 842.0;

/// Length of each arrowhead stroke, in page units.
pub const ARROWHEAD_LENGTH: f64 = 10.0;

/// Angle between an arrowhead stroke and the shaft (30 degrees).
pub const ARROWHEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f64 = 1.2;

/// Font size used when a text element has none.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// Samples per quadratic segment when flattening freehand strokes.
pub const CURVE_STEPS: usize = 4;

/// Uniform scale factor from the reference page to a thumbnail.
pub fn scale_for_width(thumbnail_width: f64) -> f64 {
    thumbnail_width / REFERENCE_WIDTH
}
