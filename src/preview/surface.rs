// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing target for the preview renderer.

use crate::models::element::{FillStyle, FontFamily, Point};
use crate::util::{color::Color, geometry::Rect};

/// Resolved stroke and fill for one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub stroke: Color,
    pub stroke_width: f64,
    /// `None` when the shape is not filled.
    pub fill: Option<Color>,
    pub fill_style: FillStyle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub family: FontFamily,
    pub size: f64,
}

/// A 2D raster target. Coordinates are surface pixels.
pub trait RasterSurface {
    fn rect(&mut self, rect: Rect, style: &Style);

    fn ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64, style: &Style);

    /// Closed polygon.
    fn polygon(&mut self, points: &[Point], style: &Style);

    fn segment(&mut self, from: Point, to: Point, style: &Style);

    /// Open polyline.
    fn polyline(&mut self, points: &[Point], style: &Style);

    /// Draw a single line of text with its baseline starting at `origin`.
    fn text(&mut self, text: &str, origin: Point, font: &Font, color: Color);

    /// Advance width of a single line of text.
    fn measure_text(&mut self, text: &str, font: &Font) -> f64;

    /// Draw an encoded image into `rect` once it has been decoded. The blit
    /// may land after the rest of the frame.
    fn image(&mut self, file_id: &str, data_url: &str, rect: Rect);
}
