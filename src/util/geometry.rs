// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides coordinate transformations between page and screen
//! space, uniform scaling, and the small curve and arrowhead constructions
//! used when sketching elements.

use crate::models::element::Point;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle spanning two corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Uniformly scale position and size.
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the point lies inside the rectangle, widened by `tolerance`.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        point.x >= self.x - tolerance
            && point.x <= self.x + self.width + tolerance
            && point.y >= self.y - tolerance
            && point.y <= self.y + self.height + tolerance
    }

    /// Edge midpoints in drawing order: top, right, bottom, left.
    pub fn diamond_vertices(&self) -> [Point; 4] {
        let center = self.center();
        [
            Point::new(center.x, self.y),
            Point::new(self.x + self.width, center.y),
            Point::new(center.x, self.y + self.height),
            Point::new(self.x, center.y),
        ]
    }
}

/// Offset a point by an element origin, then scale it.
pub fn offset_and_scale(point: Point, origin: Point, scale: f64) -> Point {
    Point::new((origin.x + point.x) * scale, (origin.y + point.y) * scale)
}

/// Convert screen coordinates to page coordinates for a view with the given
/// screen origin, scroll offset, and zoom factor.
pub fn screen_to_page(screen: Point, view_origin: Point, scroll: Point, zoom: f64) -> Point {
    Point::new(
        (screen.x - view_origin.x) / zoom - scroll.x,
        (screen.y - view_origin.y) / zoom - scroll.y,
    )
}

/// Convert page coordinates to screen coordinates.
pub fn page_to_screen(page: Point, view_origin: Point, scroll: Point, zoom: f64) -> Point {
    Point::new(
        view_origin.x + (page.x + scroll.x) * zoom,
        view_origin.y + (page.y + scroll.y) * zoom,
    )
}

/// The two head strokes of an arrow ending at `tip` coming from `tail`.
///
/// Each stroke starts at the tip and runs back along the shaft, rotated by
/// `+angle` and `-angle` respectively.
pub fn arrowhead(tail: Point, tip: Point, length: f64, angle: f64) -> [(Point, Point); 2] {
    let shaft = (tip.y - tail.y).atan2(tip.x - tail.x);
    let stroke = |theta: f64| {
        (
            tip,
            Point::new(tip.x - length * theta.cos(), tip.y - length * theta.sin()),
        )
    };
    [stroke(shaft - angle), stroke(shaft + angle)]
}

/// Points around an ellipse, for drawing it as a polygon.
pub fn ellipse_points(center: Point, radius_x: f64, radius_y: f64, segments: usize) -> Vec<Point> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let t = i as f64 / segments as f64 * std::f64::consts::TAU;
            Point::new(center.x + radius_x * t.cos(), center.y + radius_y * t.sin())
        })
        .collect()
}

/// Flatten a smoothed curve through `points`.
///
/// The curve starts at the first point, runs through quadratic segments whose
/// control points are the input points and whose endpoints are the midpoints
/// between consecutive inputs, and finishes at the last point. Each quadratic
/// segment is sampled `steps` times.
pub fn smooth_path(points: &[Point], steps: usize) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let steps = steps.max(1);
    let midpoint = |a: Point, b: Point| Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);

    let mut out = Vec::with_capacity(points.len() * steps);
    out.push(points[0]);
    let mut start = points[0];
    for i in 1..points.len() - 1 {
        let control = points[i];
        let end = midpoint(points[i], points[i + 1]);
        for step in 1..=steps {
            let t = step as f64 / steps as f64;
            let u = 1.0 - t;
            out.push(Point::new(
                u * u * start.x + 2.0 * u * t * control.x + t * t * end.x,
                u * u * start.y + 2.0 * u * t * control.y + t * t * end.y,
            ));
        }
        start = end;
    }
    out.push(points[points.len() - 1]);
    out
}
