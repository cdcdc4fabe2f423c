// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Sketch renderer for page thumbnails.
//!
//! Elements are drawn in order, scaled uniformly from the reference page
//! width. Rendering never fails: an element missing a field it needs is
//! skipped and the rest of the page is still drawn.

use super::surface::{Font, RasterSurface, Style};
use super::{ARROWHEAD_ANGLE, ARROWHEAD_LENGTH, CURVE_STEPS, DEFAULT_FONT_SIZE, LINE_HEIGHT};
use crate::models::element::{Arrowhead, Element, ElementKind, FontFamily, Point};
use crate::models::page::Files;
use crate::util::color::Color;
use crate::util::geometry::{arrowhead, offset_and_scale, smooth_path, Rect};

/// Draw every non-deleted element onto `surface`.
pub fn render_elements(
    surface: &mut dyn RasterSurface,
    elements: &[Element],
    scale: f64,
    files: Option<&Files>,
) {
    for element in elements.iter().filter(|e| !e.is_deleted) {
        render_element(surface, element, scale, files);
    }
}

fn render_element(
    surface: &mut dyn RasterSurface,
    element: &Element,
    scale: f64,
    files: Option<&Files>,
) {
    let style = style_for(element, scale);
    let scaled_bounds = || {
        element
            .bounds()
            .map(|(x, y, w, h)| Rect::new(x, y, w, h).scaled(scale))
    };

    match &element.kind {
        ElementKind::Rectangle => {
            if let Some(rect) = scaled_bounds() {
                surface.rect(rect, &style);
            }
        }
        ElementKind::Ellipse => {
            if let Some(rect) = scaled_bounds() {
                surface.ellipse(rect.center(), rect.width / 2.0, rect.height / 2.0, &style);
            }
        }
        ElementKind::Diamond => {
            if let Some(rect) = scaled_bounds() {
                surface.polygon(&rect.diamond_vertices(), &style);
            }
        }
        ElementKind::Line { points } => {
            if let Some((from, to)) = endpoints(element, points, scale) {
                surface.segment(from, to, &style);
            }
        }
        ElementKind::Arrow {
            points,
            end_arrowhead,
        } => {
            if let Some((from, to)) = endpoints(element, points, scale) {
                surface.segment(from, to, &style);
                if *end_arrowhead == Some(Arrowhead::Arrow) {
                    for (tip, end) in arrowhead(from, to, ARROWHEAD_LENGTH * scale, ARROWHEAD_ANGLE) {
                        surface.segment(tip, end, &style);
                    }
                }
            }
        }
        ElementKind::Freedraw { points } => {
            let Some(origin) = element.origin() else {
                return;
            };
            if points.len() < 2 || !points.iter().all(Point::is_finite) {
                return;
            }
            let scaled: Vec<Point> = points
                .iter()
                .map(|p| offset_and_scale(*p, origin, scale))
                .collect();
            surface.polyline(&smooth_path(&scaled, CURVE_STEPS), &style);
        }
        ElementKind::Text {
            text,
            font_size,
            font_family,
        } => {
            if let Some(origin) = element.origin() {
                render_text(surface, element, text, *font_size, *font_family, origin, scale, &style);
            }
        }
        ElementKind::Image { file_id } => {
            let payload = file_id
                .as_deref()
                .and_then(|id| files?.get(id))
                .filter(|file| !file.data_url.is_empty());
            if let (Some(file), Some(rect)) = (payload, scaled_bounds()) {
                surface.image(&file.id, &file.data_url, rect);
            }
        }
        ElementKind::Unknown { .. } => {}
    }
}

/// Stroke defaults to black and scales with the page; fill passes through.
fn style_for(element: &Element, scale: f64) -> Style {
    let stroke = element
        .stroke_color
        .as_deref()
        .and_then(Color::parse)
        .unwrap_or(Color::BLACK);
    let stroke_width = element
        .stroke_width
        .filter(|w| w.is_finite() && *w >= 0.0)
        .unwrap_or(1.0);
    let fill = Color::parse(&element.background_color).filter(|c| !c.is_transparent());
    Style {
        stroke,
        stroke_width: stroke_width * scale,
        fill,
        fill_style: element.fill_style,
    }
}

/// First and last point of a line-like element, offset and scaled.
fn endpoints(element: &Element, points: &[Point], scale: f64) -> Option<(Point, Point)> {
    let origin = element.origin()?;
    if points.len() < 2 {
        return None;
    }
    let (first, last) = (points.first()?, points.last()?);
    if !(first.is_finite() && last.is_finite()) {
        return None;
    }
    Some((
        offset_and_scale(*first, origin, scale),
        offset_and_scale(*last, origin, scale),
    ))
}

#[allow(clippy::too_many_arguments)]
fn render_text(
    surface: &mut dyn RasterSurface,
    element: &Element,
    text: &str,
    font_size: Option<f64>,
    family: FontFamily,
    origin: Point,
    scale: f64,
    style: &Style,
) {
    let size = font_size
        .filter(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE)
        * scale;
    let font = Font { family, size };
    let max_width = element
        .width
        .filter(|w| w.is_finite() && *w > 0.0)
        .map(|w| w * scale);
    let line_height = size * LINE_HEIGHT;
    let (x, y) = (origin.x * scale, origin.y * scale);

    for (i, line) in wrap_text(surface, text, &font, max_width).iter().enumerate() {
        let baseline = y + size + i as f64 * line_height;
        surface.text(line, Point::new(x, baseline), &font, style.stroke);
    }
}

/// Greedy word wrap. Explicit newlines always break; a single word wider
/// than `max_width` gets a line of its own.
pub fn wrap_text(
    surface: &mut dyn RasterSurface,
    text: &str,
    font: &Font,
    max_width: Option<f64>,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", line, word);
            let overflows = max_width.is_some_and(|max| surface.measure_text(&candidate, font) > max);
            if overflows {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::element::FillStyle;
    use crate::models::page::FileAttachment;
    use crate::preview::{scale_for_width, REFERENCE_WIDTH};
    use std::f64::consts::PI;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Op {
        Rect(Rect, Style),
        Ellipse(Point, f64, f64),
        Polygon(Vec<Point>),
        Segment(Point, Point),
        Polyline(Vec<Point>),
        Text(String, Point, Font),
        Image(String, Rect),
    }

    /// Records drawing calls; text is measured at `char_width` per character.
    pub(crate) struct RecordingSurface {
        pub ops: Vec<Op>,
        pub char_width: f64,
    }

    impl RecordingSurface {
        pub fn new() -> Self {
            Self {
                ops: Vec::new(),
                char_width: 10.0,
            }
        }

        fn segments(&self) -> Vec<(Point, Point)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Segment(a, b) => Some((*a, *b)),
                    _ => None,
                })
                .collect()
        }
    }

    impl RasterSurface for RecordingSurface {
        fn rect(&mut self, rect: Rect, style: &Style) {
            self.ops.push(Op::Rect(rect, *style));
        }
        fn ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64, _style: &Style) {
            self.ops.push(Op::Ellipse(center, radius_x, radius_y));
        }
        fn polygon(&mut self, points: &[Point], _style: &Style) {
            self.ops.push(Op::Polygon(points.to_vec()));
        }
        fn segment(&mut self, from: Point, to: Point, _style: &Style) {
            self.ops.push(Op::Segment(from, to));
        }
        fn polyline(&mut self, points: &[Point], _style: &Style) {
            self.ops.push(Op::Polyline(points.to_vec()));
        }
        fn text(&mut self, text: &str, origin: Point, font: &Font, _color: Color) {
            self.ops.push(Op::Text(text.to_string(), origin, *font));
        }
        fn measure_text(&mut self, text: &str, _font: &Font) -> f64 {
            text.chars().count() as f64 * self.char_width
        }
        fn image(&mut self, file_id: &str, _data_url: &str, rect: Rect) {
            self.ops.push(Op::Image(file_id.to_string(), rect));
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.05
    }

    fn render(elements: &[Element], scale: f64) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        render_elements(&mut surface, elements, scale, None);
        surface
    }

    fn line_like(kind: ElementKind, x: f64, y: f64) -> Element {
        Element::new(kind, x, y, 0.0, 0.0)
    }

    #[test]
    fn test_scale_law_for_rectangle() {
        let scale = scale_for_width(240.0);
        assert!(close(scale, 240.0 / REFERENCE_WIDTH));

        let rect = Element::new(ElementKind::Rectangle, 100.0, 100.0, 50.0, 50.0);
        let surface = render(&[rect], scale);

        match &surface.ops[..] {
            [Op::Rect(r, _)] => {
                assert!(close(r.x, 40.3), "x = {}", r.x);
                assert!(close(r.y, 40.3), "y = {}", r.y);
                assert!(close(r.width, 20.2), "w = {}", r.width);
                assert!(close(r.height, 20.2), "h = {}", r.height);
            }
            other => panic!("unexpected ops {:?}", other),
        }
    }

    #[test]
    fn test_style_derivation() {
        let mut rect = Element::new(ElementKind::Rectangle, 0.0, 0.0, 10.0, 10.0);
        rect.stroke_color = None;
        rect.stroke_width = Some(4.0);
        rect.background_color = "#ff0000".to_string();
        rect.fill_style = FillStyle::CrossHatch;

        let surface = render(&[rect], 0.5);
        let Op::Rect(_, style) = &surface.ops[0] else {
            panic!("expected rect");
        };
        assert_eq!(style.stroke, Color::BLACK);
        assert_eq!(style.stroke_width, 2.0);
        assert_eq!(style.fill, Some(Color::rgb(255, 0, 0)));
        assert_eq!(style.fill_style, FillStyle::CrossHatch);
    }

    #[test]
    fn test_ellipse_and_diamond_geometry() {
        let ellipse = Element::new(ElementKind::Ellipse, 10.0, 20.0, 40.0, 60.0);
        let diamond = Element::new(ElementKind::Diamond, 0.0, 0.0, 20.0, 10.0);
        let surface = render(&[ellipse, diamond], 0.5);

        assert_eq!(surface.ops[0], Op::Ellipse(Point::new(15.0, 25.0), 10.0, 15.0));
        assert_eq!(
            surface.ops[1],
            Op::Polygon(vec![
                Point::new(5.0, 0.0),
                Point::new(10.0, 2.5),
                Point::new(5.0, 5.0),
                Point::new(0.0, 2.5),
            ])
        );
    }

    #[test]
    fn test_line_uses_first_and_last_point() {
        let line = line_like(
            ElementKind::Line {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(50.0, 80.0),
                    Point::new(100.0, 20.0),
                ],
            },
            10.0,
            10.0,
        );
        let surface = render(&[line], 0.5);

        assert_eq!(
            surface.ops,
            vec![Op::Segment(Point::new(5.0, 5.0), Point::new(55.0, 15.0))]
        );
    }

    #[test]
    fn test_arrowhead_emits_three_segments_at_thirty_degrees() {
        let arrow = line_like(
            ElementKind::Arrow {
                points: vec![Point::new(0.0, 0.0), Point::new(120.0, 60.0)],
                end_arrowhead: Some(Arrowhead::Arrow),
            },
            30.0,
            40.0,
        );
        let scale = scale_for_width(240.0);
        let surface = render(&[arrow], scale);
        let segments = surface.segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(surface.ops.len(), 3);

        let (tail, tip) = segments[0];
        let shaft = (tip.y - tail.y).atan2(tip.x - tail.x);
        let mut offsets = Vec::new();
        for (start, end) in &segments[1..] {
            assert_eq!(*start, tip);
            let length = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
            assert!((length - 10.0 * scale).abs() < 1e-9);
            // Angle of the head stroke pointing back towards the tip.
            let back = (start.y - end.y).atan2(start.x - end.x);
            offsets.push(back - shaft);
        }
        offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((offsets[0] + PI / 6.0).abs() < 1e-9);
        assert!((offsets[1] - PI / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_without_arrow_end_is_one_segment() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let plain = line_like(
            ElementKind::Arrow {
                points: points.clone(),
                end_arrowhead: None,
            },
            0.0,
            0.0,
        );
        let triangle = line_like(
            ElementKind::Arrow {
                points,
                end_arrowhead: Some(Arrowhead::Triangle),
            },
            0.0,
            0.0,
        );
        assert_eq!(render(&[plain, triangle], 1.0).segments().len(), 2);
    }

    #[test]
    fn test_freedraw_smoothing_and_short_strokes() {
        let stroke = line_like(
            ElementKind::Freedraw {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 10.0),
                    Point::new(20.0, 0.0),
                ],
            },
            100.0,
            0.0,
        );
        let dot = line_like(
            ElementKind::Freedraw {
                points: vec![Point::new(0.0, 0.0)],
            },
            0.0,
            0.0,
        );
        let surface = render(&[stroke, dot], 1.0);

        assert_eq!(surface.ops.len(), 1);
        let Op::Polyline(path) = &surface.ops[0] else {
            panic!("expected polyline");
        };
        assert_eq!(path.first(), Some(&Point::new(100.0, 0.0)));
        assert_eq!(path.last(), Some(&Point::new(120.0, 0.0)));
        assert!(path.len() > 3);
    }

    #[test]
    fn test_text_wraps_at_scaled_width() {
        let text = Element::new(
            ElementKind::Text {
                text: "aaa bbb ccc".to_string(),
                font_size: Some(20.0),
                font_family: FontFamily::Serif,
            },
            10.0,
            10.0,
            140.0,
            30.0,
        );
        // Scaled width 70 fits "aaa bbb" (7 chars at 10px) but not more.
        let surface = render(&[text], 0.5);

        let lines: Vec<(String, Point, Font)> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t, p, f) => Some((t.clone(), *p, *f)),
                _ => None,
            })
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, "aaa bbb");
        assert_eq!(lines[1].0, "ccc");
        assert_eq!(lines[0].2.family, FontFamily::Serif);
        assert_eq!(lines[0].2.size, 10.0);
        assert_eq!(lines[0].1, Point::new(5.0, 15.0));
        assert!((lines[1].1.y - lines[0].1.y - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_keeps_newlines_and_long_words() {
        let mut surface = RecordingSurface::new();
        let font = Font {
            family: FontFamily::SansSerif,
            size: 10.0,
        };
        let lines = wrap_text(&mut surface, "a\n\nverylongword b", &font, Some(30.0));
        assert_eq!(lines, vec!["a", "", "verylongword", "b"]);
    }

    #[test]
    fn test_image_resolves_attachment() {
        let mut files = Files::new();
        files.insert(
            "f1".to_string(),
            FileAttachment {
                id: "f1".to_string(),
                mime_type: "image/png".to_string(),
                data_url: "data:image/png;base64,AAAA".to_string(),
                created: 0,
            },
        );
        let found = Element::new(
            ElementKind::Image {
                file_id: Some("f1".to_string()),
            },
            20.0,
            20.0,
            40.0,
            40.0,
        );
        let missing = Element::new(
            ElementKind::Image {
                file_id: Some("nope".to_string()),
            },
            0.0,
            0.0,
            1.0,
            1.0,
        );

        let mut surface = RecordingSurface::new();
        render_elements(&mut surface, &[found.clone(), missing.clone()], 0.5, Some(&files));
        assert_eq!(
            surface.ops,
            vec![Op::Image("f1".to_string(), Rect::new(10.0, 10.0, 20.0, 20.0))]
        );

        assert!(render(&[found], 0.5).ops.is_empty());
    }

    #[test]
    fn test_malformed_and_deleted_elements_are_skipped() {
        let mut no_width = Element::new(ElementKind::Rectangle, 0.0, 0.0, 10.0, 10.0);
        no_width.width = None;
        let mut nan = Element::new(ElementKind::Ellipse, f64::NAN, 0.0, 10.0, 10.0);
        nan.stroke_color = Some("garbage".to_string());
        let mut deleted = Element::new(ElementKind::Diamond, 0.0, 0.0, 10.0, 10.0);
        deleted.is_deleted = true;
        let short_line = line_like(
            ElementKind::Line {
                points: vec![Point::new(0.0, 0.0)],
            },
            0.0,
            0.0,
        );
        let unknown = Element::new(
            ElementKind::Unknown {
                tag: "frame".to_string(),
            },
            0.0,
            0.0,
            1.0,
            1.0,
        );
        let good = Element::new(ElementKind::Rectangle, 1.0, 1.0, 1.0, 1.0);

        let surface = render(&[no_width, nan, deleted, short_line, unknown, good], 1.0);
        assert_eq!(surface.ops.len(), 1);
        assert!(matches!(surface.ops[0], Op::Rect(r, _) if r.x == 1.0));
    }
}
