// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! egui-backed page thumbnails.
//!
//! A thumbnail is rendered once into a list of egui shapes and replayed every
//! frame until the page's revision or the requested width changes. Embedded
//! images are decoded on background threads; each render gets a new
//! generation number and a decoded image is only blitted if its thumbnail is
//! still on the generation that requested it.

use super::render::render_elements;
use super::surface::{Font, RasterSurface, Style};
use super::{scale_for_width, REFERENCE_HEIGHT, REFERENCE_WIDTH};
use crate::io::media::{decode_data_url, LoadedImage};
use crate::models::element::{FillStyle, FontFamily, Point};
use crate::models::notebook::Notebook;
use crate::models::page::Page;
use crate::util::color::Color;
use crate::util::geometry::{ellipse_points, Rect};
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};

const ELLIPSE_SEGMENTS: usize = 32;

fn pos(point: Point) -> egui::Pos2 {
    egui::pos2(point.x as f32, point.y as f32)
}

fn egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

fn stroke(style: &Style) -> egui::Stroke {
    egui::Stroke::new(style.stroke_width as f32, style.stroke.to_egui())
}

fn fill(style: &Style) -> egui::Color32 {
    match style.fill {
        Some(color) if style.fill_style == FillStyle::Solid => color.to_egui(),
        // Patterned fills are shown as a lighter wash at thumbnail size.
        Some(color) => color.to_egui().gamma_multiply(0.5),
        None => egui::Color32::TRANSPARENT,
    }
}

fn font_id(font: &Font) -> egui::FontId {
    let family = match font.family {
        FontFamily::SansSerif => egui::FontFamily::Proportional,
        FontFamily::Serif => egui::FontFamily::Monospace,
    };
    egui::FontId::new(font.size.max(1.0) as f32, family)
}

/// An image blit waiting for its payload to decode.
struct ImageRequest {
    file_id: String,
    data_url: String,
    rect: egui::Rect,
}

/// Records renderer calls as egui shapes in thumbnail-local coordinates.
pub struct ShapeSurface {
    ctx: egui::Context,
    shapes: Vec<egui::Shape>,
    images: Vec<ImageRequest>,
}

impl ShapeSurface {
    pub fn new(ctx: &egui::Context) -> Self {
        Self {
            ctx: ctx.clone(),
            shapes: Vec::new(),
            images: Vec::new(),
        }
    }

    fn layout(&self, text: &str, font: &Font, color: Color) -> std::sync::Arc<egui::Galley> {
        self.ctx
            .fonts(|f| f.layout_no_wrap(text.to_owned(), font_id(font), color.to_egui()))
    }
}

impl RasterSurface for ShapeSurface {
    fn rect(&mut self, rect: Rect, style: &Style) {
        self.shapes.push(egui::Shape::Rect(egui::epaint::RectShape::new(
            egui_rect(rect),
            egui::Rounding::ZERO,
            fill(style),
            stroke(style),
        )));
    }

    fn ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64, style: &Style) {
        let points = ellipse_points(center, radius_x, radius_y, ELLIPSE_SEGMENTS)
            .into_iter()
            .map(pos)
            .collect();
        self.shapes
            .push(egui::Shape::convex_polygon(points, fill(style), stroke(style)));
    }

    fn polygon(&mut self, points: &[Point], style: &Style) {
        let points = points.iter().copied().map(pos).collect();
        self.shapes
            .push(egui::Shape::convex_polygon(points, fill(style), stroke(style)));
    }

    fn segment(&mut self, from: Point, to: Point, style: &Style) {
        self.shapes
            .push(egui::Shape::line_segment([pos(from), pos(to)], stroke(style)));
    }

    fn polyline(&mut self, points: &[Point], style: &Style) {
        let points = points.iter().copied().map(pos).collect();
        self.shapes.push(egui::Shape::line(points, stroke(style)));
    }

    fn text(&mut self, text: &str, origin: Point, font: &Font, color: Color) {
        let galley = self.layout(text, font, color);
        // Galleys are positioned by their top edge; ascent is roughly 0.8em.
        let top = egui::pos2(origin.x as f32, (origin.y - font.size * 0.8) as f32);
        self.shapes
            .push(egui::Shape::galley(top, galley, color.to_egui()));
    }

    fn measure_text(&mut self, text: &str, font: &Font) -> f64 {
        self.layout(text, font, Color::BLACK).size().x as f64
    }

    fn image(&mut self, file_id: &str, data_url: &str, rect: Rect) {
        self.images.push(ImageRequest {
            file_id: file_id.to_string(),
            data_url: data_url.to_string(),
            rect: egui_rect(rect),
        });
    }
}

/// Cache key: page ids are only unique within their notebook.
type PageKey = (String, String);

/// Result of a background image decode.
struct DecodedImage {
    key: PageKey,
    generation: u64,
    file_id: String,
    rect: egui::Rect,
    result: anyhow::Result<LoadedImage>,
}

struct Entry {
    revision: u64,
    width: f32,
    generation: u64,
    shapes: Vec<egui::Shape>,
    /// Keeps decoded image textures alive while they are painted.
    textures: Vec<egui::TextureHandle>,
}

/// Per-page cache of rendered thumbnails.
pub struct ThumbnailCache {
    entries: HashMap<PageKey, Entry>,
    next_generation: u64,
    sender: Sender<DecodedImage>,
    receiver: Receiver<DecodedImage>,
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailCache {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            entries: HashMap::new(),
            next_generation: 0,
            sender,
            receiver,
        }
    }

    /// Thumbnail size for a given width, keeping the page aspect ratio.
    pub fn size_for(width: f32) -> egui::Vec2 {
        egui::vec2(width, width * (REFERENCE_HEIGHT / REFERENCE_WIDTH) as f32)
    }

    /// Allocate and paint a thumbnail of `page`, re-rendering it first if
    /// the page changed since the last render.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        notebook_id: &str,
        page: &Page,
        width: f32,
    ) -> egui::Response {
        let (rect, response) = ui.allocate_exact_size(Self::size_for(width), egui::Sense::click());
        if !ui.is_rect_visible(rect) {
            return response;
        }

        let key = (notebook_id.to_string(), page.id.clone());
        let stale = self
            .entries
            .get(&key)
            .map_or(true, |e| e.revision != page.revision || e.width != width);
        if stale {
            self.render(ui.ctx(), key.clone(), page, width);
        }

        let painter = ui.painter_at(rect);
        let background = Color::parse(&page.app_state.view_background_color)
            .unwrap_or(Color::WHITE)
            .to_egui();
        painter.rect_filled(rect, 2.0, background);
        if let Some(entry) = self.entries.get(&key) {
            let offset = rect.min.to_vec2();
            painter.extend(entry.shapes.iter().cloned().map(|mut shape| {
                shape.translate(offset);
                shape
            }));
        }
        let outline = if response.hovered() {
            ui.visuals().selection.stroke
        } else {
            ui.visuals().widgets.noninteractive.bg_stroke
        };
        painter.rect_stroke(rect, 2.0, outline);
        response
    }

    fn render(&mut self, ctx: &egui::Context, key: PageKey, page: &Page, width: f32) {
        self.next_generation += 1;
        let generation = self.next_generation;

        let mut surface = ShapeSurface::new(ctx);
        render_elements(
            &mut surface,
            &page.elements,
            scale_for_width(width as f64),
            page.files.as_ref(),
        );
        log::debug!(
            "Rendered thumbnail of page {} ({} shapes, {} images)",
            page.id,
            surface.shapes.len(),
            surface.images.len()
        );

        for request in surface.images {
            let sender = self.sender.clone();
            let key = key.clone();
            std::thread::spawn(move || {
                let result = decode_data_url(&request.data_url);
                let _ = sender.send(DecodedImage {
                    key,
                    generation,
                    file_id: request.file_id,
                    rect: request.rect,
                    result,
                });
            });
        }

        self.entries.insert(
            key,
            Entry {
                revision: page.revision,
                width,
                generation,
                shapes: surface.shapes,
                textures: Vec::new(),
            },
        );
    }

    fn is_current(&self, key: &PageKey, generation: u64) -> bool {
        self.entries
            .get(key)
            .is_some_and(|e| e.generation == generation)
    }

    /// Blit finished image decodes into their thumbnails. Decodes for a
    /// thumbnail that has since been re-rendered are discarded.
    pub fn poll_decoded(&mut self, ctx: &egui::Context) {
        while let Ok(decoded) = self.receiver.try_recv() {
            if !self.is_current(&decoded.key, decoded.generation) {
                log::debug!(
                    "Discarding stale image {} for page {}",
                    decoded.file_id,
                    decoded.key.1
                );
                continue;
            }
            let image = match decoded.result {
                Ok(image) => image,
                Err(e) => {
                    log::warn!("Failed to decode image {}: {:#}", decoded.file_id, e);
                    continue;
                }
            };

            let color_image = egui::ColorImage::from_rgba_unmultiplied(
                [image.width as usize, image.height as usize],
                &image.pixels,
            );
            let texture = ctx.load_texture(
                format!("thumb-{}-{}-{}", decoded.key.0, decoded.key.1, decoded.file_id),
                color_image,
                egui::TextureOptions::LINEAR,
            );
            if let Some(entry) = self.entries.get_mut(&decoded.key) {
                entry.shapes.push(egui::Shape::image(
                    texture.id(),
                    decoded.rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                ));
                entry.textures.push(texture);
            }
            ctx.request_repaint();
        }
    }

    /// Drop cached thumbnails of pages that no longer exist.
    pub fn retain_existing(&mut self, notebooks: &[Notebook]) {
        let before = self.entries.len();
        self.entries.retain(|(notebook_id, page_id), _| {
            notebooks
                .iter()
                .any(|n| n.id == *notebook_id && n.pages.iter().any(|p| p.id == *page_id))
        });
        if self.entries.len() != before {
            log::debug!("Dropped {} stale thumbnail(s)", before - self.entries.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::element::{Arrowhead, Element, ElementKind};

    fn entry(generation: u64) -> Entry {
        Entry {
            revision: 0,
            width: 240.0,
            generation,
            shapes: Vec::new(),
            textures: Vec::new(),
        }
    }

    #[test]
    fn test_shapes_recorded_per_primitive() {
        let ctx = egui::Context::default();
        let mut surface = ShapeSurface::new(&ctx);
        let arrow = Element::new(
            ElementKind::Arrow {
                points: vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)],
                end_arrowhead: Some(Arrowhead::Arrow),
            },
            0.0,
            0.0,
            50.0,
            0.0,
        );
        let rect = Element::new(ElementKind::Rectangle, 0.0, 0.0, 10.0, 10.0);
        let ellipse = Element::new(ElementKind::Ellipse, 0.0, 0.0, 10.0, 10.0);

        render_elements(&mut surface, &[arrow, rect, ellipse], 1.0, None);
        assert_eq!(surface.shapes.len(), 5);
        assert!(surface.images.is_empty());
    }

    #[test]
    fn test_thumbnail_keeps_page_aspect() {
        let size = ThumbnailCache::size_for(240.0);
        assert_eq!(size.x, 240.0);
        assert!((size.y - 339.6).abs() < 0.1);
    }

    fn key(notebook_id: &str, page_id: &str) -> PageKey {
        (notebook_id.to_string(), page_id.to_string())
    }

    fn decoded(key: PageKey, generation: u64, result: anyhow::Result<LoadedImage>) -> DecodedImage {
        DecodedImage {
            key,
            generation,
            file_id: "f".to_string(),
            rect: egui::Rect::from_min_size(egui::pos2(1.0, 1.0), egui::vec2(4.0, 4.0)),
            result,
        }
    }

    fn pixel() -> LoadedImage {
        LoadedImage {
            width: 1,
            height: 1,
            pixels: vec![0, 0, 0, 255],
        }
    }

    #[test]
    fn test_stale_decodes_are_discarded() {
        let ctx = egui::Context::default();
        let mut cache = ThumbnailCache::new();
        cache.entries.insert(key("n", "p"), entry(2));

        assert!(cache.is_current(&key("n", "p"), 2));
        assert!(!cache.is_current(&key("n", "p"), 1));
        assert!(!cache.is_current(&key("n", "q"), 2));
        assert!(!cache.is_current(&key("m", "p"), 2));

        cache.sender.send(decoded(key("n", "p"), 1, Ok(pixel()))).unwrap();
        cache
            .sender
            .send(decoded(key("n", "p"), 2, Err(anyhow::anyhow!("bad payload"))))
            .unwrap();
        cache.sender.send(decoded(key("m", "p"), 2, Ok(pixel()))).unwrap();
        cache.poll_decoded(&ctx);

        let entry = &cache.entries[&key("n", "p")];
        assert!(entry.shapes.is_empty());
        assert!(entry.textures.is_empty());
    }

    #[test]
    fn test_current_decode_is_blitted() {
        let ctx = egui::Context::default();
        let mut cache = ThumbnailCache::new();
        cache.entries.insert(key("n", "p"), entry(3));

        cache.sender.send(decoded(key("n", "p"), 3, Ok(pixel()))).unwrap();
        cache.poll_decoded(&ctx);

        let entry = &cache.entries[&key("n", "p")];
        assert_eq!(entry.shapes.len(), 1);
        assert!(matches!(entry.shapes[0], egui::Shape::Mesh(_)));
        assert_eq!(entry.textures.len(), 1);
        assert_eq!(entry.textures[0].size(), [1, 1]);
    }

    #[test]
    fn test_same_page_id_in_two_notebooks_is_cached_separately() {
        let mut cache = ThumbnailCache::new();
        cache.entries.insert(key("a", "page-1"), entry(1));
        cache.entries.insert(key("b", "page-1"), entry(2));

        assert!(cache.is_current(&key("a", "page-1"), 1));
        assert!(cache.is_current(&key("b", "page-1"), 2));
    }

    #[test]
    fn test_retain_existing_drops_deleted_pages() {
        let mut notebook = Notebook::new("n");
        notebook.pages.push(Page::new());
        let kept = notebook.pages[0].id.clone();
        let removed = notebook.pages.remove(1).id;

        let mut cache = ThumbnailCache::new();
        cache.entries.insert(key(&notebook.id, &kept), entry(1));
        cache.entries.insert(key(&notebook.id, &removed), entry(2));
        cache.entries.insert(key("gone", &kept), entry(3));

        cache.retain_existing(std::slice::from_ref(&notebook));
        assert!(cache.is_current(&key(&notebook.id, &kept), 1));
        assert_eq!(cache.entries.len(), 1);
    }
}
