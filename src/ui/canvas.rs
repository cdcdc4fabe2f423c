// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Drawing canvas for the active page.
//!
//! The canvas keeps its own working copy of the page, seeded from the store
//! when a page is opened. Every finished edit is reported as a
//! [`CanvasAction::Changed`] carrying the full element list, view state, and
//! file attachments; the editor decides when to commit it.

use crate::app::Tool;
use crate::io::media::{decode_data_url, load_image_attachment};
use crate::models::element::{Arrowhead, Element, ElementKind, FontFamily, Point};
use crate::models::page::{FileAttachment, Files, Page, ViewState};
use crate::store::PageChange;
use crate::util::color::Color;
use crate::util::geometry::{arrowhead, ellipse_points, page_to_screen, screen_to_page, Rect};
use std::collections::HashMap;
use std::f64::consts::PI;

/// Smallest shape, in page units, that a drag will create.
const MIN_SHAPE_SIZE: f64 = 2.0;
const TEXT_SIZE: f64 = 20.0;
const MAX_IMAGE_SIZE: f64 = 300.0;
const HIT_TOLERANCE: f64 = 4.0;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    Changed(PageChange),
}

/// An edit in progress.
#[derive(Debug, Clone)]
enum Draft {
    Pan,
    Shape { tool: Tool, start: Point, current: Point },
    Stroke { points: Vec<Point> },
}

struct TextEntry {
    at: Point,
    text: String,
    focused: bool,
}

/// Screen placement of the page.
#[derive(Debug, Clone, Copy)]
struct View {
    origin: Point,
    scroll: Point,
    zoom: f64,
}

impl View {
    fn to_screen(self, point: Point) -> egui::Pos2 {
        let s = page_to_screen(point, self.origin, self.scroll, self.zoom);
        egui::pos2(s.x as f32, s.y as f32)
    }

    fn to_page(self, pos: egui::Pos2) -> Point {
        screen_to_page(
            Point::new(pos.x as f64, pos.y as f64),
            self.origin,
            self.scroll,
            self.zoom,
        )
    }
}

/// Working copy of the page being edited.
pub struct CanvasState {
    page_id: String,
    elements: Vec<Element>,
    app_state: ViewState,
    files: Option<Files>,
    draft: Option<Draft>,
    text_entry: Option<TextEntry>,
    /// Decoded image textures by file id; `None` if the payload is unreadable
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl CanvasState {
    pub fn load(page: &Page) -> Self {
        Self {
            page_id: page.id.clone(),
            elements: page.elements.clone(),
            app_state: page.app_state.clone(),
            files: page.files.clone(),
            draft: None,
            text_entry: None,
            textures: HashMap::new(),
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    fn change(&self) -> PageChange {
        PageChange {
            elements: self.elements.clone(),
            app_state: self.app_state.clone(),
            files: self.files.clone(),
        }
    }

    fn push_element(&mut self, element: Element) -> CanvasAction {
        log::debug!("Added {} {}", element.kind.name(), element.id);
        self.elements.push(element);
        CanvasAction::Changed(self.change())
    }

    /// Mark the topmost element under `point` as deleted.
    fn erase_at(&mut self, point: Point, tolerance: f64) -> bool {
        let hit = self
            .elements
            .iter_mut()
            .rev()
            .filter(|e| !e.is_deleted)
            .find(|e| element_bounds(e).is_some_and(|b| b.contains(point, tolerance)));
        match hit {
            Some(element) => {
                element.is_deleted = true;
                true
            }
            None => false,
        }
    }

    fn insert_image(
        &mut self,
        at: Point,
        attachment: FileAttachment,
        width: u32,
        height: u32,
    ) -> CanvasAction {
        let (width, height) = (width.max(1) as f64, height.max(1) as f64);
        let fit = (MAX_IMAGE_SIZE / width.max(height)).min(1.0);
        let element = Element::new(
            ElementKind::Image {
                file_id: Some(attachment.id.clone()),
            },
            at.x,
            at.y,
            width * fit,
            height * fit,
        );
        self.files
            .get_or_insert_with(Files::new)
            .insert(attachment.id.clone(), attachment);
        self.push_element(element)
    }

    fn add_text(&mut self, at: Point, text: &str, width: f64) -> Option<CanvasAction> {
        if text.trim().is_empty() {
            return None;
        }
        let lines = text.lines().count().max(1) as f64;
        let element = Element::new(
            ElementKind::Text {
                text: text.to_string(),
                font_size: Some(TEXT_SIZE),
                font_family: FontFamily::SansSerif,
            },
            at.x,
            at.y,
            width,
            lines * TEXT_SIZE * 1.2,
        );
        Some(self.push_element(element))
    }
}

/// Page-space bounding box of an element, including line-like elements whose
/// extent comes from their points.
fn element_bounds(element: &Element) -> Option<Rect> {
    match element.points() {
        Some(points) if !points.is_empty() => {
            let origin = element.origin()?;
            let (mut min, mut max) = (points[0], points[0]);
            for p in points {
                min = Point::new(min.x.min(p.x), min.y.min(p.y));
                max = Point::new(max.x.max(p.x), max.y.max(p.y));
            }
            Some(Rect::new(
                origin.x + min.x,
                origin.y + min.y,
                max.x - min.x,
                max.y - min.y,
            ))
        }
        Some(_) => None,
        None => element
            .bounds()
            .map(|(x, y, w, h)| Rect::from_corners(Point::new(x, y), Point::new(x + w, y + h))),
    }
}

/// Turn a finished drag into an element, if it is large enough to keep.
fn finish_draft(draft: &Draft) -> Option<Element> {
    match draft {
        Draft::Pan => None,
        Draft::Shape {
            tool,
            start,
            current,
        } => {
            let (dx, dy) = (current.x - start.x, current.y - start.y);
            match tool {
                Tool::Rectangle | Tool::Ellipse | Tool::Diamond => {
                    let rect = Rect::from_corners(*start, *current);
                    if rect.width < MIN_SHAPE_SIZE || rect.height < MIN_SHAPE_SIZE {
                        return None;
                    }
                    let kind = match tool {
                        Tool::Rectangle => ElementKind::Rectangle,
                        Tool::Ellipse => ElementKind::Ellipse,
                        _ => ElementKind::Diamond,
                    };
                    Some(Element::new(kind, rect.x, rect.y, rect.width, rect.height))
                }
                Tool::Line | Tool::Arrow => {
                    if dx.hypot(dy) < MIN_SHAPE_SIZE {
                        return None;
                    }
                    let points = vec![Point::new(0.0, 0.0), Point::new(dx, dy)];
                    let kind = if *tool == Tool::Arrow {
                        ElementKind::Arrow {
                            points,
                            end_arrowhead: Some(Arrowhead::Arrow),
                        }
                    } else {
                        ElementKind::Line { points }
                    };
                    Some(Element::new(kind, start.x, start.y, dx.abs(), dy.abs()))
                }
                _ => None,
            }
        }
        Draft::Stroke { points } => {
            if points.len() < 2 {
                return None;
            }
            let origin = points[0];
            let relative: Vec<Point> = points
                .iter()
                .map(|p| Point::new(p.x - origin.x, p.y - origin.y))
                .collect();
            let (mut width, mut height) = (0.0f64, 0.0f64);
            for p in &relative {
                width = width.max(p.x.abs());
                height = height.max(p.y.abs());
            }
            Some(Element::new(
                ElementKind::Freedraw { points: relative },
                origin.x,
                origin.y,
                width,
                height,
            ))
        }
    }
}

/// Display the canvas for the working page and handle mouse interactions.
pub fn show(ui: &mut egui::Ui, state: &mut CanvasState, tool: Tool) -> CanvasAction {
    let mut action = CanvasAction::None;
    let (rect, response) =
        ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
    let view = View {
        origin: Point::new(rect.min.x as f64, rect.min.y as f64),
        scroll: Point::new(state.app_state.scroll_x, state.app_state.scroll_y),
        zoom: state.app_state.zoom.max(0.1),
    };

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            let p = view.to_page(pos);
            state.draft = match tool {
                Tool::Select => Some(Draft::Pan),
                Tool::Rectangle | Tool::Ellipse | Tool::Diamond | Tool::Line | Tool::Arrow => {
                    Some(Draft::Shape {
                        tool,
                        start: p,
                        current: p,
                    })
                }
                Tool::Freedraw => Some(Draft::Stroke { points: vec![p] }),
                Tool::Text | Tool::Image | Tool::Eraser => None,
            };
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            let p = view.to_page(pos);
            match &mut state.draft {
                Some(Draft::Pan) => {
                    let delta = response.drag_delta();
                    state.app_state.scroll_x += delta.x as f64 / view.zoom;
                    state.app_state.scroll_y += delta.y as f64 / view.zoom;
                }
                Some(Draft::Shape { current, .. }) => *current = p,
                Some(Draft::Stroke { points }) => {
                    let moved = points
                        .last()
                        .map_or(true, |last| (p.x - last.x).hypot(p.y - last.y) * view.zoom >= 1.0);
                    if moved {
                        points.push(p);
                    }
                }
                None => {}
            }
        }
    }

    if response.drag_stopped() {
        match state.draft.take() {
            Some(Draft::Pan) => action = CanvasAction::Changed(state.change()),
            Some(draft) => {
                if let Some(element) = finish_draft(&draft) {
                    action = state.push_element(element);
                }
            }
            None => {}
        }
    }

    if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            let p = view.to_page(pos);
            match tool {
                // A click away from an open entry only finishes it.
                Tool::Text if state.text_entry.is_none() => {
                    state.text_entry = Some(TextEntry {
                        at: p,
                        text: String::new(),
                        focused: false,
                    });
                }
                Tool::Eraser => {
                    if state.erase_at(p, HIT_TOLERANCE / view.zoom) {
                        action = CanvasAction::Changed(state.change());
                    }
                }
                Tool::Image => {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
                        .pick_file()
                    {
                        match load_image_attachment(&path) {
                            Ok((attachment, width, height)) => {
                                log::info!("Inserted image {}", path.display());
                                action = state.insert_image(p, attachment, width, height);
                            }
                            Err(e) => log::error!("Failed to insert image: {:#}", e),
                        }
                    }
                }
                _ => {}
            }
        }
    }

    // Paint the page
    let painter = ui.painter_at(rect);
    let background = Color::parse(&state.app_state.view_background_color)
        .unwrap_or(Color::WHITE)
        .to_egui();
    painter.rect_filled(rect, 0.0, background);

    for element in state.elements.iter().filter(|e| !e.is_deleted) {
        draw_element(
            ui.ctx(),
            &painter,
            element,
            view,
            state.files.as_ref(),
            &mut state.textures,
        );
    }

    // Draw the edit in progress
    match &state.draft {
        Some(Draft::Stroke { points }) => {
            let screen: Vec<egui::Pos2> = points.iter().map(|p| view.to_screen(*p)).collect();
            painter.add(egui::Shape::line(
                screen,
                egui::Stroke::new(2.0 * view.zoom as f32, egui::Color32::LIGHT_BLUE),
            ));
        }
        Some(draft) => {
            if let Some(element) = finish_draft(draft) {
                draw_element(
                    ui.ctx(),
                    &painter,
                    &element,
                    view,
                    None,
                    &mut state.textures,
                );
            }
        }
        None => {}
    }

    if let Some(text_action) = show_text_entry(ui, state, view) {
        action = text_action;
    }

    action
}

/// Inline editor for a text element being placed. Enter or clicking away
/// finishes the text; Escape discards it.
fn show_text_entry(ui: &mut egui::Ui, state: &mut CanvasState, view: View) -> Option<CanvasAction> {
    let entry = state.text_entry.as_mut()?;
    let font = egui::FontId::proportional((TEXT_SIZE * view.zoom) as f32);
    let edit_id = egui::Id::new("canvas-text-entry");

    let response = egui::Area::new(egui::Id::new("canvas-text-area"))
        .fixed_pos(view.to_screen(entry.at))
        .show(ui.ctx(), |ui| {
            ui.add(
                egui::TextEdit::singleline(&mut entry.text)
                    .id(edit_id)
                    .font(font)
                    .desired_width(240.0)
                    .hint_text("Type text"),
            )
        })
        .inner;

    if !entry.focused {
        response.request_focus();
        entry.focused = true;
        return None;
    }
    if !response.lost_focus() {
        return None;
    }

    let entry = state.text_entry.take()?;
    if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
        return None;
    }
    let measured = ui.fonts(|f| {
        f.layout_no_wrap(
            entry.text.clone(),
            egui::FontId::proportional(TEXT_SIZE as f32),
            egui::Color32::BLACK,
        )
        .size()
        .x as f64
    });
    // Slack so slightly different font metrics do not wrap a single line.
    state.add_text(entry.at, &entry.text, measured * 1.1 + 4.0)
}

fn screen_rect(element: &Element, view: View) -> Option<egui::Rect> {
    let (x, y, w, h) = element.bounds()?;
    Some(egui::Rect::from_two_pos(
        view.to_screen(Point::new(x, y)),
        view.to_screen(Point::new(x + w, y + h)),
    ))
}

/// Draw one element at the canvas view transform.
fn draw_element(
    ctx: &egui::Context,
    painter: &egui::Painter,
    element: &Element,
    view: View,
    files: Option<&Files>,
    textures: &mut HashMap<String, Option<egui::TextureHandle>>,
) {
    let color = element
        .stroke_color
        .as_deref()
        .and_then(Color::parse)
        .unwrap_or(Color::BLACK)
        .to_egui();
    let stroke = egui::Stroke::new(
        (element.stroke_width.unwrap_or(1.0) * view.zoom) as f32,
        color,
    );
    let fill = Color::parse(&element.background_color)
        .filter(|c| !c.is_transparent())
        .map_or(egui::Color32::TRANSPARENT, Color::to_egui);
    let screen_points = |points: &[Point]| -> Option<Vec<egui::Pos2>> {
        let origin = element.origin()?;
        Some(
            points
                .iter()
                .map(|p| view.to_screen(Point::new(origin.x + p.x, origin.y + p.y)))
                .collect(),
        )
    };

    match &element.kind {
        ElementKind::Rectangle => {
            if let Some(r) = screen_rect(element, view) {
                painter.rect(r, 0.0, fill, stroke);
            }
        }
        ElementKind::Ellipse => {
            if let Some(r) = screen_rect(element, view) {
                let center = Point::new(r.center().x as f64, r.center().y as f64);
                let points = ellipse_points(center, r.width() as f64 / 2.0, r.height() as f64 / 2.0, 48)
                    .into_iter()
                    .map(|p| egui::pos2(p.x as f32, p.y as f32))
                    .collect();
                painter.add(egui::Shape::convex_polygon(points, fill, stroke));
            }
        }
        ElementKind::Diamond => {
            if let Some((x, y, w, h)) = element.bounds() {
                let points = Rect::new(x, y, w, h)
                    .diamond_vertices()
                    .iter()
                    .map(|p| view.to_screen(*p))
                    .collect();
                painter.add(egui::Shape::convex_polygon(points, fill, stroke));
            }
        }
        ElementKind::Line { points } | ElementKind::Freedraw { points } => {
            if let Some(screen) = screen_points(points).filter(|s| s.len() >= 2) {
                painter.add(egui::Shape::line(screen, stroke));
            }
        }
        ElementKind::Arrow {
            points,
            end_arrowhead,
        } => {
            if let Some(screen) = screen_points(points).filter(|s| s.len() >= 2) {
                let tail = screen[screen.len() - 2];
                let tip = screen[screen.len() - 1];
                painter.add(egui::Shape::line(screen, stroke));
                if *end_arrowhead == Some(Arrowhead::Arrow) {
                    let head = arrowhead(
                        Point::new(tail.x as f64, tail.y as f64),
                        Point::new(tip.x as f64, tip.y as f64),
                        10.0 * view.zoom,
                        PI / 6.0,
                    );
                    for (a, b) in head {
                        painter.line_segment(
                            [
                                egui::pos2(a.x as f32, a.y as f32),
                                egui::pos2(b.x as f32, b.y as f32),
                            ],
                            stroke,
                        );
                    }
                }
            }
        }
        ElementKind::Text {
            text,
            font_size,
            font_family,
        } => {
            if let Some(origin) = element.origin() {
                let size = (font_size.unwrap_or(TEXT_SIZE) * view.zoom) as f32;
                let family = match font_family {
                    FontFamily::SansSerif => egui::FontFamily::Proportional,
                    FontFamily::Serif => egui::FontFamily::Monospace,
                };
                let galley = painter.layout_no_wrap(
                    text.clone(),
                    egui::FontId::new(size.max(1.0), family),
                    color,
                );
                painter.galley(view.to_screen(origin), galley, color);
            }
        }
        ElementKind::Image { file_id } => {
            let Some(r) = screen_rect(element, view) else {
                return;
            };
            let file = file_id.as_deref().and_then(|id| files?.get(id));
            let texture = file.and_then(|file| {
                textures
                    .entry(file.id.clone())
                    .or_insert_with(|| match decode_data_url(&file.data_url) {
                        Ok(image) => Some(ctx.load_texture(
                            format!("canvas-{}", file.id),
                            egui::ColorImage::from_rgba_unmultiplied(
                                [image.width as usize, image.height as usize],
                                &image.pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )),
                        Err(e) => {
                            log::warn!("Cannot show image {}: {:#}", file.id, e);
                            None
                        }
                    })
                    .clone()
            });
            match texture {
                Some(texture) => {
                    painter.image(
                        texture.id(),
                        r,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None => {
                    painter.rect_stroke(r, 0.0, egui::Stroke::new(1.0, egui::Color32::GRAY));
                }
            }
        }
        ElementKind::Unknown { .. } => {}
    }
}
