// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Notebook editor: page list, toolbar, and drawing canvas.

use crate::app::Tool;
use crate::preview::ThumbnailCache;
use crate::store::{CommitQueue, Direction, NotebookStore};
use crate::ui::canvas::{self, CanvasAction, CanvasState};
use crate::ui::toolbar;
use std::time::{Duration, Instant};

/// Result of editor interaction.
pub enum EditorAction {
    None,
    Back,
}

/// Page-list request, applied after the side panel is drawn.
enum PageRequest {
    Select(usize),
    Add,
    Delete(usize),
    Move(usize, Direction),
}

/// Editor for one open notebook.
pub struct EditorView {
    notebook_id: String,
    canvas: Option<CanvasState>,
    commits: CommitQueue,
    tool: Tool,
}

impl EditorView {
    pub fn new(notebook_id: &str, debounce: Duration) -> Self {
        Self {
            notebook_id: notebook_id.to_string(),
            canvas: None,
            commits: CommitQueue::new(debounce),
            tool: Tool::Freedraw,
        }
    }

    /// Close the editor, committing any edit still waiting for its quiet
    /// period.
    pub fn close(mut self, store: &mut NotebookStore) {
        self.commits.flush(store);
    }

    /// Reload the canvas when the active page is not the one being edited.
    fn sync_canvas(&mut self, store: &NotebookStore) {
        let Some(page) = store.active_page() else {
            self.canvas = None;
            return;
        };
        if self.canvas.as_ref().map(CanvasState::page_id) != Some(page.id.as_str()) {
            log::debug!("Editing page {}", page.id);
            self.canvas = Some(CanvasState::load(page));
        }
    }

    fn apply(&mut self, store: &mut NotebookStore, request: PageRequest) {
        // Page-list changes always see the latest canvas content.
        self.commits.flush(store);
        match request {
            PageRequest::Select(index) => {
                store.set_active_page(index);
            }
            PageRequest::Add => {
                store.add_page();
            }
            PageRequest::Delete(index) => {
                store.delete_page(index);
            }
            PageRequest::Move(index, direction) => {
                store.move_page(index, direction);
            }
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        store: &mut NotebookStore,
        thumbnails: &mut ThumbnailCache,
        page_thumbnail_width: f32,
    ) -> EditorAction {
        let now = Instant::now();
        self.commits.poll(store, now);
        if let Some(remaining) = self.commits.remaining(now) {
            ctx.request_repaint_after(remaining);
        }

        let Some(notebook) = store.notebook(&self.notebook_id) else {
            log::warn!("Notebook {} no longer exists", self.notebook_id);
            return EditorAction::Back;
        };
        let notebook_name = notebook.name.clone();
        let mut action = EditorAction::None;

        egui::TopBottomPanel::top("editor_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("⬅ Notebooks").clicked() {
                    action = EditorAction::Back;
                }
                ui.separator();
                ui.strong(&notebook_name);
            });
            toolbar::show(ui, &mut self.tool);
        });

        let mut request = None;
        egui::SidePanel::left("page_list")
            .resizable(false)
            .exact_width(page_thumbnail_width + 24.0)
            .show(ctx, |ui| {
                let Some(notebook) = store.selected_notebook() else {
                    return;
                };
                let active = store.selection().map_or(0, |s| s.active_page);
                let count = notebook.pages.len();

                ui.heading("Pages");
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (index, page) in notebook.pages.iter().enumerate() {
                        let label = egui::RichText::new(format!("Page {}", index + 1));
                        ui.label(if index == active { label.strong() } else { label });
                        let response = thumbnails.show(ui, &notebook.id, page, page_thumbnail_width);
                        if index == active {
                            ui.painter().rect_stroke(
                                response.rect,
                                0.0,
                                egui::Stroke::new(2.0, ui.visuals().selection.bg_fill),
                            );
                        }
                        if response.clicked() {
                            request = Some(PageRequest::Select(index));
                        }
                        ui.horizontal(|ui| {
                            if ui.add_enabled(index > 0, egui::Button::new("▲")).clicked() {
                                request = Some(PageRequest::Move(index, Direction::Up));
                            }
                            if ui
                                .add_enabled(index + 1 < count, egui::Button::new("▼"))
                                .clicked()
                            {
                                request = Some(PageRequest::Move(index, Direction::Down));
                            }
                            if ui.add_enabled(count > 1, egui::Button::new("🗑")).clicked() {
                                request = Some(PageRequest::Delete(index));
                            }
                        });
                        ui.add_space(8.0);
                    }
                    if ui.button("➕ Add page").clicked() {
                        request = Some(PageRequest::Add);
                    }
                });
            });

        if let Some(request) = request {
            let deletes = matches!(request, PageRequest::Delete(_));
            self.apply(store, request);
            if deletes {
                thumbnails.retain_existing(store.notebooks());
            }
        }
        self.sync_canvas(store);

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ctx.style().visuals.extreme_bg_color))
            .show(ctx, |ui| {
                let Some(state) = self.canvas.as_mut() else {
                    ui.label("This notebook has no pages.");
                    return;
                };
                if let CanvasAction::Changed(change) = canvas::show(ui, state, self.tool) {
                    let page_id = state.page_id().to_string();
                    self.commits
                        .enqueue(store, &self.notebook_id, &page_id, change, Instant::now());
                    if let Some(remaining) = self.commits.remaining(Instant::now()) {
                        ui.ctx().request_repaint_after(remaining);
                    }
                }
            });

        action
    }
}
