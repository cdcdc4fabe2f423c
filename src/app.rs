// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the root state container: the notebook store, the
//! thumbnail cache, and whichever screen (dashboard or editor) is showing.

use crate::config::{AppConfig, ViewMode};
use crate::preview::ThumbnailCache;
use crate::store::NotebookStore;
use crate::ui::dashboard::{self, DashboardAction, DashboardState};
use crate::ui::editor::{EditorAction, EditorView};

/// Current drawing tool selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Rectangle,
    Ellipse,
    Diamond,
    Line,
    Arrow,
    Freedraw,
    Text,
    Image,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 10] = [
        Tool::Select,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::Diamond,
        Tool::Line,
        Tool::Arrow,
        Tool::Freedraw,
        Tool::Text,
        Tool::Image,
        Tool::Eraser,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tool::Select => "✋ Pan",
            Tool::Rectangle => "▭ Rectangle",
            Tool::Ellipse => "◯ Ellipse",
            Tool::Diamond => "◇ Diamond",
            Tool::Line => "⟋ Line",
            Tool::Arrow => "➝ Arrow",
            Tool::Freedraw => "✏ Draw",
            Tool::Text => "A Text",
            Tool::Image => "🖼 Image",
            Tool::Eraser => "⌫ Erase",
        }
    }
}

enum Screen {
    Dashboard,
    Editor(EditorView),
}

/// Main application state.
pub struct InkbookApp {
    config: AppConfig,

    /// Notebook collection and selection
    store: NotebookStore,

    /// Rendered page thumbnails shared by both screens
    thumbnails: ThumbnailCache,

    dashboard: DashboardState,

    screen: Screen,
}

impl InkbookApp {
    pub fn new(config: AppConfig, store: NotebookStore) -> Self {
        let dashboard = DashboardState::new(config.default_view);
        Self {
            config,
            store,
            thumbnails: ThumbnailCache::new(),
            dashboard,
            screen: Screen::Dashboard,
        }
    }

    fn open_notebook(&mut self, id: &str) {
        self.close_editor();
        if self.store.select(id) {
            log::info!("Opened notebook {}", id);
            self.screen = Screen::Editor(EditorView::new(id, self.config.debounce()));
        }
    }

    /// Leave the editor, saving any edit still waiting for its quiet period.
    fn close_editor(&mut self) {
        if let Screen::Editor(editor) = std::mem::replace(&mut self.screen, Screen::Dashboard) {
            editor.close(&mut self.store);
            self.store.deselect();
        }
    }

    fn handle_dashboard_action(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::Open(id) => self.open_notebook(&id),
            DashboardAction::Create(name) => {
                let id = self.store.create_notebook(&name);
                self.open_notebook(&id);
            }
            DashboardAction::Rename(id, name) => {
                self.store.rename_notebook(&id, &name);
            }
            DashboardAction::Delete(id) => {
                if self.store.delete_notebook(&id) {
                    self.thumbnails.retain_existing(self.store.notebooks());
                }
            }
            DashboardAction::None => {}
        }
    }
}

impl eframe::App for InkbookApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Blit any thumbnail images that finished decoding
        self.thumbnails.poll_decoded(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            self.close_editor();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Notebook").clicked() {
                        let id = self.store.create_notebook("");
                        self.open_notebook(&id);
                        ui.close_menu();
                    }
                    let in_editor = matches!(self.screen, Screen::Editor(_));
                    if ui
                        .add_enabled(in_editor, egui::Button::new("Back to Notebooks"))
                        .clicked()
                    {
                        self.close_editor();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        self.close_editor();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    if ui
                        .radio_value(&mut self.dashboard.mode, ViewMode::Grid, "Grid")
                        .clicked()
                    {
                        ui.close_menu();
                    }
                    if ui
                        .radio_value(&mut self.dashboard.mode, ViewMode::List, "List")
                        .clicked()
                    {
                        ui.close_menu();
                    }
                });
            });
        });

        match &mut self.screen {
            Screen::Dashboard => {
                let action = egui::CentralPanel::default()
                    .show(ctx, |ui| {
                        dashboard::show(
                            ui,
                            &mut self.dashboard,
                            &self.store,
                            &mut self.thumbnails,
                            self.config.thumbnail_width,
                        )
                    })
                    .inner;
                self.handle_dashboard_action(action);
            }
            Screen::Editor(editor) => {
                let action = editor.show(
                    ctx,
                    &mut self.store,
                    &mut self.thumbnails,
                    self.config.page_thumbnail_width,
                );
                match action {
                    EditorAction::Back => self.close_editor(),
                    EditorAction::None => {}
                }
            }
        }
    }
}
