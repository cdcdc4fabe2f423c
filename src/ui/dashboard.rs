// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Notebook dashboard.
//!
//! Lists every notebook as a grid of cards or a compact list, each with a
//! thumbnail of its first page.

use crate::config::ViewMode;
use crate::models::notebook::Notebook;
use crate::preview::ThumbnailCache;
use crate::store::NotebookStore;

/// Result of dashboard interaction.
pub enum DashboardAction {
    None,
    Open(String),
    Create(String),
    Rename(String, String),
    Delete(String),
}

/// Dashboard UI state that outlives a frame.
pub struct DashboardState {
    pub mode: ViewMode,
    new_name: String,
    /// Notebook being renamed and the edited name
    renaming: Option<(String, String)>,
    /// Notebook awaiting delete confirmation
    confirm_delete: Option<String>,
}

impl DashboardState {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            new_name: String::new(),
            renaming: None,
            confirm_delete: None,
        }
    }
}

/// Display the dashboard and return the requested action.
pub fn show(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
    store: &NotebookStore,
    thumbnails: &mut ThumbnailCache,
    thumbnail_width: f32,
) -> DashboardAction {
    let mut action = DashboardAction::None;

    ui.horizontal(|ui| {
        ui.heading("Notebooks");
        ui.separator();
        let response = ui.add(
            egui::TextEdit::singleline(&mut state.new_name).hint_text("New notebook name"),
        );
        let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("➕ Create").clicked() || submitted {
            action = DashboardAction::Create(std::mem::take(&mut state.new_name));
        }
        ui.separator();
        ui.selectable_value(&mut state.mode, ViewMode::Grid, "Grid");
        ui.selectable_value(&mut state.mode, ViewMode::List, "List");
    });
    ui.separator();

    if store.notebooks().is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("No notebooks yet. Create one to start sketching.")
                    .color(egui::Color32::from_gray(160)),
            );
        });
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| match state.mode {
        ViewMode::Grid => {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = egui::vec2(16.0, 16.0);
                for notebook in store.notebooks() {
                    ui.vertical(|ui| {
                        ui.set_width(thumbnail_width);
                        if let Some(page) = notebook.pages.first() {
                            if thumbnails.show(ui, &notebook.id, page, thumbnail_width).clicked() {
                                action = DashboardAction::Open(notebook.id.clone());
                            }
                        }
                        notebook_details(ui, state, notebook, &mut action);
                    });
                }
            });
        }
        ViewMode::List => {
            for notebook in store.notebooks() {
                ui.horizontal(|ui| {
                    if let Some(page) = notebook.pages.first() {
                        if thumbnails.show(ui, &notebook.id, page, thumbnail_width / 3.0).clicked() {
                            action = DashboardAction::Open(notebook.id.clone());
                        }
                    }
                    ui.vertical(|ui| notebook_details(ui, state, notebook, &mut action));
                });
                ui.separator();
            }
        }
    });

    if let Some(id) = state.confirm_delete.clone() {
        let name = store
            .notebook(&id)
            .map(|n| n.name.clone())
            .unwrap_or_default();
        egui::Window::new("Delete notebook?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ui.ctx(), |ui| {
                ui.label(format!("\"{}\" and all of its pages will be deleted.", name));
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        action = DashboardAction::Delete(id.clone());
                        state.confirm_delete = None;
                    }
                    if ui.button("Cancel").clicked() {
                        state.confirm_delete = None;
                    }
                });
            });
    }

    action
}

/// Name, page count, timestamps, and per-notebook buttons.
fn notebook_details(
    ui: &mut egui::Ui,
    state: &mut DashboardState,
    notebook: &Notebook,
    action: &mut DashboardAction,
) {
    let rename_id = egui::Id::new(("rename-notebook", &notebook.id));
    let editing = state
        .renaming
        .as_ref()
        .is_some_and(|(id, _)| *id == notebook.id);

    if editing {
        let mut finished = false;
        if let Some((_, name)) = state.renaming.as_mut() {
            let response = ui.add(egui::TextEdit::singleline(name).id(rename_id));
            if response.lost_focus() {
                *action = DashboardAction::Rename(notebook.id.clone(), name.clone());
                finished = true;
            }
        }
        if finished {
            state.renaming = None;
        }
    } else if ui
        .add(egui::Label::new(egui::RichText::new(&notebook.name).strong()).sense(egui::Sense::click()))
        .clicked()
    {
        *action = DashboardAction::Open(notebook.id.clone());
    }

    let pages = notebook.pages.len();
    ui.label(
        egui::RichText::new(format!(
            "{} page{} · updated {}",
            pages,
            if pages == 1 { "" } else { "s" },
            notebook.updated_at.format("%Y-%m-%d %H:%M")
        ))
        .weak(),
    );

    ui.horizontal(|ui| {
        if ui.small_button("Open").clicked() {
            *action = DashboardAction::Open(notebook.id.clone());
        }
        if ui.small_button("Rename").clicked() {
            state.renaming = Some((notebook.id.clone(), notebook.name.clone()));
            ui.memory_mut(|m| m.request_focus(rename_id));
        }
        if ui.small_button("Delete").clicked() {
            state.confirm_delete = Some(notebook.id.clone());
        }
    });
}
