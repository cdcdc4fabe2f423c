// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Inkbook - a sketch notebook
//!
//! A cross-platform desktop application for keeping notebooks of freeform
//! drawing pages, with a thumbnail dashboard and automatic local saving.

mod app;
mod config;
mod io;
mod models;
mod preview;
mod storage;
mod store;
mod ui;
mod util;

use anyhow::{Context, Result};
use app::InkbookApp;
use config::AppConfig;
use storage::{FileKeyValueStore, LocalNotebookRepository};
use store::NotebookStore;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load();

    let local = FileKeyValueStore::open(config.local_dir())
        .context("Failed to open notebook storage")?;
    let session = FileKeyValueStore::open(config.session_dir())
        .context("Failed to open session storage")?;
    let repository = LocalNotebookRepository::new(Box::new(local), Box::new(session));
    let store = NotebookStore::open(Box::new(repository));

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Inkbook"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Inkbook",
        options,
        Box::new(move |_cc| Ok(Box::new(InkbookApp::new(config, store)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
