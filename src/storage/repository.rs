// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Load and save the notebook collection.

use super::KeyValueStore;
use crate::io::serialization::{decode_legacy_pages, decode_notebooks, encode_notebooks};
use crate::models::notebook::Notebook;
use anyhow::Result;

/// Local storage key holding the full notebook collection.
pub const NOTEBOOKS_KEY: &str = "notebooks";

/// Session storage key used by the single-notebook format.
pub const LEGACY_PAGES_KEY: &str = "excalidraw-pages";

/// Whole-collection persistence for notebooks.
pub trait NotebookRepository {
    /// Read the full collection.
    fn load(&mut self) -> Result<Vec<Notebook>>;

    /// Replace the stored collection.
    fn save(&mut self, notebooks: &[Notebook]) -> Result<()>;
}

/// Repository over a persistent store plus the session store that may still
/// hold pages from the single-notebook format.
pub struct LocalNotebookRepository {
    local: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
}

impl LocalNotebookRepository {
    pub fn new(local: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    fn read_collection(&self) -> Result<Vec<Notebook>> {
        let mut notebooks = match self.local.get(NOTEBOOKS_KEY)? {
            Some(json) => decode_notebooks(&json)?,
            None => Vec::new(),
        };
        for notebook in &mut notebooks {
            if notebook.repair() {
                log::warn!("Repaired stored notebook {:?}", notebook.name);
            }
        }
        Ok(notebooks)
    }

    /// Fold legacy session pages into the collection, once.
    fn migrate_legacy(&mut self, notebooks: &mut Vec<Notebook>) -> Result<()> {
        let Some(json) = self.session.get(LEGACY_PAGES_KEY)? else {
            return Ok(());
        };

        let pages = match decode_legacy_pages(&json) {
            Ok(pages) => pages,
            Err(e) => {
                log::warn!("Skipping legacy page migration: {:#}", e);
                return Ok(());
            }
        };

        let notebook = Notebook::from_legacy_pages(pages);
        log::info!(
            "Migrated {} legacy page(s) into notebook {:?}",
            notebook.pages.len(),
            notebook.name
        );
        let mut migrated = notebooks.clone();
        migrated.push(notebook);
        self.save(&migrated)?;
        *notebooks = migrated;
        self.session.remove(LEGACY_PAGES_KEY)?;
        Ok(())
    }
}

impl NotebookRepository for LocalNotebookRepository {
    fn load(&mut self) -> Result<Vec<Notebook>> {
        let mut notebooks = self.read_collection()?;
        if let Err(e) = self.migrate_legacy(&mut notebooks) {
            log::error!("Legacy page migration failed: {:#}", e);
        }
        Ok(notebooks)
    }

    fn save(&mut self, notebooks: &[Notebook]) -> Result<()> {
        let json = encode_notebooks(notebooks)?;
        self.local.set(NOTEBOOKS_KEY, &json)
    }
}
