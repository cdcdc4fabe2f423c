// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Notebook collection state and mutations.
//!
//! The store owns the in-memory notebook tree, which is the single source of
//! truth. Every mutation replaces the relevant part of the tree and then
//! writes the whole collection through the repository. Storage failures are
//! logged and absorbed; they never block the user.

pub mod commit;

use crate::models::{
    element::Element,
    notebook::Notebook,
    page::{Files, Page, ViewState},
};
use crate::storage::NotebookRepository;

pub use commit::CommitQueue;

/// Direction to move a page within its notebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the front of the notebook.
    Up,
    /// Towards the back of the notebook.
    Down,
}

/// Currently opened notebook and its active page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub notebook_id: String,
    pub active_page: usize,
}

/// New content for a page, as emitted by the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub struct PageChange {
    pub elements: Vec<Element>,
    pub app_state: ViewState,
    pub files: Option<Files>,
}

pub struct NotebookStore {
    notebooks: Vec<Notebook>,
    selection: Option<Selection>,
    repository: Box<dyn NotebookRepository>,
}

impl NotebookStore {
    /// Restore the collection from the repository. A failed load starts
    /// with an empty collection.
    pub fn open(mut repository: Box<dyn NotebookRepository>) -> Self {
        let notebooks = match repository.load() {
            Ok(notebooks) => {
                log::info!("Loaded {} notebook(s)", notebooks.len());
                notebooks
            }
            Err(e) => {
                log::error!("Failed to load notebooks, starting empty: {:#}", e);
                Vec::new()
            }
        };
        Self {
            notebooks,
            selection: None,
            repository,
        }
    }

    pub fn notebooks(&self) -> &[Notebook] {
        &self.notebooks
    }

    pub fn notebook(&self, id: &str) -> Option<&Notebook> {
        self.notebooks.iter().find(|n| n.id == id)
    }

    fn notebook_mut(&mut self, id: &str) -> Option<&mut Notebook> {
        self.notebooks.iter_mut().find(|n| n.id == id)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_notebook(&self) -> Option<&Notebook> {
        self.selection
            .as_ref()
            .and_then(|s| self.notebook(&s.notebook_id))
    }

    pub fn active_page(&self) -> Option<&Page> {
        let selection = self.selection.as_ref()?;
        self.notebook(&selection.notebook_id)?
            .pages
            .get(selection.active_page)
    }

    fn persist(&mut self) {
        if let Err(e) = self.repository.save(&self.notebooks) {
            log::error!("Failed to save notebooks: {:#}", e);
        }
    }

    /// Create a notebook with one blank page and return its id.
    pub fn create_notebook(&mut self, name: &str) -> String {
        let notebook = Notebook::new(name);
        let id = notebook.id.clone();
        log::info!("Created notebook {:?}", notebook.name);
        self.notebooks.push(notebook);
        self.persist();
        id
    }

    pub fn rename_notebook(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let Some(notebook) = self.notebook_mut(id) else {
            return false;
        };
        if notebook.name == name {
            return false;
        }
        notebook.name = name.to_string();
        notebook.touch();
        log::info!("Renamed notebook {} to {:?}", id, name);
        self.persist();
        true
    }

    pub fn delete_notebook(&mut self, id: &str) -> bool {
        let Some(index) = self.notebooks.iter().position(|n| n.id == id) else {
            return false;
        };
        let removed = self.notebooks.remove(index);
        if self
            .selection
            .as_ref()
            .is_some_and(|s| s.notebook_id == id)
        {
            self.selection = None;
        }
        log::info!("Deleted notebook {:?}", removed.name);
        self.persist();
        true
    }

    /// Open a notebook at its first page.
    pub fn select(&mut self, id: &str) -> bool {
        if self.notebook(id).is_none() {
            return false;
        }
        self.selection = Some(Selection {
            notebook_id: id.to_string(),
            active_page: 0,
        });
        true
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    pub fn set_active_page(&mut self, index: usize) -> bool {
        let page_count = match self.selected_notebook() {
            Some(notebook) => notebook.pages.len(),
            None => return false,
        };
        match self.selection.as_mut() {
            Some(selection) if index < page_count => {
                selection.active_page = index;
                true
            }
            _ => false,
        }
    }

    fn selected_parts(&mut self) -> Option<(&mut Notebook, &mut usize)> {
        let selection = self.selection.as_mut()?;
        let notebook = self
            .notebooks
            .iter_mut()
            .find(|n| n.id == selection.notebook_id)?;
        Some((notebook, &mut selection.active_page))
    }

    /// Append a blank page to the selected notebook and make it active.
    pub fn add_page(&mut self) -> Option<String> {
        let (notebook, active) = self.selected_parts()?;
        let page = Page::new();
        let id = page.id.clone();
        notebook.pages.push(page);
        *active = notebook.pages.len() - 1;
        notebook.touch();
        log::info!("Added page {} ({} total)", id, notebook.pages.len());
        self.persist();
        Some(id)
    }

    /// Delete a page of the selected notebook. The last remaining page is
    /// never deleted.
    pub fn delete_page(&mut self, index: usize) -> bool {
        let Some((notebook, active)) = self.selected_parts() else {
            return false;
        };
        if notebook.pages.len() <= 1 || index >= notebook.pages.len() {
            return false;
        }
        let removed = notebook.pages.remove(index);
        if index <= *active {
            *active = active.saturating_sub(1);
        }
        *active = (*active).min(notebook.pages.len() - 1);
        notebook.touch();
        log::info!(
            "Deleted page {} ({} remaining)",
            removed.id,
            notebook.pages.len()
        );
        self.persist();
        true
    }

    /// Swap a page of the selected notebook with its neighbour. The active
    /// index follows the page that was active.
    pub fn move_page(&mut self, index: usize, direction: Direction) -> bool {
        let Some((notebook, active)) = self.selected_parts() else {
            return false;
        };
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => index.checked_add(1),
        };
        let Some(target) = target.filter(|&t| t < notebook.pages.len()) else {
            return false;
        };
        if index >= notebook.pages.len() {
            return false;
        }

        notebook.pages.swap(index, target);
        if *active == index {
            *active = target;
        } else if *active == target {
            *active = index;
        }
        notebook.touch();
        self.persist();
        true
    }

    /// Store new content for a page. Element lists equal to the stored one
    /// are ignored and nothing is written.
    pub fn commit_page(&mut self, notebook_id: &str, page_id: &str, change: PageChange) -> bool {
        let Some(notebook) = self.notebook_mut(notebook_id) else {
            log::warn!("Dropping edit for missing notebook {}", notebook_id);
            return false;
        };
        let Some(page) = notebook.pages.iter_mut().find(|p| p.id == page_id) else {
            log::warn!("Dropping edit for missing page {}", page_id);
            return false;
        };
        if page.elements == change.elements {
            log::debug!("Skipping commit of unchanged page {}", page_id);
            return false;
        }

        page.elements = change.elements;
        page.app_state = change.app_state;
        page.files = change.files;
        page.revision += 1;
        notebook.touch();
        self.persist();
        true
    }
}
