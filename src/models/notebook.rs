// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Notebook: a named, ordered collection of pages.

use super::page::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name given to a notebook synthesized from legacy single-notebook data.
pub const LEGACY_NOTEBOOK_NAME: &str = "My Notebook";

/// Name used when a notebook is created without one.
pub const UNTITLED_NOTEBOOK_NAME: &str = "Untitled Notebook";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notebook {
    /// Create a notebook holding one blank page.
    pub fn new(name: &str) -> Self {
        Self::with_pages(name, vec![Page::new()])
    }

    /// Wrap pages saved by the single-notebook format into a notebook.
    pub fn from_legacy_pages(pages: Vec<Page>) -> Self {
        let mut notebook = Self::with_pages(LEGACY_NOTEBOOK_NAME, pages);
        notebook.repair();
        notebook
    }

    fn with_pages(name: &str, pages: Vec<Page>) -> Self {
        let now = Utc::now();
        let name = name.trim();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: if name.is_empty() {
                UNTITLED_NOTEBOOK_NAME.to_string()
            } else {
                name.to_string()
            },
            pages,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the notebook as modified now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Restore the notebook invariants after loading untrusted data:
    /// at least one page, and page ids unique within the notebook.
    /// Returns `true` if anything had to change.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;
        let mut seen = std::collections::HashSet::new();
        for page in &mut self.pages {
            if page.id.is_empty() || !seen.insert(page.id.clone()) {
                page.id = Page::new().id;
                seen.insert(page.id.clone());
                changed = true;
            }
        }
        if self.pages.is_empty() {
            self.pages.push(Page::new());
            changed = true;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notebook_has_one_page() {
        let notebook = Notebook::new("Sketches");
        assert_eq!(notebook.name, "Sketches");
        assert_eq!(notebook.pages.len(), 1);
        assert_eq!(notebook.created_at, notebook.updated_at);
    }

    #[test]
    fn test_blank_name_falls_back() {
        assert_eq!(Notebook::new("   ").name, UNTITLED_NOTEBOOK_NAME);
    }

    #[test]
    fn test_legacy_wrap_keeps_pages() {
        let mut page = Page::new();
        page.id = "page-1".to_string();
        let notebook = Notebook::from_legacy_pages(vec![page]);

        assert_eq!(notebook.name, LEGACY_NOTEBOOK_NAME);
        assert_eq!(notebook.pages.len(), 1);
        assert_eq!(notebook.pages[0].id, "page-1");
    }

    #[test]
    fn test_repair_adds_page_and_dedupes_ids() {
        let mut notebook = Notebook::new("x");
        notebook.pages.clear();
        assert!(notebook.repair());
        assert_eq!(notebook.pages.len(), 1);

        let mut a = Page::new();
        a.id = "same".to_string();
        let b = a.clone();
        notebook.pages = vec![a, b];
        assert!(notebook.repair());
        assert_ne!(notebook.pages[0].id, notebook.pages[1].id);
        assert!(!notebook.repair());
    }

    #[test]
    fn test_timestamps_serialize_camel_case() {
        let value = serde_json::to_value(Notebook::new("n")).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["pages"].as_array().map(Vec::len), Some(1));
    }
}
