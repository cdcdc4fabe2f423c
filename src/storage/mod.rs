// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Persistent storage for the notebook collection.
//!
//! Storage is modelled after browser web storage: string values under string
//! keys, in a persistent ("local") scope and a per-session scope. The
//! [`NotebookRepository`] trait is the only interface the rest of the
//! application sees.

pub mod file;
pub mod memory;
pub mod repository;

use anyhow::Result;

pub use file::FileKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use repository::{LocalNotebookRepository, NotebookRepository};

/// A string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}
