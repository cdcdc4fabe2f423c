// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Notebook collection serialization and deserialization.
//!
//! The whole collection is stored as a single JSON array; pages saved by the
//! older single-notebook format are a bare JSON array of pages.

use crate::models::{notebook::Notebook, page::Page};
use anyhow::{Context, Result};

/// Encode the full notebook collection.
pub fn encode_notebooks(notebooks: &[Notebook]) -> Result<String> {
    let json = serde_json::to_string(notebooks).context("Failed to encode notebooks")?;
    Ok(json)
}

/// Decode a notebook collection.
pub fn decode_notebooks(json: &str) -> Result<Vec<Notebook>> {
    let notebooks = serde_json::from_str(json).context("Failed to decode notebooks")?;
    Ok(notebooks)
}

/// Decode the page array written by the single-notebook format.
pub fn decode_legacy_pages(json: &str) -> Result<Vec<Page>> {
    let pages = serde_json::from_str(json).context("Failed to decode legacy pages")?;
    Ok(pages)
}
