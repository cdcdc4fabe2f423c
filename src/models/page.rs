// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page state: the saved contents of one drawing canvas.

use super::element::Element;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Embedded file payloads keyed by file id.
pub type Files = BTreeMap<String, FileAttachment>;

/// An embedded binary payload (usually an image) referenced by image elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub id: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(rename = "dataURL", default)]
    pub data_url: String,
    /// Creation time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub created: i64,
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_zoom() -> f64 {
    1.0
}

/// View and background state of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    #[serde(default = "default_background")]
    pub view_background_color: String,
    #[serde(default)]
    pub scroll_x: f64,
    #[serde(default)]
    pub scroll_y: f64,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_background_color: default_background(),
            scroll_x: 0.0,
            scroll_y: 0.0,
            zoom: default_zoom(),
        }
    }
}

/// A single page of a notebook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_elements")]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub app_state: ViewState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Files>,
    /// In-memory content revision, bumped on every committed edit.
    #[serde(skip)]
    pub revision: u64,
}

impl Page {
    /// Create an empty page with a fresh id.
    pub fn new() -> Self {
        Self {
            id: format!("page-{}", uuid::Uuid::new_v4()),
            elements: Vec::new(),
            app_state: ViewState::default(),
            files: None,
            revision: 0,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize an element list, dropping entries that do not parse instead
/// of failing the whole page.
fn deserialize_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    let total = raw.len();
    let elements: Vec<Element> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(element) => Some(element),
            Err(e) => {
                log::warn!("Dropping malformed element: {}", e);
                None
            }
        })
        .collect();
    if elements.len() != total {
        log::warn!("Kept {} of {} stored elements", elements.len(), total);
    }
    Ok(elements)
}
