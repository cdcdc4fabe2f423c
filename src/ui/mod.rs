// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the Inkbook application.

pub mod canvas;
pub mod dashboard;
pub mod editor;
pub mod toolbar;
