// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Notebook, page, and drawing element data structures.

pub mod element;
pub mod notebook;
pub mod page;
