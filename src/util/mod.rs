// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shared helpers: geometry, colors, and debouncing.

pub mod color;
pub mod debounce;
pub mod geometry;
