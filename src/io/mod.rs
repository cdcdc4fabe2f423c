// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for embedded media and notebook data.

pub mod media;
pub mod serialization;
