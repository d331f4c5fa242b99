// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Doris — incremental org-chart explorer core.
//!
//! Loads an organization tree page by page and branch by branch from a pool
//! of directory endpoints, keeps it in a merge-only registry, and exposes the
//! navigation, creation, and CSV-flattening operations a UI builds on. The
//! backend is a trait; see `backend::fixture` for the in-memory one the demo
//! binary and the tests run against.

pub mod backend;
pub mod config;
pub mod explorer;
pub mod export;
pub mod model;
pub mod query;
pub mod registry;
pub mod source;
pub mod ui;
