// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only projections over the node registry.
//!
//! Queries never mutate and never fetch; they turn registry contents into the
//! derived views the UI and the export path consume.

pub mod outline;
pub mod table;
