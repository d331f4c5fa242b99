// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Render-ready view of the explorer.
//!
//! A [`TreeOutline`] is one consistent snapshot of the visible tree, tagged
//! with the revision it reflects; a widget holds onto it until the revision
//! channel reports a newer one.

use std::fmt::Write as _;

use crate::explorer::Explorer;
use crate::query::outline::OutlineRow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeOutline {
    rev: u64,
    rows: Vec<OutlineRow>,
}

impl TreeOutline {
    /// Captures the current outline with its revision. The revision is read
    /// first, so a change slipping between the two reads makes the snapshot
    /// look stale and triggers a re-capture, never the other way around.
    pub async fn capture(explorer: &Explorer) -> Self {
        let rev = explorer.rev().await;
        let rows = explorer.outline().await;
        Self { rev, rows }
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn rows(&self) -> &[OutlineRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain-text rendering, two spaces per depth level, one row per line.
    /// `▾` marks an expanded node, `▸` a collapsed one, a trailing `…` a row
    /// whose children fetch is still out.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for _ in 0..row.depth {
                out.push_str("  ");
            }
            out.push(if row.expanded { '▾' } else { '▸' });
            let _ = write!(out, " {} [{}]", row.label, row.employees);
            if row.loading {
                out.push_str(" …");
            }
            out.push('\n');
        }
        out
    }
}
