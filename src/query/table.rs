// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tabular flattening for the CSV export collaborator.
//!
//! Produces headers and rows only; encoding, escaping, and delivery belong to
//! whatever consumes the table (see `crate::export`).

use crate::model::{NodeId, OrgNode};
use crate::registry::NodeRegistry;

/// Column order of every exported table.
pub const EXPORT_HEADERS: [&str; 5] = ["id", "parent_id", "label", "description", "employees"];

/// Which part of the tree an export covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlattenScope {
    /// Every visible row, starting from the roots.
    AllVisible,
    /// The given node and its visible descendants.
    Subtree(NodeId),
}

/// Headers plus stringified rows, ready for a table sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Flattens the registry into a table, depth-first pre-order, parents before
/// children.
///
/// The walk mirrors the outline: it descends only into expanded nodes, so the
/// export matches what is on screen and a collapsed subtree contributes one
/// row. Never fetches. An unknown subtree root yields an empty table. Root
/// rows carry an empty `parent_id` cell.
pub fn flatten(registry: &NodeRegistry, scope: &FlattenScope) -> CsvTable {
    let mut stack: Vec<&OrgNode> = match scope {
        FlattenScope::AllVisible => registry.children_of(None).into_iter().rev().collect(),
        FlattenScope::Subtree(node_id) => registry.get(node_id).into_iter().collect(),
    };

    let mut rows = Vec::new();
    while let Some(node) = stack.pop() {
        rows.push(row_of(node));
        if node.expanded() {
            for child in registry.children_of(Some(node.node_id())).into_iter().rev() {
                stack.push(child);
            }
        }
    }

    CsvTable {
        headers: EXPORT_HEADERS.iter().map(|header| (*header).to_owned()).collect(),
        rows,
    }
}

fn row_of(node: &OrgNode) -> Vec<String> {
    vec![
        node.node_id().as_str().to_owned(),
        node.parent_id()
            .map(|parent_id| parent_id.as_str().to_owned())
            .unwrap_or_default(),
        node.label().to_owned(),
        node.description().to_owned(),
        node.employees().to_string(),
    ]
}
