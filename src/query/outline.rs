// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The visible outline: what a tree widget renders, one row per line.

use crate::model::{NodeId, OrgNode};
use crate::registry::NodeRegistry;

/// One rendered line of the tree, depth-first pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub node_id: NodeId,
    pub depth: usize,
    pub label: String,
    pub employees: u32,
    pub expanded: bool,
    pub children_loaded: bool,
    /// A children fetch for this row is currently in flight. Derived from the
    /// coordinator's in-flight set, never stored on the node.
    pub loading: bool,
}

/// Flattens the visible part of the tree into rows.
///
/// Depth-first pre-order over the root sequence; descends only into nodes
/// with `expanded = true`, so a collapsed subtree contributes exactly its own
/// row. `is_loading` lets the caller mark rows with an outstanding children
/// fetch.
pub fn visible_rows(
    registry: &NodeRegistry,
    is_loading: impl Fn(&NodeId) -> bool,
) -> Vec<OutlineRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(&OrgNode, usize)> = registry
        .children_of(None)
        .into_iter()
        .rev()
        .map(|node| (node, 0))
        .collect();

    while let Some((node, depth)) = stack.pop() {
        rows.push(OutlineRow {
            node_id: node.node_id().clone(),
            depth,
            label: node.label().to_owned(),
            employees: node.employees(),
            expanded: node.expanded(),
            children_loaded: node.children_loaded(),
            loading: is_loading(node.node_id()),
        });

        if node.expanded() {
            for child in registry.children_of(Some(node.node_id())).into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    rows
}
