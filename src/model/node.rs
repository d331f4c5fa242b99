// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;

/// One org-chart node as the registry keeps it.
///
/// Data fields (`label`, `description`, `employees`, `parent_id`) are
/// server-authoritative and overwritten on merge; the two client flags
/// (`expanded`, `children_loaded`) belong to this session and survive merges
/// untouched. `parent_id = None` is the root sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgNode {
    node_id: NodeId,
    parent_id: Option<NodeId>,
    label: String,
    description: String,
    employees: u32,
    expanded: bool,
    children_loaded: bool,
}

impl OrgNode {
    pub fn new(
        node_id: NodeId,
        parent_id: Option<NodeId>,
        label: impl Into<String>,
        description: impl Into<String>,
        employees: u32,
    ) -> Self {
        Self {
            node_id,
            parent_id,
            label: label.into(),
            description: description.into(),
            employees,
            expanded: false,
            children_loaded: false,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn employees(&self) -> u32 {
        self.employees
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn children_loaded(&self) -> bool {
        self.children_loaded
    }

    pub(crate) fn set_expanded(&mut self, expanded: bool) {
        self.expanded = expanded;
    }

    pub(crate) fn set_children_loaded(&mut self, children_loaded: bool) {
        self.children_loaded = children_loaded;
    }

    pub(crate) fn set_parent_id(&mut self, parent_id: Option<NodeId>) {
        self.parent_id = parent_id;
    }

    /// Overwrites the data fields from `incoming`, leaving both client flags
    /// as they are. Used by the registry's merge path.
    pub(crate) fn merge_data(&mut self, incoming: &OrgNode) {
        self.parent_id = incoming.parent_id.clone();
        self.label = incoming.label.clone();
        self.description = incoming.description.clone();
        self.employees = incoming.employees;
    }

    /// Returns the same node under a different id, used for the atomic
    /// temporary-to-confirmed swap. Flags carry over so a node the user
    /// already expanded does not visually collapse on confirmation.
    pub(crate) fn with_node_id(mut self, node_id: NodeId) -> Self {
        self.node_id = node_id;
        self
    }
}
