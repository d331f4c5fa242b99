// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory node registry: the single source of truth the UI reads.
//!
//! All mutation funnels through `upsert_many`, `remove`, `replace_id`, and the
//! two flag setters, so there is exactly one serialized mutation path. Every
//! effective mutation bumps a revision counter that reactive readers anchor on.

use std::collections::BTreeMap;
use std::fmt;

use tracing::trace;

use crate::model::{NodeId, OrgNode};

/// Keyed store of every fetched or optimistically created node, plus an
/// arrival-ordered child sequence per parent.
///
/// Ordering rules: the first merge for a parent records backend order; later
/// merges keep known ids in their positions and append unseen ids in batch
/// order. Optimistic inserts append at the end of their parent's sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeRegistry {
    nodes: BTreeMap<NodeId, OrgNode>,
    roots: Vec<NodeId>,
    children: BTreeMap<NodeId, Vec<NodeId>>,
    rev: u64,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn get(&self, node_id: &NodeId) -> Option<&OrgNode> {
        self.nodes.get(node_id)
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, OrgNode> {
        &self.nodes
    }

    /// The ordered nodes whose `parent_id` exactly equals `parent`.
    ///
    /// Exact match only: no descendants, no siblings. `None` lists root nodes
    /// in arrival order across all fetched pages.
    pub fn children_of(&self, parent: Option<&NodeId>) -> Vec<&OrgNode> {
        self.child_seq(parent)
            .iter()
            .filter_map(|node_id| self.nodes.get(node_id))
            .collect()
    }

    /// Merges a batch by id: data fields overwrite, the `expanded` and
    /// `children_loaded` flags are never cleared by a merge (flag changes go
    /// through the dedicated setters). Returns how many records were inserted
    /// or changed.
    pub fn upsert_many(&mut self, batch: Vec<OrgNode>) -> usize {
        let mut changed = 0;

        for incoming in batch {
            match self.nodes.get_mut(incoming.node_id()) {
                Some(existing) => {
                    let moved = existing.parent_id() != incoming.parent_id();
                    let same_data = !moved
                        && existing.label() == incoming.label()
                        && existing.description() == incoming.description()
                        && existing.employees() == incoming.employees();
                    if same_data {
                        continue;
                    }

                    let old_parent = existing.parent_id().cloned();
                    existing.merge_data(&incoming);
                    if moved {
                        let node_id = incoming.node_id().clone();
                        let new_parent = incoming.parent_id().cloned();
                        self.detach(old_parent.as_ref(), &node_id);
                        self.child_seq_mut(new_parent.as_ref()).push(node_id);
                    }
                    changed += 1;
                }
                None => {
                    let node_id = incoming.node_id().clone();
                    self.child_seq_mut(incoming.parent_id()).push(node_id.clone());
                    self.nodes.insert(node_id, incoming);
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            trace!(changed, total = self.nodes.len(), "registry merged batch");
            self.bump_rev();
        }
        changed
    }

    /// Sets the UI expansion flag. Returns false for unknown ids; bumps the
    /// revision only when the flag actually changes.
    pub fn set_expanded(&mut self, node_id: &NodeId, expanded: bool) -> bool {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        if node.expanded() != expanded {
            node.set_expanded(expanded);
            self.bump_rev();
        }
        true
    }

    /// Marks whether a children fetch for this node has completed at least
    /// once. Same bump discipline as `set_expanded`.
    pub fn set_children_loaded(&mut self, node_id: &NodeId, loaded: bool) -> bool {
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        if node.children_loaded() != loaded {
            node.set_children_loaded(loaded);
            self.bump_rev();
        }
        true
    }

    /// Removes a node and its (normally empty) descendant subtree, so the
    /// no-orphans invariant cannot break. Rollback calls this before any UI
    /// has rendered a dependent child. Returns the removed record.
    pub fn remove(&mut self, node_id: &NodeId) -> Option<OrgNode> {
        if !self.nodes.contains_key(node_id) {
            return None;
        }

        let mut doomed = vec![node_id.clone()];
        let mut cursor = 0;
        while cursor < doomed.len() {
            if let Some(child_ids) = self.children.get(&doomed[cursor]) {
                doomed.extend(child_ids.iter().cloned());
            }
            cursor += 1;
        }

        let removed = self.nodes.remove(node_id);
        let parent = removed
            .as_ref()
            .and_then(|node| node.parent_id().cloned());
        self.detach(parent.as_ref(), node_id);

        for descendant in doomed.iter().skip(1) {
            self.nodes.remove(descendant);
        }
        for gone in &doomed {
            self.children.remove(gone);
        }

        trace!(node_id = %node_id, subtree = doomed.len(), "registry removed node");
        self.bump_rev();
        removed
    }

    /// Atomically swaps a temporary node for its server-confirmed form.
    ///
    /// The confirmed record takes over the temporary node's slot in the
    /// parent's sequence (same index) and inherits its client flags. If a
    /// concurrent fetch already delivered the confirmed id, the temporary
    /// node is dropped and the existing record absorbs the confirmed data at
    /// its existing position, so the node never appears twice.
    pub fn replace_id(
        &mut self,
        temp_id: &NodeId,
        confirmed: OrgNode,
    ) -> Result<NodeId, SwapError> {
        if !self.nodes.contains_key(temp_id) {
            return Err(SwapError::UnknownTemporaryId {
                temp_id: temp_id.clone(),
            });
        }

        let confirmed_id = confirmed.node_id().clone();

        if &confirmed_id == temp_id {
            // Server echoed the client id; a plain merge keeps position/flags.
            self.upsert_many(vec![confirmed]);
            return Ok(confirmed_id);
        }

        if self.nodes.contains_key(&confirmed_id) {
            self.remove(temp_id);
            self.upsert_many(vec![confirmed]);
            trace!(%temp_id, %confirmed_id, "confirmed id already present, temporary dropped");
            return Ok(confirmed_id);
        }

        let Some(mut record) = self.nodes.remove(temp_id) else {
            return Err(SwapError::UnknownTemporaryId {
                temp_id: temp_id.clone(),
            });
        };
        let old_parent = record.parent_id().cloned();
        record.merge_data(&confirmed);
        let record = record.with_node_id(confirmed_id.clone());
        let new_parent = record.parent_id().cloned();

        if old_parent == new_parent {
            // In-place slot swap keeps the optimistic position.
            let seq = self.child_seq_mut(new_parent.as_ref());
            match seq.iter().position(|slot| slot == temp_id) {
                Some(index) => seq[index] = confirmed_id.clone(),
                None => seq.push(confirmed_id.clone()),
            }
        } else {
            // Server reassigned the parent; the old slot is stale.
            self.detach(old_parent.as_ref(), temp_id);
            self.child_seq_mut(new_parent.as_ref()).push(confirmed_id.clone());
        }

        if let Some(child_ids) = self.children.remove(temp_id) {
            // Children created while the parent was still pending follow the
            // swap.
            for child_id in &child_ids {
                if let Some(child) = self.nodes.get_mut(child_id) {
                    child.set_parent_id(Some(confirmed_id.clone()));
                }
            }
            self.children.insert(confirmed_id.clone(), child_ids);
        }
        self.nodes.insert(confirmed_id.clone(), record);

        trace!(%temp_id, %confirmed_id, "temporary id swapped for confirmed id");
        self.bump_rev();
        Ok(confirmed_id)
    }

    fn child_seq(&self, parent: Option<&NodeId>) -> &[NodeId] {
        match parent {
            None => &self.roots,
            Some(parent_id) => self
                .children
                .get(parent_id)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        }
    }

    fn child_seq_mut(&mut self, parent: Option<&NodeId>) -> &mut Vec<NodeId> {
        match parent {
            None => &mut self.roots,
            Some(parent_id) => self.children.entry(parent_id.clone()).or_default(),
        }
    }

    fn detach(&mut self, parent: Option<&NodeId>, node_id: &NodeId) {
        match parent {
            None => self.roots.retain(|slot| slot != node_id),
            Some(parent_id) => {
                if let Some(seq) = self.children.get_mut(parent_id) {
                    seq.retain(|slot| slot != node_id);
                }
            }
        }
    }

    fn bump_rev(&mut self) {
        self.rev = self.rev.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    UnknownTemporaryId { temp_id: NodeId },
}

impl fmt::Display for SwapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTemporaryId { temp_id } => {
                write!(f, "temporary node not in registry (id={temp_id})")
            }
        }
    }
}

impl std::error::Error for SwapError {}

#[cfg(test)]
mod tests;
