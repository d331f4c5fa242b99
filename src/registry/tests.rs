// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::{NodeId, OrgNode};

use super::{NodeRegistry, SwapError};

fn id(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn node(node_id: &str, parent: Option<&str>, label: &str) -> OrgNode {
    OrgNode::new(
        id(node_id),
        parent.map(id),
        label,
        format!("{label} department"),
        10,
    )
}

fn ids_of(nodes: &[&OrgNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|node| node.node_id().as_str().to_owned())
        .collect()
}

#[test]
fn upsert_inserts_roots_in_batch_order() {
    let mut registry = NodeRegistry::new();
    let changed = registry.upsert_many(vec![
        node("board", None, "Board"),
        node("ops", None, "Operations"),
        node("rnd", None, "Research"),
    ]);

    assert_eq!(changed, 3);
    assert_eq!(registry.len(), 3);
    assert_eq!(ids_of(&registry.children_of(None)), ["board", "ops", "rnd"]);
    assert_eq!(registry.rev(), 1);
}

#[test]
fn children_of_matches_the_exact_parent_only() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("board", None, "Board"),
        node("ops", Some("board"), "Operations"),
        node("ops-eu", Some("ops"), "Operations EU"),
        node("rnd", Some("board"), "Research"),
    ]);

    // Direct children only: no grandchildren, no siblings, no self.
    assert_eq!(ids_of(&registry.children_of(None)), ["board"]);
    assert_eq!(
        ids_of(&registry.children_of(Some(&id("board")))),
        ["ops", "rnd"]
    );
    assert_eq!(ids_of(&registry.children_of(Some(&id("ops")))), ["ops-eu"]);
    assert!(registry.children_of(Some(&id("ops-eu"))).is_empty());
}

#[test]
fn merge_overwrites_data_and_preserves_flags() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![node("ops", None, "Operations")]);
    assert!(registry.set_expanded(&id("ops"), true));
    assert!(registry.set_children_loaded(&id("ops"), true));

    registry.upsert_many(vec![node("ops", None, "Operations & Logistics")]);

    let ops = registry.get(&id("ops")).expect("ops present");
    assert_eq!(ops.label(), "Operations & Logistics");
    assert!(ops.expanded(), "merge must not collapse an expanded node");
    assert!(ops.children_loaded(), "merge must not reset children_loaded");
}

#[test]
fn remerge_keeps_known_positions_and_appends_unseen() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("board", None, "Board"),
        node("ops", None, "Operations"),
    ]);

    // Second page repeats "ops" and introduces two newcomers.
    registry.upsert_many(vec![
        node("ops", None, "Operations"),
        node("hr", None, "People"),
        node("fin", None, "Finance"),
    ]);

    assert_eq!(
        ids_of(&registry.children_of(None)),
        ["board", "ops", "hr", "fin"]
    );
}

#[test]
fn merge_moves_node_when_parent_changes() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("board", None, "Board"),
        node("ops", None, "Operations"),
        node("hr", Some("board"), "People"),
    ]);

    registry.upsert_many(vec![node("hr", Some("ops"), "People")]);

    assert!(registry.children_of(Some(&id("board"))).is_empty());
    assert_eq!(ids_of(&registry.children_of(Some(&id("ops")))), ["hr"]);
    let hr = registry.get(&id("hr")).expect("hr present");
    assert_eq!(hr.parent_id(), Some(&id("ops")));
}

#[test]
fn unchanged_batch_does_not_bump_rev() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![node("ops", None, "Operations")]);
    let rev = registry.rev();

    let changed = registry.upsert_many(vec![node("ops", None, "Operations")]);

    assert_eq!(changed, 0);
    assert_eq!(registry.rev(), rev);
}

#[test]
fn flag_setters_bump_rev_only_on_actual_change() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![node("ops", None, "Operations")]);
    let rev = registry.rev();

    assert!(registry.set_expanded(&id("ops"), true));
    assert_eq!(registry.rev(), rev + 1);
    assert!(registry.set_expanded(&id("ops"), true));
    assert_eq!(registry.rev(), rev + 1);

    assert!(!registry.set_expanded(&id("ghost"), true));
    assert!(!registry.set_children_loaded(&id("ghost"), true));
    assert_eq!(registry.rev(), rev + 1);
}

#[test]
fn remove_drops_the_whole_subtree() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("board", None, "Board"),
        node("ops", Some("board"), "Operations"),
        node("ops-eu", Some("ops"), "Operations EU"),
        node("ops-eu-de", Some("ops-eu"), "Operations DE"),
        node("rnd", Some("board"), "Research"),
    ]);

    let removed = registry.remove(&id("ops")).expect("removed record");
    assert_eq!(removed.node_id(), &id("ops"));

    assert!(!registry.contains(&id("ops")));
    assert!(!registry.contains(&id("ops-eu")));
    assert!(!registry.contains(&id("ops-eu-de")));
    assert!(registry.contains(&id("rnd")));
    assert_eq!(ids_of(&registry.children_of(Some(&id("board")))), ["rnd"]);
}

#[test]
fn remove_unknown_id_is_a_no_op() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![node("ops", None, "Operations")]);
    let rev = registry.rev();

    assert!(registry.remove(&id("ghost")).is_none());
    assert_eq!(registry.rev(), rev);
    assert_eq!(registry.len(), 1);
}

#[test]
fn replace_id_swaps_in_place_and_keeps_flags() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("board", None, "Board"),
        node("ops", Some("board"), "Operations"),
        node("tmp-1", Some("board"), "Draft team"),
        node("rnd", Some("board"), "Research"),
    ]);
    registry.set_expanded(&id("tmp-1"), true);

    let confirmed = node("srv-9", Some("board"), "Draft team");
    registry
        .replace_id(&id("tmp-1"), confirmed)
        .expect("swap succeeds");

    // Same slot, same parent, temp id fully gone.
    assert_eq!(
        ids_of(&registry.children_of(Some(&id("board")))),
        ["ops", "srv-9", "rnd"]
    );
    assert!(!registry.contains(&id("tmp-1")));
    let swapped = registry.get(&id("srv-9")).expect("confirmed present");
    assert!(swapped.expanded(), "flags carry over to the confirmed id");
}

#[test]
fn replace_id_with_already_known_id_keeps_one_copy() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("srv-9", None, "Draft team"),
        node("ops", None, "Operations"),
        node("tmp-1", None, "Draft team"),
    ]);

    let confirmed = node("srv-9", None, "Draft team (named)");
    registry
        .replace_id(&id("tmp-1"), confirmed)
        .expect("swap succeeds");

    assert_eq!(ids_of(&registry.children_of(None)), ["srv-9", "ops"]);
    let kept = registry.get(&id("srv-9")).expect("confirmed present");
    assert_eq!(kept.label(), "Draft team (named)");
}

#[test]
fn replace_id_requires_a_known_temporary() {
    let mut registry = NodeRegistry::new();
    let confirmed = node("srv-9", None, "Draft team");

    let err = registry
        .replace_id(&id("tmp-404"), confirmed)
        .expect_err("unknown temporary must fail");
    assert!(matches!(err, SwapError::UnknownTemporaryId { .. }));
}

#[test]
fn replace_id_follows_a_server_side_parent_change() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("board", None, "Board"),
        node("ops", None, "Operations"),
        node("tmp-1", Some("board"), "Draft team"),
    ]);

    let confirmed = node("srv-9", Some("ops"), "Draft team");
    registry
        .replace_id(&id("tmp-1"), confirmed)
        .expect("swap succeeds");

    assert!(registry.children_of(Some(&id("board"))).is_empty());
    assert_eq!(ids_of(&registry.children_of(Some(&id("ops")))), ["srv-9"]);
}

#[test]
fn replace_id_rekeys_children_of_the_temporary() {
    let mut registry = NodeRegistry::new();
    registry.upsert_many(vec![
        node("tmp-1", None, "Draft team"),
        node("tmp-2", Some("tmp-1"), "Draft subteam"),
    ]);

    let confirmed = node("srv-9", None, "Draft team");
    registry
        .replace_id(&id("tmp-1"), confirmed)
        .expect("swap succeeds");

    assert_eq!(ids_of(&registry.children_of(Some(&id("srv-9")))), ["tmp-2"]);
    let child = registry.get(&id("tmp-2")).expect("child present");
    assert_eq!(child.parent_id(), Some(&id("srv-9")));
}
