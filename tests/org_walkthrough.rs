// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! One end-to-end session against the public API: page in roots, walk the
//! tree, survive a failed fetch, create a node, and export what is visible.

use std::sync::Arc;

use doris::backend::fixture::FixtureDirectory;
use doris::config::ExplorerConfig;
use doris::explorer::{Expand, Explorer, RootLoad};
use doris::model::{EndpointId, NewNodeForm, NodeId};
use doris::query::table::FlattenScope;
use doris::source::Endpoint;
use doris::ui::TreeOutline;

fn nid(value: &str) -> NodeId {
    NodeId::new(value).unwrap_or_else(|err| panic!("bad node id {value:?}: {err}"))
}

fn setup() -> (Explorer, Arc<FixtureDirectory>) {
    let endpoints = vec![
        Endpoint::new(
            EndpointId::new("emea").expect("endpoint id"),
            "https://emea.example.test/api",
        ),
        Endpoint::new(
            EndpointId::new("apac").expect("endpoint id"),
            "https://apac.example.test/api",
        ),
    ];
    let config = ExplorerConfig::new(endpoints).expect("valid config");
    let fixture = Arc::new(FixtureDirectory::demo_org());
    (Explorer::new(&config, fixture.clone()), fixture)
}

#[tokio::test]
async fn full_walkthrough() {
    let (explorer, fixture) = setup();

    // Page in all roots; pages alternate between the two endpoints.
    assert_eq!(
        explorer.load_root_page(1).await.expect("page 1"),
        RootLoad::Fetched { nodes: 3 }
    );
    assert_eq!(
        explorer.load_root_page(2).await.expect("page 2"),
        RootLoad::Fetched { nodes: 2 }
    );
    assert_eq!(fixture.calls_for("root:emea:1"), 1);
    assert_eq!(fixture.calls_for("root:apac:2"), 1);
    assert_eq!(explorer.node_count().await, 5);

    // Walk two levels down.
    assert_eq!(
        explorer.expand(&nid("ops")).await.expect("expand ops"),
        Expand::Loaded { children: 3 }
    );
    explorer
        .expand(&nid("ops-log"))
        .await
        .expect("expand ops-log");

    let outline = TreeOutline::capture(&explorer).await;
    let visible: Vec<(&str, usize)> = outline
        .rows()
        .iter()
        .map(|row| (row.node_id.as_str(), row.depth))
        .collect();
    assert_eq!(
        visible,
        [
            ("board", 0),
            ("ops", 0),
            ("ops-log", 1),
            ("ops-log-fleet", 2),
            ("ops-mfg", 1),
            ("ops-qa", 1),
            ("rnd", 0),
            ("people", 0),
            ("fin", 0),
        ]
    );

    // A flaky branch: the first attempt fails and collapses, the retry lands.
    fixture.fail_next_children(&nid("rnd"));
    explorer
        .expand(&nid("rnd"))
        .await
        .expect_err("scripted failure");
    let rnd = explorer.node(&nid("rnd")).await.expect("rnd known");
    assert!(!rnd.expanded());
    explorer.expand(&nid("rnd")).await.expect("retry succeeds");

    // Create a team under a loaded branch; it lands at the end and swaps to
    // the server id in place.
    let mut form = NewNodeForm::new("Dispatch", "Shift planning", Some(9));
    let dispatch_id = explorer
        .submit_new_node(Some(&nid("ops-log")), &mut form)
        .await
        .expect("creation succeeds");
    let ops_log_children: Vec<String> = explorer
        .children_of(Some(&nid("ops-log")))
        .await
        .iter()
        .map(|node| node.node_id().as_str().to_owned())
        .collect();
    assert_eq!(ops_log_children, ["ops-log-fleet", dispatch_id.as_str()]);
    assert!(form.label.is_empty(), "form resets after confirmation");

    // Collapsing hides but keeps everything; re-expanding is served from
    // the cache.
    assert!(explorer.collapse(&nid("ops")).await);
    let collapsed_outline = TreeOutline::capture(&explorer).await;
    assert!(collapsed_outline
        .rows()
        .iter()
        .all(|row| !row.node_id.as_str().starts_with("ops-")));
    let children_calls_before = fixture.children_calls();
    assert_eq!(
        explorer.expand(&nid("ops")).await.expect("re-expand"),
        Expand::FromCache
    );
    assert_eq!(fixture.children_calls(), children_calls_before);

    // Export mirrors the outline, headers first.
    let table = explorer.export_table(&FlattenScope::AllVisible).await;
    assert_eq!(
        table.headers,
        ["id", "parent_id", "label", "description", "employees"]
    );
    let exported_ids: Vec<&str> = table.rows.iter().map(|row| row[0].as_str()).collect();
    let final_outline = TreeOutline::capture(&explorer).await;
    let outline_ids: Vec<&str> = final_outline
        .rows()
        .iter()
        .map(|row| row.node_id.as_str())
        .collect();
    assert_eq!(exported_ids, outline_ids);

    let dispatch_row = table
        .rows
        .iter()
        .find(|row| row[0] == dispatch_id.as_str())
        .unwrap_or_else(|| panic!("expected {dispatch_id} in the export"));
    assert_eq!(dispatch_row[1], "ops-log");
    assert_eq!(dispatch_row[2], "Dispatch");
    assert_eq!(dispatch_row[4], "9");
}
