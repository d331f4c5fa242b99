// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! In-memory directory backend for tests and the demo binary.
//!
//! Serves a small fictional company, counts every call per cache key, and can
//! be scripted to fail or stall specific requests. No network anywhere.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::model::NodeId;
use crate::source::Endpoint;

use super::{CreateError, DirectoryBackend, FetchError, NodeDraft, NodeSeed};

const DEMO_PAGE_SIZE: usize = 3;

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn seed(node_id: &str, parent: Option<&str>, label: &str, description: &str, employees: u32) -> NodeSeed {
    NodeSeed {
        node_id: nid(node_id),
        parent_id: parent.map(nid),
        label: label.to_owned(),
        description: description.to_owned(),
        employees,
    }
}

struct FixtureState {
    records: Vec<NodeSeed>,
    page_size: usize,
    next_server_id: u32,
    failing_root_pages: BTreeSet<u32>,
    failing_children: BTreeSet<NodeId>,
    rejecting_creates: u32,
    calls: BTreeMap<String, usize>,
}

/// Scriptable in-memory stand-in for a directory service.
///
/// Counters and one-shot failure scripts make interaction tests precise: a
/// test can assert "exactly one children fetch happened for this parent" or
/// "the first fetch fails, the retry succeeds" without any timing games.
pub struct FixtureDirectory {
    state: Mutex<FixtureState>,
    root_page_calls: AtomicUsize,
    children_calls: AtomicUsize,
    create_calls: AtomicUsize,
    held_root: watch::Sender<bool>,
    held_children: watch::Sender<bool>,
    held_create: watch::Sender<bool>,
}

impl FixtureDirectory {
    /// A two-level fictional company: five root departments (two demo pages
    /// at page size 3) with teams below the larger ones.
    pub fn demo_org() -> Self {
        Self::with_records(vec![
            seed("board", None, "Board", "Direction and oversight", 4),
            seed("ops", None, "Operations", "Keeps the machines running", 210),
            seed("rnd", None, "Research", "Prototypes and papers", 58),
            seed("people", None, "People", "Hiring and development", 17),
            seed("fin", None, "Finance", "Budgets and audits", 23),
            seed("ops-log", Some("ops"), "Logistics", "Warehousing and routing", 120),
            seed("ops-mfg", Some("ops"), "Manufacturing", "Assembly lines", 80),
            seed("ops-qa", Some("ops"), "Quality", "Inspection and returns", 10),
            seed("rnd-plat", Some("rnd"), "Platform", "Shared infrastructure", 31),
            seed("rnd-ml", Some("rnd"), "Applied ML", "Models in production", 27),
            seed("ops-log-fleet", Some("ops-log"), "Fleet", "Vehicles and drivers", 64),
        ])
    }

    pub fn with_records(records: Vec<NodeSeed>) -> Self {
        let (held_root, _) = watch::channel(false);
        let (held_children, _) = watch::channel(false);
        let (held_create, _) = watch::channel(false);
        Self {
            state: Mutex::new(FixtureState {
                records,
                page_size: DEMO_PAGE_SIZE,
                next_server_id: 100,
                failing_root_pages: BTreeSet::new(),
                failing_children: BTreeSet::new(),
                rejecting_creates: 0,
                calls: BTreeMap::new(),
            }),
            root_page_calls: AtomicUsize::new(0),
            children_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
            held_root,
            held_children,
            held_create,
        }
    }

    // -- scripting ---------------------------------------------------------

    /// The next fetch for this parent fails once, then recovers.
    pub fn fail_next_children(&self, parent_id: &NodeId) {
        self.lock_state().failing_children.insert(parent_id.clone());
    }

    /// The next fetch of this root page fails once, then recovers.
    pub fn fail_next_root_page(&self, page: u32) {
        self.lock_state().failing_root_pages.insert(page.max(1));
    }

    /// The next `count` create calls are rejected by the "server".
    pub fn reject_next_creates(&self, count: u32) {
        self.lock_state().rejecting_creates = count;
    }

    /// Stalls children fetches until [`Self::release_children`].
    pub fn hold_children(&self) {
        self.held_children.send_replace(true);
    }

    pub fn release_children(&self) {
        self.held_children.send_replace(false);
    }

    /// Stalls root page fetches until [`Self::release_root_pages`].
    pub fn hold_root_pages(&self) {
        self.held_root.send_replace(true);
    }

    pub fn release_root_pages(&self) {
        self.held_root.send_replace(false);
    }

    /// Stalls create calls until [`Self::release_creates`].
    pub fn hold_creates(&self) {
        self.held_create.send_replace(true);
    }

    pub fn release_creates(&self) {
        self.held_create.send_replace(false);
    }

    // -- observations ------------------------------------------------------

    pub fn root_page_calls(&self) -> usize {
        self.root_page_calls.load(Ordering::SeqCst)
    }

    pub fn children_calls(&self) -> usize {
        self.children_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Calls seen for one cache key, e.g. `children:ops` or `root:emea:2`.
    pub fn calls_for(&self, key: &str) -> usize {
        self.lock_state().calls.get(key).copied().unwrap_or(0)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FixtureState> {
        self.state.lock().expect("fixture state lock")
    }

    async fn wait_open(held: &watch::Sender<bool>) {
        let mut open = held.subscribe();
        while *open.borrow_and_update() {
            if open.changed().await.is_err() {
                return;
            }
        }
    }
}

#[async_trait]
impl DirectoryBackend for FixtureDirectory {
    async fn fetch_root_page(
        &self,
        endpoint: &Endpoint,
        page: u32,
    ) -> Result<Vec<NodeSeed>, FetchError> {
        Self::wait_open(&self.held_root).await;
        self.root_page_calls.fetch_add(1, Ordering::SeqCst);

        let page = page.max(1);
        let mut state = self.lock_state();
        let key = format!("root:{}:{page}", endpoint.endpoint_id());
        *state.calls.entry(key).or_default() += 1;

        if state.failing_root_pages.remove(&page) {
            return Err(FetchError::transport(format!(
                "scripted outage for root page {page}"
            )));
        }

        let start = (page as usize - 1) * state.page_size;
        Ok(state
            .records
            .iter()
            .filter(|record| record.parent_id.is_none())
            .skip(start)
            .take(state.page_size)
            .cloned()
            .collect())
    }

    async fn fetch_children(&self, parent_id: &NodeId) -> Result<Vec<NodeSeed>, FetchError> {
        Self::wait_open(&self.held_children).await;
        self.children_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.lock_state();
        let key = format!("children:{parent_id}");
        *state.calls.entry(key).or_default() += 1;

        if state.failing_children.remove(parent_id) {
            return Err(FetchError::rejected(
                503,
                format!("scripted outage for children of {parent_id}"),
            ));
        }

        Ok(state
            .records
            .iter()
            .filter(|record| record.parent_id.as_ref() == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn create_node(&self, draft: &NodeDraft) -> Result<NodeSeed, CreateError> {
        Self::wait_open(&self.held_create).await;
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.lock_state();
        *state.calls.entry("create".to_owned()).or_default() += 1;

        if state.rejecting_creates > 0 {
            state.rejecting_creates -= 1;
            return Err(CreateError::rejected("scripted rejection"));
        }

        let node_id = nid(&format!("srv-{}", state.next_server_id));
        state.next_server_id += 1;
        let record = NodeSeed {
            node_id,
            parent_id: draft.parent_id.clone(),
            label: draft.label.clone(),
            description: draft.description.clone(),
            employees: draft.employees,
        };
        // Later refetches of the parent include the new node, like a real
        // directory would.
        state.records.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::EndpointId;
    use crate::source::Endpoint;

    use super::super::DirectoryBackend;
    use super::{nid, FixtureDirectory};

    fn endpoint() -> Endpoint {
        Endpoint::new(
            EndpointId::new("hq").expect("endpoint id"),
            "https://hq.example.test/api",
        )
    }

    #[tokio::test]
    async fn pages_roots_at_fixed_size() {
        let fixture = FixtureDirectory::demo_org();

        let page1 = fixture
            .fetch_root_page(&endpoint(), 1)
            .await
            .expect("page 1");
        let page2 = fixture
            .fetch_root_page(&endpoint(), 2)
            .await
            .expect("page 2");
        let page3 = fixture
            .fetch_root_page(&endpoint(), 3)
            .await
            .expect("page 3");

        assert_eq!(page1.len(), 3);
        assert_eq!(page2.len(), 2);
        assert!(page3.is_empty(), "past the end means an empty batch");
        assert_eq!(fixture.calls_for("root:hq:1"), 1);
    }

    #[tokio::test]
    async fn scripted_children_failure_is_one_shot() {
        let fixture = FixtureDirectory::demo_org();
        let ops = nid("ops");
        fixture.fail_next_children(&ops);

        assert!(fixture.fetch_children(&ops).await.is_err());
        let children = fixture.fetch_children(&ops).await.expect("retry succeeds");
        assert_eq!(children.len(), 3);
        assert_eq!(fixture.calls_for("children:ops"), 2);
    }

    #[tokio::test]
    async fn created_nodes_show_up_in_later_fetches() {
        let fixture = FixtureDirectory::demo_org();
        let draft = crate::backend::NodeDraft {
            parent_id: Some(nid("fin")),
            label: "Payroll".to_owned(),
            description: "Salaries and benefits".to_owned(),
            employees: 6,
        };

        let created = fixture.create_node(&draft).await.expect("created");
        assert!(created.node_id.as_str().starts_with("srv-"));

        let children = fixture.fetch_children(&nid("fin")).await.expect("children");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].node_id, created.node_id);
    }
}
