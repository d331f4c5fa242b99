// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The explorer facade: navigation, fetch coordination, and node creation
//! over one shared registry.
//!
//! `Explorer` is a cheap-to-clone handle around locked state. The lock is
//! held only for synchronous state transitions, never across a backend call,
//! so fetches overlap freely while every registry mutation stays serialized.
//! Duplicate suppression is the in-flight key set: a request whose key is
//! already pending is acknowledged without a second backend call.

use std::collections::BTreeSet;
use std::fmt;
use std::io;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::backend::{CreateError, DirectoryBackend, FetchError, NodeDraft, NodeSeed};
use crate::config::ExplorerConfig;
use crate::export::TableSink;
use crate::model::{FieldIssue, NewNodeForm, NodeId, OrgNode};
use crate::query::outline::{visible_rows, OutlineRow};
use crate::query::table::{flatten, CsvTable, FlattenScope};
use crate::registry::{NodeRegistry, SwapError};
use crate::source::EndpointPool;

/// Identity of one outstanding backend request.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum FetchKey {
    RootPage(u32),
    Children(NodeId),
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootPage(page) => write!(f, "root:{page}"),
            Self::Children(parent_id) => write!(f, "children:{parent_id}"),
        }
    }
}

#[derive(Debug)]
struct ExplorerState {
    registry: NodeRegistry,
    in_flight: BTreeSet<FetchKey>,
    loaded_root_pages: BTreeSet<u32>,
    /// Monotonic UI revision: bumped on every observable transition,
    /// including in-flight markers the registry itself does not track.
    rev: u64,
}

/// Shared handle over the explorer state. Clones observe and mutate the same
/// tree.
#[derive(Clone)]
pub struct Explorer {
    state: Arc<Mutex<ExplorerState>>,
    backend: Arc<dyn DirectoryBackend>,
    pool: EndpointPool,
    rev_tx: Arc<watch::Sender<u64>>,
}

impl Explorer {
    pub fn new(config: &ExplorerConfig, backend: Arc<dyn DirectoryBackend>) -> Self {
        let (rev_tx, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(ExplorerState {
                registry: NodeRegistry::new(),
                in_flight: BTreeSet::new(),
                loaded_root_pages: BTreeSet::new(),
                rev: 0,
            })),
            backend,
            pool: config.pool().clone(),
            rev_tx: Arc::new(rev_tx),
        }
    }

    // -- reactive reads ----------------------------------------------------

    /// Current UI revision. Changes whenever a render would change.
    pub async fn rev(&self) -> u64 {
        self.state.lock().await.rev
    }

    /// Channel that yields the UI revision after every observable change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rev_tx.subscribe()
    }

    /// Snapshot of one node.
    pub async fn node(&self, node_id: &NodeId) -> Option<OrgNode> {
        self.state.lock().await.registry.get(node_id).cloned()
    }

    /// Number of nodes currently known.
    pub async fn node_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    /// Ordered snapshot of the children currently known for `parent`.
    pub async fn children_of(&self, parent: Option<&NodeId>) -> Vec<OrgNode> {
        let state = self.state.lock().await;
        state
            .registry
            .children_of(parent)
            .into_iter()
            .cloned()
            .collect()
    }

    /// The rendered outline: visible rows with per-row loading markers.
    pub async fn outline(&self) -> Vec<OutlineRow> {
        let state = self.state.lock().await;
        let loading: BTreeSet<&NodeId> = state
            .in_flight
            .iter()
            .filter_map(|key| match key {
                FetchKey::Children(parent_id) => Some(parent_id),
                FetchKey::RootPage(_) => None,
            })
            .collect();
        visible_rows(&state.registry, |node_id| loading.contains(node_id))
    }

    // -- root pages --------------------------------------------------------

    /// Loads one 1-based page of root nodes through the endpoint the page
    /// maps to. Pages already loaded are served from the registry; a page
    /// whose fetch is pending is acknowledged without a second call. A failed
    /// page is retryable by calling again.
    pub async fn load_root_page(&self, page: u32) -> Result<RootLoad, FetchError> {
        let page = page.max(1);
        let key = FetchKey::RootPage(page);
        let endpoint = self.pool.select_for_page(page).clone();

        {
            let mut state = self.state.lock().await;
            if state.loaded_root_pages.contains(&page) {
                return Ok(RootLoad::AlreadyLoaded);
            }
            if !state.in_flight.insert(key.clone()) {
                return Ok(RootLoad::Pending);
            }
            self.mark_changed(&mut state);
        }

        debug!(page, endpoint = %endpoint.endpoint_id(), "fetching root page");
        let outcome = self.backend.fetch_root_page(&endpoint, page).await;

        let mut state = self.state.lock().await;
        state.in_flight.remove(&key);
        match outcome {
            Ok(seeds) => {
                let nodes = seeds.len();
                state
                    .registry
                    .upsert_many(seeds.into_iter().map(NodeSeed::into_node).collect());
                state.loaded_root_pages.insert(page);
                self.mark_changed(&mut state);
                debug!(page, nodes, "root page merged");
                Ok(RootLoad::Fetched { nodes })
            }
            Err(source) => {
                self.mark_changed(&mut state);
                warn!(page, error = %source, "root page fetch failed");
                Err(source)
            }
        }
    }

    // -- navigation --------------------------------------------------------

    /// Expands a node. Cached children render immediately; otherwise exactly
    /// one children fetch runs per node, no matter how often expansion is
    /// requested while it is pending. On fetch failure the node returns to
    /// collapsed and the next expand retries.
    pub async fn expand(&self, node_id: &NodeId) -> Result<Expand, ExpandError> {
        let key = FetchKey::Children(node_id.clone());

        {
            let mut state = self.state.lock().await;
            let Some(node) = state.registry.get(node_id) else {
                return Err(ExpandError::UnknownNode {
                    node_id: node_id.clone(),
                });
            };
            let cached = node.children_loaded();
            state.registry.set_expanded(node_id, true);
            if cached {
                self.mark_changed(&mut state);
                return Ok(Expand::FromCache);
            }
            if !state.in_flight.insert(key.clone()) {
                self.mark_changed(&mut state);
                return Ok(Expand::Pending);
            }
            self.mark_changed(&mut state);
        }

        debug!(node_id = %node_id, "fetching children");
        let outcome = self.backend.fetch_children(node_id).await;
        self.finish_children_fetch(node_id, &key, outcome, true).await
    }

    /// Collapses a node; returns false for unknown ids. Cached children and
    /// any in-flight fetch are left alone, so re-expanding is instant once
    /// data is there.
    pub async fn collapse(&self, node_id: &NodeId) -> bool {
        let mut state = self.state.lock().await;
        if !state.registry.contains(node_id) {
            return false;
        }
        state.registry.set_expanded(node_id, false);
        self.mark_changed(&mut state);
        true
    }

    /// Forces a fresh children fetch even when a previous one completed,
    /// keeping the current expansion state. Deduplicated against expand by
    /// the same in-flight key.
    pub async fn reload_children(&self, node_id: &NodeId) -> Result<Expand, ExpandError> {
        let key = FetchKey::Children(node_id.clone());

        {
            let mut state = self.state.lock().await;
            if !state.registry.contains(node_id) {
                return Err(ExpandError::UnknownNode {
                    node_id: node_id.clone(),
                });
            }
            if !state.in_flight.insert(key.clone()) {
                return Ok(Expand::Pending);
            }
            self.mark_changed(&mut state);
        }

        debug!(node_id = %node_id, "reloading children");
        let outcome = self.backend.fetch_children(node_id).await;
        self.finish_children_fetch(node_id, &key, outcome, false).await
    }

    /// Common tail of expand/reload: clear the in-flight key, then merge or
    /// restore a retryable state. `collapse_on_failure` distinguishes a first
    /// load (failure collapses the node) from a refresh of cached children
    /// (failure keeps what is on screen).
    async fn finish_children_fetch(
        &self,
        node_id: &NodeId,
        key: &FetchKey,
        outcome: Result<Vec<NodeSeed>, FetchError>,
        collapse_on_failure: bool,
    ) -> Result<Expand, ExpandError> {
        let mut state = self.state.lock().await;
        state.in_flight.remove(key);
        match outcome {
            Ok(seeds) => {
                let children = seeds.len();
                state
                    .registry
                    .upsert_many(seeds.into_iter().map(NodeSeed::into_node).collect());
                // Expansion is deliberately untouched: a collapse issued while
                // the fetch was airborne stays a collapse.
                state.registry.set_children_loaded(node_id, true);
                self.mark_changed(&mut state);
                debug!(node_id = %node_id, children, "children merged");
                Ok(Expand::Loaded { children })
            }
            Err(source) => {
                if collapse_on_failure {
                    state.registry.set_expanded(node_id, false);
                }
                self.mark_changed(&mut state);
                warn!(node_id = %node_id, error = %source, "children fetch failed");
                Err(ExpandError::Fetch {
                    node_id: node_id.clone(),
                    source,
                })
            }
        }
    }

    // -- creation ----------------------------------------------------------

    /// Runs the full creation workflow: validate everything at once, insert
    /// an optimistic node at the end of the parent's children, submit, then
    /// either swap the temporary id for the server id or roll the insert
    /// back. On success the form is cleared and the confirmed id returned.
    pub async fn submit_new_node(
        &self,
        parent: Option<&NodeId>,
        form: &mut NewNodeForm,
    ) -> Result<NodeId, SubmitError> {
        let valid = form.validate().map_err(SubmitError::Validation)?;

        let temp_id = {
            let mut state = self.state.lock().await;
            if let Some(parent_id) = parent {
                if !state.registry.contains(parent_id) {
                    return Err(SubmitError::UnknownParent {
                        parent_id: parent_id.clone(),
                    });
                }
            }
            let temp_id = allocate_temp_node_id(&state.registry);
            let optimistic = OrgNode::new(
                temp_id.clone(),
                parent.cloned(),
                valid.label.clone(),
                valid.description.clone(),
                valid.employees,
            );
            state.registry.upsert_many(vec![optimistic]);
            // A brand-new node has no children; marking it loaded spares a
            // pointless fetch when the user expands it right away.
            state.registry.set_children_loaded(&temp_id, true);
            self.mark_changed(&mut state);
            temp_id
        };

        debug!(temp_id = %temp_id, "submitting new node");
        let draft = NodeDraft::new(parent.cloned(), valid);
        let outcome = self.backend.create_node(&draft).await;

        let mut state = self.state.lock().await;
        match outcome {
            Ok(seed) => {
                let confirmed = seed.into_node();
                let confirmed_id = confirmed.node_id().clone();
                if let Err(SwapError::UnknownTemporaryId { .. }) =
                    state.registry.replace_id(&temp_id, confirmed.clone())
                {
                    // The temporary vanished underneath us; the server record
                    // is still the truth, so merge it in.
                    warn!(temp_id = %temp_id, "temporary node missing at confirmation");
                    state.registry.upsert_many(vec![confirmed]);
                }
                state.registry.set_children_loaded(&confirmed_id, true);
                self.mark_changed(&mut state);
                debug!(confirmed_id = %confirmed_id, "node creation confirmed");
                form.clear();
                Ok(confirmed_id)
            }
            Err(source) => {
                state.registry.remove(&temp_id);
                self.mark_changed(&mut state);
                warn!(temp_id = %temp_id, error = %source, "node creation rejected, rolled back");
                Err(SubmitError::Rejected { source })
            }
        }
    }

    // -- export ------------------------------------------------------------

    /// Flattened table for the given scope, headers included.
    pub async fn export_table(&self, scope: &FlattenScope) -> CsvTable {
        let state = self.state.lock().await;
        flatten(&state.registry, scope)
    }

    /// Flattens and hands the table to the export collaborator.
    pub async fn export_to(
        &self,
        scope: &FlattenScope,
        sink: &mut dyn TableSink,
    ) -> io::Result<()> {
        let table = self.export_table(scope).await;
        sink.deliver(&table)
    }

    fn mark_changed(&self, state: &mut ExplorerState) {
        state.rev = state.rev.saturating_add(1);
        self.rev_tx.send_replace(state.rev);
    }
}

/// First free `tmp-N` id. Scanning keeps ids stable and readable in logs;
/// creation volume is interactive, so the scan is never long.
fn allocate_temp_node_id(registry: &NodeRegistry) -> NodeId {
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("tmp-{counter}");
        match NodeId::new(&candidate) {
            Ok(node_id) if !registry.contains(&node_id) => return node_id,
            _ => counter = counter.saturating_add(1),
        }
    }
}

/// How a root page request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootLoad {
    Fetched { nodes: usize },
    AlreadyLoaded,
    Pending,
}

/// How an expand/reload request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expand {
    /// Children were already cached; no backend call.
    FromCache,
    /// A fetch ran and merged this many children.
    Loaded { children: usize },
    /// A fetch for the same node was already pending; its completion covers
    /// this request too.
    Pending,
}

#[derive(Debug)]
pub enum ExpandError {
    UnknownNode { node_id: NodeId },
    Fetch { node_id: NodeId, source: FetchError },
}

impl fmt::Display for ExpandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => write!(f, "unknown node {node_id}"),
            Self::Fetch { node_id, source } => {
                write!(f, "children fetch for {node_id} failed: {source}")
            }
        }
    }
}

impl std::error::Error for ExpandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownNode { .. } => None,
            Self::Fetch { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub enum SubmitError {
    /// Every violated field at once, in field order.
    Validation(Vec<FieldIssue>),
    UnknownParent { parent_id: NodeId },
    /// The server said no; the optimistic insert has been rolled back.
    Rejected { source: CreateError },
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(issues) => {
                let codes: Vec<&str> = issues.iter().map(FieldIssue::code).collect();
                write!(f, "form validation failed: {}", codes.join(", "))
            }
            Self::UnknownParent { parent_id } => write!(f, "unknown parent {parent_id}"),
            Self::Rejected { source } => write!(f, "creation rejected: {source}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(_) | Self::UnknownParent { .. } => None,
            Self::Rejected { source } => Some(source),
        }
    }
}
