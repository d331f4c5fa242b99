// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The directory backend seam.
//!
//! Everything the explorer knows about the outside world goes through
//! [`DirectoryBackend`]: root pages, children batches, and node creation.
//! The explorer state machine is tested against [`fixture::FixtureDirectory`];
//! a production binary plugs in an HTTP implementation of the same trait.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{NodeId, OrgNode, ValidNewNode};
use crate::source::Endpoint;

pub mod fixture;

/// One node record as an endpoint returns it, before it becomes a registry
/// [`OrgNode`]. Plain data, no client flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSeed {
    pub node_id: NodeId,
    pub parent_id: Option<NodeId>,
    pub label: String,
    pub description: String,
    pub employees: u32,
}

impl NodeSeed {
    pub fn into_node(self) -> OrgNode {
        OrgNode::new(
            self.node_id,
            self.parent_id,
            self.label,
            self.description,
            self.employees,
        )
    }
}

/// Payload sent to the server when creating a node. Built from an already
/// validated form, so a draft is well-formed by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDraft {
    pub parent_id: Option<NodeId>,
    pub label: String,
    pub description: String,
    pub employees: u32,
}

impl NodeDraft {
    pub fn new(parent_id: Option<NodeId>, valid: ValidNewNode) -> Self {
        Self {
            parent_id,
            label: valid.label,
            description: valid.description,
            employees: valid.employees,
        }
    }
}

/// Where fetched node batches come from.
///
/// Implementations must be cheap to share (`&self` methods, `Send + Sync`);
/// the explorer holds one behind an `Arc` and may issue calls concurrently.
#[async_trait]
pub trait DirectoryBackend: Send + Sync {
    /// One page (1-based) of root nodes from the given endpoint. A page past
    /// the end of the directory is an empty batch, not an error.
    async fn fetch_root_page(
        &self,
        endpoint: &Endpoint,
        page: u32,
    ) -> Result<Vec<NodeSeed>, FetchError>;

    /// The direct children of `parent_id`. A leaf yields an empty batch.
    async fn fetch_children(&self, parent_id: &NodeId) -> Result<Vec<NodeSeed>, FetchError>;

    /// Asks the server to create a node; on success the returned seed carries
    /// the server-assigned id.
    async fn create_node(&self, draft: &NodeDraft) -> Result<NodeSeed, CreateError>;
}

/// A fetch that did not produce a batch. Always retryable: the explorer
/// clears its in-flight marker so the same request can be issued again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The endpoint could not be reached at all.
    Transport { reason: String },
    /// The endpoint answered but refused the request.
    Rejected { status: u16, reason: String },
}

impl FetchError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn rejected(status: u16, reason: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => write!(f, "transport failure: {reason}"),
            Self::Rejected { status, reason } => {
                write!(f, "endpoint rejected request (status {status}): {reason}")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// A node creation the server did not accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateError {
    Transport { reason: String },
    /// The server looked at the draft and said no, e.g. a policy violation
    /// the client cannot check locally.
    Rejected { reason: String },
}

impl CreateError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => write!(f, "transport failure: {reason}"),
            Self::Rejected { reason } => write!(f, "server rejected node creation: {reason}"),
        }
    }
}

impl std::error::Error for CreateError {}
