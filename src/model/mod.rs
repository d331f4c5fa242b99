// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Typed ids, the org-node record the registry stores, and the new-node form
//! with its all-fields-at-once validation.

pub mod form;
pub mod ids;
pub mod node;

pub use form::{FieldIssue, NewNodeForm, ValidNewNode};
pub use ids::{EndpointId, Id, IdError, NodeId};
pub use node::OrgNode;
