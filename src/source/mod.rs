// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Root-page endpoint rotation.
//!
//! Root pages are served by a fixed list of directory endpoints. Which
//! endpoint serves which page is a pure function of the page number, so two
//! callers asking for the same page always hit the same endpoint and cache
//! keys stay stable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::EndpointId;

/// One directory endpoint as configured, e.g. a regional HR service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    endpoint_id: EndpointId,
    base_url: String,
}

impl Endpoint {
    pub fn new(endpoint_id: EndpointId, base_url: impl Into<String>) -> Self {
        Self {
            endpoint_id,
            base_url: base_url.into(),
        }
    }

    pub fn endpoint_id(&self) -> &EndpointId {
        &self.endpoint_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Ordered, non-empty endpoint list with round-robin page assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPool {
    endpoints: Vec<Endpoint>,
}

impl EndpointPool {
    /// Rejects an empty list up front: a pool with no endpoints cannot serve
    /// any page, and catching that at startup beats a modulo-by-zero later.
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, EmptyPoolError> {
        if endpoints.is_empty() {
            return Err(EmptyPoolError);
        }
        Ok(Self { endpoints })
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        // A constructed pool is never empty; kept for the usual pairing.
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    pub fn get(&self, endpoint_id: &EndpointId) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|endpoint| endpoint.endpoint_id() == endpoint_id)
    }

    /// The endpoint responsible for 1-based root page `page`.
    ///
    /// Pages rotate through the list in configuration order: page 1 maps to
    /// the first endpoint, page `len + 1` wraps back to it. A page of 0 is
    /// treated as page 1 rather than wrapping around the integer range.
    pub fn select_for_page(&self, page: u32) -> &Endpoint {
        let page = page.max(1);
        let index = (page as usize - 1) % self.endpoints.len();
        &self.endpoints[index]
    }
}

/// Returned when a pool is constructed from zero endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPoolError;

impl fmt::Display for EmptyPoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "endpoint pool requires at least one endpoint")
    }
}

impl std::error::Error for EmptyPoolError {}
