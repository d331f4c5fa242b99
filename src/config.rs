// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Doris-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Doris and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Explorer configuration, loaded from a TOML file.
//!
//! ```toml
//! [[endpoints]]
//! endpoint_id = "emea"
//! base_url = "https://emea.example.test/api"
//!
//! [[endpoints]]
//! endpoint_id = "apac"
//! base_url = "https://apac.example.test/api"
//! ```
//!
//! Validation happens at load time: a config without endpoints is rejected
//! here, never deep inside a fetch.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::source::{Endpoint, EndpointPool, EmptyPoolError};

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    endpoints: Vec<Endpoint>,
}

/// Validated configuration: the endpoint pool is guaranteed non-empty.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pool: EndpointPool,
}

impl ExplorerConfig {
    pub fn new(endpoints: Vec<Endpoint>) -> Result<Self, ConfigError> {
        let pool = EndpointPool::new(endpoints).map_err(ConfigError::NoEndpoints)?;
        Ok(Self { pool })
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(input).map_err(|source| ConfigError::Parse {
            source: Box::new(source),
        })?;
        Self::new(raw.endpoints)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    pub fn pool(&self) -> &EndpointPool {
        &self.pool
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        source: Box<toml::de::Error>,
    },
    NoEndpoints(EmptyPoolError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => write!(f, "cannot read config at {path:?}: {source}"),
            Self::Parse { source } => write!(f, "cannot parse config: {source}"),
            Self::NoEndpoints(source) => write!(f, "invalid config: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source } => Some(source),
            Self::NoEndpoints(source) => Some(source),
        }
    }
}
