// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for registry, configuration and check execution

use crate::CheckId;
use ifc_check_geometry::GeometryError;
use ifc_check_model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up or running a validation
#[derive(Error, Debug)]
pub enum Error {
    /// Two checks registered under the same (group, identifier) pair
    #[error("Check {0} is already registered")]
    DuplicateCheck(CheckId),

    /// Requested check is not in the registry
    #[error("Check {0} not found")]
    CheckNotFound(CheckId),

    /// Neither the requested nor the default locale resource exists
    #[error("No locale resource for {language} (or the en fallback) in {}", dir.display())]
    MissingLocale { language: String, dir: PathBuf },

    /// Locale resource is not a flat JSON object of strings
    #[error("Invalid locale resource {name}: {source}")]
    InvalidLocale {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration JSON could not be decoded
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] serde_json::Error),

    /// Report could not be encoded
    #[error("Report serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// I/O error reading configuration or locale files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Model query failed inside a check
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// Footprint projection failed inside a check
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Check-specific failure
    #[error("{0}")]
    Check(String),
}

impl Error {
    /// Create a check-specific error
    pub fn check(msg: impl Into<String>) -> Self {
        Error::Check(msg.into())
    }
}
