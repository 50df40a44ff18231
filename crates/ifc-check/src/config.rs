// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Run configuration
//!
//! Which checks are enabled (keyed by fully-qualified id), the output language
//! and named numeric parameters. A check missing from `checks` is disabled.
//!
//! ```json
//! {
//!   "language": "NL",
//!   "checks": { "SITE___LATITUDE": true, "ACCESSIBILITY___CARPARKS": true },
//!   "parameters": { "dimensionVariation": 150.0 }
//! }
//! ```

use crate::{CheckId, CheckRegistry, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Language used when a configuration does not name one
pub const DEFAULT_LANGUAGE: &str = "EN";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Immutable settings for one validation run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Output language code, case-insensitive
    #[serde(default = "default_language")]
    pub language: String,
    /// Fully-qualified check id -> enabled
    pub checks: BTreeMap<String, bool>,
    /// Named check parameters
    pub parameters: BTreeMap<String, f64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            language: default_language(),
            checks: BTreeMap::new(),
            parameters: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Empty configuration: every check disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with every registered check at its default toggle and
    /// every declared parameter at its default value
    pub fn defaults(registry: &CheckRegistry) -> Self {
        let mut configuration = Self::new();
        for check in registry.iter() {
            configuration
                .checks
                .insert(check.id().qualified(), check.is_enabled_by_default());
            for parameter in check.parameters() {
                configuration
                    .parameters
                    .entry(parameter.name.to_string())
                    .or_insert(parameter.default);
            }
        }
        configuration
    }

    /// Decode from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Builder: set the language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder: set a check's toggle
    pub fn with_check(mut self, id: &CheckId, enabled: bool) -> Self {
        self.checks.insert(id.qualified(), enabled);
        self
    }

    /// Builder: set a named parameter
    pub fn with_parameter(mut self, name: impl Into<String>, value: f64) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Toggle of a check: `None` when absent, which means disabled
    pub fn check_enabled(&self, qualified: &str) -> Option<bool> {
        self.checks.get(qualified).copied()
    }

    /// Whether the check is present and enabled
    pub fn is_enabled(&self, id: &CheckId) -> bool {
        self.check_enabled(&id.qualified()).unwrap_or(false)
    }

    /// Named parameter, if set
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }

    /// Reject enabled toggles for checks the registry does not know
    ///
    /// Unknown toggles set to `false` request nothing and are skipped.
    pub fn validate(&self, registry: &CheckRegistry) -> Result<()> {
        for (qualified, enabled) in &self.checks {
            if registry.contains(qualified) {
                continue;
            }
            if !enabled {
                log::warn!("ignoring disabled toggle for unknown check {}", qualified);
                continue;
            }
            let id = CheckId::parse(qualified).unwrap_or_else(|| CheckId::new(qualified.as_str(), ""));
            return Err(Error::CheckNotFound(id));
        }
        Ok(())
    }
}
