// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Check contract
//!
//! A check is one independently toggleable rule. It reads the model, appends
//! findings to the container it is handed and never mutates anything else.

use crate::{Configuration, IssueContainer, Result, Translator};
use ifc_check_model::IfcModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between group and identifier in a fully-qualified check id
pub const SEPARATOR: &str = "___";

/// (group, identifier) pair that keys a check across the registry
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CheckId {
    pub group: String,
    pub identifier: String,
}

impl CheckId {
    pub fn new(group: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            identifier: identifier.into(),
        }
    }

    /// `GROUP___IDENTIFIER`, the key used in configurations
    pub fn qualified(&self) -> String {
        format!("{}{}{}", self.group, SEPARATOR, self.identifier)
    }

    /// Split a fully-qualified id at the first separator
    pub fn parse(qualified: &str) -> Option<Self> {
        let (group, identifier) = qualified.split_once(SEPARATOR)?;
        if group.is_empty() || identifier.is_empty() {
            return None;
        }
        Some(Self::new(group, identifier))
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.group, SEPARATOR, self.identifier)
    }
}

/// Numeric parameter a check reads from the configuration
#[derive(Clone, Debug, PartialEq)]
pub struct NumericParameter {
    /// Configuration name, e.g. `dimensionVariation`
    pub name: &'static str,
    /// Value used when the configuration does not set it
    pub default: f64,
}

/// Per-run services available to a check
pub struct CheckerContext<'a> {
    translator: &'a dyn Translator,
    configuration: &'a Configuration,
}

impl<'a> CheckerContext<'a> {
    pub fn new(translator: &'a dyn Translator, configuration: &'a Configuration) -> Self {
        Self {
            translator,
            configuration,
        }
    }

    /// Localized string for `key`
    pub fn translate(&self, key: &str) -> String {
        self.translator.translate(key)
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator
    }

    pub fn configuration(&self) -> &Configuration {
        self.configuration
    }

    /// Named numeric parameter, `default` when unset
    pub fn parameter_or(&self, name: &str, default: f64) -> f64 {
        self.configuration.parameter(name).unwrap_or(default)
    }
}

/// A single validation rule
///
/// Checks are registered by value into a [`crate::CheckRegistry`] and shared
/// read-only between runs, hence `Send + Sync`.
///
/// # Example
///
/// ```ignore
/// struct HasProject;
///
/// impl ModelCheck for HasProject {
///     fn id(&self) -> CheckId {
///         CheckId::new("PROJECT", "EXISTS")
///     }
///
///     fn check(&self, model: &dyn IfcModel, issues: &mut IssueContainer, ctx: &CheckerContext<'_>) -> Result<bool> {
///         let found = model.resolver().count_by_type(&IfcType::IfcProject) > 0;
///         issues.builder().issue_type(if found { IssueType::Success } else { IssueType::Error })
///             .message(ctx.translate("PROJECT_EXISTS")).add();
///         Ok(true)
///     }
/// }
/// ```
pub trait ModelCheck: Send + Sync {
    /// Registry key of this check
    fn id(&self) -> CheckId;

    /// Default of the check's toggle in a settings definition
    fn is_enabled_by_default(&self) -> bool {
        true
    }

    /// Localized display name, looked up as `GROUP___IDENTIFIER_NAME`
    fn name(&self, translator: &dyn Translator) -> String {
        translator.translate(&format!("{}_NAME", self.id().qualified()))
    }

    /// Localized description, looked up as `GROUP___IDENTIFIER_DESCRIPTION`
    fn description(&self, translator: &dyn Translator) -> String {
        translator.translate(&format!("{}_DESCRIPTION", self.id().qualified()))
    }

    /// Numeric parameters this check reads
    fn parameters(&self) -> Vec<NumericParameter> {
        Vec::new()
    }

    /// Evaluate the rule, appending findings to `issues`
    ///
    /// Returns whether the check reached a definitive pass/fail. Missing
    /// model data must be reported as findings, not errors.
    fn check(
        &self,
        model: &dyn IfcModel,
        issues: &mut IssueContainer,
        context: &CheckerContext<'_>,
    ) -> Result<bool>;
}
