// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Check - Configurable validation of IFC building models
//!
//! A [`CheckRegistry`] holds independently toggleable [`ModelCheck`]s in
//! groups. A [`Validator`] runs the checks a [`Configuration`] enables against
//! a read-only [`IfcModel`](ifc_check_model::IfcModel) and collects the
//! findings into [`Report`]s.
//!
//! # Built-in checks
//!
//! | Id | Rule |
//! |----|------|
//! | `SITE___LATITUDE` | every IfcSite has a RefLatitude |
//! | `SITE___ONLY_ONE_SITE` | the model has exactly one IfcSite |
//! | `ACCESSIBILITY___CARPARKS` | parking spaces are identifiable and enough are accessible |
//!
//! # Example
//!
//! ```
//! use ifc_check::{CheckId, CheckRegistry, Configuration, IssueType, Validator};
//! use ifc_check_model::{IfcType, ModelBuilder};
//! use std::sync::Arc;
//!
//! let mut builder = ModelBuilder::new();
//! builder.spatial_element(IfcType::IfcSite, "site-a", "A", None, None, None);
//! builder.spatial_element(IfcType::IfcSite, "site-b", "B", None, None, None);
//! let model = builder.build();
//!
//! let registry = Arc::new(CheckRegistry::full().unwrap());
//! let configuration = Configuration::new().with_check(&CheckId::new("SITE", "ONLY_ONE_SITE"), true);
//! let outcome = Validator::new(registry, false).run_configured(&model, &configuration).unwrap();
//!
//! assert_eq!(outcome.count(IssueType::Error), 1);
//! ```

pub mod check;
pub mod checks;
pub mod config;
pub mod engine;
pub mod error;
pub mod localization;
pub mod registry;
pub mod report;
pub mod serializer;
pub mod settings;

pub use check::{CheckId, CheckerContext, ModelCheck, NumericParameter, SEPARATOR};
pub use config::{Configuration, DEFAULT_LANGUAGE};
pub use engine::{Validator, COMBINED_REPORT_NAME};
pub use error::{Error, Result};
pub use localization::{Localization, Translator, FALLBACK_LANGUAGE};
pub use registry::CheckRegistry;
pub use report::{CheckFailure, ElementRef, Issue, IssueBuilder, IssueContainer, IssueType, Report, ValidationOutcome};
pub use serializer::{IssueContainerSerializer, JsonIssueSerializer};
pub use settings::{
    settings_definition, ParameterDefinition, ParameterType, ParameterValue, SettingsDefinition, LANGUAGE_PARAMETER,
};
