// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Settings definition
//!
//! Describes every configurable value so a host can render a settings form:
//! the output language, one toggle per registered check and the numeric
//! parameters checks declare.

use crate::config::DEFAULT_LANGUAGE;
use crate::{CheckRegistry, Configuration, Translator};
use serde::{Deserialize, Serialize};

/// Identifier of the language parameter
pub const LANGUAGE_PARAMETER: &str = "LANGUAGE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    String,
    Boolean,
    Double,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    String(String),
    Boolean(bool),
    Double(f64),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDefinition {
    pub identifier: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub parameter_type: ParameterType,
    pub required: bool,
    pub default_value: ParameterValue,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDefinition {
    pub parameters: Vec<ParameterDefinition>,
}

impl SettingsDefinition {
    pub fn get(&self, identifier: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.identifier == identifier)
    }

    /// Configuration holding every default value
    pub fn default_configuration(&self) -> Configuration {
        let mut configuration = Configuration::new();
        for parameter in &self.parameters {
            match (&parameter.parameter_type, &parameter.default_value) {
                (ParameterType::String, ParameterValue::String(language))
                    if parameter.identifier == LANGUAGE_PARAMETER =>
                {
                    configuration.language = language.clone();
                }
                (ParameterType::Boolean, ParameterValue::Boolean(enabled)) => {
                    configuration.checks.insert(parameter.identifier.clone(), *enabled);
                }
                (ParameterType::Double, ParameterValue::Double(value)) => {
                    configuration.parameters.insert(parameter.identifier.clone(), *value);
                }
                _ => {}
            }
        }
        configuration
    }
}

/// Build the settings definition for a registry
///
/// Names and descriptions come from `translator`, typically the English
/// bundled locale.
pub fn settings_definition(registry: &CheckRegistry, translator: &dyn Translator) -> SettingsDefinition {
    let mut parameters = vec![ParameterDefinition {
        identifier: LANGUAGE_PARAMETER.to_string(),
        name: translator.translate("LANGUAGE_NAME"),
        description: translator.translate("LANGUAGE_DESCRIPTION"),
        parameter_type: ParameterType::String,
        required: false,
        default_value: ParameterValue::String(DEFAULT_LANGUAGE.to_string()),
    }];

    for check in registry.iter() {
        parameters.push(ParameterDefinition {
            identifier: check.id().qualified(),
            name: check.name(translator),
            description: check.description(translator),
            parameter_type: ParameterType::Boolean,
            required: true,
            default_value: ParameterValue::Boolean(check.is_enabled_by_default()),
        });
    }

    for check in registry.iter() {
        for numeric in check.parameters() {
            if parameters.iter().any(|p| p.identifier == numeric.name) {
                continue;
            }
            parameters.push(ParameterDefinition {
                identifier: numeric.name.to_string(),
                name: translator.translate(&format!("{}_NAME", numeric.name)),
                description: translator.translate(&format!("{}_DESCRIPTION", numeric.name)),
                parameter_type: ParameterType::Double,
                required: false,
                default_value: ParameterValue::Double(numeric.default),
            });
        }
    }

    SettingsDefinition { parameters }
}
