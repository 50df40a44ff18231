// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property set access for IFC entities

use crate::{AttributeValue, EntityId};

/// A single property value with optional unit
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// Property name
    pub name: String,
    /// Nominal value as decoded from the model
    pub value: AttributeValue,
    /// Unit of measurement (if applicable)
    pub unit: Option<String>,
}

impl Property {
    /// Create a new property
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: None,
        }
    }

    /// Create a property with unit
    pub fn with_unit(
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: Some(unit.into()),
        }
    }

    /// Format the value with unit
    pub fn formatted(&self) -> String {
        match &self.unit {
            Some(unit) => format!("{} {}", self.value.formatted(), unit),
            None => self.value.formatted(),
        }
    }
}

/// A property set containing multiple properties
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySet {
    /// Property set name (e.g., "Pset_SpaceParking")
    pub name: String,
    /// Properties in this set
    pub properties: Vec<Property>,
}

impl PropertySet {
    /// Create a new property set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    /// Add a property to this set
    pub fn add(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Builder-style variant of [`PropertySet::add`]
    pub fn with(mut self, property: Property) -> Self {
        self.add(property);
        self
    }

    /// Get a property by name
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Whether a property with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Property reader trait
///
/// Provides access to property sets associated with IFC entities through
/// IfcRelDefinesByProperties, plus the common IfcRoot/IfcObject strings.
///
/// # Example
///
/// ```ignore
/// use ifc_check_model::{PropertyReader, EntityId};
///
/// fn is_accessible(props: &dyn PropertyReader, space: EntityId) -> bool {
///     props
///         .property_set(space, "Pset_SpaceParking")
///         .and_then(|pset| pset.get("HandicapAccessible").and_then(|p| p.value.as_bool()))
///         .unwrap_or(false)
/// }
/// ```
pub trait PropertyReader: Send + Sync {
    /// Get all property sets associated with an entity
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet>;

    /// Get one property set by name
    ///
    /// When several sets share the name, their properties are merged in
    /// relation order.
    fn property_set(&self, id: EntityId, name: &str) -> Option<PropertySet> {
        self.property_sets(id)
            .into_iter()
            .filter(|pset| pset.name == name)
            .reduce(|mut merged, pset| {
                merged.properties.extend(pset.properties);
                merged
            })
    }

    /// Get a specific property by name from any set
    fn get_property(&self, id: EntityId, name: &str) -> Option<Property> {
        self.property_sets(id)
            .into_iter()
            .flat_map(|pset| pset.properties)
            .find(|p| p.name == name)
    }

    /// Get entity's GlobalId (GUID)
    fn global_id(&self, id: EntityId) -> Option<String>;

    /// Get entity's Name attribute
    fn name(&self, id: EntityId) -> Option<String>;

    /// Get entity's ObjectType attribute
    fn object_type(&self, _id: EntityId) -> Option<String> {
        None
    }
}
