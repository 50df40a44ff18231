// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for IFC data representation
//!
//! Entity identifiers, the IFC classes the checks understand, decoded attribute
//! values and decoded entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe entity identifier
///
/// Wraps the raw IFC entity ID (e.g., #123 becomes EntityId(123))
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

impl From<EntityId> for u32 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Declares `IfcType` together with its STEP name table, so parsing and
/// rendering can never drift apart.
macro_rules! ifc_types {
    ($( $(#[$meta:meta])* $variant:ident => $step:literal, )*) => {
        /// IFC entity type enumeration
        ///
        /// Covers the spatial, representation, property and unit classes the
        /// validator reads. Anything else is kept as `Unknown` with its
        /// original name.
        #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum IfcType {
            $( $(#[$meta])* $variant, )*
            /// Unknown type - stores the original type name string
            Unknown(String),
        }

        impl IfcType {
            /// Parse a type name string into an IfcType (case-insensitive)
            pub fn parse(s: &str) -> Self {
                match s.to_uppercase().as_str() {
                    $( $step => IfcType::$variant, )*
                    _ => IfcType::Unknown(s.to_string()),
                }
            }

            /// Get the STEP type name
            pub fn name(&self) -> &str {
                match self {
                    $( IfcType::$variant => $step, )*
                    IfcType::Unknown(s) => s,
                }
            }

            /// Get the schema-cased class name, e.g. `IfcSpace`
            ///
            /// Unknown types keep the name they were decoded with.
            pub fn schema_name(&self) -> &str {
                match self {
                    $( IfcType::$variant => stringify!($variant), )*
                    IfcType::Unknown(s) => s,
                }
            }
        }
    };
}

ifc_types! {
    // Spatial structure
    IfcProject => "IFCPROJECT",
    IfcSite => "IFCSITE",
    IfcBuilding => "IFCBUILDING",
    IfcBuildingStorey => "IFCBUILDINGSTOREY",
    IfcSpace => "IFCSPACE",

    // Representations
    IfcProductDefinitionShape => "IFCPRODUCTDEFINITIONSHAPE",
    IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
    IfcMappedItem => "IFCMAPPEDITEM",
    IfcRepresentationMap => "IFCREPRESENTATIONMAP",

    // Solids
    IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",
    IfcFacetedBrep => "IFCFACETEDBREP",
    IfcClosedShell => "IFCCLOSEDSHELL",
    IfcFace => "IFCFACE",
    IfcFaceBound => "IFCFACEBOUND",
    IfcFaceOuterBound => "IFCFACEOUTERBOUND",
    IfcPolyLoop => "IFCPOLYLOOP",

    // Profiles and curves
    IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
    IfcArbitraryClosedProfileDef => "IFCARBITRARYCLOSEDPROFILEDEF",
    IfcPolyline => "IFCPOLYLINE",
    IfcIndexedPolyCurve => "IFCINDEXEDPOLYCURVE",
    IfcCartesianPointList2D => "IFCCARTESIANPOINTLIST2D",

    // Points, directions and placements
    IfcCartesianPoint => "IFCCARTESIANPOINT",
    IfcDirection => "IFCDIRECTION",
    IfcAxis2Placement2D => "IFCAXIS2PLACEMENT2D",
    IfcAxis2Placement3D => "IFCAXIS2PLACEMENT3D",
    IfcLocalPlacement => "IFCLOCALPLACEMENT",
    IfcCartesianTransformationOperator3D => "IFCCARTESIANTRANSFORMATIONOPERATOR3D",

    // Properties
    IfcRelDefinesByProperties => "IFCRELDEFINESBYPROPERTIES",
    IfcPropertySet => "IFCPROPERTYSET",
    IfcPropertySingleValue => "IFCPROPERTYSINGLEVALUE",

    // Units
    IfcUnitAssignment => "IFCUNITASSIGNMENT",
    IfcSIUnit => "IFCSIUNIT",
    IfcConversionBasedUnit => "IFCCONVERSIONBASEDUNIT",
    IfcMeasureWithUnit => "IFCMEASUREWITHUNIT",
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Check if this type is a spatial structure element
    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            IfcType::IfcProject
                | IfcType::IfcSite
                | IfcType::IfcBuilding
                | IfcType::IfcBuildingStorey
                | IfcType::IfcSpace
        )
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Decoded attribute value
///
/// Represents any value that can appear in an IFC entity's attribute list.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum AttributeValue {
    /// Null value ($)
    #[default]
    Null,
    /// Derived value (*)
    Derived,
    /// Entity reference (#123)
    EntityRef(EntityId),
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Enumeration value (.VALUE.)
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed value like IFCBOOLEAN(.T.)
    TypedValue(String, Vec<AttributeValue>),
}

impl AttributeValue {
    /// Try to get as entity reference
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// Try to get as string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_string(),
            _ => None,
        }
    }

    /// Try to get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_float(),
            _ => None,
        }
    }

    /// Try to get as boolean
    ///
    /// STEP booleans arrive either as `Bool` or as the `.T.`/`.F.` enums,
    /// possibly wrapped in `IFCBOOLEAN(...)`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            AttributeValue::Enum(s) => match s.to_uppercase().as_str() {
                "TRUE" | "T" => Some(true),
                "FALSE" | "F" => Some(false),
                _ => None,
            },
            AttributeValue::TypedValue(_, args) if !args.is_empty() => args[0].as_bool(),
            _ => None,
        }
    }

    /// Try to get as enum string
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as list
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Check if this value carries data (neither `$` nor `*`)
    pub fn is_set(&self) -> bool {
        !matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }

    /// Human readable rendering used in reports
    pub fn formatted(&self) -> String {
        match self {
            AttributeValue::Null | AttributeValue::Derived => String::new(),
            AttributeValue::EntityRef(id) => id.to_string(),
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Integer(i) => i.to_string(),
            AttributeValue::Float(f) => format!("{:.6}", f)
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string(),
            AttributeValue::String(s) | AttributeValue::Enum(s) => s.clone(),
            AttributeValue::List(items) => items
                .iter()
                .map(|v| v.formatted())
                .collect::<Vec<_>>()
                .join(", "),
            AttributeValue::TypedValue(_, args) => args
                .iter()
                .map(|v| v.formatted())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<EntityId> for AttributeValue {
    fn from(id: EntityId) -> Self {
        AttributeValue::EntityRef(id)
    }
}

/// Decoded IFC entity
///
/// Represents a fully decoded IFC entity with its ID, type, and attribute values.
#[derive(Clone, Debug)]
pub struct DecodedEntity {
    /// Entity ID
    pub id: EntityId,
    /// Entity type
    pub ifc_type: IfcType,
    /// Attribute values in order
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    /// Get attribute at index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get attribute by schema name, see [`crate::schema::attribute_index`]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        crate::schema::attribute_index(&self.ifc_type, name).and_then(|index| self.get(index))
    }

    /// Whether the named attribute holds a value
    pub fn is_set(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(AttributeValue::is_set)
    }

    /// Get entity reference at index
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// Get string at index
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_string())
    }

    /// Get float at index
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    /// Get list at index
    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// Get enum string at index
    pub fn get_enum(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_enum())
    }

    /// Get list of entity references at index
    pub fn get_refs(&self, index: usize) -> Option<Vec<EntityId>> {
        self.get_list(index)
            .map(|list| list.iter().filter_map(|v| v.as_entity_ref()).collect())
    }
}

/// Model metadata extracted from IFC header
#[derive(Clone, Debug, Default)]
pub struct ModelMetadata {
    /// IFC schema version (e.g., "IFC2X3", "IFC4")
    pub schema_version: String,
    /// Originating system (CAD application)
    pub originating_system: Option<String>,
    /// File name from header
    pub file_name: Option<String>,
}
