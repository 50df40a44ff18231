// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named attribute lookup
//!
//! STEP entities store attributes positionally. Checks address them by their
//! schema name instead, so this table maps `(type, name)` to an index for the
//! inherited IfcRoot/IfcObject/IfcProduct prefix and the spatial classes.

use crate::IfcType;

/// IfcRoot attributes, shared by every rooted entity
const ROOT: &[&str] = &["GlobalId", "OwnerHistory", "Name", "Description"];

/// IfcObject adds ObjectType, IfcProduct adds placement and representation
const PRODUCT: &[&str] = &["ObjectType", "ObjectPlacement", "Representation"];

/// IfcSpatialStructureElement
const SPATIAL: &[&str] = &["LongName", "CompositionType"];

const SITE: &[&str] = &[
    "RefLatitude",
    "RefLongitude",
    "RefElevation",
    "LandTitleNumber",
    "SiteAddress",
];

const BUILDING: &[&str] = &["ElevationOfRefHeight", "ElevationOfTerrain", "BuildingAddress"];

const STOREY: &[&str] = &["Elevation"];

const SPACE: &[&str] = &["InteriorOrExteriorSpace", "ElevationWithFlooring"];

const PROJECT: &[&str] = &[
    "ObjectType",
    "LongName",
    "Phase",
    "RepresentationContexts",
    "UnitsInContext",
];

/// Attribute layout of an entity type, outermost supertype first
fn layout(ifc_type: &IfcType) -> Option<Vec<&'static [&'static str]>> {
    let own: &[&str] = match ifc_type {
        IfcType::IfcProject => return Some(vec![ROOT, PROJECT]),
        IfcType::IfcSite => SITE,
        IfcType::IfcBuilding => BUILDING,
        IfcType::IfcBuildingStorey => STOREY,
        IfcType::IfcSpace => SPACE,
        _ => return None,
    };
    Some(vec![ROOT, PRODUCT, SPATIAL, own])
}

/// Position of a named attribute within an entity of the given type
///
/// Returns `None` for types or names outside the table.
pub fn attribute_index(ifc_type: &IfcType, name: &str) -> Option<usize> {
    layout(ifc_type)?
        .into_iter()
        .flat_map(|names| names.iter())
        .position(|candidate| *candidate == name)
}

/// Number of attributes an entity of this type carries, if known
pub fn attribute_count(ifc_type: &IfcType) -> Option<usize> {
    layout(ifc_type).map(|parts| parts.iter().map(|names| names.len()).sum())
}
