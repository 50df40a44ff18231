// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length unit scale extraction

use crate::{AttributeValue, DecodedEntity, EntityResolver, IfcType};

/// Extract the length unit scale of a model
///
/// Follows IFCPROJECT.UnitsInContext to the unit assignment and returns the
/// factor converting file lengths to meters, or 1.0 when no length unit is
/// declared.
pub fn extract_unit_scale(resolver: &dyn EntityResolver) -> f64 {
    let Some(project) = resolver.entities_by_type(&IfcType::IfcProject).into_iter().next() else {
        return 1.0;
    };

    let Some(unit_assignment) = project
        .attribute("UnitsInContext")
        .and_then(|attr| resolver.resolve_ref(attr))
    else {
        return 1.0;
    };

    // IFCUNITASSIGNMENT has Units list at index 0
    let Some(units) = unit_assignment.get(0) else {
        return 1.0;
    };

    resolver
        .resolve_ref_list(units)
        .iter()
        .find_map(|unit| length_unit_scale(unit, resolver))
        .unwrap_or(1.0)
}

/// Scale of a unit entity if it is a length unit
fn length_unit_scale(unit: &DecodedEntity, resolver: &dyn EntityResolver) -> Option<f64> {
    match unit.ifc_type {
        IfcType::IfcSIUnit => si_unit_scale(unit),
        IfcType::IfcConversionBasedUnit => conversion_unit_scale(unit, resolver),
        _ => None,
    }
}

/// IFCSIUNIT(*, UnitType, Prefix, Name)
fn si_unit_scale(unit: &DecodedEntity) -> Option<f64> {
    if unit.get_enum(1)? != "LENGTHUNIT" || unit.get_enum(3)? != "METRE" {
        return None;
    }

    let prefix = match unit.get_enum(2) {
        Some("KILO") => 1e3,
        Some("HECTO") => 1e2,
        Some("DECA") => 1e1,
        Some("DECI") => 1e-1,
        Some("CENTI") => 1e-2,
        Some("MILLI") => 1e-3,
        Some("MICRO") => 1e-6,
        Some("NANO") => 1e-9,
        _ => 1.0,
    };

    Some(prefix)
}

/// IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor)
fn conversion_unit_scale(unit: &DecodedEntity, resolver: &dyn EntityResolver) -> Option<f64> {
    if unit.get_enum(1)? != "LENGTHUNIT" {
        return None;
    }

    // IFCMEASUREWITHUNIT(ValueComponent, UnitComponent)
    let factor = resolver.get(unit.get_ref(3)?)?;
    if factor.ifc_type != IfcType::IfcMeasureWithUnit {
        return None;
    }

    let value = factor.get(0).and_then(AttributeValue::as_float)?;
    let base_scale = factor
        .get_ref(1)
        .and_then(|id| resolver.get(id))
        .and_then(|base| length_unit_scale(&base, resolver))
        .unwrap_or(1.0);

    Some(value * base_scale)
}

/// Common unit scales for reference
pub mod scales {
    /// Meters to meters (identity)
    pub const METRE: f64 = 1.0;
    /// Millimeters to meters
    pub const MILLIMETRE: f64 = 0.001;
    /// Feet to meters
    pub const FOOT: f64 = 0.3048;
}
