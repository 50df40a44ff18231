// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The two independent classifications of a parking space

use super::vote::{Verdict, Vote};
use super::CarparkAccessibilityConfiguration;
use ifc_check_geometry::{Footprint, FootprintProjector};
use ifc_check_model::{DecodedEntity, IfcModel};

/// Property set carrying the accessibility flag
pub const PARKING_PSET: &str = "Pset_SpaceParking";
/// Boolean property inside [`PARKING_PSET`]
pub const HANDICAP_ACCESSIBLE: &str = "HandicapAccessible";
/// ObjectType a space needs for its properties to be trusted
pub const PARKING_OBJECT_TYPE: &str = "Parking";

/// Half-open tolerance band `[target - variation, target + variation)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DimensionWindow {
    pub target: f64,
    pub variation: f64,
}

impl DimensionWindow {
    pub fn new(target: f64, variation: f64) -> Self {
        Self { target, variation }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.target - self.variation && value < self.target + self.variation
    }
}

/// Width and depth windows of one kind of carpark
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeWindow {
    pub width: DimensionWindow,
    pub depth: DimensionWindow,
}

impl SizeWindow {
    pub fn new(width: f64, depth: f64, variation: f64) -> Self {
        Self {
            width: DimensionWindow::new(width, variation),
            depth: DimensionWindow::new(depth, variation),
        }
    }

    /// Whether `(a, b)` fits in either axis order
    pub fn matches(&self, a: f64, b: f64) -> bool {
        (self.width.contains(a) && self.depth.contains(b)) || (self.width.contains(b) && self.depth.contains(a))
    }
}

/// Vote derived from ObjectType and `Pset_SpaceParking`
///
/// A missing HandicapAccessible flag counts as a regular carpark.
pub fn property_vote(model: &dyn IfcModel, space: &DecodedEntity) -> Vote {
    let properties = model.properties();
    if properties.object_type(space.id).as_deref() != Some(PARKING_OBJECT_TYPE) {
        return Vote::property_set(Verdict::UnidentifiedSpace);
    }

    let accessible = properties
        .property_set(space.id, PARKING_PSET)
        .and_then(|pset| pset.get(HANDICAP_ACCESSIBLE).map(|p| p.value.as_bool()));

    let verdict = match accessible {
        Some(Some(true)) => Verdict::HandicappedCarpark,
        Some(_) => Verdict::RegularCarpark,
        None => {
            log::debug!("{} has no {}.{}, assuming regular", space.id, PARKING_PSET, HANDICAP_ACCESSIBLE);
            Verdict::RegularCarpark
        }
    };
    Vote::property_set(verdict)
}

/// Classify plan dimensions in millimetres, handicapped window first
pub fn classify_dimensions(configuration: &CarparkAccessibilityConfiguration, width: f64, depth: f64) -> Verdict {
    if configuration.handicapped_window().matches(width, depth) {
        Verdict::HandicappedCarpark
    } else if configuration.regular_window().matches(width, depth) {
        Verdict::RegularCarpark
    } else {
        Verdict::UnidentifiedCarpark
    }
}

/// Vote derived from the footprint, together with the footprint when one
/// could be projected
pub fn geometry_vote(
    model: &dyn IfcModel,
    projector: &FootprintProjector,
    configuration: &CarparkAccessibilityConfiguration,
    space: &DecodedEntity,
) -> (Vote, Option<Footprint>) {
    match projector.project(space, model.resolver()) {
        Ok(footprint) => {
            let verdict = classify_dimensions(configuration, footprint.width(), footprint.depth());
            log::debug!(
                "{} footprint {:.0} x {:.0} mm: {:?}",
                space.id,
                footprint.width(),
                footprint.depth(),
                verdict
            );
            (Vote::geometry(verdict), Some(footprint))
        }
        Err(e) => {
            log::warn!("no footprint for {}: {}", space.id, e);
            (Vote::geometry(Verdict::UnidentifiedSpace), None)
        }
    }
}
