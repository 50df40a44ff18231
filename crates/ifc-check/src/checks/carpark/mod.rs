// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Carpark accessibility
//!
//! Every IfcSpace whose ObjectType reads "parking" (any case) is classified
//! twice: once from `Pset_SpaceParking.HandicapAccessible`, once from its
//! plan footprint. The two votes are reconciled per space, counted, and the
//! counts checked against the required handicapped ratio.

pub mod classify;
pub mod tally;
pub mod vote;

pub use classify::{DimensionWindow, SizeWindow};
pub use tally::CarparkTally;
pub use vote::{reconcile, Reconciliation, Verdict, Vote, VoteSource};

use crate::{
    CheckId, CheckerContext, Configuration, ElementRef, IssueContainer, ModelCheck, NumericParameter, Result,
};
use ifc_check_geometry::FootprintProjector;
use ifc_check_model::{IfcModel, IfcType};

pub const HANDICAPPED_WIDTH: NumericParameter = NumericParameter {
    name: "handicappedWidth",
    default: 3500.0,
};
pub const HANDICAPPED_DEPTH: NumericParameter = NumericParameter {
    name: "handicappedDepth",
    default: 5000.0,
};
pub const REGULAR_WIDTH: NumericParameter = NumericParameter {
    name: "regularWidth",
    default: 2500.0,
};
pub const REGULAR_DEPTH: NumericParameter = NumericParameter {
    name: "regularDepth",
    default: 5000.0,
};
pub const DIMENSION_VARIATION: NumericParameter = NumericParameter {
    name: "dimensionVariation",
    default: 100.0,
};
pub const REQUIRED_RATIO: NumericParameter = NumericParameter {
    name: "requiredHandicappedToRegularRatio",
    default: 50.0,
};

/// Dimensions in millimetres and the regular-per-handicapped ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarparkAccessibilityConfiguration {
    pub handicapped_width: f64,
    pub handicapped_depth: f64,
    pub regular_width: f64,
    pub regular_depth: f64,
    pub dimension_variation: f64,
    pub required_ratio: f64,
}

impl Default for CarparkAccessibilityConfiguration {
    fn default() -> Self {
        Self {
            handicapped_width: HANDICAPPED_WIDTH.default,
            handicapped_depth: HANDICAPPED_DEPTH.default,
            regular_width: REGULAR_WIDTH.default,
            regular_depth: REGULAR_DEPTH.default,
            dimension_variation: DIMENSION_VARIATION.default,
            required_ratio: REQUIRED_RATIO.default,
        }
    }
}

impl CarparkAccessibilityConfiguration {
    /// Read the named parameters, keeping defaults for unset ones
    pub fn from_configuration(configuration: &Configuration) -> Self {
        let read = |parameter: &NumericParameter| configuration.parameter(parameter.name).unwrap_or(parameter.default);
        Self {
            handicapped_width: read(&HANDICAPPED_WIDTH),
            handicapped_depth: read(&HANDICAPPED_DEPTH),
            regular_width: read(&REGULAR_WIDTH),
            regular_depth: read(&REGULAR_DEPTH),
            dimension_variation: read(&DIMENSION_VARIATION),
            required_ratio: read(&REQUIRED_RATIO),
        }
    }

    pub fn handicapped_window(&self) -> SizeWindow {
        SizeWindow::new(self.handicapped_width, self.handicapped_depth, self.dimension_variation)
    }

    pub fn regular_window(&self) -> SizeWindow {
        SizeWindow::new(self.regular_width, self.regular_depth, self.dimension_variation)
    }
}

/// ACCESSIBILITY/CARPARKS
#[derive(Debug, Default)]
pub struct CarparkAccessibility;

impl CarparkAccessibility {
    pub fn new() -> Self {
        Self
    }
}

fn is_parking(model: &dyn IfcModel, space: &ifc_check_model::DecodedEntity) -> bool {
    model
        .properties()
        .object_type(space.id)
        .is_some_and(|object_type| object_type.eq_ignore_ascii_case("parking"))
}

impl ModelCheck for CarparkAccessibility {
    fn id(&self) -> CheckId {
        CheckId::new("ACCESSIBILITY", "CARPARKS")
    }

    fn parameters(&self) -> Vec<NumericParameter> {
        vec![
            HANDICAPPED_WIDTH,
            HANDICAPPED_DEPTH,
            REGULAR_WIDTH,
            REGULAR_DEPTH,
            DIMENSION_VARIATION,
            REQUIRED_RATIO,
        ]
    }

    fn check(&self, model: &dyn IfcModel, issues: &mut IssueContainer, context: &CheckerContext<'_>) -> Result<bool> {
        let configuration = CarparkAccessibilityConfiguration::from_configuration(context.configuration());
        let projector = FootprintProjector::with_default_processors_and_unit_scale(model.unit_scale());

        let mut tally = CarparkTally::default();
        for space in model.resolver().entities_by_type(&IfcType::IfcSpace) {
            if !is_parking(model, &space) {
                continue;
            }

            let property = classify::property_vote(model, &space);
            let (geometry, footprint) = classify::geometry_vote(model, &projector, &configuration, &space);
            let outcome = reconcile(property, geometry);
            log::debug!(
                "{}: {:?} by {}, {:?} by {} -> {:?}",
                space.id,
                property.verdict,
                property.source,
                geometry.verdict,
                geometry.source,
                outcome
            );
            tally = tally.record(outcome);

            if let Some((issue_type, key)) = tally::space_finding(outcome) {
                let builder = issues
                    .builder()
                    .issue_type(issue_type)
                    .object(ElementRef::new(model, &space))
                    .message(context.translate(key));
                match footprint {
                    Some(footprint) => builder
                        .is(format!("{:.0} x {:.0}", footprint.width(), footprint.depth()))
                        .add(),
                    None => builder.add(),
                }
            }
        }

        log::debug!("carpark tally: {:?}", tally);
        tally.emit(issues, context, configuration.required_ratio);
        Ok(tally.total > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IssueType, Localization};
    use ifc_check_model::{AttributeValue, EntityId, ModelBuilder, Property, PropertySet};

    fn parking_space(builder: &mut ModelBuilder, object_type: &str, width: f64, depth: f64) -> EntityId {
        let profile = builder.add(
            IfcType::IfcRectangleProfileDef,
            vec![
                AttributeValue::Enum("AREA".into()),
                AttributeValue::Null,
                AttributeValue::Null,
                width.into(),
                depth.into(),
            ],
        );
        let up = builder.direction(&[0.0, 0.0, 1.0]);
        let solid = builder.add(
            IfcType::IfcExtrudedAreaSolid,
            vec![profile.into(), AttributeValue::Null, up.into(), 2500.0f64.into()],
        );
        let shape = builder.shape("Body", "SweptSolid", vec![solid]);
        builder.spatial_element(IfcType::IfcSpace, "space", "P", Some(object_type), None, Some(shape))
    }

    fn run(model: &dyn IfcModel, configuration: &Configuration) -> (bool, Vec<crate::Issue>) {
        let en = Localization::bundled("en").unwrap();
        let mut issues = IssueContainer::new();
        let definitive = CarparkAccessibility::new()
            .check(model, &mut issues, &CheckerContext::new(&en, configuration))
            .unwrap();
        (definitive, issues.into_issues())
    }

    fn millimetre_builder() -> ModelBuilder {
        let mut builder = ModelBuilder::new();
        builder.project_with_si_length_unit(Some("MILLI"));
        builder
    }

    #[test]
    fn test_configuration_defaults_and_overrides() {
        let configuration = Configuration::new().with_parameter("dimensionVariation", 150.0);
        let read = CarparkAccessibilityConfiguration::from_configuration(&configuration);
        assert_eq!(read.dimension_variation, 150.0);
        assert_eq!(read.regular_width, 2500.0);
        assert_eq!(read.required_ratio, 50.0);
    }

    #[test]
    fn test_agreeing_handicapped_space() {
        let mut builder = millimetre_builder();
        let space = parking_space(&mut builder, "Parking", 5000.0, 3500.0);
        builder.property_set(
            &[space],
            &PropertySet::new("Pset_SpaceParking").with(Property::new("HandicapAccessible", true)),
        );
        let (definitive, issues) = run(&builder.build(), &Configuration::new());

        assert!(definitive);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::Success);
        assert_eq!(issues[0].is.as_deref(), Some("5000 x 3500"));
        assert_eq!(issues[0].subject.as_ref().unwrap().ifc_type, "IfcSpace");
    }

    #[test]
    fn test_property_vote_wins_disagreement() {
        let mut builder = millimetre_builder();
        let space = parking_space(&mut builder, "Parking", 2500.0, 5000.0);
        builder.property_set(
            &[space],
            &PropertySet::new("Pset_SpaceParking").with(Property::new("HandicapAccessible", true)),
        );
        let (_, issues) = run(&builder.build(), &Configuration::new());
        let en = Localization::bundled("en").unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::Success);
        assert_eq!(issues[0].message, en.get("CARPARK_HANDICAPPED_PSET_ONLY").unwrap());
    }

    #[test]
    fn test_lowercase_object_type_is_unidentified_space() {
        let mut builder = millimetre_builder();
        parking_space(&mut builder, "parking", 2500.0, 5000.0);
        let (definitive, issues) = run(&builder.build(), &Configuration::new());
        let en = Localization::bundled("en").unwrap();

        assert!(definitive);
        let messages: Vec<&str> = issues.iter().map(|i| i.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                en.get("SPACE_UNIDENTIFIED").unwrap(),
                en.get("TOO_MANY_UNIDENTIFIED_SPACES").unwrap(),
            ]
        );
    }

    #[test]
    fn test_odd_size_falls_back_to_properties() {
        let mut builder = millimetre_builder();
        parking_space(&mut builder, "Parking", 4000.0, 4000.0);
        let (_, issues) = run(&builder.build(), &Configuration::new());
        let en = Localization::bundled("en").unwrap();

        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].issue_type, IssueType::Success);
        assert_eq!(issues[0].message, en.get("CARPARK_REGULAR_PSET_ONLY").unwrap());
        assert_eq!(issues[1].message, en.get("TOO_FEW_HANDICAPPED_CARPARKS").unwrap());
        assert_eq!(issues[1].is.as_deref(), Some("0"));
        assert_eq!(issues[1].should_be.as_deref(), Some("0.02"));
    }

    #[test]
    fn test_other_spaces_are_ignored() {
        let mut builder = millimetre_builder();
        parking_space(&mut builder, "Office", 2500.0, 5000.0);
        let (definitive, issues) = run(&builder.build(), &Configuration::new());

        assert!(!definitive);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].issue_type, IssueType::CannotCheck);
    }
}
