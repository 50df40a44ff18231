// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end runs of the built-in checks

use ifc_check::{
    CheckId, CheckRegistry, CheckerContext, Configuration, Error, IssueContainer, IssueContainerSerializer,
    IssueType, JsonIssueSerializer, Localization, ModelCheck, Result, Validator, COMBINED_REPORT_NAME,
};
use ifc_check_model::{AttributeValue, EntityId, IfcModel, IfcType, MemoryModel, ModelBuilder, Property, PropertySet};
use std::sync::Arc;

fn registry() -> Arc<CheckRegistry> {
    Arc::new(CheckRegistry::full().unwrap())
}

fn only(group: &str, identifier: &str) -> Configuration {
    Configuration::new().with_check(&CheckId::new(group, identifier), true)
}

fn millimetre_builder() -> ModelBuilder {
    let mut builder = ModelBuilder::new();
    builder.project_with_si_length_unit(Some("MILLI"));
    builder
}

/// IfcSpace with ObjectType "Parking" and a `width` x `depth` extruded rectangle
fn parking_space(builder: &mut ModelBuilder, name: &str, width: f64, depth: f64, handicapped: Option<bool>) -> EntityId {
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
    let origin = builder.axis2_placement_3d([0.0, 0.0, 0.0], None, None);
    let placement = builder.local_placement(None, origin);
    let space = builder.spatial_element(IfcType::IfcSpace, name, name, Some("Parking"), Some(placement), Some(shape));

    if let Some(flag) = handicapped {
        builder.property_set(
            &[space],
            &PropertySet::new("Pset_SpaceParking").with(Property::new("HandicapAccessible", flag)),
        );
    }
    space
}

fn carpark_model(regular: usize) -> MemoryModel {
    let mut builder = millimetre_builder();
    for n in 0..regular {
        parking_space(&mut builder, &format!("P{}", n), 2500.0, 5000.0, Some(false));
    }
    builder.build()
}

#[test]
fn two_sites_give_one_error() {
    let mut builder = ModelBuilder::new();
    builder.spatial_element(IfcType::IfcSite, "site-a", "A", None, None, None);
    builder.spatial_element(IfcType::IfcSite, "site-b", "B", None, None, None);

    let outcome = Validator::new(registry(), false)
        .run_configured(&builder.build(), &only("SITE", "ONLY_ONE_SITE"))
        .unwrap();

    let issues: Vec<_> = outcome.issues().collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_type, IssueType::Error);
    assert_eq!(issues[0].is.as_deref(), Some("2 Sites"));
    assert_eq!(issues[0].should_be.as_deref(), Some("Exactly one site"));
}

#[test]
fn disabled_toggle_for_removed_check_is_ignored() {
    let mut builder = ModelBuilder::new();
    builder.spatial_element(IfcType::IfcSite, "site-a", "A", None, None, None);
    builder.spatial_element(IfcType::IfcSite, "site-b", "B", None, None, None);
    let configuration = Configuration::from_json(
        r#"{"checks": {"SITE___ONLY_ONE_SITE": true, "SITE___REMOVED_CHECK": false}}"#,
    )
    .unwrap();

    let outcome = Validator::new(registry(), false)
        .run_configured(&builder.build(), &configuration)
        .unwrap();

    let issues: Vec<_> = outcome.issues().collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].is.as_deref(), Some("2 Sites"));
}

#[test]
fn unset_latitude_gives_one_error() {
    let mut builder = ModelBuilder::new();
    let site = builder.spatial_element(IfcType::IfcSite, "site-a", "A", None, None, None);

    let outcome = Validator::new(registry(), false)
        .run_configured(&builder.build(), &only("SITE", "LATITUDE"))
        .unwrap();

    let issues: Vec<_> = outcome.issues().collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_type, IssueType::Error);
    assert_eq!(issues[0].subject.as_ref().unwrap().id, site);
    assert_eq!(issues[0].subject.as_ref().unwrap().ifc_type, "IfcSite");
    assert_eq!(issues[0].is, None);
    assert_eq!(issues[0].should_be.as_deref(), Some("Not null"));
}

#[test]
fn regular_space_confirmed_by_both_votes() {
    let mut builder = millimetre_builder();
    parking_space(&mut builder, "P1", 2400.0, 1200.0, Some(false));
    let configuration = only("ACCESSIBILITY", "CARPARKS")
        .with_parameter("regularWidth", 2400.0)
        .with_parameter("regularDepth", 1200.0)
        .with_parameter("dimensionVariation", 100.0);

    let outcome = Validator::new(registry(), false)
        .run_configured(&builder.build(), &configuration)
        .unwrap();

    let en = Localization::bundled("en").unwrap();
    let successes: Vec<_> = outcome.issues().filter(|i| i.issue_type == IssueType::Success).collect();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].message, en.get("CARPARK_REGULAR_AGREED").unwrap());
    assert_eq!(successes[0].is.as_deref(), Some("2400 x 1200"));

    // the one regular carpark exceeds zero handicapped times the ratio
    let shortfall = outcome
        .issues()
        .find(|i| i.message == en.get("TOO_FEW_HANDICAPPED_CARPARKS").unwrap())
        .unwrap();
    assert_eq!(shortfall.is.as_deref(), Some("0"));
}

#[test]
fn no_parking_spaces_cannot_check() {
    let outcome = Validator::new(registry(), false)
        .run_configured(&ModelBuilder::new().build(), &only("ACCESSIBILITY", "CARPARKS"))
        .unwrap();

    let issues: Vec<_> = outcome.issues().collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].issue_type, IssueType::CannotCheck);
    assert_eq!(issues[0].message, "No carparks found");
    assert_eq!(issues[0].is.as_deref(), Some("0"));
    assert_eq!(issues[0].should_be.as_deref(), Some("> 0"));
}

#[test]
fn handicapped_shortfall_with_small_tallies() {
    let configuration = only("ACCESSIBILITY", "CARPARKS").with_parameter("requiredHandicappedToRegularRatio", 20.0);

    let outcome = Validator::new(registry(), false)
        .run_configured(&carpark_model(10), &configuration)
        .unwrap();

    assert_eq!(outcome.count(IssueType::Success), 10);
    let errors: Vec<_> = outcome.issues().filter(|i| i.issue_type == IssueType::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Too few handicapped carparks");
    assert_eq!(errors[0].is.as_deref(), Some("0"));
    assert_eq!(errors[0].should_be.as_deref(), Some("0.5"));
}

#[test]
fn handicapped_space_satisfies_ratio() {
    let mut builder = millimetre_builder();
    for n in 0..3 {
        parking_space(&mut builder, &format!("P{}", n), 5000.0, 2500.0, None);
    }
    parking_space(&mut builder, "H", 3500.0, 5000.0, Some(true));

    let outcome = Validator::new(registry(), false)
        .run_configured(&builder.build(), &only("ACCESSIBILITY", "CARPARKS"))
        .unwrap();

    assert_eq!(outcome.count(IssueType::Success), 4);
    assert_eq!(outcome.count(IssueType::Error), 0);
}

#[test]
fn repeated_runs_are_identical() {
    let registry = registry();
    let model = carpark_model(3);
    let configuration = Configuration::defaults(&registry);
    let validator = Validator::new(registry, false);
    let serializer = JsonIssueSerializer::new();

    let first = validator.run_configured(&model, &configuration).unwrap();
    let second = validator.run_configured(&model, &configuration).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serializer.to_bytes(&first.reports[0]).unwrap(),
        serializer.to_bytes(&second.reports[0]).unwrap()
    );
}

#[test]
fn partitioned_run_reports_per_group() {
    let registry = registry();
    let configuration = Configuration::defaults(&registry);

    let outcome = Validator::new(registry, true)
        .run_configured(&carpark_model(1), &configuration)
        .unwrap();

    let names: Vec<&str> = outcome.reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["SITE", "ACCESSIBILITY"]);
    assert!(outcome.report(COMBINED_REPORT_NAME).is_none());
    // no site: ONLY_ONE_SITE errors, LATITUDE has nothing to report
    assert_eq!(outcome.report("SITE").unwrap().issues.len(), 1);
}

#[test]
fn disabled_group_yields_no_report() {
    let registry = registry();
    let configuration = Configuration::defaults(&registry).with_check(&CheckId::new("ACCESSIBILITY", "CARPARKS"), false);

    let outcome = Validator::new(registry, true)
        .run_configured(&carpark_model(1), &configuration)
        .unwrap();

    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.reports[0].name, "SITE");
}

struct Unreadable;

impl ModelCheck for Unreadable {
    fn id(&self) -> CheckId {
        CheckId::new("SITE", "UNREADABLE")
    }

    fn check(&self, model: &dyn IfcModel, _: &mut IssueContainer, _: &CheckerContext<'_>) -> Result<bool> {
        model.resolver().get(EntityId(9999)).ok_or_else(|| Error::check("#9999 missing"))?;
        Ok(true)
    }
}

#[test]
fn failing_check_does_not_stop_the_run() {
    let mut registry = CheckRegistry::full().unwrap();
    registry.register(Arc::new(Unreadable)).unwrap();
    let configuration = Configuration::defaults(&registry);

    let outcome = Validator::new(Arc::new(registry), false)
        .run_configured(&carpark_model(1), &configuration)
        .unwrap();

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].check, CheckId::new("SITE", "UNREADABLE"));
    assert_eq!(outcome.count(IssueType::CannotCheck), 1);
    // carparks still ran after the failure
    assert_eq!(outcome.count(IssueType::Success), 1);
}

#[test]
fn unknown_check_in_configuration_is_rejected() {
    let configuration = only("SITE", "LONGITUDE");
    let result = Validator::new(registry(), false).run_configured(&ModelBuilder::new().build(), &configuration);
    assert!(matches!(result, Err(Error::CheckNotFound(_))));
}

#[test]
fn dutch_output() {
    let mut builder = ModelBuilder::new();
    builder.spatial_element(IfcType::IfcSite, "site-a", "A", None, None, None);
    let configuration = only("SITE", "ONLY_ONE_SITE").with_language("NL");

    let outcome = Validator::new(registry(), false)
        .run_configured(&builder.build(), &configuration)
        .unwrap();

    let issue = outcome.issues().next().unwrap();
    assert_eq!(issue.issue_type, IssueType::Success);
    assert_eq!(issue.is.as_deref(), Some("1 Terrein"));
    assert_eq!(issue.should_be.as_deref(), Some("Precies één terrein"));
}

#[test]
fn report_serializes_to_json() {
    let outcome = Validator::new(registry(), false)
        .run_configured(&ModelBuilder::new().build(), &only("ACCESSIBILITY", "CARPARKS"))
        .unwrap();
    let bytes = JsonIssueSerializer::pretty().to_bytes(&outcome.reports[0]).unwrap();

    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["name"], COMBINED_REPORT_NAME);
    assert_eq!(json["issues"][0]["type"], "CANNOT_CHECK");
    assert_eq!(json["issues"][0]["shouldBe"], "> 0");
    assert_eq!(json["summary"]["cannotCheck"], 1);
}
