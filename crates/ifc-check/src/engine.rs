// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation engine
//!
//! Walks the registry in group order and, within a group, in check order.
//! Only checks present and `true` in the configuration execute. Findings go
//! into one container for the whole run, or one per group when partitioned.

use crate::{
    CheckFailure, CheckId, CheckRegistry, CheckerContext, Configuration, IssueContainer, IssueType,
    Localization, Report, Result, Translator, ValidationOutcome,
};
use ifc_check_model::IfcModel;
use std::sync::Arc;

/// Name of the single report of an unpartitioned run
pub const COMBINED_REPORT_NAME: &str = "IFC Validator";

/// Runs enabled checks against a model
///
/// Holds no per-run state; one validator can serve any number of runs.
#[derive(Clone)]
pub struct Validator {
    registry: Arc<CheckRegistry>,
    partition_per_group: bool,
}

impl Validator {
    /// Create a validator
    ///
    /// With `partition_per_group` every group that executed at least one
    /// check yields its own report named after the group.
    pub fn new(registry: Arc<CheckRegistry>, partition_per_group: bool) -> Self {
        Self {
            registry,
            partition_per_group,
        }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Run with the bundled locale named by `configuration.language`
    pub fn run_configured(&self, model: &dyn IfcModel, configuration: &Configuration) -> Result<ValidationOutcome> {
        let localization = Localization::bundled(&configuration.language)?;
        self.run(model, configuration, &localization)
    }

    /// Run every enabled check
    pub fn run(
        &self,
        model: &dyn IfcModel,
        configuration: &Configuration,
        translator: &dyn Translator,
    ) -> Result<ValidationOutcome> {
        self.run_with_progress(model, configuration, translator, |_| {})
    }

    /// Run every enabled check, reporting 0 before and 100 after
    ///
    /// Fails before touching the model when the configuration enables a check
    /// the registry does not know. Errors returned by checks do not fail the
    /// run: they become a [`CheckFailure`] plus a `CannotCheck` finding.
    pub fn run_with_progress(
        &self,
        model: &dyn IfcModel,
        configuration: &Configuration,
        translator: &dyn Translator,
        mut on_progress: impl FnMut(u8),
    ) -> Result<ValidationOutcome> {
        configuration.validate(&self.registry)?;

        on_progress(0);
        log::info!(
            "validating {} entities with {} registered checks",
            model.resolver().entity_count(),
            self.registry.len()
        );

        let context = CheckerContext::new(translator, configuration);
        let mut outcome = ValidationOutcome::default();
        let mut container = IssueContainer::new();

        for group in self.registry.groups() {
            let mut executed = 0usize;

            for identifier in self.registry.checks_in(group) {
                let id = CheckId::new(group, identifier);
                let qualified = id.qualified();

                match configuration.check_enabled(&qualified) {
                    None => {
                        log::debug!("{} not configured, skipping", qualified);
                        continue;
                    }
                    Some(false) => {
                        log::debug!("{} disabled, skipping", qualified);
                        continue;
                    }
                    Some(true) => {}
                }

                let check = self.registry.resolve(&id.group, &id.identifier)?;
                executed += 1;

                let before = container.len();
                match check.check(model, &mut container, &context) {
                    Ok(definitive) => log::debug!(
                        "{} added {} findings (definitive: {})",
                        qualified,
                        container.len() - before,
                        definitive
                    ),
                    Err(e) => {
                        log::warn!("{} failed: {}", qualified, e);
                        container
                            .builder()
                            .issue_type(IssueType::CannotCheck)
                            .message(context.translate("CHECK_FAILED"))
                            .is(e.to_string())
                            .add();
                        outcome.failures.push(CheckFailure {
                            check: id,
                            message: e.to_string(),
                        });
                    }
                }
            }

            if self.partition_per_group && executed > 0 {
                outcome.reports.push(Report::new(group, container.take()));
            }
        }

        if !self.partition_per_group {
            outcome.reports.push(Report::new(COMBINED_REPORT_NAME, container.take()));
        }

        log::info!(
            "validation finished: {} success, {} error, {} cannot check, {} failed checks",
            outcome.count(IssueType::Success),
            outcome.count(IssueType::Error),
            outcome.count(IssueType::CannotCheck),
            outcome.failures.len()
        );
        on_progress(100);

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ModelCheck};
    use ifc_check_model::ModelBuilder;

    /// Adds one finding per run, or fails
    struct Probe {
        group: &'static str,
        identifier: &'static str,
        fail: bool,
    }

    impl ModelCheck for Probe {
        fn id(&self) -> CheckId {
            CheckId::new(self.group, self.identifier)
        }

        fn check(&self, _: &dyn IfcModel, issues: &mut IssueContainer, _: &CheckerContext<'_>) -> Result<bool> {
            if self.fail {
                return Err(Error::check("probe failure"));
            }
            issues.builder().issue_type(IssueType::Success).message(self.identifier).add();
            Ok(true)
        }
    }

    fn probe(group: &'static str, identifier: &'static str) -> Arc<Probe> {
        Arc::new(Probe {
            group,
            identifier,
            fail: false,
        })
    }

    fn registry() -> Arc<CheckRegistry> {
        let mut registry = CheckRegistry::new();
        registry.register(probe("A", "ONE")).unwrap();
        registry.register(probe("A", "TWO")).unwrap();
        registry.register(probe("B", "ONE")).unwrap();
        Arc::new(registry)
    }

    fn messages(report: &Report) -> Vec<&str> {
        report.issues.iter().map(|i| i.message.as_str()).collect()
    }

    #[test]
    fn test_only_present_and_true_checks_run() {
        let model = ModelBuilder::new().build();
        let configuration = Configuration::new()
            .with_check(&CheckId::new("A", "TWO"), true)
            .with_check(&CheckId::new("B", "ONE"), false);

        let outcome = Validator::new(registry(), false)
            .run(&model, &configuration, &Localization::default())
            .unwrap();

        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].name, COMBINED_REPORT_NAME);
        assert_eq!(messages(&outcome.reports[0]), vec!["TWO"]);
    }

    #[test]
    fn test_partitioned_run_skips_idle_groups() {
        let model = ModelBuilder::new().build();
        let configuration = Configuration::new()
            .with_check(&CheckId::new("A", "ONE"), true)
            .with_check(&CheckId::new("A", "TWO"), true)
            .with_check(&CheckId::new("B", "ONE"), false);

        let outcome = Validator::new(registry(), true)
            .run(&model, &configuration, &Localization::default())
            .unwrap();

        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.reports[0].name, "A");
        assert_eq!(messages(&outcome.reports[0]), vec!["ONE", "TWO"]);
    }

    #[test]
    fn test_unpartitioned_run_always_reports() {
        let model = ModelBuilder::new().build();
        let outcome = Validator::new(registry(), false)
            .run(&model, &Configuration::new(), &Localization::default())
            .unwrap();

        assert_eq!(outcome.reports.len(), 1);
        assert!(outcome.reports[0].issues.is_empty());
    }

    #[test]
    fn test_failing_check_is_isolated() {
        let mut registry = CheckRegistry::new();
        registry
            .register(Arc::new(Probe {
                group: "A",
                identifier: "BROKEN",
                fail: true,
            }))
            .unwrap();
        registry.register(probe("A", "AFTER")).unwrap();
        registry.register(probe("B", "NEXT_GROUP")).unwrap();
        let configuration = Configuration::defaults(&registry);

        let outcome = Validator::new(Arc::new(registry), true)
            .run(&ModelBuilder::new().build(), &configuration, &Localization::default())
            .unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].check, CheckId::new("A", "BROKEN"));
        let group_a = outcome.report("A").unwrap();
        assert_eq!(group_a.issues[0].issue_type, IssueType::CannotCheck);
        assert_eq!(group_a.issues[0].is.as_deref(), Some("probe failure"));
        assert_eq!(group_a.issues[1].message, "AFTER");
        assert_eq!(messages(outcome.report("B").unwrap()), vec!["NEXT_GROUP"]);
    }

    #[test]
    fn test_unknown_configured_check_fails_before_running() {
        let mut progress = Vec::new();
        let configuration = Configuration::new().with_check(&CheckId::new("C", "ONE"), true);

        let result = Validator::new(registry(), false).run_with_progress(
            &ModelBuilder::new().build(),
            &configuration,
            &Localization::default(),
            |p| progress.push(p),
        );

        assert!(matches!(result, Err(Error::CheckNotFound(_))));
        assert!(progress.is_empty());
    }

    #[test]
    fn test_progress_is_two_point() {
        let mut progress = Vec::new();
        Validator::new(registry(), false)
            .run_with_progress(
                &ModelBuilder::new().build(),
                &Configuration::new(),
                &Localization::default(),
                |p| progress.push(p),
            )
            .unwrap();
        assert_eq!(progress, vec![0, 100]);
    }
}
