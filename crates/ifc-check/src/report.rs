// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Findings, the issue container sink and finished reports

use crate::CheckId;
use ifc_check_model::{DecodedEntity, EntityId, IfcModel};
use serde::{Deserialize, Serialize};

/// Severity of a finding
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Success,
    Error,
    CannotCheck,
}

/// Model element a finding is about
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    pub id: EntityId,
    pub global_id: Option<String>,
    /// Schema-cased class name, e.g. `IfcSpace`
    pub ifc_type: String,
}

impl ElementRef {
    pub fn new(model: &dyn IfcModel, entity: &DecodedEntity) -> Self {
        Self {
            id: entity.id,
            global_id: model.properties().global_id(entity.id),
            ifc_type: entity.ifc_type.schema_name().to_string(),
        }
    }
}

/// One reported fact
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub subject: Option<ElementRef>,
    pub message: String,
    /// Observed value
    pub is: Option<String>,
    /// Expected value
    pub should_be: Option<String>,
}

/// Append-only sink for findings
#[derive(Clone, Debug, Default)]
pub struct IssueContainer {
    issues: Vec<Issue>,
}

impl IssueContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Fluent construction of one issue, appended by [`IssueBuilder::add`]
    pub fn builder(&mut self) -> IssueBuilder<'_> {
        IssueBuilder {
            container: self,
            issue: Issue {
                issue_type: IssueType::Error,
                subject: None,
                message: String::new(),
                is: None,
                should_be: None,
            },
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues of one type
    pub fn count(&self, issue_type: IssueType) -> usize {
        count(&self.issues, issue_type)
    }

    /// Drain the container, leaving it empty
    pub fn take(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

fn count(issues: &[Issue], issue_type: IssueType) -> usize {
    issues.iter().filter(|i| i.issue_type == issue_type).count()
}

/// Pending issue; dropped without effect unless `add` is called
#[must_use = "call .add() to append the issue"]
pub struct IssueBuilder<'a> {
    container: &'a mut IssueContainer,
    issue: Issue,
}

impl IssueBuilder<'_> {
    pub fn issue_type(mut self, issue_type: IssueType) -> Self {
        self.issue.issue_type = issue_type;
        self
    }

    /// Element the issue is about
    pub fn object(mut self, subject: ElementRef) -> Self {
        self.issue.subject = Some(subject);
        self
    }

    pub fn subject(mut self, subject: Option<ElementRef>) -> Self {
        self.issue.subject = subject;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.issue.message = message.into();
        self
    }

    pub fn is(mut self, observed: impl Into<String>) -> Self {
        self.issue.is = Some(observed.into());
        self
    }

    pub fn should_be(mut self, expected: impl Into<String>) -> Self {
        self.issue.should_be = Some(expected.into());
        self
    }

    pub fn add(self) {
        self.container.add(self.issue);
    }
}

/// Completed findings of one group, or of the whole run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub name: String,
    pub issues: Vec<Issue>,
}

impl Report {
    pub fn new(name: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            name: name.into(),
            issues,
        }
    }

    pub fn count(&self, issue_type: IssueType) -> usize {
        count(&self.issues, issue_type)
    }
}

/// A check that returned an error instead of findings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckFailure {
    pub check: CheckId,
    pub message: String,
}

/// Everything a validation run produced
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationOutcome {
    pub reports: Vec<Report>,
    pub failures: Vec<CheckFailure>,
}

impl ValidationOutcome {
    /// Report by name
    pub fn report(&self, name: &str) -> Option<&Report> {
        self.reports.iter().find(|r| r.name == name)
    }

    /// All issues, report by report
    pub fn issues(&self) -> impl Iterator<Item = &Issue> + '_ {
        self.reports.iter().flat_map(|r| r.issues.iter())
    }

    pub fn count(&self, issue_type: IssueType) -> usize {
        self.reports.iter().map(|r| r.count(issue_type)).sum()
    }
}
