// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Running counts over the parking spaces and the aggregate findings

use super::vote::Reconciliation;
use crate::{CheckerContext, IssueContainer, IssueType};

/// Per-space finding: severity and message key
pub fn space_finding(outcome: Reconciliation) -> Option<(IssueType, &'static str)> {
    let finding = match outcome {
        Reconciliation::Regular { agreed: true } => (IssueType::Success, "CARPARK_REGULAR_AGREED"),
        Reconciliation::Regular { agreed: false } => (IssueType::Success, "CARPARK_REGULAR_PSET_ONLY"),
        Reconciliation::Handicapped { agreed: true } => (IssueType::Success, "CARPARK_HANDICAPPED_AGREED"),
        Reconciliation::Handicapped { agreed: false } => (IssueType::Success, "CARPARK_HANDICAPPED_PSET_ONLY"),
        Reconciliation::UnidentifiedCarpark { agreed: true } => (IssueType::Error, "CARPARK_UNIDENTIFIED_AGREED"),
        Reconciliation::UnidentifiedCarpark { agreed: false } => {
            (IssueType::Error, "CARPARK_UNIDENTIFIED_SEMANTICALLY")
        }
        Reconciliation::UnidentifiedSpace => (IssueType::Error, "SPACE_UNIDENTIFIED"),
        Reconciliation::NotACarpark => return None,
    };
    Some(finding)
}

/// Counts accumulated over one run of the check
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarparkTally {
    /// Spaces considered, whatever their verdict
    pub total: usize,
    pub regular: usize,
    pub handicapped: usize,
    pub unidentified_carparks: usize,
    pub unidentified_spaces: usize,
}

impl CarparkTally {
    /// Count one reconciled space
    pub fn record(mut self, outcome: Reconciliation) -> Self {
        self.total += 1;
        match outcome {
            Reconciliation::Regular { .. } => self.regular += 1,
            Reconciliation::Handicapped { .. } => self.handicapped += 1,
            Reconciliation::UnidentifiedCarpark { .. } => self.unidentified_carparks += 1,
            Reconciliation::UnidentifiedSpace => self.unidentified_spaces += 1,
            Reconciliation::NotACarpark => {}
        }
        self
    }

    /// Whether regular carparks outnumber handicapped ones beyond `ratio`
    pub fn lacks_handicapped(&self, ratio: f64) -> bool {
        self.regular as f64 > self.handicapped as f64 * ratio
    }

    /// Append the model-wide findings
    ///
    /// Order: unidentified spaces, unidentified carparks, handicapped
    /// shortfall, nothing found.
    pub fn emit(&self, issues: &mut IssueContainer, context: &CheckerContext<'_>, ratio: f64) {
        if self.unidentified_spaces > 0 {
            issues
                .builder()
                .issue_type(IssueType::Error)
                .message(context.translate("TOO_MANY_UNIDENTIFIED_SPACES"))
                .is(self.unidentified_spaces.to_string())
                .should_be("0")
                .add();
        }

        if self.unidentified_carparks > 0 {
            issues
                .builder()
                .issue_type(IssueType::Error)
                .message(context.translate("TOO_MANY_UNIDENTIFIED_CARPARKS"))
                .is(self.unidentified_carparks.to_string())
                .should_be("0")
                .add();
        }

        if self.lacks_handicapped(ratio) {
            issues
                .builder()
                .issue_type(IssueType::Error)
                .message(context.translate("TOO_FEW_HANDICAPPED_CARPARKS"))
                .is(self.handicapped.to_string())
                .should_be(format!("{}", self.regular as f64 / ratio))
                .add();
        }

        if self.total == 0 {
            issues
                .builder()
                .issue_type(IssueType::CannotCheck)
                .message(context.translate("NO_CARPARKS_FOUND"))
                .is("0")
                .should_be("> 0")
                .add();
        }
    }
}
