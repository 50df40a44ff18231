// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{CheckId, CheckerContext, ElementRef, IssueContainer, IssueType, ModelCheck, Result};
use ifc_check_model::{IfcModel, IfcType};

/// A model must contain exactly one IfcSite; one finding for the whole model
#[derive(Debug, Default)]
pub struct OnlyOneIfcSite;

impl OnlyOneIfcSite {
    pub fn new() -> Self {
        Self
    }
}

impl ModelCheck for OnlyOneIfcSite {
    fn id(&self) -> CheckId {
        CheckId::new("SITE", "ONLY_ONE_SITE")
    }

    fn check(&self, model: &dyn IfcModel, issues: &mut IssueContainer, context: &CheckerContext<'_>) -> Result<bool> {
        let sites = model.resolver().entities_by_type(&IfcType::IfcSite);
        let (issue_type, subject, noun) = match sites.as_slice() {
            [site] => (IssueType::Success, Some(ElementRef::new(model, site)), "SITE"),
            _ => (IssueType::Error, None, "SITES"),
        };

        issues
            .builder()
            .issue_type(issue_type)
            .subject(subject)
            .message(context.translate("NUMBER_OF_SITES"))
            .is(format!("{} {}", sites.len(), context.translate(noun)))
            .should_be(context.translate("EXACTLY_ONE_SITE"))
            .add();
        Ok(true)
    }
}
