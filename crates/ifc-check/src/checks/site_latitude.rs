// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::{CheckId, CheckerContext, ElementRef, IssueContainer, IssueType, ModelCheck, Result};
use ifc_check_model::{IfcModel, IfcType};

/// Every IfcSite must carry a RefLatitude
///
/// Only presence is checked, not whether the value is a valid WGS84 angle.
#[derive(Debug, Default)]
pub struct IfcSiteLatitude;

impl IfcSiteLatitude {
    pub fn new() -> Self {
        Self
    }
}

impl ModelCheck for IfcSiteLatitude {
    fn id(&self) -> CheckId {
        CheckId::new("SITE", "LATITUDE")
    }

    fn check(&self, model: &dyn IfcModel, issues: &mut IssueContainer, context: &CheckerContext<'_>) -> Result<bool> {
        for site in model.resolver().entities_by_type(&IfcType::IfcSite) {
            let builder = issues
                .builder()
                .object(ElementRef::new(model, &site))
                .message(context.translate("REF_LATITUDE"))
                .should_be(context.translate("NOT_NULL"));

            match site.attribute("RefLatitude").filter(|value| value.is_set()) {
                Some(latitude) => builder
                    .issue_type(IssueType::Success)
                    .is(latitude.formatted())
                    .add(),
                None => builder.issue_type(IssueType::Error).add(),
            }
        }
        Ok(true)
    }
}
