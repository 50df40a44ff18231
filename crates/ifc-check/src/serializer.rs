// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Report serializers

use crate::{Error, IssueType, Report, Result};
use serde::Serialize;

/// Encodes a finished report for delivery to the host
pub trait IssueContainerSerializer: Send + Sync {
    /// MIME type of the encoded bytes
    fn content_type(&self) -> &str;

    /// File name the host stores the bytes under
    fn file_name(&self) -> &str;

    fn to_bytes(&self, report: &Report) -> Result<Vec<u8>>;
}

/// JSON output, `validationresults.json`
#[derive(Clone, Debug, Default)]
pub struct JsonIssueSerializer {
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    success: usize,
    error: usize,
    cannot_check: usize,
}

#[derive(Serialize)]
struct Document<'a> {
    #[serde(flatten)]
    report: &'a Report,
    summary: Summary,
}

impl JsonIssueSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl IssueContainerSerializer for JsonIssueSerializer {
    fn content_type(&self) -> &str {
        "application/json"
    }

    fn file_name(&self) -> &str {
        "validationresults.json"
    }

    fn to_bytes(&self, report: &Report) -> Result<Vec<u8>> {
        let document = Document {
            report,
            summary: Summary {
                success: report.count(IssueType::Success),
                error: report.count(IssueType::Error),
                cannot_check: report.count(IssueType::CannotCheck),
            },
        };
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)
        } else {
            serde_json::to_vec(&document)
        };
        bytes.map_err(Error::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Issue;

    #[test]
    fn test_json_document() {
        let report = Report::new(
            "SITE",
            vec![Issue {
                issue_type: IssueType::Error,
                subject: None,
                message: "Number of sites".into(),
                is: Some("2 Sites".into()),
                should_be: Some("Exactly one site".into()),
            }],
        );
        let serializer = JsonIssueSerializer::new();
        assert_eq!(serializer.content_type(), "application/json");
        assert_eq!(serializer.file_name(), "validationresults.json");

        let json: serde_json::Value = serde_json::from_slice(&serializer.to_bytes(&report).unwrap()).unwrap();
        assert_eq!(json["name"], "SITE");
        assert_eq!(json["issues"][0]["is"], "2 Sites");
        assert_eq!(json["summary"]["error"], 1);
        assert_eq!(json["summary"]["cannotCheck"], 0);
    }
}
