// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification votes and their reconciliation

use serde::Serialize;
use std::fmt;

/// What one source concluded about a parking space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    RegularCarpark,
    HandicappedCarpark,
    NotACarpark,
    UnidentifiedCarpark,
    UnidentifiedSpace,
}

/// Where a vote came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum VoteSource {
    PropertySet,
    Geometry,
}

impl fmt::Display for VoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteSource::PropertySet => f.write_str("Pset_SpaceParking"),
            VoteSource::Geometry => f.write_str("Geometry"),
        }
    }
}

/// A verdict tagged with its source
///
/// Two votes are equal when their verdicts are, whichever source cast them.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Vote {
    pub verdict: Verdict,
    pub source: VoteSource,
}

impl Vote {
    pub fn new(verdict: Verdict, source: VoteSource) -> Self {
        Self { verdict, source }
    }

    pub fn property_set(verdict: Verdict) -> Self {
        Self::new(verdict, VoteSource::PropertySet)
    }

    pub fn geometry(verdict: Verdict) -> Self {
        Self::new(verdict, VoteSource::Geometry)
    }
}

impl PartialEq for Vote {
    fn eq(&self, other: &Self) -> bool {
        self.verdict == other.verdict
    }
}

impl Eq for Vote {}

/// Result of combining the property and geometry votes of one space
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciliation {
    /// Counted as a regular carpark; `agreed` when geometry concurred
    Regular { agreed: bool },
    /// Counted as a handicapped carpark; `agreed` when geometry concurred
    Handicapped { agreed: bool },
    /// Recognized as a carpark of unknown kind
    UnidentifiedCarpark { agreed: bool },
    /// Not recognizable as a parking space
    UnidentifiedSpace,
    /// Correctly excluded; produces no finding
    NotACarpark,
}

/// Combine the two votes of one space
///
/// On agreement the shared verdict wins. On disagreement the property vote
/// decides, so geometry can never promote an unidentified space.
pub fn reconcile(property: Vote, geometry: Vote) -> Reconciliation {
    let agreed = property == geometry;
    match property.verdict {
        Verdict::RegularCarpark => Reconciliation::Regular { agreed },
        Verdict::HandicappedCarpark => Reconciliation::Handicapped { agreed },
        Verdict::UnidentifiedCarpark => Reconciliation::UnidentifiedCarpark { agreed },
        Verdict::UnidentifiedSpace => Reconciliation::UnidentifiedSpace,
        Verdict::NotACarpark => Reconciliation::NotACarpark,
    }
}
