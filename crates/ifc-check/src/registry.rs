// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Check registry - grouped checks in registration order

use crate::checks::{CarparkAccessibility, IfcSiteLatitude, OnlyOneIfcSite};
use crate::{CheckId, Error, ModelCheck, Result};
use std::sync::Arc;

struct Group {
    name: String,
    checks: Vec<Arc<dyn ModelCheck>>,
}

/// Holds all available checks, grouped
///
/// Built once, then shared read-only (typically as `Arc<CheckRegistry>`)
/// between validation runs.
#[derive(Default)]
pub struct CheckRegistry {
    groups: Vec<Group>,
}

impl CheckRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in check
    ///
    /// - SITE___LATITUDE
    /// - SITE___ONLY_ONE_SITE
    /// - ACCESSIBILITY___CARPARKS
    pub fn full() -> Result<Self> {
        let mut registry = Self::new();
        registry.register(Arc::new(IfcSiteLatitude::new()))?;
        registry.register(Arc::new(OnlyOneIfcSite::new()))?;
        registry.register(Arc::new(CarparkAccessibility::new()))?;
        Ok(registry)
    }

    /// Add a check under its (group, identifier) pair
    ///
    /// Fails with [`Error::DuplicateCheck`] when the pair is taken.
    pub fn register(&mut self, check: Arc<dyn ModelCheck>) -> Result<()> {
        let id = check.id();
        if self.find(&id.group, &id.identifier).is_some() {
            return Err(Error::DuplicateCheck(id));
        }

        match self.groups.iter_mut().find(|g| g.name == id.group) {
            Some(group) => group.checks.push(check),
            None => self.groups.push(Group {
                name: id.group,
                checks: vec![check],
            }),
        }
        Ok(())
    }

    /// Group identifiers in registration order
    pub fn groups(&self) -> impl Iterator<Item = &str> + '_ {
        self.groups.iter().map(|g| g.name.as_str())
    }

    /// Check identifiers within `group`, in registration order
    pub fn checks_in<'a>(&'a self, group: &str) -> impl Iterator<Item = String> + 'a {
        self.groups
            .iter()
            .filter(move |g| g.name == group)
            .flat_map(|g| g.checks.iter().map(|check| check.id().identifier))
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Look up a check
    pub fn resolve(&self, group: &str, identifier: &str) -> Result<&Arc<dyn ModelCheck>> {
        self.find(group, identifier)
            .ok_or_else(|| Error::CheckNotFound(CheckId::new(group, identifier)))
    }

    /// Every registered check, group by group
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ModelCheck>> + '_ {
        self.groups.iter().flat_map(|g| g.checks.iter())
    }

    /// Whether a fully-qualified id names a registered check
    pub fn contains(&self, qualified: &str) -> bool {
        CheckId::parse(qualified).is_some_and(|id| self.find(&id.group, &id.identifier).is_some())
    }

    /// Number of registered checks
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.checks.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn find(&self, group: &str, identifier: &str) -> Option<&Arc<dyn ModelCheck>> {
        self.groups
            .iter()
            .find(|g| g.name == group)?
            .checks
            .iter()
            .find(|check| check.id().identifier == identifier)
    }
}
