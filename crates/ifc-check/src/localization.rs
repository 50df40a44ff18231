// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Localization
//!
//! Locale resources are flat JSON objects of key -> string, one file per
//! language (`en.json`, `nl.json`). English is the fallback.

use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Language whose resource must always exist
pub const FALLBACK_LANGUAGE: &str = "en";

const BUNDLED: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.json")),
    ("nl", include_str!("../locales/nl.json")),
];

/// Key -> localized string lookup for the active language
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Strings of one language
#[derive(Clone, Debug, Default)]
pub struct Localization {
    language: String,
    strings: BTreeMap<String, String>,
}

impl Localization {
    /// Parse a locale resource
    pub fn from_json(language: impl Into<String>, json: &str) -> Result<Self> {
        let language = language.into();
        let strings = serde_json::from_str(json).map_err(|source| Error::InvalidLocale {
            name: language.clone(),
            source,
        })?;
        Ok(Self { language, strings })
    }

    /// Load `<dir>/<language>.json`, falling back to `<dir>/en.json`
    pub fn load(dir: impl AsRef<Path>, language: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let language = language.to_lowercase();

        let requested = dir.join(format!("{}.json", language));
        if requested.is_file() {
            return Self::from_json(language, &std::fs::read_to_string(requested)?);
        }

        let fallback = dir.join(format!("{}.json", FALLBACK_LANGUAGE));
        if fallback.is_file() {
            log::warn!(
                "no locale resource for {} in {}, falling back to {}",
                language,
                dir.display(),
                FALLBACK_LANGUAGE
            );
            return Self::from_json(FALLBACK_LANGUAGE, &std::fs::read_to_string(fallback)?);
        }

        Err(Error::MissingLocale {
            language,
            dir: dir.to_path_buf(),
        })
    }

    /// Resources compiled into the crate
    pub fn bundled(language: &str) -> Result<Self> {
        let language = language.to_lowercase();
        let lookup = |code: &str| BUNDLED.iter().find(|(name, _)| *name == code).map(|(_, json)| *json);

        match lookup(&language) {
            Some(json) => Self::from_json(language, json),
            None => {
                log::warn!("no bundled locale for {}, falling back to {}", language, FALLBACK_LANGUAGE);
                let json = lookup(FALLBACK_LANGUAGE).ok_or_else(|| Error::MissingLocale {
                    language: language.clone(),
                    dir: Default::default(),
                })?;
                Self::from_json(FALLBACK_LANGUAGE, json)
            }
        }
    }

    /// Language actually loaded (after any fallback), lowercase
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Translator for Localization {
    /// Unknown keys translate to themselves
    fn translate(&self, key: &str) -> String {
        match self.get(key) {
            Some(text) => text.to_string(),
            None => {
                log::debug!("no {} translation for {}", self.language, key);
                key.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_locales_have_same_keys() {
        let en = Localization::bundled("EN").unwrap();
        let nl = Localization::bundled("nl").unwrap();
        assert_eq!(en.language(), "en");
        assert_eq!(nl.language(), "nl");
        assert_eq!(
            en.strings.keys().collect::<Vec<_>>(),
            nl.strings.keys().collect::<Vec<_>>()
        );
        assert_eq!(en.translate("NOT_NULL"), "Not null");
        assert_ne!(nl.translate("NOT_NULL"), "Not null");
    }

    #[test]
    fn test_unknown_bundled_language_falls_back() {
        let localization = Localization::bundled("FR").unwrap();
        assert_eq!(localization.language(), "en");
    }

    #[test]
    fn test_unknown_key_is_echoed() {
        let localization = Localization::from_json("en", r#"{"SITE": "Site"}"#).unwrap();
        assert_eq!(localization.translate("SITE"), "Site");
        assert_eq!(localization.translate("SITES"), "SITES");
    }

    #[test]
    fn test_load_from_directory_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"SITE": "Site"}"#).unwrap();
        std::fs::write(dir.path().join("de.json"), r#"{"SITE": "Grundstück"}"#).unwrap();

        assert_eq!(Localization::load(dir.path(), "DE").unwrap().translate("SITE"), "Grundstück");
        let fallback = Localization::load(dir.path(), "nl").unwrap();
        assert_eq!(fallback.language(), "en");
        assert_eq!(fallback.translate("SITE"), "Site");
    }

    #[test]
    fn test_load_without_fallback_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Localization::load(dir.path(), "nl"),
            Err(Error::MissingLocale { language, .. }) if language == "nl"
        ));
    }

    #[test]
    fn test_invalid_resource() {
        assert!(matches!(
            Localization::from_json("en", "[1, 2]"),
            Err(Error::InvalidLocale { .. })
        ));
    }
}
