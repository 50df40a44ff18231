// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core model trait
//!
//! Parsing happens elsewhere; validation only ever sees a model through this
//! read-only interface.

use crate::{EntityResolver, ModelMetadata, PropertyReader};

/// Core model interface - read-only access to a parsed IFC model
///
/// The model is thread-safe (`Send + Sync`) so that independent validation
/// runs can share it.
pub trait IfcModel: Send + Sync {
    /// Get entity resolver for entity lookups and reference resolution
    fn resolver(&self) -> &dyn EntityResolver;

    /// Get property reader for accessing property sets
    fn properties(&self) -> &dyn PropertyReader;

    /// Get unit scale factor (file length unit to meters)
    ///
    /// Common values:
    /// - 1.0 for meters
    /// - 0.001 for millimeters
    /// - 0.3048 for feet
    fn unit_scale(&self) -> f64;

    /// Get file metadata (schema version, originating system, etc.)
    fn metadata(&self) -> &ModelMetadata;
}
