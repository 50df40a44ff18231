// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC-Check Model - Read-only model access for IFC validation
//!
//! Checks never parse IFC themselves. They work against the trait interfaces
//! defined here, so any decoder can feed them by implementing the traits or by
//! handing its entities to [`ModelBuilder`].
//!
//! # Architecture
//!
//! - [`IfcModel`] - Read-only access to a decoded IFC model
//! - [`EntityResolver`] - Entity lookup and reference resolution
//! - [`PropertyReader`] - Property sets attached through IfcRelDefinesByProperties
//! - [`schema`] - Attribute name to position table for the spatial classes
//! - [`MemoryModel`] - Hash-indexed implementation of all of the above
//!
//! # Example
//!
//! ```
//! use ifc_check_model::{EntityResolver, IfcModel, IfcType, ModelBuilder};
//!
//! let mut builder = ModelBuilder::new();
//! builder.project_with_si_length_unit(Some("MILLI"));
//! builder.spatial_element(IfcType::IfcSite, "0YvctVUKr0kugbFTf53O9L", "Site", None, None, None);
//! let model = builder.build();
//!
//! assert_eq!(model.resolver().count_by_type(&IfcType::IfcSite), 1);
//! assert!((model.unit_scale() - 0.001).abs() < 1e-12);
//! ```

pub mod error;
pub mod memory;
pub mod properties;
pub mod resolver;
pub mod schema;
pub mod traits;
pub mod types;
pub mod units;

// Re-export all public types
pub use error::*;
pub use memory::*;
pub use properties::*;
pub use resolver::*;
pub use traits::*;
pub use types::*;
pub use units::{extract_unit_scale, scales};
