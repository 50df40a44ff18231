// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Check Geometry
//!
//! Reduces element shapes to 2D plan-view footprints for geometric checks.
//! This crate uses the `EntityResolver` trait from `ifc-check-model` for
//! entity lookup, so it works with any model implementation.
//!
//! ## Overview
//!
//! - **Placements**: IfcLocalPlacement chains, axis placements and
//!   transformation operators resolved to `Matrix4`
//! - **Processors**: per item type point extraction (extrusions, faceted
//!   breps, 2D curves)
//! - **Projection**: mapped item expansion, object placement, unit scaling
//!   to millimetres and axis-aligned extents
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_check_geometry::FootprintProjector;
//!
//! let projector = FootprintProjector::with_default_processors_and_unit_scale(model.unit_scale());
//! let footprint = projector.project(&space, model.resolver())?;
//! println!("{} x {} mm", footprint.width(), footprint.depth());
//! ```

pub mod error;
pub mod placement;
pub mod processors;
pub mod profile;
pub mod router;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector3};

// Re-export main types
pub use error::{GeometryError, Result};
pub use placement::resolve_placement;
pub use profile::{Bounds2D, Profile2D};
pub use router::{Footprint, FootprintProcessor, FootprintProjector, FOOTPRINT_REPRESENTATIONS};

// Re-export processors
pub use processors::{CurveProcessor, ExtrudedAreaSolidProcessor, FacetedBrepProcessor};
