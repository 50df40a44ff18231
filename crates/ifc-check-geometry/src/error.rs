// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for footprint projection

use ifc_check_model::EntityId;
use thiserror::Error;

/// Geometry processing result type
pub type Result<T> = std::result::Result<T, GeometryError>;

/// Geometry processing errors
#[derive(Error, Debug)]
pub enum GeometryError {
    /// Element has no product representation
    #[error("Entity {0} has no representation")]
    NoRepresentation(EntityId),

    /// Missing entity error
    #[error("Entity not found: #{0}")]
    EntityNotFound(u32),

    /// Invalid attribute error
    #[error("Invalid attribute at index {index}: {message}")]
    InvalidAttribute { index: usize, message: String },

    /// Profile processing error
    #[error("Profile error: {0}")]
    Profile(String),

    /// Unsupported geometry type
    #[error("Unsupported geometry type: {0}")]
    UnsupportedType(String),

    /// Representation produced no points
    #[error("Entity {0} has an empty footprint")]
    Empty(EntityId),
}

impl GeometryError {
    /// Create a profile error
    pub fn profile(msg: impl Into<String>) -> Self {
        GeometryError::Profile(msg.into())
    }

    /// Create an entity not found error
    pub fn entity_not_found(id: EntityId) -> Self {
        GeometryError::EntityNotFound(id.0)
    }

    /// Create an invalid attribute error
    pub fn invalid_attribute(index: usize, msg: impl Into<String>) -> Self {
        GeometryError::InvalidAttribute {
            index,
            message: msg.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        GeometryError::UnsupportedType(type_name.into())
    }
}
