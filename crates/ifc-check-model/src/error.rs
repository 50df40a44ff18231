// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model access

use crate::EntityId;
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while querying a model
#[derive(Error, Debug)]
pub enum ModelError {
    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(EntityId),

    /// Invalid entity reference
    #[error("Invalid entity reference at {entity}: attribute {attribute}")]
    InvalidReference { entity: EntityId, attribute: usize },

    /// Missing required attribute
    #[error("Missing required attribute {attribute} on entity {entity}")]
    MissingAttribute { entity: EntityId, attribute: String },

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl ModelError {
    /// Create a missing attribute error
    pub fn missing_attribute(entity: EntityId, attribute: impl Into<String>) -> Self {
        ModelError::MissingAttribute {
            entity,
            attribute: attribute.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        ModelError::Other(msg.into())
    }
}
