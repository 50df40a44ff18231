// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up and resolving IFC entities

use crate::{AttributeValue, DecodedEntity, EntityId, IfcType, ModelError};
use std::sync::Arc;

/// Entity lookup and reference resolution
///
/// Implementations should provide O(1) lookup by entity ID and must return
/// entities of one type in ascending ID order, so that checks iterating a
/// type produce findings in a stable order.
///
/// # Example
///
/// ```ignore
/// use ifc_check_model::{EntityResolver, IfcType};
///
/// fn count_spaces(resolver: &dyn EntityResolver) -> usize {
///     resolver.entities_by_type(&IfcType::IfcSpace).len()
/// }
/// ```
pub trait EntityResolver: Send + Sync {
    /// Get entity by ID
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>>;

    /// Resolve an entity reference from an attribute value
    fn resolve_ref(&self, attr: &AttributeValue) -> Option<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::EntityRef(id) => self.get(*id),
            _ => None,
        }
    }

    /// Resolve a list of entity references
    ///
    /// Non-reference items are skipped; a non-list attribute yields nothing.
    fn resolve_ref_list(&self, attr: &AttributeValue) -> Vec<Arc<DecodedEntity>> {
        match attr {
            AttributeValue::List(items) => items
                .iter()
                .filter_map(|item| self.resolve_ref(item))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Get all entities of a specific type, in ID order
    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>>;

    /// Find entities by type name string (case-insensitive)
    fn find_by_type_name(&self, type_name: &str) -> Vec<Arc<DecodedEntity>> {
        self.entities_by_type(&IfcType::parse(type_name))
    }

    /// Count entities of a specific type
    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.entities_by_type(ifc_type).len()
    }

    /// Get all entity IDs in the model
    fn all_ids(&self) -> Vec<EntityId>;

    /// Get total entity count
    fn entity_count(&self) -> usize {
        self.all_ids().len()
    }
}

/// Extension methods for EntityResolver
pub trait EntityResolverExt: EntityResolver {
    /// Check if an entity exists
    fn exists(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Get entity or return error
    fn get_or_err(&self, id: EntityId) -> crate::Result<Arc<DecodedEntity>> {
        self.get(id).ok_or(ModelError::EntityNotFound(id))
    }

    /// Follow the reference stored at `attr_index` of `entity`
    fn follow(
        &self,
        entity: &DecodedEntity,
        attr_index: usize,
    ) -> crate::Result<Arc<DecodedEntity>> {
        entity
            .get(attr_index)
            .and_then(|attr| self.resolve_ref(attr))
            .ok_or(ModelError::InvalidReference {
                entity: entity.id,
                attribute: attr_index,
            })
    }
}

// Blanket implementation for all EntityResolver types
impl<T: EntityResolver + ?Sized> EntityResolverExt for T {}
