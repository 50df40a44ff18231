// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory model
//!
//! `MemoryModel` implements every model trait over a flat list of decoded
//! entities. Hosts that decode IFC themselves hand their entities to a
//! [`ModelBuilder`]; tests use the builder helpers to assemble small models.

use crate::units::extract_unit_scale;
use crate::{
    schema, AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcModel, IfcType,
    ModelError, ModelMetadata, Property, PropertyReader, PropertySet, Result,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Incrementally assembles a [`MemoryModel`]
///
/// Entity IDs are assigned sequentially starting at #1, in insertion order.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    entities: Vec<DecodedEntity>,
    metadata: ModelMetadata,
    unit_scale: Option<f64>,
}

impl ModelBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set header metadata
    pub fn with_metadata(mut self, metadata: ModelMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Override the unit scale instead of deriving it from the project units
    pub fn with_unit_scale(mut self, unit_scale: f64) -> Self {
        self.unit_scale = Some(unit_scale);
        self
    }

    /// Append an entity and return its ID
    pub fn add(&mut self, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> EntityId {
        let id = EntityId(self.entities.len() as u32 + 1);
        self.entities.push(DecodedEntity {
            id,
            ifc_type,
            attributes,
        });
        id
    }

    /// Append an already decoded entity, keeping its ID
    pub fn insert(&mut self, entity: DecodedEntity) -> Result<()> {
        if self.entities.iter().any(|e| e.id == entity.id) {
            return Err(ModelError::other(format!("duplicate entity {}", entity.id)));
        }
        self.entities.push(entity);
        Ok(())
    }

    /// Overwrite a named attribute of an already added entity
    pub fn set_attribute(
        &mut self,
        id: EntityId,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(ModelError::EntityNotFound(id))?;
        let index = schema::attribute_index(&entity.ifc_type, name)
            .ok_or_else(|| ModelError::missing_attribute(id, name))?;
        if entity.attributes.len() <= index {
            entity.attributes.resize(index + 1, AttributeValue::Null);
        }
        entity.attributes[index] = value.into();
        Ok(())
    }

    /// IFCCARTESIANPOINT((x, y[, z]))
    pub fn point(&mut self, coordinates: &[f64]) -> EntityId {
        self.add(IfcType::IfcCartesianPoint, vec![float_list(coordinates)])
    }

    /// IFCDIRECTION((x, y[, z]))
    pub fn direction(&mut self, ratios: &[f64]) -> EntityId {
        self.add(IfcType::IfcDirection, vec![float_list(ratios)])
    }

    /// IFCAXIS2PLACEMENT3D(Location, Axis, RefDirection)
    pub fn axis2_placement_3d(
        &mut self,
        location: [f64; 3],
        axis: Option<[f64; 3]>,
        ref_direction: Option<[f64; 3]>,
    ) -> EntityId {
        let location = self.point(&location);
        let axis = self.optional_direction(axis.as_ref().map(|a| a.as_slice()));
        let ref_direction = self.optional_direction(ref_direction.as_ref().map(|d| d.as_slice()));
        self.add(
            IfcType::IfcAxis2Placement3D,
            vec![location.into(), axis, ref_direction],
        )
    }

    /// IFCAXIS2PLACEMENT2D(Location, RefDirection)
    pub fn axis2_placement_2d(&mut self, location: [f64; 2], ref_direction: Option<[f64; 2]>) -> EntityId {
        let location = self.point(&location);
        let ref_direction = self.optional_direction(ref_direction.as_ref().map(|d| d.as_slice()));
        self.add(IfcType::IfcAxis2Placement2D, vec![location.into(), ref_direction])
    }

    /// IFCLOCALPLACEMENT(PlacementRelTo, RelativePlacement)
    pub fn local_placement(&mut self, relative_to: Option<EntityId>, relative: EntityId) -> EntityId {
        self.add(
            IfcType::IfcLocalPlacement,
            vec![optional_ref(relative_to), relative.into()],
        )
    }

    /// IFCPROJECT with the given unit entities in its unit assignment
    pub fn project_with_units(&mut self, units: Vec<EntityId>) -> EntityId {
        let assignment = self.add(
            IfcType::IfcUnitAssignment,
            vec![AttributeValue::List(units.into_iter().map(Into::into).collect())],
        );
        let mut attributes = vec![AttributeValue::Null; schema::attribute_count(&IfcType::IfcProject).unwrap_or(9)];
        attributes[0] = AttributeValue::String(format!("project-{}", self.entities.len() + 1));
        attributes[8] = assignment.into();
        self.add(IfcType::IfcProject, attributes)
    }

    /// IFCPROJECT whose length unit is `prefix` + METRE
    pub fn project_with_si_length_unit(&mut self, prefix: Option<&str>) -> EntityId {
        let unit = self.add(
            IfcType::IfcSIUnit,
            vec![
                AttributeValue::Derived,
                AttributeValue::Enum("LENGTHUNIT".into()),
                prefix.map_or(AttributeValue::Null, |p| AttributeValue::Enum(p.to_string())),
                AttributeValue::Enum("METRE".into()),
            ],
        );
        self.project_with_units(vec![unit])
    }

    /// A spatial element (site, building, storey, space) with its inherited
    /// attributes laid out per the schema table
    pub fn spatial_element(
        &mut self,
        ifc_type: IfcType,
        global_id: &str,
        name: &str,
        object_type: Option<&str>,
        placement: Option<EntityId>,
        representation: Option<EntityId>,
    ) -> EntityId {
        let count = schema::attribute_count(&ifc_type).unwrap_or(7);
        let mut attributes = vec![AttributeValue::Null; count];
        attributes[0] = global_id.into();
        attributes[2] = name.into();
        if let Some(object_type) = object_type {
            attributes[4] = object_type.into();
        }
        attributes[5] = optional_ref(placement);
        attributes[6] = optional_ref(representation);
        self.add(ifc_type, attributes)
    }

    /// IFCPRODUCTDEFINITIONSHAPE holding one IFCSHAPEREPRESENTATION of `items`
    pub fn shape(&mut self, identifier: &str, representation_type: &str, items: Vec<EntityId>) -> EntityId {
        let representation = self.add(
            IfcType::IfcShapeRepresentation,
            vec![
                AttributeValue::Null,
                identifier.into(),
                representation_type.into(),
                AttributeValue::List(items.into_iter().map(Into::into).collect()),
            ],
        );
        self.add(
            IfcType::IfcProductDefinitionShape,
            vec![
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::List(vec![representation.into()]),
            ],
        )
    }

    /// Attach a property set to the given objects
    ///
    /// Emits one IFCPROPERTYSINGLEVALUE per property, the IFCPROPERTYSET and
    /// the IFCRELDEFINESBYPROPERTIES relation.
    pub fn property_set(&mut self, related: &[EntityId], pset: &PropertySet) -> EntityId {
        let properties: Vec<AttributeValue> = pset
            .properties
            .iter()
            .map(|property| {
                self.add(
                    IfcType::IfcPropertySingleValue,
                    vec![
                        property.name.as_str().into(),
                        AttributeValue::Null,
                        property.value.clone(),
                        AttributeValue::Null,
                    ],
                )
                .into()
            })
            .collect();
        let pset_id = self.add(
            IfcType::IfcPropertySet,
            vec![
                AttributeValue::String(format!("pset-{}", self.entities.len() + 1)),
                AttributeValue::Null,
                pset.name.as_str().into(),
                AttributeValue::Null,
                AttributeValue::List(properties),
            ],
        );
        self.add(
            IfcType::IfcRelDefinesByProperties,
            vec![
                AttributeValue::String(format!("rel-{}", self.entities.len() + 1)),
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::Null,
                AttributeValue::List(related.iter().copied().map(Into::into).collect()),
                pset_id.into(),
            ],
        );
        pset_id
    }

    /// Index the entities and produce the model
    pub fn build(self) -> MemoryModel {
        let mut entities = FxHashMap::default();
        let mut type_index: FxHashMap<IfcType, Vec<EntityId>> = FxHashMap::default();
        let mut ids = Vec::with_capacity(self.entities.len());

        for entity in self.entities {
            ids.push(entity.id);
            type_index
                .entry(entity.ifc_type.clone())
                .or_default()
                .push(entity.id);
            entities.insert(entity.id, Arc::new(entity));
        }
        ids.sort();
        for list in type_index.values_mut() {
            list.sort();
        }

        let mut model = MemoryModel {
            entities,
            type_index,
            ids,
            pset_index: FxHashMap::default(),
            unit_scale: 1.0,
            metadata: self.metadata,
        };
        model.pset_index = model.index_property_sets();
        model.unit_scale = self
            .unit_scale
            .unwrap_or_else(|| extract_unit_scale(&model));
        model
    }

    fn optional_direction(&mut self, ratios: Option<&[f64]>) -> AttributeValue {
        match ratios {
            Some(ratios) => self.direction(ratios).into(),
            None => AttributeValue::Null,
        }
    }
}

fn float_list(values: &[f64]) -> AttributeValue {
    AttributeValue::List(values.iter().copied().map(AttributeValue::Float).collect())
}

fn optional_ref(id: Option<EntityId>) -> AttributeValue {
    id.map_or(AttributeValue::Null, AttributeValue::EntityRef)
}

/// Read-only model over decoded entities held in memory
#[derive(Debug)]
pub struct MemoryModel {
    entities: FxHashMap<EntityId, Arc<DecodedEntity>>,
    type_index: FxHashMap<IfcType, Vec<EntityId>>,
    ids: Vec<EntityId>,
    /// Cache: entity ID -> property set IDs, in relation order
    pset_index: FxHashMap<EntityId, Vec<EntityId>>,
    unit_scale: f64,
    metadata: ModelMetadata,
}

impl MemoryModel {
    /// Map related objects to their property sets
    fn index_property_sets(&self) -> FxHashMap<EntityId, Vec<EntityId>> {
        let mut index: FxHashMap<EntityId, Vec<EntityId>> = FxHashMap::default();

        for rel in self.entities_by_type(&IfcType::IfcRelDefinesByProperties) {
            // RelatedObjects at index 4, RelatingPropertyDefinition at index 5
            let Some(related) = rel.get_refs(4) else { continue };
            let Some(pset_id) = rel.get_ref(5) else { continue };

            let is_pset = self
                .get(pset_id)
                .is_some_and(|pset| pset.ifc_type == IfcType::IfcPropertySet);
            if !is_pset {
                continue;
            }

            for related_id in related {
                index.entry(related_id).or_default().push(pset_id);
            }
        }

        index
    }

    /// Extract a single property from an IfcPropertySingleValue
    fn extract_property(&self, prop: &DecodedEntity) -> Option<Property> {
        if prop.ifc_type != IfcType::IfcPropertySingleValue {
            return None;
        }
        // Name at index 0, NominalValue at index 2, Unit at index 3
        let name = prop.get_string(0)?.to_string();
        let value = prop.get(2).cloned().unwrap_or_default();
        let unit = prop
            .get_ref(3)
            .and_then(|id| self.get(id))
            .and_then(|unit| unit_label(&unit));
        Some(Property { name, value, unit })
    }

    fn root_string(&self, id: EntityId, name: &str) -> Option<String> {
        self.get(id)?
            .attribute(name)
            .and_then(|v| v.as_string())
            .map(str::to_string)
    }
}

/// Short label for an IFCSIUNIT, e.g. "mm" or "m²"
fn unit_label(unit: &DecodedEntity) -> Option<String> {
    if unit.ifc_type != IfcType::IfcSIUnit {
        return None;
    }
    let prefix = match unit.get_enum(2) {
        Some("MILLI") => "m",
        Some("CENTI") => "c",
        Some("KILO") => "k",
        _ => "",
    };
    let name = match unit.get_enum(3)? {
        "METRE" => "m",
        "SQUARE_METRE" => "m²",
        "CUBIC_METRE" => "m³",
        other => other,
    };
    Some(format!("{}{}", prefix, name))
}

impl EntityResolver for MemoryModel {
    fn get(&self, id: EntityId) -> Option<Arc<DecodedEntity>> {
        self.entities.get(&id).cloned()
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<DecodedEntity>> {
        self.type_index
            .get(ifc_type)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    fn count_by_type(&self, ifc_type: &IfcType) -> usize {
        self.type_index.get(ifc_type).map_or(0, Vec::len)
    }

    fn all_ids(&self) -> Vec<EntityId> {
        self.ids.clone()
    }

    fn entity_count(&self) -> usize {
        self.ids.len()
    }
}

impl PropertyReader for MemoryModel {
    fn property_sets(&self, id: EntityId) -> Vec<PropertySet> {
        let Some(pset_ids) = self.pset_index.get(&id) else {
            return Vec::new();
        };

        pset_ids
            .iter()
            .filter_map(|pset_id| self.get(*pset_id))
            .map(|pset| {
                // Name at index 2, HasProperties at index 4
                let name = pset.get_string(2).unwrap_or("Unknown").to_string();
                let properties = pset
                    .get(4)
                    .map(|list| self.resolve_ref_list(list))
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|prop| self.extract_property(prop))
                    .collect();
                PropertySet { name, properties }
            })
            .collect()
    }

    fn global_id(&self, id: EntityId) -> Option<String> {
        // GlobalId is index 0 for every rooted entity
        self.get(id)?.get_string(0).map(str::to_string)
    }

    fn name(&self, id: EntityId) -> Option<String> {
        self.root_string(id, "Name")
    }

    fn object_type(&self, id: EntityId) -> Option<String> {
        self.root_string(id, "ObjectType")
    }
}

impl IfcModel for MemoryModel {
    fn resolver(&self) -> &dyn EntityResolver {
        self
    }

    fn properties(&self) -> &dyn PropertyReader {
        self
    }

    fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parking_model() -> (MemoryModel, EntityId) {
        let mut builder = ModelBuilder::new();
        let space = builder.spatial_element(
            IfcType::IfcSpace,
            "2O2Fr$t4X7Zf8NOew3FLOH",
            "P-01",
            Some("Parking"),
            None,
            None,
        );
        builder.property_set(
            &[space],
            &PropertySet::new("Pset_SpaceParking").with(Property::new(
                "HandicapAccessible",
                AttributeValue::TypedValue("IFCBOOLEAN".into(), vec![AttributeValue::Enum("T".into())]),
            )),
        );
        (builder.build(), space)
    }

    #[test]
    fn test_entities_by_type_in_id_order() {
        let mut builder = ModelBuilder::new();
        let a = builder.spatial_element(IfcType::IfcSite, "a", "A", None, None, None);
        builder.spatial_element(IfcType::IfcBuilding, "b", "B", None, None, None);
        let c = builder.spatial_element(IfcType::IfcSite, "c", "C", None, None, None);
        let model = builder.build();

        let sites: Vec<EntityId> = model
            .entities_by_type(&IfcType::IfcSite)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(sites, vec![a, c]);
        assert_eq!(model.find_by_type_name("ifcsite").len(), 2);
        assert_eq!(model.count_by_type(&IfcType::IfcSpace), 0);
        assert_eq!(model.entity_count(), 3);
    }

    #[test]
    fn test_property_sets_are_indexed() {
        let (model, space) = parking_model();

        let pset = model.property_set(space, "Pset_SpaceParking").unwrap();
        let accessible = pset.get("HandicapAccessible").unwrap();
        assert_eq!(accessible.value.as_bool(), Some(true));
        assert!(model.property_set(space, "Pset_SpaceCommon").is_none());
        assert_eq!(model.object_type(space).as_deref(), Some("Parking"));
        assert_eq!(model.global_id(space).as_deref(), Some("2O2Fr$t4X7Zf8NOew3FLOH"));
        assert_eq!(model.name(space).as_deref(), Some("P-01"));
    }

    #[test]
    fn test_set_attribute_by_name() {
        let mut builder = ModelBuilder::new();
        let site = builder.spatial_element(IfcType::IfcSite, "s", "Site", None, None, None);
        builder
            .set_attribute(site, "RefLatitude", AttributeValue::List(vec![52i64.into(), 5i64.into()]))
            .unwrap();
        assert!(builder.set_attribute(site, "Elevation", 1.0f64).is_err());
        assert!(builder.set_attribute(EntityId(99), "Name", "x").is_err());

        let model = builder.build();
        let site = model.get(site).unwrap();
        assert!(site.is_set("RefLatitude"));
        assert!(!site.is_set("RefLongitude"));
    }

    #[test]
    fn test_insert_rejects_duplicate_ids() {
        let mut builder = ModelBuilder::new();
        let id = builder.point(&[0.0, 0.0]);
        let duplicate = DecodedEntity {
            id,
            ifc_type: IfcType::IfcDirection,
            attributes: Vec::new(),
        };
        assert!(builder.insert(duplicate).is_err());
    }
}
