// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint Projector - Dynamic dispatch to footprint processors
//!
//! Routes IFC representation items to processors based on type, expands
//! mapped items, applies the element's object placement and flattens the
//! result to a plan-view footprint in millimetres.

use crate::placement::resolve_placement;
use crate::{Bounds2D, GeometryError, Result};
use ifc_check_model::{DecodedEntity, EntityId, EntityResolver, IfcType};
use nalgebra::{Matrix4, Point2, Point3};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Shape representation identifiers that describe an element's extent
pub const FOOTPRINT_REPRESENTATIONS: &[&str] = &["Body", "Facetation", "FootPrint", "Box"];

/// IfcMappedItem nesting deeper than this is treated as cyclic
const MAX_MAPPING_DEPTH: usize = 16;

/// Footprint processor trait
///
/// Each processor handles one or more types of IFC representation items and
/// returns the item's points in item-local coordinates.
pub trait FootprintProcessor: Send + Sync {
    /// Extract characteristic points of a representation item
    ///
    /// # Arguments
    /// * `entity` - The decoded representation item
    /// * `resolver` - Entity resolver for looking up referenced entities
    fn points(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Vec<Point3<f64>>>;

    /// Get supported IFC types
    fn supported_types(&self) -> Vec<IfcType>;
}

/// Plan-view footprint of an element
#[derive(Debug, Clone)]
pub struct Footprint {
    /// Projected points in millimetres, world XY
    pub points: Vec<Point2<f64>>,
    /// Axis-aligned extents of `points`
    pub bounds: Bounds2D,
}

impl Footprint {
    /// Build from projected points, `None` when there are none
    pub fn from_points(points: Vec<Point2<f64>>) -> Option<Self> {
        let bounds = Bounds2D::from_points(&points)?;
        Some(Self { points, bounds })
    }

    /// Extent along world X in millimetres
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    /// Extent along world Y in millimetres
    pub fn depth(&self) -> f64 {
        self.bounds.height()
    }
}

/// Footprint projector - routes representation items to processors
///
/// Caches the local points of every IfcRepresentationMap it expands, so
/// repeated instances of one type only walk the source geometry once. The
/// cache makes the projector single-threaded; create one per validation run.
pub struct FootprintProjector {
    /// Registered processors by type
    processors: HashMap<IfcType, Arc<dyn FootprintProcessor>>,
    /// Cache for IfcRepresentationMap source points (MappedItem instancing)
    mapped_item_cache: RefCell<FxHashMap<EntityId, Arc<Vec<Point3<f64>>>>>,
    /// Unit scale factor (e.g., 0.001 for millimeters -> meters)
    unit_scale: f64,
}

impl FootprintProjector {
    /// Create new projector without any processors registered
    pub fn new() -> Self {
        Self {
            processors: HashMap::new(),
            mapped_item_cache: RefCell::new(FxHashMap::default()),
            unit_scale: 1.0,
        }
    }

    /// Create projector with default processors registered
    ///
    /// - `ExtrudedAreaSolidProcessor` (IfcExtrudedAreaSolid)
    /// - `FacetedBrepProcessor` (IfcFacetedBrep)
    /// - `CurveProcessor` (IfcPolyline, IfcIndexedPolyCurve)
    pub fn with_default_processors() -> Self {
        use crate::processors::{CurveProcessor, ExtrudedAreaSolidProcessor, FacetedBrepProcessor};

        let mut projector = Self::new();
        projector.register(Arc::new(ExtrudedAreaSolidProcessor::new()));
        projector.register(Arc::new(FacetedBrepProcessor::new()));
        projector.register(Arc::new(CurveProcessor::new()));
        projector
    }

    /// Create projector with default processors and specific unit scale
    pub fn with_default_processors_and_unit_scale(unit_scale: f64) -> Self {
        let mut projector = Self::with_default_processors();
        projector.unit_scale = unit_scale;
        projector
    }

    /// Get the current unit scale factor
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    /// Set the unit scale factor
    pub fn set_unit_scale(&mut self, scale: f64) {
        self.unit_scale = scale;
    }

    /// Register a footprint processor
    pub fn register(&mut self, processor: Arc<dyn FootprintProcessor>) {
        for ifc_type in processor.supported_types() {
            self.processors.insert(ifc_type, Arc::clone(&processor));
        }
    }

    /// Check if a type has a registered processor
    pub fn has_processor(&self, ifc_type: &IfcType) -> bool {
        self.processors.contains_key(ifc_type)
    }

    /// Project an element's shape to a plan-view footprint
    ///
    /// Follows the IFC representation chain:
    /// Element -> ProductDefinitionShape -> ShapeRepresentation -> Items
    pub fn project(&self, element: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Footprint> {
        // Representation at index 6 for products
        let shape = element
            .get_ref(6)
            .and_then(|id| resolver.get(id))
            .ok_or(GeometryError::NoRepresentation(element.id))?;

        // Representations at index 2 in IfcProductDefinitionShape
        let representations = resolver.resolve_ref_list(
            shape
                .get(2)
                .ok_or(GeometryError::NoRepresentation(element.id))?,
        );

        let mut local_points = Vec::new();
        for representation in representations {
            if let Some(identifier) = representation.get_string(1) {
                if !FOOTPRINT_REPRESENTATIONS.contains(&identifier) {
                    continue;
                }
            }
            local_points.extend(self.shape_representation_points(&representation, resolver, 0));
        }

        // ObjectPlacement at index 5
        let placement = element
            .get_ref(5)
            .and_then(|id| resolve_placement(id, resolver))
            .unwrap_or_else(Matrix4::identity);

        let to_mm = self.unit_scale * 1000.0;
        let points: Vec<Point2<f64>> = local_points
            .iter()
            .map(|p| placement.transform_point(p))
            .map(|p| Point2::new(p.x * to_mm, p.y * to_mm))
            .collect();

        Footprint::from_points(points).ok_or(GeometryError::Empty(element.id))
    }

    /// Process a single representation item to item-local points
    pub fn process_representation_item(
        &self,
        item: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Result<Vec<Point3<f64>>> {
        self.item_points(item, resolver, 0)
    }

    fn item_points(
        &self,
        item: &DecodedEntity,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<Vec<Point3<f64>>> {
        if item.ifc_type == IfcType::IfcMappedItem {
            return self.mapped_item_points(item, resolver, depth);
        }

        let processor = self
            .processors
            .get(&item.ifc_type)
            .ok_or_else(|| GeometryError::unsupported_type(item.ifc_type.to_string()))?;

        processor.points(item, resolver)
    }

    /// Points of every item in a shape representation, skipping items that fail
    fn shape_representation_points(
        &self,
        shape_rep: &DecodedEntity,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Vec<Point3<f64>> {
        // Items at index 3 in IfcShapeRepresentation
        let Some(items) = shape_rep.get(3) else {
            return Vec::new();
        };

        let mut points = Vec::new();
        for item in resolver.resolve_ref_list(items) {
            match self.item_points(&item, resolver, depth) {
                Ok(item_points) => points.extend(item_points),
                Err(e) => log::debug!("skipping representation item {}: {}", item.id, e),
            }
        }
        points
    }

    /// IFCMAPPEDITEM(MappingSource, MappingTarget)
    fn mapped_item_points(
        &self,
        mapped_item: &DecodedEntity,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<Vec<Point3<f64>>> {
        if depth >= MAX_MAPPING_DEPTH {
            return Err(GeometryError::unsupported_type("nested IFCMAPPEDITEM too deep"));
        }

        let source_id = mapped_item
            .get_ref(0)
            .ok_or_else(|| GeometryError::invalid_attribute(0, "Missing MappingSource"))?;

        let source = match self.cached_mapped_source(source_id) {
            Some(cached) => cached,
            None => {
                let source_points = Arc::new(self.representation_map_points(source_id, resolver, depth)?);
                self.mapped_item_cache
                    .borrow_mut()
                    .insert(source_id, Arc::clone(&source_points));
                source_points
            }
        };

        // MappingTarget at index 1
        let target = mapped_item
            .get_ref(1)
            .and_then(|id| resolve_placement(id, resolver))
            .unwrap_or_else(Matrix4::identity);

        Ok(source.iter().map(|p| target.transform_point(p)).collect())
    }

    /// IFCREPRESENTATIONMAP(MappingOrigin, MappedRepresentation)
    fn representation_map_points(
        &self,
        map_id: EntityId,
        resolver: &dyn EntityResolver,
        depth: usize,
    ) -> Result<Vec<Point3<f64>>> {
        let map = resolver
            .get(map_id)
            .ok_or_else(|| GeometryError::entity_not_found(map_id))?;

        let representation = map
            .get_ref(1)
            .and_then(|id| resolver.get(id))
            .ok_or_else(|| GeometryError::invalid_attribute(1, "Missing MappedRepresentation"))?;

        let origin = map
            .get_ref(0)
            .and_then(|id| resolve_placement(id, resolver))
            .unwrap_or_else(Matrix4::identity);

        Ok(self
            .shape_representation_points(&representation, resolver, depth + 1)
            .iter()
            .map(|p| origin.transform_point(p))
            .collect())
    }

    fn cached_mapped_source(&self, source_id: EntityId) -> Option<Arc<Vec<Point3<f64>>>> {
        self.mapped_item_cache.borrow().get(&source_id).cloned()
    }

    /// Clear the mapped item cache
    pub fn clear_caches(&self) {
        self.mapped_item_cache.borrow_mut().clear();
    }
}

impl Default for FootprintProjector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ifc_check_model::{AttributeValue, IfcModel, ModelBuilder};

    /// Rectangle extrusion item of `x` by `y`, centred on the item origin
    fn rectangle_solid(builder: &mut ModelBuilder, x: f64, y: f64) -> EntityId {
        let profile = builder.add(
            IfcType::IfcRectangleProfileDef,
            vec![
                AttributeValue::Enum("AREA".into()),
                AttributeValue::Null,
                AttributeValue::Null,
                x.into(),
                y.into(),
            ],
        );
        let up = builder.direction(&[0.0, 0.0, 1.0]);
        builder.add(
            IfcType::IfcExtrudedAreaSolid,
            vec![profile.into(), AttributeValue::Null, up.into(), 2.5f64.into()],
        )
    }

    fn space_with_items(builder: &mut ModelBuilder, placement: Option<EntityId>, items: Vec<EntityId>) -> EntityId {
        let shape = builder.shape("Body", "SweptSolid", items);
        builder.spatial_element(IfcType::IfcSpace, "space", "P", Some("Parking"), placement, Some(shape))
    }

    #[test]
    fn test_projector_with_default_processors() {
        let projector = FootprintProjector::with_default_processors();
        assert_eq!(projector.unit_scale(), 1.0);
        assert!(projector.has_processor(&IfcType::IfcExtrudedAreaSolid));
        assert!(projector.has_processor(&IfcType::IfcFacetedBrep));
        assert!(projector.has_processor(&IfcType::IfcPolyline));
        assert!(!FootprintProjector::new().has_processor(&IfcType::IfcExtrudedAreaSolid));
    }

    #[test]
    fn test_metre_model_projects_to_millimetres() {
        let mut builder = ModelBuilder::new();
        builder.project_with_si_length_unit(None);
        let solid = rectangle_solid(&mut builder, 2.4, 1.2);
        let space = space_with_items(&mut builder, None, vec![solid]);
        let model = builder.build();

        let projector = FootprintProjector::with_default_processors_and_unit_scale(model.unit_scale());
        let footprint = projector.project(&model.get(space).unwrap(), &model).unwrap();
        assert_relative_eq!(footprint.width(), 2400.0, epsilon = 1e-9);
        assert_relative_eq!(footprint.depth(), 1200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotated_offset_placement() {
        let mut builder = ModelBuilder::new();
        builder.project_with_si_length_unit(Some("MILLI"));
        let solid = rectangle_solid(&mut builder, 5000.0, 2500.0);
        let axes = builder.axis2_placement_3d([10000.0, 0.0, 0.0], None, Some([0.0, 1.0, 0.0]));
        let placement = builder.local_placement(None, axes);
        let space = space_with_items(&mut builder, Some(placement), vec![solid]);
        let model = builder.build();

        let projector = FootprintProjector::with_default_processors_and_unit_scale(model.unit_scale());
        let footprint = projector.project(&model.get(space).unwrap(), &model).unwrap();
        assert_relative_eq!(footprint.width(), 2500.0, epsilon = 1e-6);
        assert_relative_eq!(footprint.depth(), 5000.0, epsilon = 1e-6);
        assert_relative_eq!(footprint.bounds.min.x, 10000.0 - 1250.0, epsilon = 1e-6);
    }

    #[test]
    fn test_mapped_item_uses_target_transform() {
        let mut builder = ModelBuilder::new();
        let solid = rectangle_solid(&mut builder, 2400.0, 1200.0);
        let representation = builder.add(
            IfcType::IfcShapeRepresentation,
            vec![
                AttributeValue::Null,
                "Body".into(),
                "SweptSolid".into(),
                AttributeValue::List(vec![solid.into()]),
            ],
        );
        let origin = builder.axis2_placement_3d([0.0, 0.0, 0.0], None, None);
        let map = builder.add(IfcType::IfcRepresentationMap, vec![origin.into(), representation.into()]);
        let target_origin = builder.point(&[500.0, 0.0, 0.0]);
        let target = builder.add(
            IfcType::IfcCartesianTransformationOperator3D,
            vec![AttributeValue::Null, AttributeValue::Null, target_origin.into(), AttributeValue::Null],
        );
        let mapped = builder.add(IfcType::IfcMappedItem, vec![map.into(), target.into()]);
        let first = space_with_items(&mut builder, None, vec![mapped]);
        let second = space_with_items(&mut builder, None, vec![mapped]);
        let model = builder.build();

        let projector = FootprintProjector::with_default_processors_and_unit_scale(0.001);
        for space in [first, second] {
            let footprint = projector.project(&model.get(space).unwrap(), &model).unwrap();
            assert_relative_eq!(footprint.width(), 2400.0, epsilon = 1e-9);
            assert_relative_eq!(footprint.bounds.min.x, 500.0 - 1200.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_axis_representation_is_ignored() {
        let mut builder = ModelBuilder::new();
        let solid = rectangle_solid(&mut builder, 1000.0, 1000.0);
        let shape = builder.shape("Axis", "Curve2D", vec![solid]);
        let space = builder.spatial_element(IfcType::IfcSpace, "s", "S", None, None, Some(shape));
        let model = builder.build();

        let projector = FootprintProjector::with_default_processors_and_unit_scale(0.001);
        let result = projector.project(&model.get(space).unwrap(), &model);
        assert!(matches!(result, Err(GeometryError::Empty(_))));
    }

    #[test]
    fn test_missing_representation() {
        let mut builder = ModelBuilder::new();
        let space = builder.spatial_element(IfcType::IfcSpace, "s", "S", None, None, None);
        let model = builder.build();

        let result = FootprintProjector::with_default_processors().project(&model.get(space).unwrap(), &model);
        assert!(matches!(result, Err(GeometryError::NoRepresentation(id)) if id == space));
    }
}
