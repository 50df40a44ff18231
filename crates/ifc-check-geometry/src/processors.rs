// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint processors - point extraction for individual representation items
//!
//! Each processor returns the item's characteristic points in item-local
//! coordinates. The projector applies mapping and object placements afterwards.

use crate::{
    placement::{axis2_placement_2d, axis2_placement_3d, cartesian_point, direction},
    profile::Profile2D,
    GeometryError, Result,
};
use ifc_check_model::{AttributeValue, DecodedEntity, EntityId, EntityResolver, IfcType};
use nalgebra::{Point2, Point3, Vector3};

use super::router::FootprintProcessor;

/// ExtrudedAreaSolid processor
///
/// Handles IfcExtrudedAreaSolid, the usual shape of a modelled space. Emits
/// the profile outline at the base and at the end of the extrusion.
pub struct ExtrudedAreaSolidProcessor;

impl ExtrudedAreaSolidProcessor {
    /// Create new processor
    pub fn new() -> Self {
        Self
    }

    /// Extract a 2D profile, already placed by its own Position
    fn extract_profile(
        &self,
        profile_entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Result<Profile2D> {
        let profile = match profile_entity.ifc_type {
            IfcType::IfcRectangleProfileDef => self.extract_rectangle_profile(profile_entity)?,
            IfcType::IfcArbitraryClosedProfileDef => {
                self.extract_arbitrary_profile(profile_entity, resolver)?
            }
            _ => {
                return Err(GeometryError::unsupported_type(format!(
                    "Profile type {}",
                    profile_entity.ifc_type
                )))
            }
        };

        // IfcParameterizedProfileDef.Position at index 2
        let placed = match profile_entity.ifc_type {
            IfcType::IfcRectangleProfileDef => profile_entity
                .get_ref(2)
                .and_then(|id| axis2_placement_2d(id, resolver))
                .map(|transform| profile.transformed(&transform)),
            _ => None,
        };

        Ok(placed.unwrap_or(profile))
    }

    /// IFCRECTANGLEPROFILEDEF(ProfileType, ProfileName, Position, XDim, YDim)
    fn extract_rectangle_profile(&self, entity: &DecodedEntity) -> Result<Profile2D> {
        let x_dim = entity
            .get_float(3)
            .ok_or_else(|| GeometryError::invalid_attribute(3, "Missing XDim"))?;
        let y_dim = entity
            .get_float(4)
            .ok_or_else(|| GeometryError::invalid_attribute(4, "Missing YDim"))?;

        Ok(Profile2D::rectangle(x_dim, y_dim))
    }

    /// IFCARBITRARYCLOSEDPROFILEDEF(ProfileType, ProfileName, OuterCurve)
    fn extract_arbitrary_profile(
        &self,
        entity: &DecodedEntity,
        resolver: &dyn EntityResolver,
    ) -> Result<Profile2D> {
        let curve_id = entity
            .get_ref(2)
            .ok_or_else(|| GeometryError::invalid_attribute(2, "Missing OuterCurve"))?;

        let points = curve_points(curve_id, resolver)?;
        if points.len() < 3 {
            return Err(GeometryError::profile("Profile must have at least 3 points"));
        }

        Ok(Profile2D::new(points))
    }
}

impl Default for ExtrudedAreaSolidProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FootprintProcessor for ExtrudedAreaSolidProcessor {
    fn points(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Vec<Point3<f64>>> {
        // IfcExtrudedAreaSolid attributes:
        // 0: SweptArea (IfcProfileDef)
        // 1: Position (IfcAxis2Placement3D, optional)
        // 2: ExtrudedDirection (IfcDirection)
        // 3: Depth (IfcPositiveLengthMeasure)

        let profile_id = entity
            .get_ref(0)
            .ok_or_else(|| GeometryError::invalid_attribute(0, "Missing SweptArea"))?;
        let profile_entity = resolver
            .get(profile_id)
            .ok_or_else(|| GeometryError::entity_not_found(profile_id))?;
        let profile = self.extract_profile(&profile_entity, resolver)?;

        let direction = entity
            .get_ref(2)
            .and_then(|id| direction(id, resolver))
            .and_then(|d| d.try_normalize(f64::EPSILON))
            .unwrap_or_else(Vector3::z);
        let depth = entity
            .get_float(3)
            .ok_or_else(|| GeometryError::invalid_attribute(3, "Missing Depth"))?;
        let extrusion = direction * depth;

        let mut points = Vec::with_capacity(profile.outer.len() * 2);
        for p in &profile.outer {
            let base = Point3::new(p.x, p.y, 0.0);
            points.push(base);
            points.push(base + extrusion);
        }

        if let Some(transform) = entity
            .get_ref(1)
            .and_then(|id| axis2_placement_3d(id, resolver))
        {
            for point in points.iter_mut() {
                *point = transform.transform_point(point);
            }
        }

        Ok(points)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcExtrudedAreaSolid]
    }
}

/// FacetedBrep processor
///
/// Handles IfcFacetedBrep by collecting every vertex of every face loop.
pub struct FacetedBrepProcessor;

impl FacetedBrepProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract polygon points from a loop entity
    fn extract_loop_points(
        &self,
        loop_id: EntityId,
        resolver: &dyn EntityResolver,
    ) -> Option<Vec<Point3<f64>>> {
        let loop_entity = resolver.get(loop_id)?;

        if loop_entity.ifc_type != IfcType::IfcPolyLoop {
            return None;
        }

        // IfcPolyLoop has Polygon attribute at index 0
        let points = loop_entity
            .get_refs(0)?
            .into_iter()
            .filter_map(|point_id| cartesian_point(point_id, resolver))
            .collect::<Vec<_>>();

        (points.len() >= 3).then_some(points)
    }
}

impl Default for FacetedBrepProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FootprintProcessor for FacetedBrepProcessor {
    fn points(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Vec<Point3<f64>>> {
        // IfcFacetedBrep attributes:
        // 0: Outer (IfcClosedShell)

        let shell_id = entity
            .get_ref(0)
            .ok_or_else(|| GeometryError::invalid_attribute(0, "Missing Outer shell"))?;

        let shell_entity = resolver
            .get(shell_id)
            .ok_or_else(|| GeometryError::entity_not_found(shell_id))?;

        // IfcClosedShell has CfsFaces at index 0
        let faces = shell_entity
            .get_refs(0)
            .ok_or_else(|| GeometryError::invalid_attribute(0, "Missing CfsFaces"))?;

        let mut points = Vec::new();

        for face in faces.into_iter().filter_map(|id| resolver.get(id)) {
            // IfcFace has Bounds at index 0
            let Some(bounds) = face.get_refs(0) else {
                continue;
            };

            for bound in bounds.into_iter().filter_map(|id| resolver.get(id)) {
                // IfcFaceBound / IfcFaceOuterBound: Bound at index 0, Orientation at index 1
                if let Some(loop_points) = bound
                    .get_ref(0)
                    .and_then(|loop_id| self.extract_loop_points(loop_id, resolver))
                {
                    points.extend(loop_points);
                }
            }
        }

        Ok(points)
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcFacetedBrep]
    }
}

/// Curve processor
///
/// Handles the 2D outlines found in FootPrint representations
/// (IfcPolyline, IfcIndexedPolyCurve) at Z = 0.
pub struct CurveProcessor;

impl CurveProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurveProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FootprintProcessor for CurveProcessor {
    fn points(&self, entity: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Vec<Point3<f64>>> {
        Ok(curve_points(entity.id, resolver)?
            .into_iter()
            .map(|p| Point3::new(p.x, p.y, 0.0))
            .collect())
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcPolyline, IfcType::IfcIndexedPolyCurve]
    }
}

/// Extract points from a bounded 2D curve, dropping a repeated closing point
fn curve_points(curve_id: EntityId, resolver: &dyn EntityResolver) -> Result<Vec<Point2<f64>>> {
    let curve = resolver
        .get(curve_id)
        .ok_or_else(|| GeometryError::entity_not_found(curve_id))?;

    let mut points = match curve.ifc_type {
        IfcType::IfcPolyline => {
            // Points at index 0
            let point_ids = curve
                .get_refs(0)
                .ok_or_else(|| GeometryError::invalid_attribute(0, "Missing Points"))?;

            point_ids
                .into_iter()
                .filter_map(|id| cartesian_point(id, resolver))
                .map(|p| Point2::new(p.x, p.y))
                .collect::<Vec<_>>()
        }
        IfcType::IfcIndexedPolyCurve => indexed_poly_curve_points(&curve, resolver)?,
        _ => {
            return Err(GeometryError::unsupported_type(format!(
                "Curve type {}",
                curve.ifc_type
            )))
        }
    };

    let closed = matches!(points.as_slice(), [first, .., last] if (first - last).norm() < 1e-10);
    if closed {
        points.pop();
    }

    Ok(points)
}

/// IFCINDEXEDPOLYCURVE(Points, Segments, SelfIntersect)
///
/// Every listed point is a vertex. Arc segments also add the points where
/// the arc crosses an axis direction, so the extents of arcs wider than a
/// half circle are exact. Coordinate pairs with a missing component are
/// dropped.
fn indexed_poly_curve_points(curve: &DecodedEntity, resolver: &dyn EntityResolver) -> Result<Vec<Point2<f64>>> {
    let list_id = curve
        .get_ref(0)
        .ok_or_else(|| GeometryError::invalid_attribute(0, "Missing Points"))?;

    let point_list = resolver
        .get(list_id)
        .ok_or_else(|| GeometryError::entity_not_found(list_id))?;

    // IfcCartesianPointList2D.CoordList at index 0
    let coords = point_list
        .get_list(0)
        .ok_or_else(|| GeometryError::invalid_attribute(0, "Missing CoordList"))?;

    // Kept positional so 1-based segment indices stay valid
    let vertices: Vec<Option<Point2<f64>>> = coords
        .iter()
        .map(|coord| {
            let pair = coord.as_list()?;
            let x = pair.first()?.as_float()?;
            let y = pair.get(1)?.as_float()?;
            Some(Point2::new(x, y))
        })
        .collect();

    let dropped = vertices.iter().filter(|v| v.is_none()).count();
    if dropped > 0 {
        log::warn!("{}: dropped {} incomplete coordinate pairs", curve.id, dropped);
    }

    let vertex = |index: usize| index.checked_sub(1).and_then(|i| vertices.get(i).copied().flatten());

    let mut points: Vec<Point2<f64>> = vertices.iter().flatten().copied().collect();
    for indices in curve.get_list(1).unwrap_or_default().iter().filter_map(arc_indices) {
        if let [Some(a), Some(b), Some(c)] = indices.map(vertex) {
            points.extend(arc_extremes(a, b, c));
        }
    }

    Ok(points)
}

/// Indices of an IFCARCINDEX segment, `None` for line segments
fn arc_indices(segment: &AttributeValue) -> Option<[usize; 3]> {
    let AttributeValue::TypedValue(name, args) = segment else {
        return None;
    };
    if !name.eq_ignore_ascii_case("IFCARCINDEX") {
        return None;
    }
    let values = match args.as_slice() {
        [AttributeValue::List(inner)] => inner.as_slice(),
        _ => args.as_slice(),
    };
    let index = |value: &AttributeValue| value.as_float().map(|f| f as usize);
    match values {
        [a, b, c] => Some([index(a)?, index(b)?, index(c)?]),
        _ => None,
    }
}

/// Axis-direction points of the circular arc from `a` through `b` to `c`
fn arc_extremes(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Vec<Point2<f64>> {
    use std::f64::consts::{FRAC_PI_2, TAU};

    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return Vec::new();
    }
    let sq = |p: Point2<f64>| p.x * p.x + p.y * p.y;
    let center = Point2::new(
        (sq(a) * (b.y - c.y) + sq(b) * (c.y - a.y) + sq(c) * (a.y - b.y)) / d,
        (sq(a) * (c.x - b.x) + sq(b) * (a.x - c.x) + sq(c) * (b.x - a.x)) / d,
    );
    let radius = (a - center).norm();
    let angle = |p: Point2<f64>| (p.y - center.y).atan2(p.x - center.x);
    let wrap = |t: f64| t.rem_euclid(TAU);

    let (ta, tb, tc) = (angle(a), angle(b), angle(c));
    let sweep = wrap(tc - ta);
    // Counter-clockwise from a when b lies inside that sweep, else from c
    let (start, span) = if wrap(tb - ta) < sweep {
        (ta, sweep)
    } else {
        (tc, TAU - sweep)
    };

    (0..4)
        .map(|quadrant| quadrant as f64 * FRAC_PI_2)
        .filter(|phi| wrap(phi - start) <= span)
        .map(|phi| Point2::new(center.x + radius * phi.cos(), center.y + radius * phi.sin()))
        .collect()
}
