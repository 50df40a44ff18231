// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement resolution
//!
//! Turns IFC placement entities into homogeneous transforms. Every function
//! returns `None` when the entity is missing or of an unexpected type; callers
//! then fall back to identity.

use ifc_check_model::{EntityId, EntityResolver, IfcType};
use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};

/// IfcLocalPlacement chains deeper than this are treated as cyclic
const MAX_PLACEMENT_DEPTH: usize = 64;

/// Resolve an object placement or axis placement to a transform
///
/// IfcLocalPlacement chains are composed through PlacementRelTo, outermost
/// first.
pub fn resolve_placement(placement_id: EntityId, resolver: &dyn EntityResolver) -> Option<Matrix4<f64>> {
    resolve_placement_at_depth(placement_id, resolver, 0)
}

fn resolve_placement_at_depth(
    placement_id: EntityId,
    resolver: &dyn EntityResolver,
    depth: usize,
) -> Option<Matrix4<f64>> {
    if depth > MAX_PLACEMENT_DEPTH {
        log::warn!("placement chain at #{} too deep, ignoring", placement_id.0);
        return None;
    }

    let placement = resolver.get(placement_id)?;

    match placement.ifc_type {
        IfcType::IfcLocalPlacement => {
            // RelativePlacement at index 1
            let relative = placement
                .get_ref(1)
                .and_then(|id| resolve_placement_at_depth(id, resolver, depth + 1))
                .unwrap_or_else(Matrix4::identity);

            // PlacementRelTo at index 0
            match placement.get_ref(0) {
                Some(parent_id) => {
                    let parent = resolve_placement_at_depth(parent_id, resolver, depth + 1)
                        .unwrap_or_else(Matrix4::identity);
                    Some(parent * relative)
                }
                None => Some(relative),
            }
        }
        IfcType::IfcAxis2Placement3D => axis2_placement_3d(placement_id, resolver),
        IfcType::IfcAxis2Placement2D => {
            axis2_placement_2d(placement_id, resolver).map(|m| lift_to_3d(&m))
        }
        IfcType::IfcCartesianTransformationOperator3D => {
            transformation_operator_3d(placement_id, resolver)
        }
        _ => None,
    }
}

/// Resolve an IfcAxis2Placement3D(Location, Axis, RefDirection)
pub fn axis2_placement_3d(placement_id: EntityId, resolver: &dyn EntityResolver) -> Option<Matrix4<f64>> {
    let placement = resolver.get(placement_id)?;

    if placement.ifc_type != IfcType::IfcAxis2Placement3D {
        return None;
    }

    // Location (index 0)
    let location = cartesian_point(placement.get_ref(0)?, resolver)?;

    // Axis (index 1) - Z direction, optional
    let axis = placement
        .get_ref(1)
        .and_then(|id| direction(id, resolver))
        .unwrap_or_else(Vector3::z);

    // RefDirection (index 2) - X direction, optional
    let ref_dir = placement
        .get_ref(2)
        .and_then(|id| direction(id, resolver))
        .unwrap_or_else(Vector3::x);

    Some(basis_matrix(&axis, &ref_dir, &location, 1.0))
}

/// Resolve an IfcAxis2Placement2D(Location, RefDirection)
pub fn axis2_placement_2d(placement_id: EntityId, resolver: &dyn EntityResolver) -> Option<Matrix3<f64>> {
    let placement = resolver.get(placement_id)?;

    if placement.ifc_type != IfcType::IfcAxis2Placement2D {
        return None;
    }

    let location = cartesian_point(placement.get_ref(0)?, resolver)?;
    let x = placement
        .get_ref(1)
        .and_then(|id| direction(id, resolver))
        .map(|d| Vector2::new(d.x, d.y))
        .filter(|d| d.norm() > f64::EPSILON)
        .unwrap_or_else(Vector2::x)
        .normalize();
    let y = Vector2::new(-x.y, x.x);

    Some(Matrix3::new(
        x.x, y.x, location.x, //
        x.y, y.y, location.y, //
        0.0, 0.0, 1.0,
    ))
}

/// Resolve an IfcCartesianTransformationOperator3D(Axis1, Axis2, LocalOrigin, Scale, Axis3)
///
/// Axis2 is ignored; the Y axis is derived from Axis3 × Axis1.
pub fn transformation_operator_3d(op_id: EntityId, resolver: &dyn EntityResolver) -> Option<Matrix4<f64>> {
    let op = resolver.get(op_id)?;

    if op.ifc_type != IfcType::IfcCartesianTransformationOperator3D {
        return None;
    }

    let origin = cartesian_point(op.get_ref(2)?, resolver)?;
    let scale = op.get_float(3).unwrap_or(1.0);
    let x = op
        .get_ref(0)
        .and_then(|id| direction(id, resolver))
        .unwrap_or_else(Vector3::x);
    let z = op
        .get_ref(4)
        .and_then(|id| direction(id, resolver))
        .unwrap_or_else(Vector3::z);

    Some(basis_matrix(&z, &x, &origin, scale))
}

/// Resolve an IfcCartesianPoint, missing coordinates default to 0
pub fn cartesian_point(point_id: EntityId, resolver: &dyn EntityResolver) -> Option<Point3<f64>> {
    let point = resolver.get(point_id)?;

    if point.ifc_type != IfcType::IfcCartesianPoint {
        return None;
    }

    // Coordinates at index 0
    let coords = point.get_list(0)?;

    let x = coords.first().and_then(|v| v.as_float()).unwrap_or(0.0);
    let y = coords.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
    let z = coords.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);

    Some(Point3::new(x, y, z))
}

/// Resolve an IfcCartesianPoint as 2D
pub fn cartesian_point_2d(point_id: EntityId, resolver: &dyn EntityResolver) -> Option<Point2<f64>> {
    cartesian_point(point_id, resolver).map(|p| Point2::new(p.x, p.y))
}

/// Resolve an IfcDirection; a missing Z ratio means a 2D direction
pub fn direction(dir_id: EntityId, resolver: &dyn EntityResolver) -> Option<Vector3<f64>> {
    let direction = resolver.get(dir_id)?;

    if direction.ifc_type != IfcType::IfcDirection {
        return None;
    }

    // DirectionRatios at index 0
    let ratios = direction.get_list(0)?;

    let x = ratios.first().and_then(|v| v.as_float()).unwrap_or(0.0);
    let y = ratios.get(1).and_then(|v| v.as_float()).unwrap_or(0.0);
    let z = ratios.get(2).and_then(|v| v.as_float()).unwrap_or(0.0);

    Some(Vector3::new(x, y, z))
}

/// Orthonormal basis from a Z axis and an approximate X axis
fn basis_matrix(axis: &Vector3<f64>, ref_dir: &Vector3<f64>, origin: &Point3<f64>, scale: f64) -> Matrix4<f64> {
    let z = axis.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
    let mut x = ref_dir.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::x);
    if z.cross(&x).norm() < 1e-9 {
        // RefDirection parallel to Axis, pick any perpendicular
        x = if z.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
    }
    let y = z.cross(&x).normalize();
    let x = y.cross(&z).normalize();

    let (x, y, z) = (x * scale, y * scale, z * scale);
    Matrix4::new(
        x.x, y.x, z.x, origin.x, //
        x.y, y.y, z.y, origin.y, //
        x.z, y.z, z.z, origin.z, //
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Embed a 2D transform in the XY plane
pub fn lift_to_3d(m: &Matrix3<f64>) -> Matrix4<f64> {
    Matrix4::new(
        m[(0, 0)], m[(0, 1)], 0.0, m[(0, 2)], //
        m[(1, 0)], m[(1, 1)], 0.0, m[(1, 2)], //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    )
}
