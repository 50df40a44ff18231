// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D profiles and axis-aligned extents

use nalgebra::{Matrix3, Point2};

/// Axis-aligned 2D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2D {
    pub min: Point2<f64>,
    pub max: Point2<f64>,
}

impl Bounds2D {
    /// Degenerate box around a single point
    pub fn at(point: Point2<f64>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box containing all points, `None` when there are none
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2<f64>>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::at(*points.next()?);
        for point in points {
            bounds.include(point);
        }
        Some(bounds)
    }

    /// Grow the box to contain `point`
    pub fn include(&mut self, point: &Point2<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Extent along X
    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}

/// Closed 2D profile outline
#[derive(Debug, Clone)]
pub struct Profile2D {
    /// Outer boundary, without a repeated closing point
    pub outer: Vec<Point2<f64>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self { outer }
    }

    /// Create a rectangular profile centered at origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        let half_w = width / 2.0;
        let half_h = height / 2.0;

        Self::new(vec![
            Point2::new(-half_w, -half_h),
            Point2::new(half_w, -half_h),
            Point2::new(half_w, half_h),
            Point2::new(-half_w, half_h),
        ])
    }

    /// Copy of the profile with every point mapped through a 2D transform
    pub fn transformed(&self, transform: &Matrix3<f64>) -> Self {
        Self::new(
            self.outer
                .iter()
                .map(|p| transform.transform_point(p))
                .collect(),
        )
    }

    /// Extents of the outline
    pub fn bounds(&self) -> Option<Bounds2D> {
        Bounds2D::from_points(&self.outer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Rotation2, Translation2};

    #[test]
    fn test_rectangle_profile() {
        let profile = Profile2D::rectangle(10.0, 5.0);
        assert_eq!(profile.outer.len(), 4);

        let bounds = profile.bounds().unwrap();
        assert_relative_eq!(bounds.width(), 10.0);
        assert_relative_eq!(bounds.height(), 5.0);
        assert_relative_eq!(bounds.min.x, -5.0);
    }

    #[test]
    fn test_quarter_turn_swaps_extents() {
        let rotation = Rotation2::new(std::f64::consts::FRAC_PI_2).to_homogeneous();
        let shift = Translation2::new(100.0, 0.0).to_homogeneous();
        let profile = Profile2D::rectangle(2400.0, 1200.0).transformed(&(shift * rotation));

        let bounds = profile.bounds().unwrap();
        assert_relative_eq!(bounds.width(), 1200.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.height(), 2400.0, epsilon = 1e-9);
        assert_relative_eq!(bounds.min.x, 100.0 - 600.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_bounds() {
        assert!(Profile2D::new(Vec::new()).bounds().is_none());
    }
}
