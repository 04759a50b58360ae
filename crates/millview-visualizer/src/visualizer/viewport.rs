//! Bounding volume tracking

use serde::{Deserialize, Serialize};

use super::toolpath::Point3D;

/// Running min/max accumulator
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min: Point3D,
    pub max: Point3D,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self {
            min: Point3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Fold a point in; points with a non-finite coordinate are skipped
    pub fn update(&mut self, point: Point3D) {
        if !(point.x.is_finite() && point.y.is_finite() && point.z.is_finite()) {
            return;
        }
        self.min.x = self.min.x.min(point.x);
        self.max.x = self.max.x.max(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.y = self.max.y.max(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn is_valid(&self) -> bool {
        self.min.x.is_finite()
            && self.max.x.is_finite()
            && self.min.y.is_finite()
            && self.max.y.is_finite()
            && self.min.z.is_finite()
            && self.max.z.is_finite()
            && self.min.x <= self.max.x
            && self.min.y <= self.max.y
            // a flat program has min_z == max_z
            && self.min.z <= self.max.z
    }

    /// Freeze into a volume; never-updated bounds become the unit cube
    pub fn finalize(self) -> BoundingVolume {
        if !self.is_valid() {
            return BoundingVolume::unit();
        }
        BoundingVolume {
            min: self.min,
            max: self.max,
        }
    }
}

/// Axis-aligned bounding volume of a toolpath
///
/// Always finite with `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingVolume {
    pub min: Point3D,
    pub max: Point3D,
}

impl Default for BoundingVolume {
    fn default() -> Self {
        Self::unit()
    }
}

impl BoundingVolume {
    /// (0,0,0)..(1,1,1), used when a program has no motion
    pub fn unit() -> Self {
        Self {
            min: Point3D::origin(),
            max: Point3D::new(1.0, 1.0, 1.0),
        }
    }

    /// Per-axis size (dx, dy, |dz|)
    pub fn extents(&self) -> (f64, f64, f64) {
        (
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            (self.max.z - self.min.z).abs(),
        )
    }

    pub fn center(&self) -> Point3D {
        self.min.lerp(&self.max, 0.5)
    }

    /// Largest of the three extents
    pub fn max_extent(&self) -> f64 {
        let (dx, dy, dz) = self.extents();
        dx.max(dy).max(dz)
    }

    pub fn volume(&self) -> f64 {
        let (dx, dy, dz) = self.extents();
        dx * dy * dz
    }

    pub fn contains(&self, point: &Point3D) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_bounds_finalize_to_unit() {
        let bounds = Bounds::new();
        assert!(!bounds.is_valid());
        assert_eq!(bounds.finalize(), BoundingVolume::unit());
    }

    #[test]
    fn test_update_and_finalize() {
        let mut bounds = Bounds::new();
        bounds.update(Point3D::new(0.0, 0.0, 0.0));
        bounds.update(Point3D::new(10.0, -5.0, -2.0));
        let volume = bounds.finalize();
        assert_eq!(volume.min, Point3D::new(0.0, -5.0, -2.0));
        assert_eq!(volume.max, Point3D::new(10.0, 0.0, 0.0));
        assert_eq!(volume.extents(), (10.0, 5.0, 2.0));
        assert_eq!(volume.max_extent(), 10.0);
        assert_eq!(volume.volume(), 100.0);
        assert_eq!(volume.center(), Point3D::new(5.0, -2.5, -1.0));
    }

    #[test]
    fn test_single_point_is_valid() {
        let mut bounds = Bounds::new();
        bounds.update(Point3D::new(2.0, 2.0, 2.0));
        assert!(bounds.is_valid());
        assert_eq!(bounds.finalize().max_extent(), 0.0);
    }

    #[test]
    fn test_non_finite_points_are_skipped() {
        let mut bounds = Bounds::new();
        bounds.update(Point3D::new(f64::INFINITY, 0.0, 0.0));
        bounds.update(Point3D::new(1.0, f64::NAN, 0.0));
        assert!(!bounds.is_valid());

        bounds.update(Point3D::new(3.0, -1.0, 0.0));
        let volume = bounds.finalize();
        assert_eq!(volume.min, Point3D::new(3.0, -1.0, 0.0));
        assert_eq!(volume.max, Point3D::new(3.0, -1.0, 0.0));
    }

    #[test]
    fn test_contains() {
        let volume = BoundingVolume::unit();
        assert!(volume.contains(&Point3D::new(0.5, 1.0, 0.0)));
        assert!(!volume.contains(&Point3D::new(1.5, 0.5, 0.5)));
    }
}
