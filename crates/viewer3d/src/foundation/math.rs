//! Math utilities and types
//!
//! Provides the small set of vector types used by materials, geometry and
//! camera framing.

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type (texture repeat and offset)
pub type Vec2 = Vector2<f32>;

/// 3D vector type (positions, rotations, RGB colors)
pub type Vec3 = Vector3<f32>;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Bounds {
    /// Create bounds from a single point
    pub fn from_point(point: Vec3) -> Self {
        Self { min: point, max: point }
    }

    /// Create bounds enclosing all given points, `None` if there are none
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f32; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::from_point(Vec3::from(*first));
        for p in iter {
            bounds.include(Vec3::from(*p));
        }
        Some(bounds)
    }

    /// Grow the bounds to include a point
    pub fn include(&mut self, point: Vec3) {
        self.min = self.min.inf(&point);
        self.max = self.max.sup(&point);
    }

    /// Grow the bounds to include other bounds
    pub fn merge(&mut self, other: &Self) {
        self.include(other.min);
        self.include(other.max);
    }

    /// Center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Math utility functions
pub mod utils {
    /// Halve a texture dimension for the next mip level, never below one
    pub fn next_mip_dimension(value: u32) -> u32 {
        (value >> 1).max(1)
    }

    /// Number of 4x4 blocks needed to cover a dimension
    pub fn block_count(value: u32) -> u32 {
        value.max(1).div_ceil(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_center() {
        let points = [[-1.0, 0.0, 2.0], [3.0, 4.0, -2.0], [0.0, 1.0, 0.0]];
        let bounds = Bounds::from_points(points.iter()).unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 4.0, 2.0));
        assert_eq!(bounds.center(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_bounds_empty() {
        let points: [[f32; 3]; 0] = [];
        assert!(Bounds::from_points(points.iter()).is_none());
    }

    #[test]
    fn test_mip_dimension_floor() {
        assert_eq!(utils::next_mip_dimension(256), 128);
        assert_eq!(utils::next_mip_dimension(5), 2);
        assert_eq!(utils::next_mip_dimension(1), 1);
    }

    #[test]
    fn test_block_count() {
        assert_eq!(utils::block_count(1), 1);
        assert_eq!(utils::block_count(4), 1);
        assert_eq!(utils::block_count(5), 2);
        assert_eq!(utils::block_count(256), 64);
    }
}
