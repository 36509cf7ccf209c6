use crate::Vec3;

/// A ray in 3D space with origin, direction, and capture time.
///
/// Represents the half-line `origin + t * direction`. The `time` field lies in
/// `[0, 1)` and selects where moving geometry sits when the ray is traced.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Not necessarily normalized.
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    /// Create a ray captured at time 0.
    #[inline]
    pub fn new_simple(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, 0.0)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new_simple(Vec3::ZERO, Vec3::NEG_Z)
    }
}
