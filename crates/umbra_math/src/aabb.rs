use crate::{Interval, Ray, Vec3};

/// Minimum thickness of every axis, so flat boxes stay hittable by slab tests.
const MIN_THICKNESS: f32 = 0.0001;

/// Axis-Aligned Bounding Box.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self::new(x, y, z)
    }

    /// Create the tightest AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Uses the slab method.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];

            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Returns true if `other` lies entirely inside this box.
    pub fn encloses(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| {
            let outer = self.axis_interval(axis);
            let inner = other.axis_interval(axis);
            outer.min <= inner.min && inner.max <= outer.max
        })
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.add_scalar(offset.x),
            self.y.add_scalar(offset.y),
            self.z.add_scalar(offset.z),
        )
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_THICKNESS {
            self.x = self.x.expand(MIN_THICKNESS);
        }
        if self.y.size() < MIN_THICKNESS {
            self.y = self.y.expand(MIN_THICKNESS);
        }
        if self.z.size() < MIN_THICKNESS {
            self.z = self.z.expand(MIN_THICKNESS);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
