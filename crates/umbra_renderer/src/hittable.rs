//! Hittable trait and HitRecord for ray-object intersection.

use crate::Material;
use umbra_math::{Aabb, Interval, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Produced by a single intersection test and consumed right away by the
/// scattering step; it borrows the material of the primitive that was hit.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting the normal against the ray.
    ///
    /// `outward_normal` must be unit length.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest intersection strictly inside `ray_t`, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// A list of hittable objects, searched linearly.
pub struct HittableList {
    objects: Vec<Box<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        // The aggregate box encloses every member, so missing it means missing all.
        if !self.bbox.hit(ray, ray_t) {
            return None;
        }

        let mut closest = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
