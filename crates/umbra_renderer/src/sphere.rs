//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use umbra_math::{Aabb, Interval, Ray, Vec3};

/// A sphere primitive, either stationary or moving linearly over the shutter
/// interval.
pub struct Sphere {
    /// Center at time 0
    center: Vec3,
    /// Displacement of the center between time 0 and time 1
    center_vec: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            center_vec: Vec3::ZERO,
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere moving from `center1` at time 0 to `center2` at time 1.
    pub fn moving(center1: Vec3, center2: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);
        let box2 = Aabb::from_points(center2 - rvec, center2 + rvec);

        Self {
            center: center1,
            center_vec: center2 - center1,
            radius,
            material,
            bbox: Aabb::surrounding(&box1, &box2),
        }
    }

    /// Center of the sphere at the given capture time.
    #[inline]
    pub fn center_at(&self, time: f32) -> Vec3 {
        self.center + time * self.center_vec
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Get the UV coordinates for a point on the unit sphere.
    ///
    /// `u` is the angle around the Y axis starting from -X, `v` the angle
    /// down from +Y, both normalized to [0, 1].
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        let theta = p.y.clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        if self.radius <= 0.0 {
            return None;
        }

        let center = self.center_at(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - center) / self.radius;
        let uv = Self::get_sphere_uv(outward_normal);

        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            uv,
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use umbra_math::Color;

    const EPS: f32 = 1e-5;

    fn unit_sphere_at(center: Vec3) -> Sphere {
        Sphere::new(center, 1.0, Arc::new(Lambertian::new(Color::splat(0.5))))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_hit_at_origin_distance_minus_radius() {
        let sphere = unit_sphere_at(Vec3::ZERO);

        for (origin, direction) in [
            (Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z),
            (Vec3::new(-3.0, 0.0, 0.0), Vec3::X),
            (Vec3::new(0.0, 7.0, 0.0), Vec3::new(0.0, -2.0, 0.0)),
        ] {
            let ray = Ray::new_simple(origin, direction);
            let rec = sphere.hit(&ray, forward()).unwrap();
            let travelled = rec.t * direction.length();

            assert!((travelled - (origin.length() - 1.0)).abs() < EPS);
            assert!((rec.p.length() - 1.0).abs() < EPS);
            assert!(rec.front_face);
        }
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere_at(Vec3::new(0.0, 0.0, -1.0));

        // Ray pointing away from sphere
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::Z);
        assert!(sphere.hit(&ray, forward()).is_none());

        // Ray passing beside the sphere
        let ray = Ray::new_simple(Vec3::new(2.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(sphere.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_tangent_ray_yields_single_root() {
        let sphere = unit_sphere_at(Vec3::ZERO);
        let ray = Ray::new_simple(Vec3::new(-5.0, 1.0, 0.0), Vec3::X);

        let rec = sphere.hit(&ray, forward()).unwrap();
        assert!((rec.t - 5.0).abs() < EPS);
        assert!((rec.p - Vec3::Y).length() < EPS);

        // Past the touching point there is nothing left to hit.
        let beyond = Interval::new(rec.t, f32::INFINITY);
        assert!(sphere.hit(&ray, beyond).is_none());
    }

    #[test]
    fn test_root_on_interval_boundary_is_rejected() {
        let sphere = unit_sphere_at(Vec3::ZERO);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        // Near root is exactly 4, far root exactly 6.
        let rec = sphere.hit(&ray, Interval::new(4.0, 10.0)).unwrap();
        assert!((rec.t - 6.0).abs() < EPS);
        assert!(sphere.hit(&ray, Interval::new(4.0, 6.0)).is_none());
    }

    #[test]
    fn test_normal_opposes_ray_from_both_sides() {
        let sphere = unit_sphere_at(Vec3::ZERO);
        let rays = [
            Ray::new_simple(Vec3::new(0.3, -0.2, 4.0), Vec3::new(-0.05, 0.02, -1.0)),
            Ray::new_simple(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)),
            Ray::new_simple(Vec3::new(0.1, 0.1, 0.1), Vec3::NEG_X),
            Ray::new_simple(Vec3::new(-4.0, 0.5, 0.0), Vec3::X),
        ];

        for ray in rays {
            let rec = sphere.hit(&ray, forward()).unwrap();
            assert!(rec.normal.dot(ray.direction()) <= 0.0);
            assert!((rec.normal.length() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_hit_from_inside_is_back_face() {
        let sphere = unit_sphere_at(Vec3::ZERO);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::Y);

        let rec = sphere.hit(&ray, forward()).unwrap();
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::NEG_Y).length() < EPS);
        // UVs come from the outward normal, so the +Y pole maps to v = 0.
        assert!(rec.v.abs() < EPS);
    }

    #[test]
    fn test_sphere_uv() {
        let cases = [
            (Vec3::X, (0.5, 0.5)),
            (Vec3::NEG_X, (0.0, 0.5)),
            (Vec3::Z, (0.25, 0.5)),
            (Vec3::NEG_Z, (0.75, 0.5)),
            (Vec3::Y, (0.5, 0.0)),
            (Vec3::NEG_Y, (0.5, 1.0)),
        ];

        for (p, (u, v)) in cases {
            let (su, sv) = Sphere::get_sphere_uv(p);
            assert!((su - u).abs() < EPS, "u for {p:?}: {su}");
            assert!((sv - v).abs() < EPS, "v for {p:?}: {sv}");
        }
    }

    #[test]
    fn test_negative_radius_is_clamped() {
        let sphere = Sphere::new(Vec3::ZERO, -2.0, Arc::new(Lambertian::new(Color::ONE)));
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        assert_eq!(sphere.radius(), 0.0);
        assert!(sphere.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_zero_direction_is_a_miss() {
        let sphere = unit_sphere_at(Vec3::ZERO);
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);

        assert!(sphere.hit(&ray, forward()).is_none());
    }

    #[test]
    fn test_moving_sphere_follows_time() {
        let sphere = Sphere::moving(
            Vec3::ZERO,
            Vec3::new(3.0, 0.0, 0.0),
            1.0,
            Arc::new(Lambertian::new(Color::ONE)),
        );
        let origin = Vec3::new(1.5, 0.0, 5.0);

        let early = Ray::new(origin, Vec3::NEG_Z, 0.0);
        assert!(sphere.hit(&early, forward()).is_none());

        let middle = Ray::new(origin, Vec3::NEG_Z, 0.5);
        let rec = sphere.hit(&middle, forward()).unwrap();
        assert!((rec.t - 4.0).abs() < EPS);
        assert!((rec.normal - Vec3::Z).length() < EPS);
        assert_eq!(sphere.center_at(0.5), Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn test_moving_sphere_bbox_covers_path() {
        let sphere = Sphere::moving(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            0.5,
            Arc::new(Lambertian::new(Color::ONE)),
        );
        let bbox = sphere.bounding_box();

        assert_eq!(bbox.x, Interval::new(-0.5, 0.5));
        assert_eq!(bbox.y, Interval::new(-0.5, 2.5));
        assert_eq!(bbox.z, Interval::new(-0.5, 0.5));
    }

    #[test]
    fn test_stationary_bbox() {
        let sphere = unit_sphere_at(Vec3::new(1.0, 2.0, 3.0));
        let bbox = sphere.bounding_box();

        assert_eq!(bbox.x, Interval::new(0.0, 2.0));
        assert_eq!(bbox.y, Interval::new(1.0, 3.0));
        assert_eq!(bbox.z, Interval::new(2.0, 4.0));
    }
}
