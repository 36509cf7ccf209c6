//! Material trait for surface scattering.

use std::sync::Arc;

use rand::RngCore;
use umbra_core::{SolidColor, Texture};
use umbra_math::{Color, Ray, Vec3};

use crate::{
    hittable::HitRecord,
    sampling::{gen_f32, near_zero, random_unit_vector},
};

/// Outcome of a successful scatter event.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Per-channel factor applied to the light carried back along `scattered`
    pub attenuation: Color,
    /// Continuation ray leaving the surface
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed. The scattered ray always starts
    /// at `rec.p` and keeps the capture time of `ray_in`.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    /// Create a Lambertian material whose albedo is looked up in a texture.
    pub fn with_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz can push the ray below the surface; those are absorbed.
        (scattered_dir.dot(rec.normal) > 0.0).then(|| ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scattered_dir, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Index of refraction relative to the enclosing medium
    ior: f32,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn ior(&self) -> f32 {
        self.ior
    }

    /// Schlick's approximation for reflectance.
    ///
    /// An index-matched interface has no boundary to reflect from.
    fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
        if refraction_ratio == 1.0 {
            return 0.0;
        }
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord<'_>,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with unit normal `n`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
