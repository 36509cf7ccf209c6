//! Random sampling helpers.
//!
//! Every helper draws from a caller-supplied generator so that a render is
//! reproducible from its seed and each worker can own an independent stream.

use rand::{Rng, RngCore};
use umbra_math::Vec3;

/// Components below this magnitude count as zero.
const NEAR_ZERO: f32 = 1e-8;

/// Uniform f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Uniform f32 in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Random unit vector, uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling inside the unit ball, then project onto the surface.
    loop {
        let v = Vec3::new(
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
            gen_range(rng, -1.0, 1.0),
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Random point in the unit disk on the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Random point in the unit square [-0.5, 0.5) x [-0.5, 0.5).
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

/// True if every component is close enough to zero to be degenerate.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO
}
