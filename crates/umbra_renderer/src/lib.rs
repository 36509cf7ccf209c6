//! Umbra Renderer - CPU path tracing.
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials, depth of field and motion blur.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use umbra_renderer::{render, Camera, HittableList, Lambertian, RenderConfig, Sphere};
//!
//! let mut world = HittableList::new();
//! world.add(Box::new(Sphere::new(Vec3::ZERO, 1.0, Arc::new(Lambertian::new(Color::splat(0.5))))));
//!
//! let mut camera = Camera::new().with_image(400, 16.0 / 9.0);
//! camera.initialize()?;
//! let image = render(&camera, &world, &RenderConfig::default())?;
//! ```

mod band;
mod camera;
mod error;
mod hittable;
pub mod material;
pub mod output;
mod renderer;
pub mod sampling;
mod sphere;

pub use band::{generate_bands, render_band, render_parallel, Band, BandResult};
pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{color_to_rgb8, save_image, save_png, write_ppm, write_ppm_binary};
pub use renderer::{
    ray_color, render, render_pixel, sky_gradient, Background, ImageBuffer, RenderConfig,
};
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from umbra_math
pub use umbra_math::{Aabb, Color, Interval, Ray, Vec3};
