//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Anti-aliasing, depth of field and motion blur via per-sample jitter
//! - Reproducible output from a single seed

use std::ops::Range;
use std::time::Instant;

use log::{info, trace};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use umbra_math::{Color, Interval, Ray};

use crate::{error::RenderResult, output::color_to_rgb8, Camera, Hittable};

/// Closest distance along a ray at which a hit counts.
///
/// Keeps scattered rays from re-hitting the surface they left.
const T_MIN: f32 = 0.001;

/// What a ray sees when it escapes the scene.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Background {
    /// Vertical white-to-blue gradient
    #[default]
    Sky,
    /// Uniform color
    Solid(Color),
}

impl Background {
    /// Radiance for a ray that missed everything.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Sky => sky_gradient(ray),
            Background::Solid(color) => *color,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Color returned for rays that escape the scene
    pub background: Background,
    /// Seed for the random number generator
    pub seed: u64,
    /// Worker threads for parallel rendering (0 = available parallelism)
    pub workers: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Background::Sky,
            seed: 0,
            workers: 0,
        }
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. `depth` is the number of rays the
/// path may still spend, including this one; at zero the path contributes
/// nothing.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY)) else {
        return background.color(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, background, rng)
        }
        // Ray was absorbed
        None => Color::ZERO,
    }
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling.
///
/// Returns the average of `samples_per_pixel` radiance estimates.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..camera.samples_per_pixel() {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, world, camera.max_depth(), background, rng);
    }

    pixel_color * camera.samples_scale()
}

/// Render a contiguous range of scanlines in row-major order.
pub(crate) fn render_rows(
    camera: &Camera,
    world: &dyn Hittable,
    background: &Background,
    rows: Range<u32>,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    let width = camera.image_width();
    let mut pixels = Vec::with_capacity(rows.len() * width as usize);

    for y in rows {
        trace!("Scanline {} of {}", y + 1, camera.image_height());
        for x in 0..width {
            pixels.push(render_pixel(camera, world, x, y, background, rng));
        }
    }

    pixels
}

/// Simple image buffer for storing render output.
///
/// Pixels hold sample-averaged linear radiance, row-major from the top row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub(crate) fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to gamma-corrected RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb8(*c)).collect()
    }
}

/// Render the entire scene to an image buffer.
///
/// Single-threaded: pixels are visited in row-major order with one generator
/// seeded from `config.seed`, so the output is a pure function of the camera,
/// the world and the seed.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> RenderResult<ImageBuffer> {
    camera.ensure_initialized()?;

    let width = camera.image_width();
    let height = camera.image_height();
    info!(
        "Rendering {}x{} at {} spp, max depth {}",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth()
    );

    let start = Instant::now();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let pixels = render_rows(camera, world, &config.background, 0..height, &mut rng);

    info!("Render finished in {:.2?}", start.elapsed());
    Ok(ImageBuffer::from_pixels(width, height, pixels))
}
