//! Band-based parallel rendering.
//!
//! Splits the image into horizontal bands of whole scanlines that are
//! rendered independently on a rayon pool, each with its own generator.

use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use umbra_math::Color;

use crate::{
    error::RenderResult,
    renderer::{render_rows, Background, ImageBuffer, RenderConfig},
    Camera, Hittable,
};

/// Multiplier spreading band indices across the seed space.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A contiguous run of scanlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Position of this band from the top of the image
    pub index: usize,
    /// First scanline of the band
    pub y: u32,
    /// Number of scanlines in the band
    pub height: u32,
}

impl Band {
    pub fn new(index: usize, y: u32, height: u32) -> Self {
        Self { index, y, height }
    }

    /// Seed for this band's generator. Band 0 uses the base seed unchanged.
    pub fn seed(&self, base: u64) -> u64 {
        base ^ (self.index as u64).wrapping_mul(SEED_STRIDE)
    }
}

/// Result of rendering a band.
#[derive(Debug, Clone)]
pub struct BandResult {
    /// The band that was rendered
    pub band: Band,
    /// Pixel colors in row-major order
    pub pixels: Vec<Color>,
}

/// Partition `height` scanlines into at most `count` bands, top to bottom.
///
/// Band heights differ by at most one; earlier bands take the extra rows.
/// Never produces an empty band.
pub fn generate_bands(height: u32, count: usize) -> Vec<Band> {
    let count = count.clamp(1, height.max(1) as usize) as u32;
    let base = height / count;
    let extra = height % count;

    let mut bands = Vec::with_capacity(count as usize);
    let mut y = 0;
    for index in 0..count {
        let rows = base + u32::from(index < extra);
        if rows == 0 {
            break;
        }
        bands.push(Band::new(index as usize, y, rows));
        y += rows;
    }

    bands
}

/// Render a single band with a generator seeded for that band.
pub fn render_band(
    band: &Band,
    camera: &Camera,
    world: &dyn Hittable,
    background: &Background,
    base_seed: u64,
) -> BandResult {
    let mut rng = StdRng::seed_from_u64(band.seed(base_seed));
    let pixels = render_rows(camera, world, background, band.y..band.y + band.height, &mut rng);

    BandResult {
        band: *band,
        pixels,
    }
}

/// Render the scene on a dedicated pool, one band per worker.
///
/// Bands are stitched back in order once all of them are done. The result
/// depends on the seed and the worker count, never on scheduling; with a
/// single worker it matches [`crate::render`] exactly.
pub fn render_parallel(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> RenderResult<ImageBuffer> {
    camera.ensure_initialized()?;

    let width = camera.image_width();
    let height = camera.image_height();

    // A worker count of 0 lets rayon size the pool.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;
    let workers = pool.current_num_threads();
    let bands = generate_bands(height, workers);

    info!(
        "Rendering {}x{} at {} spp, max depth {} on {} workers",
        width,
        height,
        camera.samples_per_pixel(),
        camera.max_depth(),
        workers
    );
    debug!("Split {} scanlines into {} bands", height, bands.len());

    let start = Instant::now();
    let results: Vec<BandResult> = pool.install(|| {
        bands
            .par_iter()
            .map(|band| render_band(band, camera, world, &config.background, config.seed))
            .collect()
    });

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for result in results {
        debug!(
            "Band {} (rows {}..{}) done",
            result.band.index,
            result.band.y,
            result.band.y + result.band.height
        );
        pixels.extend(result.pixels);
    }

    info!("Render finished in {:.2?}", start.elapsed());
    Ok(ImageBuffer::from_pixels(width, height, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::RenderError, render, write_ppm, HittableList, Lambertian, Metal, Sphere};
    use std::sync::Arc;
    use umbra_math::Vec3;

    fn scene() -> (Camera, HittableList) {
        let mut world = HittableList::new();
        world.add(Box::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::new(Color::new(0.7, 0.3, 0.3))),
        )));
        world.add(Box::new(Sphere::new(
            Vec3::new(0.0, -101.0, 0.0),
            100.0,
            Arc::new(Metal::new(Color::splat(0.8), 0.2)),
        )));

        let mut camera = Camera::new()
            .with_image(24, 1.5)
            .with_quality(3, 6)
            .with_position(Vec3::new(0.0, 1.0, 6.0), Vec3::ZERO, Vec3::Y)
            .with_lens(35.0, 0.0, 6.0);
        camera.initialize().unwrap();

        (camera, world)
    }

    fn config(workers: usize) -> RenderConfig {
        RenderConfig {
            seed: 99,
            workers,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn test_bands_cover_every_row_once() {
        for (height, count) in [(16, 4), (17, 4), (3, 8), (1, 1), (100, 7)] {
            let bands = generate_bands(height, count);

            assert!(bands.len() <= count);
            assert!(bands.iter().all(|b| b.height > 0));
            let total: u32 = bands.iter().map(|b| b.height).sum();
            assert_eq!(total, height);

            let mut next = 0;
            for (i, band) in bands.iter().enumerate() {
                assert_eq!(band.index, i);
                assert_eq!(band.y, next);
                next += band.height;
            }
        }
    }

    #[test]
    fn test_bands_are_balanced() {
        let heights: Vec<u32> = generate_bands(10, 4).iter().map(|b| b.height).collect();
        assert_eq!(heights, vec![3, 3, 2, 2]);
    }

    #[test]
    fn test_zero_count_gives_one_band() {
        assert_eq!(generate_bands(5, 0), vec![Band::new(0, 0, 5)]);
    }

    #[test]
    fn test_band_seeds() {
        assert_eq!(Band::new(0, 0, 1).seed(7), 7);
        assert_ne!(Band::new(1, 0, 1).seed(7), Band::new(2, 0, 1).seed(7));
    }

    #[test]
    fn test_single_worker_matches_serial_render() {
        let (camera, world) = scene();

        let serial = render(&camera, &world, &config(1)).unwrap();
        let parallel = render_parallel(&camera, &world, &config(1)).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_parallel_render_is_deterministic() {
        let (camera, world) = scene();

        let first = render_parallel(&camera, &world, &config(4)).unwrap();
        let second = render_parallel(&camera, &world, &config(4)).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.pixels.len(), 24 * 16);
    }

    fn ppm_header(image: &ImageBuffer) -> String {
        let mut out = Vec::new();
        write_ppm(image, &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .take(3)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_parallel_output_shape_matches_serial() {
        let (camera, world) = scene();

        let serial = render(&camera, &world, &config(1)).unwrap();
        let parallel = render_parallel(&camera, &world, &config(4)).unwrap();

        assert_eq!((parallel.width, parallel.height), (serial.width, serial.height));
        assert_eq!(parallel.pixels.len(), serial.pixels.len());
        assert_eq!(ppm_header(&parallel), "P3\n24 16\n255");
        assert_eq!(ppm_header(&parallel), ppm_header(&serial));
    }

    #[test]
    fn test_more_workers_than_rows() {
        let (_, world) = scene();
        let mut camera = Camera::new()
            .with_image(10, 1.0)
            .with_quality(1, 3)
            .with_position(Vec3::new(0.0, 1.0, 6.0), Vec3::ZERO, Vec3::Y)
            .with_lens(35.0, 0.0, 6.0);
        camera.initialize().unwrap();

        let serial = render(&camera, &world, &config(1)).unwrap();
        let parallel = render_parallel(&camera, &world, &config(64)).unwrap();

        assert_eq!((parallel.width, parallel.height), (10, 10));
        assert_eq!(parallel.pixels.len(), 100);
        assert_eq!(ppm_header(&parallel), ppm_header(&serial));
    }

    #[test]
    fn test_zero_workers_uses_default_pool() {
        let (camera, world) = scene();

        let image = render_parallel(&camera, &world, &config(0)).unwrap();
        assert_eq!(image.pixels.len(), 24 * 16);
    }

    #[test]
    fn test_parallel_rejects_uninitialized_camera() {
        let (_, world) = scene();
        let camera = Camera::new();

        let result = render_parallel(&camera, &world, &config(2));
        assert!(matches!(result, Err(RenderError::CameraNotInitialized)));
    }
}
