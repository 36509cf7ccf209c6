//! Camera for ray generation.

use log::debug;
use rand::RngCore;
use umbra_math::{Ray, Vec3};

use crate::{
    error::{RenderError, RenderResult},
    sampling::{gen_f32, random_in_unit_disk, sample_square},
};

/// Camera for generating rays into the scene.
///
/// Configure it with the `with_*` builders, then call [`Camera::initialize`]
/// once to derive the basis and pixel grid. Any builder call clears the
/// derived state, so the camera must be initialized again before rendering.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    image_width: u32,
    aspect_ratio: f32,
    samples_per_pixel: u32,
    max_depth: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Cached computed values (set by initialize())
    initialized: bool,
    image_height: u32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 100,
            aspect_ratio: 1.0,
            samples_per_pixel: 10,
            max_depth: 10,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            initialized: false,
            image_height: 0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
            samples_scale: 0.0,
        }
    }

    /// Set image width and aspect ratio. The height is derived.
    pub fn with_image(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self.initialized = false;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self.initialized = false;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialized = false;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self.initialized = false;
        self
    }

    /// Validate the configuration and derive the basis, pixel grid and
    /// defocus disk. Must be called before generating rays.
    pub fn initialize(&mut self) -> RenderResult<()> {
        self.initialized = false;
        self.validate()?;

        self.image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);
        self.samples_scale = 1.0 / self.samples_per_pixel as f32;
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        debug!(
            "Camera initialized: {}x{}, {} spp, depth {}, vfov {}, defocus radius {:.4}",
            self.image_width,
            self.image_height,
            self.samples_per_pixel,
            self.max_depth,
            self.vfov,
            defocus_radius
        );

        self.initialized = true;
        Ok(())
    }

    fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 {
            return Err(RenderError::invalid_config("image width must be at least 1"));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::invalid_config(
                "samples per pixel must be at least 1",
            ));
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(RenderError::invalid_config(format!(
                "aspect ratio must be positive and finite, got {}",
                self.aspect_ratio
            )));
        }
        let height = self.image_width as f64 / self.aspect_ratio as f64;
        if height >= u32::MAX as f64 {
            return Err(RenderError::invalid_config(format!(
                "image height {height} for width {} and aspect ratio {} is out of range",
                self.image_width, self.aspect_ratio
            )));
        }
        if (self.image_width as usize)
            .checked_mul((self.image_width as f32 / self.aspect_ratio) as usize)
            .is_none()
        {
            return Err(RenderError::invalid_config(format!(
                "{}x{height} pixels do not fit in memory",
                self.image_width
            )));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::invalid_config(format!(
                "vertical field of view must be in (0, 180) degrees, got {}",
                self.vfov
            )));
        }
        if !(self.focus_dist > 0.0) || !self.focus_dist.is_finite() {
            return Err(RenderError::invalid_config(format!(
                "focus distance must be positive, got {}",
                self.focus_dist
            )));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return Err(RenderError::invalid_config(format!(
                "defocus angle must be in [0, 180) degrees, got {}",
                self.defocus_angle
            )));
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return Err(RenderError::invalid_config(
                "lookfrom and lookat must be different points",
            ));
        }
        if self.vup.cross(view.normalize()).length_squared() < 1e-12 {
            return Err(RenderError::invalid_config(
                "vup must not be parallel to the view direction",
            ));
        }

        Ok(())
    }

    /// Reject use of a camera whose derived state is stale.
    pub(crate) fn ensure_initialized(&self) -> RenderResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(RenderError::CameraNotInitialized)
        }
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The target is jittered inside the pixel footprint, the origin is
    /// sampled on the defocus disk when the lens has an aperture, and the
    /// capture time is uniform in [0, 1).
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Derived image height; zero until the camera is initialized.
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    /// Camera center, equal to `look_from` once initialized.
    pub fn center(&self) -> Vec3 {
        self.center
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::tests::{ScriptedRng, HALF, ZERO};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-4;

    fn pinhole(width: u32, aspect: f32) -> Camera {
        Camera::new()
            .with_image(width, aspect)
            .with_position(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y)
            .with_lens(90.0, 0.0, 1.0)
    }

    fn expect_invalid(mut camera: Camera) {
        match camera.initialize() {
            Err(RenderError::InvalidConfig(_)) => {}
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
        assert!(!camera.is_initialized());
    }

    #[test]
    fn test_camera_initialize() {
        let mut camera = pinhole(800, 4.0 / 3.0);
        camera.initialize().unwrap();

        assert!(camera.is_initialized());
        assert_eq!(camera.center(), Vec3::ZERO);
        assert_eq!(camera.image_height(), 600);
        assert!((camera.w - Vec3::Z).length() < EPS);
        assert!((camera.u - Vec3::X).length() < EPS);
        assert!((camera.v - Vec3::Y).length() < EPS);
        assert!((camera.samples_scale() - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = Camera::new()
            .with_image(64, 1.5)
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.6, 10.0);
        camera.initialize().unwrap();

        for axis in [camera.u, camera.v, camera.w] {
            assert!((axis.length() - 1.0).abs() < EPS);
        }
        assert!(camera.u.dot(camera.v).abs() < EPS);
        assert!(camera.v.dot(camera.w).abs() < EPS);
        assert!(camera.w.dot(camera.u).abs() < EPS);
    }

    #[test]
    fn test_image_height_is_floored_with_minimum_one() {
        let mut camera = pinhole(400, 16.0 / 9.0);
        camera.initialize().unwrap();
        assert_eq!(camera.image_height(), 225);

        let mut camera = pinhole(10, 100.0);
        camera.initialize().unwrap();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_invalid_configurations() {
        expect_invalid(pinhole(0, 1.0));
        expect_invalid(pinhole(10, 0.0));
        expect_invalid(pinhole(10, -2.0));
        expect_invalid(pinhole(10, f32::NAN));
        expect_invalid(pinhole(100_000, 1e-30));
        expect_invalid(pinhole(u32::MAX, 0.5));
        expect_invalid(pinhole(10, 1.0).with_quality(0, 10));
        expect_invalid(pinhole(10, 1.0).with_lens(0.0, 0.0, 1.0));
        expect_invalid(pinhole(10, 1.0).with_lens(180.0, 0.0, 1.0));
        expect_invalid(pinhole(10, 1.0).with_lens(90.0, 0.0, 0.0));
        expect_invalid(pinhole(10, 1.0).with_lens(90.0, -1.0, 1.0));
        expect_invalid(pinhole(10, 1.0).with_position(Vec3::ONE, Vec3::ONE, Vec3::Y));
        expect_invalid(pinhole(10, 1.0).with_position(Vec3::ZERO, Vec3::Y, Vec3::Y));
    }

    #[test]
    fn test_builder_clears_initialization() {
        let mut camera = pinhole(10, 1.0);
        camera.initialize().unwrap();
        assert!(camera.ensure_initialized().is_ok());

        let camera = camera.with_quality(4, 4);
        assert!(!camera.is_initialized());
        assert!(matches!(
            camera.ensure_initialized(),
            Err(RenderError::CameraNotInitialized)
        ));
    }

    #[test]
    fn test_unjittered_ray_hits_pixel_center() {
        let mut camera = pinhole(100, 1.0);
        camera.initialize().unwrap();

        // Zero jitter, then the capture time.
        let mut rng = ScriptedRng::new(vec![HALF, HALF, ZERO]);
        let ray = camera.get_ray(0, 0, &mut rng);

        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((ray.direction() - Vec3::new(-0.99, 0.99, -1.0)).length() < EPS);
        assert_eq!(ray.time(), 0.0);
    }

    #[test]
    fn test_camera_ray_direction() {
        let mut camera = pinhole(100, 1.0);
        camera.initialize().unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        assert!(ray.direction().z < 0.0);
        assert!(ray.direction().x.abs() < 0.05);
        assert!(ray.direction().y.abs() < 0.05);
    }

    #[test]
    fn test_ray_time_is_sampled() {
        let mut camera = pinhole(16, 1.0);
        camera.initialize().unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let times: Vec<f32> = (0..64).map(|_| camera.get_ray(8, 8, &mut rng).time()).collect();
        assert!(times.iter().all(|t| (0.0..1.0).contains(t)));
        assert!(times.iter().any(|&t| t != times[0]));
    }

    #[test]
    fn test_defocus_origin_stays_on_disk() {
        let focus_dist = 4.0;
        let defocus_angle = 10.0_f32;
        let mut camera = Camera::new()
            .with_image(32, 1.0)
            .with_position(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, defocus_angle, focus_dist);
        camera.initialize().unwrap();

        let radius = focus_dist * (defocus_angle / 2.0).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(17);
        let mut moved = false;

        for _ in 0..200 {
            let ray = camera.get_ray(16, 16, &mut rng);
            let offset = ray.origin() - camera.center();
            assert!(offset.length() <= radius + EPS);
            assert!(offset.z.abs() < EPS);
            moved |= offset.length() > 0.0;
        }
        assert!(moved);
    }
}
