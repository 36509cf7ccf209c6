//! Surface textures for diffuse materials.
//!
//! A texture maps a surface coordinate `(u, v)` and a world-space hit point to
//! a linear RGB color. Textures are immutable once built and shared across
//! render threads.

use std::path::Path;

use thiserror::Error;
use umbra_math::{Color, Interval, Vec3};

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture has no pixels: {0}")]
    Empty(String),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A color lookup over a surface.
pub trait Texture: Send + Sync {
    /// Color at surface coordinates `(u, v)` and hit point `p`.
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// A uniform color, independent of where the surface is hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
        Self::new(Color::new(red, green, blue))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.albedo
    }
}

/// A solid 3D checker pattern alternating between two textures.
///
/// Cells are axis-aligned cubes of side `scale` in world space, so the pattern
/// does not depend on the surface parameterization.
pub struct CheckerTexture {
    inv_scale: f32,
    even: Box<dyn Texture>,
    odd: Box<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f32, even: Box<dyn Texture>, odd: Box<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    /// Checker of two solid colors.
    pub fn from_colors(scale: f32, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Box::new(SolidColor::new(even)),
            Box::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);

        if parity == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Debug color returned when an image texture has no pixel data.
const MISSING_TEXTURE: Color = Color::new(0.0, 1.0, 1.0);

/// A texture backed by a decoded image.
///
/// Pixels are stored in linear RGB, row-major from the top row. `v = 0` maps to
/// the top row, matching the sphere parameterization where `v` grows from the
/// `+Y` pole toward `-Y`.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    pixels: Vec<Color>,
}

impl ImageTexture {
    /// Create a texture from linear pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Load an image file, converting sRGB bytes to linear color.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        if width == 0 || height == 0 {
            return Err(TextureError::Empty(path.display().to_string()));
        }

        let pixels = rgb
            .pixels()
            .map(|p| {
                Color::new(
                    srgb_to_linear(p[0]),
                    srgb_to_linear(p[1]),
                    srgb_to_linear(p[2]),
                )
            })
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(Self::from_pixels(width, height, pixels))
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.width == 0 || self.height == 0 {
            return MISSING_TEXTURE;
        }

        let unit = Interval::new(0.0, 1.0);
        let i = ((unit.clamp(u) * self.width as f32) as u32).min(self.width - 1);
        let j = ((unit.clamp(v) * self.height as f32) as u32).min(self.height - 1);

        self.pixels
            .get((j * self.width + i) as usize)
            .copied()
            .unwrap_or(MISSING_TEXTURE)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
