//! Renderer-agnostic scene description.
//!
//! A scene is a camera setup, a table of named materials and a list of
//! spheres referencing them by name. The description is plain data that
//! (de)serializes to JSON; turning it into traceable geometry is the job of
//! the consumer.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use umbra_math::{Color, Vec3};

/// Errors that can occur while loading or validating a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sphere {index} references unknown material '{name}'")]
    UnknownMaterial { index: usize, name: String },

    #[error("Sphere {index} has invalid radius {radius}")]
    InvalidRadius { index: usize, radius: f32 },

    #[error("Material '{name}' is invalid: {reason}")]
    InvalidMaterial { name: String, reason: String },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Camera and sampling settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDescription {
    /// Ratio of image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    pub samples_per_pixel: u32,
    /// Maximum number of rays along one path
    pub max_depth: u32,
    /// Vertical field of view in degrees
    pub vfov: f32,
    pub lookfrom: [f32; 3],
    pub lookat: [f32; 3],
    pub vup: [f32; 3],
    /// Aperture cone angle in degrees; 0 renders a pinhole camera
    pub defocus_angle: f32,
    /// Distance to the plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            vfov: 20.0,
            lookfrom: [13.0, 2.0, 3.0],
            lookat: [0.0, 0.0, 0.0],
            vup: [0.0, 1.0, 0.0],
            defocus_angle: 0.0,
            focus_dist: 10.0,
        }
    }
}

/// What a ray sees when it escapes the scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundDescription {
    /// Vertical white-to-blue gradient
    #[default]
    Sky,
    Solid { color: [f32; 3] },
}

/// Texture attached to a diffuse material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDescription {
    Solid { color: [f32; 3] },
    Checker { scale: f32, even: [f32; 3], odd: [f32; 3] },
    Image { path: PathBuf },
}

/// One of the three scattering models.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    Lambertian { texture: TextureDescription },
    Metal { albedo: [f32; 3], fuzz: f32 },
    Dielectric { ior: f32 },
}

impl MaterialDescription {
    /// Diffuse material with a solid color.
    pub fn lambertian(albedo: Color) -> Self {
        Self::Lambertian {
            texture: TextureDescription::Solid {
                color: albedo.to_array(),
            },
        }
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Self::Metal {
            albedo: albedo.to_array(),
            fuzz,
        }
    }

    pub fn dielectric(ior: f32) -> Self {
        Self::Dielectric { ior }
    }
}

/// A sphere, optionally moving linearly from `center` to `center2` over the
/// shutter interval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center2: Option<[f32; 3]>,
    pub radius: f32,
    /// Name of an entry in the scene's material table
    pub material: String,
}

impl SphereDescription {
    pub fn stationary(center: Vec3, radius: f32, material: impl Into<String>) -> Self {
        Self {
            center: center.to_array(),
            center2: None,
            radius,
            material: material.into(),
        }
    }

    pub fn moving(center1: Vec3, center2: Vec3, radius: f32, material: impl Into<String>) -> Self {
        Self {
            center: center1.to_array(),
            center2: Some(center2.to_array()),
            radius,
            material: material.into(),
        }
    }
}

/// A complete scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDescription,
    #[serde(default)]
    pub background: BackgroundDescription,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    /// Parse and validate a scene from JSON text.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        let scene: SceneDescription = serde_json::from_str(json)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Load and validate a scene from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;

        log::info!(
            "Loaded scene {}: {} materials, {} spheres",
            path.display(),
            scene.materials.len(),
            scene.spheres.len()
        );

        Ok(scene)
    }

    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Register a material under `name`, replacing any previous entry.
    pub fn add_material(&mut self, name: impl Into<String>, material: MaterialDescription) {
        self.materials.insert(name.into(), material);
    }

    pub fn add_sphere(&mut self, sphere: SphereDescription) {
        self.spheres.push(sphere);
    }

    /// Check material references and parameter ranges.
    ///
    /// Camera settings are validated by the renderer when the camera is
    /// initialized.
    pub fn validate(&self) -> SceneResult<()> {
        for (name, material) in &self.materials {
            let invalid = |reason: &str| SceneError::InvalidMaterial {
                name: name.clone(),
                reason: reason.to_string(),
            };

            match material {
                MaterialDescription::Dielectric { ior } if !(*ior > 0.0 && ior.is_finite()) => {
                    return Err(invalid("index of refraction must be positive"));
                }
                MaterialDescription::Metal { fuzz, .. } if fuzz.is_nan() => {
                    return Err(invalid("fuzz must be a number"));
                }
                MaterialDescription::Lambertian {
                    texture: TextureDescription::Checker { scale, .. },
                } if !(*scale > 0.0 && scale.is_finite()) => {
                    return Err(invalid("checker scale must be positive"));
                }
                _ => {}
            }
        }

        for (index, sphere) in self.spheres.iter().enumerate() {
            if !self.materials.contains_key(&sphere.material) {
                return Err(SceneError::UnknownMaterial {
                    index,
                    name: sphere.material.clone(),
                });
            }
            if !(sphere.radius >= 0.0 && sphere.radius.is_finite()) {
                return Err(SceneError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
        }

        Ok(())
    }
}
