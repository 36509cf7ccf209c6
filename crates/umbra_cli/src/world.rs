//! Conversion from a scene description to renderable objects.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::debug;
use umbra_core::{
    BackgroundDescription, CameraDescription, CheckerTexture, ImageTexture, MaterialDescription,
    SceneDescription, SolidColor, Texture, TextureDescription,
};
use umbra_math::{Color, Vec3};
use umbra_renderer::{
    Background, Camera, Dielectric, HittableList, Lambertian, Material, Metal, Sphere,
};

/// Everything the renderer needs for one image.
pub struct World {
    pub objects: HittableList,
    pub camera: Camera,
    pub background: Background,
}

/// Build the world for a scene: materials are created once and shared by
/// every sphere that names them, and each image file is decoded once.
pub fn build_world(scene: &SceneDescription) -> Result<World> {
    let mut textures = TextureCache::default();
    let mut materials: HashMap<&str, Arc<dyn Material>> = HashMap::new();

    for (name, description) in &scene.materials {
        let material = build_material(description, &mut textures)
            .with_context(|| format!("failed to build material '{name}'"))?;
        materials.insert(name.as_str(), material);
    }

    let mut objects = HittableList::new();
    for (index, sphere) in scene.spheres.iter().enumerate() {
        let material = materials
            .get(sphere.material.as_str())
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "sphere {index} references unknown material '{}'",
                    sphere.material
                )
            })?;

        let center = Vec3::from_array(sphere.center);
        let primitive = match sphere.center2 {
            Some(center2) => {
                Sphere::moving(center, Vec3::from_array(center2), sphere.radius, material)
            }
            None => Sphere::new(center, sphere.radius, material),
        };
        objects.add(Box::new(primitive));
    }

    debug!(
        "Built world: {} spheres, {} materials, {} image textures",
        objects.len(),
        materials.len(),
        textures.images.len()
    );

    Ok(World {
        objects,
        camera: build_camera(&scene.camera)?,
        background: build_background(&scene.background),
    })
}

/// Configure and initialize a camera from its description.
pub fn build_camera(description: &CameraDescription) -> Result<Camera> {
    let mut camera = Camera::new()
        .with_image(description.image_width, description.aspect_ratio)
        .with_quality(description.samples_per_pixel, description.max_depth)
        .with_position(
            Vec3::from_array(description.lookfrom),
            Vec3::from_array(description.lookat),
            Vec3::from_array(description.vup),
        )
        .with_lens(
            description.vfov,
            description.defocus_angle,
            description.focus_dist,
        );

    camera.initialize().context("invalid camera settings")?;
    Ok(camera)
}

fn build_background(description: &BackgroundDescription) -> Background {
    match description {
        BackgroundDescription::Sky => Background::Sky,
        BackgroundDescription::Solid { color } => Background::Solid(Color::from_array(*color)),
    }
}

fn build_material(
    description: &MaterialDescription,
    textures: &mut TextureCache,
) -> Result<Arc<dyn Material>> {
    let material: Arc<dyn Material> = match description {
        MaterialDescription::Lambertian { texture } => {
            Arc::new(Lambertian::with_texture(textures.get(texture)?))
        }
        MaterialDescription::Metal { albedo, fuzz } => {
            Arc::new(Metal::new(Color::from_array(*albedo), *fuzz))
        }
        MaterialDescription::Dielectric { ior } => Arc::new(Dielectric::new(*ior)),
    };
    Ok(material)
}

/// Decoded image textures keyed by path.
#[derive(Default)]
struct TextureCache {
    images: HashMap<PathBuf, Arc<dyn Texture>>,
}

impl TextureCache {
    fn get(&mut self, description: &TextureDescription) -> Result<Arc<dyn Texture>> {
        let texture: Arc<dyn Texture> = match description {
            TextureDescription::Solid { color } => {
                Arc::new(SolidColor::new(Color::from_array(*color)))
            }
            TextureDescription::Checker { scale, even, odd } => Arc::new(
                CheckerTexture::from_colors(
                    *scale,
                    Color::from_array(*even),
                    Color::from_array(*odd),
                ),
            ),
            TextureDescription::Image { path } => {
                if let Some(texture) = self.images.get(path) {
                    return Ok(Arc::clone(texture));
                }
                let image = ImageTexture::load(path)
                    .with_context(|| format!("failed to load texture {}", path.display()))?;
                let texture: Arc<dyn Texture> = Arc::new(image);
                self.images.insert(path.clone(), Arc::clone(&texture));
                texture
            }
        };
        Ok(texture)
    }
}
