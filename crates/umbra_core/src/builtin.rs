//! Built-in demo scenes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use umbra_math::{Color, Vec3};

use crate::scene::{
    CameraDescription, MaterialDescription, SceneDescription, SphereDescription,
    TextureDescription,
};

/// A unit gray sphere at the origin, viewed head-on along -Z.
pub fn single_sphere() -> SceneDescription {
    let mut scene = SceneDescription {
        camera: CameraDescription {
            aspect_ratio: 1.0,
            image_width: 200,
            vfov: 40.0,
            lookfrom: [0.0, 0.0, 5.0],
            lookat: [0.0, 0.0, 0.0],
            focus_dist: 5.0,
            ..Default::default()
        },
        ..Default::default()
    };

    scene.add_material("gray", MaterialDescription::lambertian(Color::splat(0.5)));
    scene.add_sphere(SphereDescription::stationary(Vec3::ZERO, 1.0, "gray"));
    scene
}

/// Two large spheres sharing a checker texture.
pub fn checkered_spheres() -> SceneDescription {
    let mut scene = SceneDescription::default();

    scene.add_material("checker", checker_material());
    scene.add_sphere(SphereDescription::stationary(Vec3::new(0.0, -10.0, 0.0), 10.0, "checker"));
    scene.add_sphere(SphereDescription::stationary(Vec3::new(0.0, 10.0, 0.0), 10.0, "checker"));
    scene
}

/// A field of small random spheres around three large feature spheres.
///
/// Diffuse spheres bounce upward during the shutter interval, which shows up
/// as motion blur. The layout is fully determined by `seed`.
pub fn bouncing_spheres(seed: u64) -> SceneDescription {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = SceneDescription {
        camera: CameraDescription {
            defocus_angle: 0.6,
            ..Default::default()
        },
        ..Default::default()
    };

    scene.add_material("ground", checker_material());
    scene.add_sphere(SphereDescription::stationary(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        "ground",
    ));

    let feature_center = Vec3::new(4.0, 0.2, 0.0);
    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - feature_center).length() <= 0.9 {
                continue;
            }

            let name = format!("sphere_{a}_{b}");
            if choose_mat < 0.8 {
                let albedo = random_color(&mut rng) * random_color(&mut rng);
                let center2 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                scene.add_material(name.clone(), MaterialDescription::lambertian(albedo));
                scene.add_sphere(SphereDescription::moving(center, center2, 0.2, name));
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                let fuzz = rng.gen_range(0.0..0.5);
                scene.add_material(name.clone(), MaterialDescription::metal(albedo, fuzz));
                scene.add_sphere(SphereDescription::stationary(center, 0.2, name));
            } else {
                scene.add_material(name.clone(), MaterialDescription::dielectric(1.5));
                scene.add_sphere(SphereDescription::stationary(center, 0.2, name));
            }
        }
    }

    scene.add_material("glass", MaterialDescription::dielectric(1.5));
    scene.add_sphere(SphereDescription::stationary(Vec3::new(0.0, 1.0, 0.0), 1.0, "glass"));

    scene.add_material(
        "brown",
        MaterialDescription::lambertian(Color::new(0.4, 0.2, 0.1)),
    );
    scene.add_sphere(SphereDescription::stationary(Vec3::new(-4.0, 1.0, 0.0), 1.0, "brown"));

    scene.add_material(
        "bronze",
        MaterialDescription::metal(Color::new(0.7, 0.6, 0.5), 0.0),
    );
    scene.add_sphere(SphereDescription::stationary(Vec3::new(4.0, 1.0, 0.0), 1.0, "bronze"));

    scene
}

fn checker_material() -> MaterialDescription {
    MaterialDescription::Lambertian {
        texture: TextureDescription::Checker {
            scale: 0.32,
            even: [0.2, 0.3, 0.1],
            odd: [0.9, 0.9, 0.9],
        },
    }
}

fn random_color(rng: &mut StdRng) -> Color {
    Color::new(rng.gen(), rng.gen(), rng.gen())
}
