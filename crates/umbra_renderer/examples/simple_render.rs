//! Simple path tracer example.
//!
//! Renders three feature spheres over a ground plane and saves a PPM.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

use umbra_renderer::{
    render_parallel, write_ppm, Camera, Color, Dielectric, HittableList, Lambertian, Metal,
    RenderConfig, Sphere, Vec3,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Umbra Path Tracer - Simple Example");
    println!("==================================");

    let world = build_scene();

    let mut camera = Camera::new()
        .with_image(400, 16.0 / 9.0)
        .with_quality(50, 10)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0);
    camera.initialize()?;

    println!(
        "Rendering {}x{} @ {} spp...",
        camera.image_width(),
        camera.image_height(),
        camera.samples_per_pixel()
    );

    let start = std::time::Instant::now();
    let image = render_parallel(&camera, &world, &RenderConfig::default())?;
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    let mut writer = BufWriter::new(File::create(filename)?);
    write_ppm(&image, &mut writer)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> HittableList {
    let mut world = HittableList::new();

    // Ground
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5))),
    )));

    // Three main spheres
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    world
}
