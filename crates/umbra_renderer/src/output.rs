//! Pixel quantization and image file output.
//!
//! Supports plain (P3) and binary (P6) PPM written to any `Write`, and PNG
//! through the `image` crate.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use umbra_math::{Color, Interval};

use crate::{
    error::{RenderError, RenderResult},
    renderer::ImageBuffer,
};

/// Displayable intensity range before quantization.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a sample-averaged linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Write the image as plain-text PPM (P3), one pixel per line.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: &mut W) -> RenderResult<()> {
    write!(writer, "P3\n{} {}\n255\n", image.width, image.height)?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    Ok(())
}

/// Write the image as binary PPM (P6).
pub fn write_ppm_binary<W: Write>(image: &ImageBuffer, writer: &mut W) -> RenderResult<()> {
    write!(writer, "P6\n{} {}\n255\n", image.width, image.height)?;
    writer.write_all(&image.to_rgb8())?;
    Ok(())
}

/// Save the image as PNG.
pub fn save_png(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    image::save_buffer(
        path.as_ref(),
        &image.to_rgb8(),
        image.width,
        image.height,
        image::ColorType::Rgb8,
    )?;
    Ok(())
}

/// Save the image, choosing the format from the file extension
/// (`ppm` for plain PPM, `png`).
pub fn save_image(image: &ImageBuffer, path: impl AsRef<Path>) -> RenderResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(image, &mut writer)?;
            writer.flush()?;
        }
        "png" => save_png(image, path)?,
        other => return Err(RenderError::UnsupportedFormat(other.to_string())),
    }

    info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
