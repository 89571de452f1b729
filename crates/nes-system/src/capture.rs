//! Headless capture: PNG screenshots of the render helpers.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use crate::image::Image;
use crate::nes::Nes;

/// Encode an [`Image`] as an RGBA PNG file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_image(image: &Image, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, image.width() as u32, image.height() as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut rgba = Vec::with_capacity(image.width() * image.height() * 4);
    for pixel in image.pixels() {
        rgba.extend_from_slice(&[pixel.r, pixel.g, pixel.b, 0xFF]);
    }
    writer.write_image_data(&rgba)?;
    Ok(())
}

/// Save the current frame as a PNG.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_screenshot(nes: &Nes, path: &Path) -> Result<(), Box<dyn Error>> {
    save_image(&nes.render_frame(), path)
}

/// Run and dump `num_frames` frames as numbered PNGs under `dir/frames`.
///
/// # Errors
///
/// Returns an error if a frame cannot be saved.
pub fn record(nes: &mut Nes, dir: &Path, num_frames: u32) -> Result<(), Box<dyn Error>> {
    let frames_dir = dir.join("frames");
    fs::create_dir_all(&frames_dir)?;

    for i in 1..=num_frames {
        nes.run_until_frame();
        let filename = frames_dir.join(format!("{i:06}.png"));
        save_screenshot(nes, &filename)?;
    }

    eprintln!("Captured {num_frames} frames to {}", frames_dir.display());
    Ok(())
}
