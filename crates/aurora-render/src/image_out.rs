use crate::buffer::{FrameBuffer, rgba8};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;
use utils::Color;

/// The accumulator normalised to mean radiance per pixel.
pub fn normalized_pixels(buffer: &FrameBuffer, samples_per_pixel: u32) -> Vec<Color> {
    let scale = 1.0 / samples_per_pixel.max(1) as f32;
    buffer
        .hdr_snapshot()
        .into_iter()
        .map(|px| Color::new(px[0], px[1], px[2]) * scale)
        .collect()
}

/// Gamma-encoded 8-bit PNG of the normalised buffer.
pub fn write_png<P: AsRef<Path>>(
    buffer: &FrameBuffer,
    samples_per_pixel: u32,
    path: P,
) -> io::Result<()> {
    let mut bytes = Vec::with_capacity(buffer.num_pixels() * 4);
    for color in normalized_pixels(buffer, samples_per_pixel) {
        bytes.extend_from_slice(&rgba8(color, true));
    }

    let img = image::RgbaImage::from_raw(buffer.width() as u32, buffer.height() as u32, bytes)
        .expect("buffer dimensions match the byte count");
    img.save(path.as_ref())
        .map_err(|err| io::Error::other(err.to_string()))?;
    info!(path = %path.as_ref().display(), "wrote png");
    Ok(())
}

/// Plain-text PPM (`P3`), row-major from the top-left, gamma encoded.
pub fn write_ppm<P: AsRef<Path>>(
    buffer: &FrameBuffer,
    samples_per_pixel: u32,
    path: P,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    writeln!(out, "P3\n{} {}\n255", buffer.width(), buffer.height())?;
    for color in normalized_pixels(buffer, samples_per_pixel) {
        let [r, g, b, _a] = rgba8(color, true);
        writeln!(out, "{} {} {}", r, g, b)?;
    }
    out.flush()?;
    info!(path = %path.as_ref().display(), "wrote ppm");
    Ok(())
}

/// Linear float EXR of the normalised buffer, no gamma.
pub fn write_exr<P: AsRef<Path>>(
    buffer: &FrameBuffer,
    samples_per_pixel: u32,
    path: P,
) -> io::Result<()> {
    let pixels = normalized_pixels(buffer, samples_per_pixel);
    let width = buffer.width();
    exr::prelude::write_rgb_file(path.as_ref(), width, buffer.height(), |x, y| {
        let px = pixels[y * width + x];
        (px.x, px.y, px.z)
    })
    .map_err(|err| io::Error::other(err.to_string()))?;
    info!(path = %path.as_ref().display(), "wrote exr");
    Ok(())
}
