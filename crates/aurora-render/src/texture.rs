use crate::perlin::Perlin;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use utils::{Color, Point3};

pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color;
}

#[derive(Debug, Clone, Copy)]
pub struct ConstantTexture {
    color: Color,
}

impl ConstantTexture {
    pub fn new(color: Color) -> ConstantTexture {
        ConstantTexture { color }
    }
}

impl Texture for ConstantTexture {
    fn value(&self, _u: f32, _v: f32, _p: Point3) -> Color {
        self.color
    }
}

/// The sign of a product of sines over world position selects a sub-texture.
pub struct CheckerTexture {
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> CheckerTexture {
        CheckerTexture { odd, even }
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Point3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like bands from turbulence-perturbed sine stripes along Z.
pub struct NoiseTexture {
    perlin: Arc<Perlin>,
    scale: f32,
}

impl NoiseTexture {
    pub fn new(perlin: Arc<Perlin>, scale: f32) -> NoiseTexture {
        NoiseTexture { perlin, scale }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Point3) -> Color {
        Color::ONE * 0.5 * (1.0 + (self.scale * p.z + 10.0 * self.perlin.turb(p, 7)).sin())
    }
}

// Substitute for image files that fail to load.
static WHITE_FALLBACK: Lazy<Arc<ImageTexture>> =
    Lazy::new(|| Arc::new(ImageTexture::from_pixels(&[255, 255, 255, 255], 1, 1)));

/// A bilinear 2-D sampler over tightly packed RGBA pixels. Indices clamp at
/// the borders and `v` runs bottom-up.
pub struct ImageTexture {
    data: Vec<Color>,
    width: usize,
    height: usize,
}

impl ImageTexture {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Arc<ImageTexture> {
        match image::open(path.as_ref()) {
            Ok(img) => {
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                Arc::new(ImageTexture::from_pixels(
                    rgba.as_raw(),
                    width as usize,
                    height as usize,
                ))
            }
            Err(err) => {
                debug!(path = %path.as_ref().display(), %err, "image load failed, using white");
                WHITE_FALLBACK.clone()
            }
        }
    }

    pub fn from_pixels(pixels: &[u8], width: usize, height: usize) -> ImageTexture {
        const REMAP: f32 = 1.0 / 255.0;
        let data = pixels
            .chunks_exact(4)
            .map(|px| Color::new(px[0] as f32, px[1] as f32, px[2] as f32) * REMAP)
            .collect();
        ImageTexture {
            data,
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn texel(&self, i: usize, j: usize) -> Color {
        let i = i.min(self.width - 1);
        let j = j.min(self.height - 1);
        self.data[i + self.width * j]
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Point3) -> Color {
        let x = (u.clamp(0.0, 1.0) * (self.width - 1) as f32).max(0.0);
        let y = ((1.0 - v).clamp(0.0, 1.0) * (self.height - 1) as f32).max(0.0);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let fx = x - x.floor();
        let fy = y - y.floor();

        let top = self.texel(x0, y0) * (1.0 - fx) + self.texel(x0 + 1, y0) * fx;
        let bottom = self.texel(x0, y0 + 1) * (1.0 - fx) + self.texel(x0 + 1, y0 + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}
