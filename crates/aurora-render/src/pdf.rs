use crate::hittable::Hittable;
use std::f32::consts::PI;
use std::sync::Arc;
use utils::{Onb, Point3, Vec3A};

/// A probability density over directions, paired with a sampler for it.
pub trait Pdf {
    fn value(&self, direction: Vec3A) -> f32;
    fn generate(&self) -> Vec3A;
}

/// Cosine-weighted density about a surface normal. The value never drops
/// below 0.05: near-zero densities in the estimator's denominator produce
/// fireflies, and this floor is load-bearing at low sample counts.
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3A) -> CosinePdf {
        CosinePdf {
            uvw: Onb::build_from_w(w),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3A) -> f32 {
        let cosine = direction.normalize().dot(self.uvw.w());
        if cosine > 0.0 {
            (cosine / PI).max(0.05)
        } else {
            0.05
        }
    }

    fn generate(&self) -> Vec3A {
        self.uvw.local(utils::random_cosine_direction())
    }
}

/// Density of sampling a shape (typically a light) from a fixed origin.
pub struct ShapePdf {
    shape: Arc<dyn Hittable>,
    origin: Point3,
}

impl ShapePdf {
    pub fn new(shape: Arc<dyn Hittable>, origin: Point3) -> ShapePdf {
        ShapePdf { shape, origin }
    }
}

impl Pdf for ShapePdf {
    fn value(&self, direction: Vec3A) -> f32 {
        self.shape.pdf_value(self.origin, direction)
    }

    fn generate(&self) -> Vec3A {
        self.shape.random(self.origin)
    }
}

/// Equal-weight average of two densities; generation flips a fair coin.
pub struct MixturePdf<'a> {
    a: &'a dyn Pdf,
    b: &'a dyn Pdf,
}

impl<'a> MixturePdf<'a> {
    pub fn new(a: &'a dyn Pdf, b: &'a dyn Pdf) -> MixturePdf<'a> {
        MixturePdf { a, b }
    }
}

impl Pdf for MixturePdf<'_> {
    fn value(&self, direction: Vec3A) -> f32 {
        0.5 * self.a.value(direction) + 0.5 * self.b.value(direction)
    }

    fn generate(&self) -> Vec3A {
        if utils::random() < 0.5 {
            self.a.generate()
        } else {
            self.b.generate()
        }
    }
}
