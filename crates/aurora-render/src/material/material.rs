use crate::hittable::HitRecord;
use crate::pdf::Pdf;
use crate::ray::Ray;
use utils::{Color, Point3};

/// How a material redistributes an incident ray.
pub enum ScatterRecord {
    /// A concrete reflected or refracted ray; no density to integrate over.
    Specular { ray: Ray, attenuation: Color },
    /// A sampled density over outgoing directions, plus the classic
    /// hemisphere ray used when importance sampling is disabled.
    Diffuse {
        attenuation: Color,
        pdf: Box<dyn Pdf>,
        classic: Ray,
    },
}

pub trait Material: Send + Sync {
    /// `None` means the ray is absorbed (lights absorb everything).
    fn scatter(&self, _ray_in: &Ray, _hit: &HitRecord) -> Option<ScatterRecord> {
        None
    }

    /// The material's own directional density for an already-sampled
    /// outgoing ray.
    fn scattering_pdf(&self, _ray_in: &Ray, _hit: &HitRecord, _scattered: &Ray) -> f32 {
        1.0
    }

    /// Emitted radiance. Black for everything but lights.
    fn emitted(&self, _ray_in: &Ray, _hit: &HitRecord, _u: f32, _v: f32, _p: Point3) -> Color {
        Color::ZERO
    }

    fn albedo(&self, u: f32, v: f32, p: Point3) -> Color;

    /// Coarse average of the albedo texture over the unit UV square.
    fn average_albedo(&self) -> Color {
        const STEP: f32 = 0.01;
        let p = Point3::ZERO;
        let mut color = Color::ZERO;
        let mut count = 0;
        let mut u = 0.0;
        while u <= 1.0 {
            let mut v = 0.0;
            while v <= 1.0 {
                color += self.albedo(u, v, p);
                count += 1;
                v += STEP;
            }
            u += STEP;
        }
        color / count as f32
    }
}
