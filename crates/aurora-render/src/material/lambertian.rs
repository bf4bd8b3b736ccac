use crate::hittable::HitRecord;
use crate::material::{Material, ScatterRecord};
use crate::pdf::CosinePdf;
use crate::ray::Ray;
use crate::texture::Texture;
use std::f32::consts::PI;
use std::sync::Arc;
use utils::{Color, Point3};

pub struct Lambertian {
    albedo: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(albedo: Arc<dyn Texture>) -> Lambertian {
        Lambertian { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord) -> Option<ScatterRecord> {
        let target = hit.p + hit.normal + utils::random_in_unit_sphere();
        Some(ScatterRecord::Diffuse {
            attenuation: self.albedo.value(hit.u, hit.v, hit.p),
            pdf: Box::new(CosinePdf::new(hit.normal)),
            classic: Ray::with_time(hit.p, target - hit.p, ray_in.time()),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, hit: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = hit.normal.dot(scattered.direction().normalize());
        if cosine < 0.0 {
            0.0
        } else {
            // Near-zero densities make rogue bright pixels; keep a floor so
            // every bounce contributes something.
            (cosine / PI).max(0.05)
        }
    }

    fn albedo(&self, u: f32, v: f32, p: Point3) -> Color {
        self.albedo.value(u, v, p)
    }
}
