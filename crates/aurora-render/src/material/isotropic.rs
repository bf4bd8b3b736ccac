use crate::hittable::HitRecord;
use crate::material::{Material, ScatterRecord};
use crate::ray::Ray;
use crate::texture::Texture;
use std::sync::Arc;
use utils::{Color, Point3};

/// Phase function for participating media: scatters uniformly over the
/// sphere regardless of the incident direction.
pub struct Isotropic {
    albedo: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Arc<dyn Texture>) -> Isotropic {
        Isotropic { albedo }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord) -> Option<ScatterRecord> {
        Some(ScatterRecord::Specular {
            ray: Ray::with_time(hit.p, utils::random_in_unit_sphere(), ray_in.time()),
            attenuation: self.albedo.value(hit.u, hit.v, hit.p),
        })
    }

    fn albedo(&self, u: f32, v: f32, p: Point3) -> Color {
        self.albedo.value(u, v, p)
    }
}
