use crate::hittable::HitRecord;
use crate::material::{Material, ScatterRecord};
use crate::ray::Ray;
use crate::texture::Texture;
use std::sync::Arc;
use utils::{Color, Point3};

pub struct Metal {
    albedo: Arc<dyn Texture>,
    fuzz: f32,
}

impl Metal {
    pub fn new(albedo: Arc<dyn Texture>, fuzz: f32) -> Metal {
        Metal {
            albedo,
            fuzz: fuzz.min(1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord) -> Option<ScatterRecord> {
        let reflected = utils::reflect(ray_in.direction().normalize(), hit.normal);
        Some(ScatterRecord::Specular {
            ray: Ray::with_time(
                hit.p,
                reflected + self.fuzz * utils::random_in_unit_sphere(),
                ray_in.time(),
            ),
            attenuation: self.albedo.value(hit.u, hit.v, hit.p),
        })
    }

    fn albedo(&self, u: f32, v: f32, p: Point3) -> Color {
        self.albedo.value(u, v, p)
    }
}
