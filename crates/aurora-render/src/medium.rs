use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::material::{Isotropic, Material};
use crate::ray::Ray;
use crate::texture::Texture;
use std::sync::Arc;
use utils::Vec3A;

/// A homogeneous participating medium filling a boundary shape. Rays scatter
/// inside with exponentially distributed free paths and an isotropic phase
/// function.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    phase_function: Arc<dyn Material>,
    density: f32,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> ConstantMedium {
        ConstantMedium {
            boundary,
            phase_function: Arc::new(Isotropic::new(albedo)),
            density,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        // Two boundary hits bracket the segment the ray spends inside.
        let rec1 = self.boundary.hit(ray, f32::MIN, f32::MAX)?;
        let rec2 = self.boundary.hit(ray, rec1.t + 0.0001, f32::MAX)?;

        let mut t1 = rec1.t.max(t_min);
        let t2 = rec2.t.min(t_max);
        if t1 >= t2 {
            return None;
        }
        if t1 < 0.0 {
            t1 = 0.0;
        }

        let dir_length = ray.direction().length();
        let distance_inside_boundary = (t2 - t1) * dir_length;
        let hit_distance = -(1.0 / self.density) * utils::random().ln();
        if hit_distance >= distance_inside_boundary {
            return None;
        }

        let t = t1 + hit_distance / dir_length;
        Some(HitRecord {
            t,
            p: ray.at(t),
            // Any unit vector serves: the phase function ignores it.
            normal: Vec3A::new(1.0, 0.0, 0.0),
            u: 0.0,
            v: 0.0,
            mat: self.phase_function.clone(),
        })
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}
