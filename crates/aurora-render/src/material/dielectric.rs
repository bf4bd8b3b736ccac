use crate::hittable::HitRecord;
use crate::material::{Material, ScatterRecord};
use crate::ray::Ray;
use utils::{Color, Point3};

/// Clear glass: Schlick-weighted choice between reflection and refraction.
pub struct Dielectric {
    ref_idx: f32,
}

impl Dielectric {
    pub fn new(ref_idx: f32) -> Dielectric {
        Dielectric { ref_idx }
    }

    pub fn refractive_index(&self) -> f32 {
        self.ref_idx
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, hit: &HitRecord) -> Option<ScatterRecord> {
        let reflected = utils::reflect(ray_in.direction(), hit.normal);

        let d_dot_n = ray_in.direction().dot(hit.normal);
        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            (
                -hit.normal,
                self.ref_idx,
                self.ref_idx * d_dot_n / ray_in.direction().length(),
            )
        } else {
            (
                hit.normal,
                1.0 / self.ref_idx,
                -d_dot_n / ray_in.direction().length(),
            )
        };

        let direction = match utils::refract(ray_in.direction(), outward_normal, ni_over_nt) {
            Some(refracted) => {
                if utils::random() < utils::schlick(cosine, self.ref_idx) {
                    reflected
                } else {
                    refracted
                }
            }
            // Total internal reflection.
            None => reflected,
        };

        Some(ScatterRecord::Specular {
            ray: Ray::with_time(hit.p, direction, ray_in.time()),
            attenuation: Color::ONE,
        })
    }

    fn albedo(&self, _u: f32, _v: f32, _p: Point3) -> Color {
        Color::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use utils::Vec3A;

    fn glass_hit(normal: Vec3A) -> (Arc<dyn Material>, HitRecord) {
        let mat: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
        let hit = HitRecord {
            t: 1.0,
            p: Point3::ZERO,
            normal,
            u: 0.0,
            v: 0.0,
            mat: mat.clone(),
        };
        (mat, hit)
    }

    #[test]
    fn attenuation_is_white() {
        utils::seed_thread_rng(13);
        let (mat, hit) = glass_hit(Vec3A::new(0.0, 1.0, 0.0));
        let ray_in = Ray::new(Point3::new(0.0, 1.0, 0.0), Vec3A::new(0.3, -1.0, 0.0));
        match mat.scatter(&ray_in, &hit) {
            Some(ScatterRecord::Specular { attenuation, .. }) => {
                assert_eq!(attenuation, Color::ONE)
            }
            _ => panic!("dielectric must be specular"),
        }
    }

    #[test]
    fn grazing_exit_totally_reflects() {
        utils::seed_thread_rng(13);
        let (mat, hit) = glass_hit(Vec3A::new(0.0, 1.0, 0.0));
        // Leaving the glass (direction along the normal) beyond the critical angle.
        let dir = Vec3A::new(0.99, 0.14, 0.0).normalize();
        let ray_in = Ray::new(Point3::ZERO, dir);
        match mat.scatter(&ray_in, &hit) {
            Some(ScatterRecord::Specular { ray, .. }) => {
                let expected = utils::reflect(dir, hit.normal);
                assert!((ray.direction() - expected).length() < 1e-6);
            }
            _ => panic!("dielectric must be specular"),
        }
    }

    #[test]
    fn scattered_ray_keeps_the_shutter_time() {
        utils::seed_thread_rng(13);
        let (mat, hit) = glass_hit(Vec3A::new(0.0, 1.0, 0.0));
        let ray_in = Ray::with_time(Point3::new(0.0, 1.0, 0.0), Vec3A::new(0.0, -1.0, 0.1), 0.37);
        match mat.scatter(&ray_in, &hit) {
            Some(ScatterRecord::Specular { ray, .. }) => assert_eq!(ray.time(), 0.37),
            _ => panic!("dielectric must be specular"),
        }
    }
}
