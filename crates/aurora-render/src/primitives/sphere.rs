use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::ray::Ray;
use std::f32::consts::PI;
use std::sync::Arc;
use utils::{Onb, Point3, Vec3A};

pub struct Sphere {
    center: Point3,
    radius: f32,
    mat: Arc<dyn Material>,
    light_shape: bool,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32, mat: Arc<dyn Material>) -> Sphere {
        Sphere {
            center,
            radius,
            mat,
            light_shape: false,
        }
    }

    /// A sphere that also participates in explicit light sampling.
    pub fn new_light_shape(center: Point3, radius: f32, mat: Arc<dyn Material>) -> Sphere {
        Sphere {
            center,
            radius,
            mat,
            light_shape: true,
        }
    }
}

/// Latitude/longitude parameterisation of a unit-sphere point.
pub(crate) fn sphere_uv(p: Vec3A) -> (f32, f32) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();
    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + PI / 2.0) / PI;
    (u, v)
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let oc = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = oc.dot(ray.direction());
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let mut t = (-b - sqrt_d) / a;
        if t >= t_max || t <= t_min {
            t = (-b + sqrt_d) / a;
            if t >= t_max || t <= t_min {
                return None;
            }
        }

        let p = ray.at(t);
        // Dividing by the radius normalises, and a negative radius turns the
        // sphere inside out.
        let normal = (p - self.center) / self.radius;
        let (u, v) = sphere_uv(normal);

        Some(HitRecord {
            t,
            p,
            normal,
            u,
            v,
            mat: self.mat.clone(),
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::for_sphere(self.center, self.radius))
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3A) -> f32 {
        if self
            .hit(&Ray::new(origin, direction), 0.001, f32::MAX)
            .is_some()
        {
            let cos_theta_max =
                (1.0 - self.radius * self.radius / (self.center - origin).length_squared()).sqrt();
            let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
            1.0 / solid_angle
        } else {
            0.0
        }
    }

    fn random(&self, origin: Point3) -> Vec3A {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        let uvw = Onb::build_from_w(direction);
        uvw.local(utils::random_to_sphere(self.radius, distance_squared))
    }

    fn is_light_shape(&self) -> bool {
        self.light_shape
    }
}
