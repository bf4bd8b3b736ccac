use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::primitives::sphere::sphere_uv;
use crate::ray::Ray;
use std::sync::Arc;
use utils::Point3;

/// A sphere whose center moves linearly across the shutter interval. The
/// center is evaluated at each ray's timestamp, which is what produces
/// motion blur.
pub struct MovingSphere {
    center0: Point3,
    center1: Point3,
    time0: f32,
    time1: f32,
    radius: f32,
    mat: Arc<dyn Material>,
}

impl MovingSphere {
    pub fn new(
        center0: Point3,
        center1: Point3,
        time0: f32,
        time1: f32,
        radius: f32,
        mat: Arc<dyn Material>,
    ) -> MovingSphere {
        MovingSphere {
            center0,
            center1,
            time0,
            time1,
            radius,
            mat,
        }
    }

    pub fn center(&self, time: f32) -> Point3 {
        self.center0
            + ((time - self.time0) / (self.time1 - self.time0)) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let center = self.center(ray.time());
        let oc = ray.origin() - center;
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
        let normal = (p - center) / self.radius;
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
        // Covers the whole sweep, not just the queried sub-interval.
        Some(Aabb::surrounding_box(
            Aabb::for_sphere(self.center0, self.radius),
            Aabb::for_sphere(self.center1, self.radius),
        ))
    }
}
