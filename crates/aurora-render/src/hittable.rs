use crate::aabb::Aabb;
use crate::material::Material;
use crate::ray::Ray;
use std::sync::Arc;
use utils::{Point3, Vec3A};

/// Everything the integrator needs to know about a surface intersection.
#[derive(Clone)]
pub struct HitRecord {
    pub t: f32,
    pub p: Point3,
    pub normal: Vec3A,
    pub u: f32,
    pub v: f32,
    pub mat: Arc<dyn Material>,
}

pub trait Hittable: Send + Sync {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord>;

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;

    /// Probability density of sampling `direction` from `origin` toward this
    /// shape. Only shapes used for light sampling override the default.
    fn pdf_value(&self, _origin: Point3, _direction: Vec3A) -> f32 {
        0.0
    }

    /// A random direction from `origin` onto this shape.
    fn random(&self, _origin: Point3) -> Vec3A {
        Vec3A::new(1.0, 0.0, 0.0)
    }

    fn is_light_shape(&self) -> bool {
        false
    }
}
