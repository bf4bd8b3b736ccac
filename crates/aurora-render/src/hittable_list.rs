use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::ray::Ray;
use std::sync::Arc;
use utils::{Point3, Vec3A};

/// A flat collection of hittables, tested in order with the closest hit kept.
/// Ownership is shared: the same `Arc` may also sit in a light-shape list.
#[derive(Default, Clone)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    pub fn new() -> HittableList {
        Default::default()
    }

    pub fn from_vec(objects: Vec<Arc<dyn Hittable>>) -> HittableList {
        HittableList { objects }
    }

    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut result = None;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, t_min, closest_so_far) {
                closest_so_far = rec.t;
                result = Some(rec);
            }
        }

        result
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        if self.objects.is_empty() {
            return None;
        }

        let mut result: Option<Aabb> = None;
        for object in &self.objects {
            let bb = object.bounding_box(time0, time1)?;
            result = Some(match result {
                Some(acc) => Aabb::surrounding_box(acc, bb),
                None => bb,
            });
        }
        result
    }

    /// Uniform mixture over the children's densities.
    fn pdf_value(&self, origin: Point3, direction: Vec3A) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random(&self, origin: Point3) -> Vec3A {
        if self.objects.is_empty() {
            return Vec3A::new(1.0, 0.0, 0.0);
        }
        let index = utils::random_index(self.objects.len());
        self.objects[index].random(origin)
    }
}
