use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::hittable_list::HittableList;
use crate::instance::FlipNormals;
use crate::material::Material;
use crate::primitives::rect::{AxisRect, Plane};
use crate::ray::Ray;
use std::sync::Arc;
use utils::Point3;

/// An axis-aligned box assembled from six rectangles, the far faces wrapped
/// in normal flips so every face points outward.
pub struct Cuboid {
    pmin: Point3,
    pmax: Point3,
    sides: HittableList,
}

impl Cuboid {
    pub fn new(p0: Point3, p1: Point3, mat: Arc<dyn Material>) -> Cuboid {
        let mut sides = HittableList::new();

        sides.add(Arc::new(AxisRect::new(
            Plane::Xy,
            p0.x,
            p1.x,
            p0.y,
            p1.y,
            p1.z,
            mat.clone(),
        )));
        sides.add(Arc::new(FlipNormals::new(Arc::new(AxisRect::new(
            Plane::Xy,
            p0.x,
            p1.x,
            p0.y,
            p1.y,
            p0.z,
            mat.clone(),
        )))));

        sides.add(Arc::new(AxisRect::new(
            Plane::Xz,
            p0.x,
            p1.x,
            p0.z,
            p1.z,
            p1.y,
            mat.clone(),
        )));
        sides.add(Arc::new(FlipNormals::new(Arc::new(AxisRect::new(
            Plane::Xz,
            p0.x,
            p1.x,
            p0.z,
            p1.z,
            p0.y,
            mat.clone(),
        )))));

        sides.add(Arc::new(AxisRect::new(
            Plane::Yz,
            p0.y,
            p1.y,
            p0.z,
            p1.z,
            p1.x,
            mat.clone(),
        )));
        sides.add(Arc::new(FlipNormals::new(Arc::new(AxisRect::new(
            Plane::Yz,
            p0.y,
            p1.y,
            p0.z,
            p1.z,
            p0.x,
            mat,
        )))));

        Cuboid {
            pmin: p0,
            pmax: p1,
            sides,
        }
    }
}

impl Hittable for Cuboid {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        self.sides.hit(ray, t_min, t_max)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(Aabb::new(self.pmin, self.pmax))
    }
}
