use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::ray::Ray;
use std::sync::{Arc, Once};
use tracing::warn;
use utils::Point3;

/// A node of the bounding volume hierarchy. Built by median split along an
/// axis chosen uniformly at random; the randomness rides on the seeded
/// thread RNG, so a seeded build is reproducible.
pub struct BvhNode {
    left: Arc<dyn Hittable>,
    right: Arc<dyn Hittable>,
    bbox: Aabb,
}

impl BvhNode {
    pub fn build(
        mut objects: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
    ) -> Arc<BvhNode> {
        assert!(!objects.is_empty(), "cannot build a BVH over nothing");

        let comparator = match utils::random_index(3) {
            0 => Aabb::compare_x,
            1 => Aabb::compare_y,
            _ => Aabb::compare_z,
        };
        objects.sort_by(|a, b| {
            comparator(
                &bounding_box_or_degenerate(a.as_ref(), time0, time1),
                &bounding_box_or_degenerate(b.as_ref(), time0, time1),
            )
        });

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            // A lone leaf is aliased into both children; shared ownership
            // makes the duplication harmless.
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            n => {
                let right_half = objects.split_off(n / 2);
                let left: Arc<dyn Hittable> = BvhNode::build(objects, time0, time1);
                let right: Arc<dyn Hittable> = BvhNode::build(right_half, time0, time1);
                (left, right)
            }
        };

        let bbox = Aabb::surrounding_box(
            bounding_box_or_degenerate(left.as_ref(), time0, time1),
            bounding_box_or_degenerate(right.as_ref(), time0, time1),
        );

        Arc::new(BvhNode { left, right, bbox })
    }
}

/// Unbounded children (legitimately possible for constant-medium interiors)
/// are warned about once and folded in as a degenerate box.
fn bounding_box_or_degenerate(object: &dyn Hittable, time0: f32, time1: f32) -> Aabb {
    object.bounding_box(time0, time1).unwrap_or_else(|| {
        static WARNED: Once = Once::new();
        WARNED.call_once(|| warn!("hittable without a bounding box in BVH build"));
        Aabb::new(Point3::ZERO, Point3::ZERO)
    })
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        if !self.bbox.hit(ray, t_min, t_max) {
            return None;
        }

        // Both subtrees get the full interval. The second may sit entirely
        // in front of the first, so t_max must not shrink between descents.
        let left_hit = self.left.hit(ray, t_min, t_max);
        let right_hit = self.right.hit(ray, t_min, t_max);

        match (left_hit, right_hit) {
            (Some(l), Some(r)) => Some(if l.t < r.t { l } else { r }),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable_list::HittableList;
    use crate::material::Lambertian;
    use crate::primitives::Sphere;
    use crate::texture::ConstantTexture;
    use utils::{Color, Vec3A};

    fn random_sphere_cloud(count: usize) -> Vec<Arc<dyn Hittable>> {
        let mat = Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(Color::ONE))));
        (0..count)
            .map(|_| {
                let center = Point3::new(
                    utils::random_range(-10.0, 10.0),
                    utils::random_range(-10.0, 10.0),
                    utils::random_range(-10.0, 10.0),
                );
                Arc::new(Sphere::new(center, 0.5, mat.clone())) as Arc<dyn Hittable>
            })
            .collect()
    }

    #[test]
    fn node_box_is_the_union_of_its_children() {
        utils::seed_thread_rng(21);
        let objects = random_sphere_cloud(32);
        let node = BvhNode::build(objects, 0.0, 1.0);
        let left = node.left.bounding_box(0.0, 1.0).unwrap();
        let right = node.right.bounding_box(0.0, 1.0).unwrap();
        let union = Aabb::surrounding_box(left, right);
        assert_eq!(node.bbox.minimum, union.minimum);
        assert_eq!(node.bbox.maximum, union.maximum);
    }

    #[test]
    fn agrees_with_the_linear_list() {
        utils::seed_thread_rng(22);
        let objects = random_sphere_cloud(64);
        let list = HittableList::from_vec(objects.clone());
        let bvh = BvhNode::build(objects, 0.0, 1.0);

        for _ in 0..256 {
            let origin = Point3::new(
                utils::random_range(-20.0, 20.0),
                utils::random_range(-20.0, 20.0),
                -30.0,
            );
            let dir = Vec3A::new(
                utils::random_range(-0.3, 0.3),
                utils::random_range(-0.3, 0.3),
                1.0,
            );
            let ray = Ray::new(origin, dir);
            let from_list = list.hit(&ray, 0.001, f32::MAX);
            let from_bvh = bvh.hit(&ray, 0.001, f32::MAX);
            match (from_list, from_bvh) {
                (Some(a), Some(b)) => assert!((a.t - b.t).abs() < 1e-4),
                (None, None) => {}
                _ => panic!("BVH and list disagree on a hit"),
            }
        }
    }

    #[test]
    fn single_object_tree_still_hits() {
        utils::seed_thread_rng(23);
        let mat = Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(Color::ONE))));
        let sphere: Arc<dyn Hittable> = Arc::new(Sphere::new(Point3::ZERO, 1.0, mat));
        let bvh = BvhNode::build(vec![sphere], 0.0, 1.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vec3A::new(0.0, 0.0, 1.0));
        let rec = bvh.hit(&ray, 0.001, f32::MAX).expect("must hit the leaf");
        assert!((rec.t - 4.0).abs() < 1e-4);
    }
}
