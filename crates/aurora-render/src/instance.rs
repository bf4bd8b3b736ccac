use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::ray::Ray;
use std::sync::Arc;
use utils::{Point3, Vec3A};

pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3A,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3A) -> Translate {
        Translate { object, offset }
    }
}

impl Hittable for Translate {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let moved = Ray::with_time(ray.origin() - self.offset, ray.direction(), ray.time());
        let mut rec = self.object.hit(&moved, t_min, t_max)?;
        rec.p += self.offset;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let bb = self.object.bounding_box(time0, time1)?;
        Some(Aabb::new(bb.minimum + self.offset, bb.maximum + self.offset))
    }
}

pub struct RotateY {
    object: Arc<dyn Hittable>,
    sin_theta: f32,
    cos_theta: f32,
    bbox: Option<Aabb>,
}

impl RotateY {
    pub fn new(object: Arc<dyn Hittable>, angle_degrees: f32) -> RotateY {
        let radians = utils::degrees_to_radians(angle_degrees);
        let sin_theta = radians.sin();
        let cos_theta = radians.cos();

        // Rotate all 8 corners of the box and take the envelope.
        let bbox = object.bounding_box(0.0, 1.0).map(|bb| {
            let mut min = Point3::splat(f32::MAX);
            let mut max = Point3::splat(-f32::MAX);
            for i in 0..2 {
                for j in 0..2 {
                    for k in 0..2 {
                        let x = i as f32 * bb.maximum.x + (1 - i) as f32 * bb.minimum.x;
                        let y = j as f32 * bb.maximum.y + (1 - j) as f32 * bb.minimum.y;
                        let z = k as f32 * bb.maximum.z + (1 - k) as f32 * bb.minimum.z;
                        let new_x = cos_theta * x + sin_theta * z;
                        let new_z = -sin_theta * x + cos_theta * z;
                        let tester = Point3::new(new_x, y, new_z);
                        min = min.min(tester);
                        max = max.max(tester);
                    }
                }
            }
            Aabb::new(min, max)
        });

        RotateY {
            object,
            sin_theta,
            cos_theta,
            bbox,
        }
    }

    fn to_object(&self, v: Vec3A) -> Vec3A {
        Vec3A::new(
            self.cos_theta * v.x - self.sin_theta * v.z,
            v.y,
            self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }

    fn to_world(&self, v: Vec3A) -> Vec3A {
        Vec3A::new(
            self.cos_theta * v.x + self.sin_theta * v.z,
            v.y,
            -self.sin_theta * v.x + self.cos_theta * v.z,
        )
    }
}

impl Hittable for RotateY {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let rotated = Ray::with_time(
            self.to_object(ray.origin()),
            self.to_object(ray.direction()),
            ray.time(),
        );
        let mut rec = self.object.hit(&rotated, t_min, t_max)?;
        rec.p = self.to_world(rec.p);
        rec.normal = self.to_world(rec.normal);
        Some(rec)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        self.bbox
    }
}

pub struct FlipNormals {
    object: Arc<dyn Hittable>,
}

impl FlipNormals {
    pub fn new(object: Arc<dyn Hittable>) -> FlipNormals {
        FlipNormals { object }
    }
}

impl Hittable for FlipNormals {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let mut rec = self.object.hit(ray, t_min, t_max)?;
        rec.normal = -rec.normal;
        Some(rec)
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.object.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::primitives::Sphere;
    use crate::texture::ConstantTexture;
    use utils::Color;

    fn sphere_at(center: Point3) -> Arc<dyn Hittable> {
        let mat = Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(Color::ONE))));
        Arc::new(Sphere::new(center, 1.0, mat))
    }

    #[test]
    fn translate_shifts_the_hit_point() {
        let moved = Translate::new(sphere_at(Point3::ZERO), Vec3A::new(5.0, 0.0, 0.0));
        let ray = Ray::new(Point3::new(5.0, 0.0, -4.0), Vec3A::new(0.0, 0.0, 1.0));
        let rec = moved.hit(&ray, 0.001, f32::MAX).unwrap();
        assert!((rec.p - Point3::new(5.0, 0.0, -1.0)).length() < 1e-4);
        let bb = moved.bounding_box(0.0, 1.0).unwrap();
        assert!((bb.minimum.x - 4.0).abs() < 1e-5);
    }

    #[test]
    fn translate_then_untranslate_is_identity() {
        let inner = sphere_at(Point3::new(1.0, 2.0, 3.0));
        let offset = Vec3A::new(-4.0, 7.0, 0.5);
        let round_trip = Translate::new(
            Arc::new(Translate::new(inner.clone(), offset)),
            -offset,
        );
        let ray = Ray::new(Point3::new(1.0, 2.0, -10.0), Vec3A::new(0.0, 0.0, 1.0));
        let direct = inner.hit(&ray, 0.001, f32::MAX).unwrap();
        let wrapped = round_trip.hit(&ray, 0.001, f32::MAX).unwrap();
        assert!((direct.t - wrapped.t).abs() < 1e-5);
        assert!((direct.p - wrapped.p).length() < 1e-4);
    }

    #[test]
    fn rotate_then_unrotate_is_identity() {
        let inner = sphere_at(Point3::new(2.0, 0.0, 0.0));
        let round_trip = RotateY::new(
            Arc::new(RotateY::new(inner.clone(), 35.0)),
            -35.0,
        );
        let ray = Ray::new(Point3::new(2.0, 0.0, -10.0), Vec3A::new(0.0, 0.0, 1.0));
        let direct = inner.hit(&ray, 0.001, f32::MAX).unwrap();
        let wrapped = round_trip.hit(&ray, 0.001, f32::MAX).unwrap();
        assert!((direct.t - wrapped.t).abs() < 1e-4);
        assert!((direct.p - wrapped.p).length() < 1e-3);
        assert!((direct.normal - wrapped.normal).length() < 1e-3);
    }

    #[test]
    fn rotate_90_degrees_swaps_axes() {
        let rotated = RotateY::new(sphere_at(Point3::new(2.0, 0.0, 0.0)), 90.0);
        // After +90 degrees about Y, the sphere sits at z = -2.
        let ray = Ray::new(Point3::new(0.0, 0.0, -10.0), Vec3A::new(0.0, 0.0, 1.0));
        let rec = rotated.hit(&ray, 0.001, f32::MAX).unwrap();
        assert!((rec.p.z + 3.0).abs() < 1e-3);
        let bb = rotated.bounding_box(0.0, 1.0).unwrap();
        assert!((bb.minimum.z + 3.0).abs() < 1e-3);
        assert!((bb.maximum.z + 1.0).abs() < 1e-3);
    }

    #[test]
    fn flip_normals_negates() {
        let flipped = FlipNormals::new(sphere_at(Point3::ZERO));
        let ray = Ray::new(Point3::new(0.0, 0.0, -4.0), Vec3A::new(0.0, 0.0, 1.0));
        let rec = flipped.hit(&ray, 0.001, f32::MAX).unwrap();
        assert!((rec.normal - Vec3A::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }
}
