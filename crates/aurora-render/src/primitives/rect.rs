use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::ray::Ray;
use std::sync::Arc;
use utils::{Point3, Vec3A};

/// Which coordinate plane the rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    Xy,
    Xz,
    Yz,
}

/// An axis-aligned rectangle spanning `[a0,a1] x [b0,b1]` at offset `k`
/// along the plane's constant axis.
pub struct AxisRect {
    plane: Plane,
    a0: f32,
    a1: f32,
    b0: f32,
    b1: f32,
    k: f32,
    mat: Arc<dyn Material>,
    light_shape: bool,
}

impl AxisRect {
    pub fn new(
        plane: Plane,
        a0: f32,
        a1: f32,
        b0: f32,
        b1: f32,
        k: f32,
        mat: Arc<dyn Material>,
    ) -> AxisRect {
        AxisRect {
            plane,
            a0,
            a1,
            b0,
            b1,
            k,
            mat,
            light_shape: false,
        }
    }

    pub fn new_light_shape(
        plane: Plane,
        a0: f32,
        a1: f32,
        b0: f32,
        b1: f32,
        k: f32,
        mat: Arc<dyn Material>,
    ) -> AxisRect {
        AxisRect {
            light_shape: true,
            ..AxisRect::new(plane, a0, a1, b0, b1, k, mat)
        }
    }

    fn normal(&self) -> Vec3A {
        match self.plane {
            Plane::Xy => Vec3A::Z,
            Plane::Xz => Vec3A::Y,
            Plane::Yz => Vec3A::X,
        }
    }

    /// (a, b, k) components of a vector in this plane's axis order.
    fn split_axes(&self, v: Vec3A) -> (f32, f32, f32) {
        match self.plane {
            Plane::Xy => (v.x, v.y, v.z),
            Plane::Xz => (v.x, v.z, v.y),
            Plane::Yz => (v.y, v.z, v.x),
        }
    }

    fn assemble(&self, a: f32, b: f32, k: f32) -> Point3 {
        match self.plane {
            Plane::Xy => Point3::new(a, b, k),
            Plane::Xz => Point3::new(a, k, b),
            Plane::Yz => Point3::new(k, a, b),
        }
    }
}

impl Hittable for AxisRect {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        let (a_orig, b_orig, k_orig) = self.split_axes(ray.origin());
        let (a_dir, b_dir, k_dir) = self.split_axes(ray.direction());

        if k_dir.abs() < 1e-5 {
            return None;
        }

        let t = (self.k - k_orig) / k_dir;
        if t < t_min || t > t_max {
            return None;
        }

        let a = a_orig + t * a_dir;
        let b = b_orig + t * b_dir;
        if a < self.a0 || a > self.a1 || b < self.b0 || b > self.b1 {
            return None;
        }

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal: self.normal(),
            u: (a - self.a0) / (self.a1 - self.a0),
            v: (b - self.b0) / (self.b1 - self.b0),
            mat: self.mat.clone(),
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        // Pad the flat axis so the box has volume.
        const PAD: f32 = 1e-4;
        Some(Aabb::new(
            self.assemble(self.a0, self.b0, self.k - PAD),
            self.assemble(self.a1, self.b1, self.k + PAD),
        ))
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3A) -> f32 {
        if let Some(rec) = self.hit(&Ray::new(origin, direction), 0.001, f32::MAX) {
            let area = (self.a1 - self.a0) * (self.b1 - self.b0);
            let distance_squared = rec.t * rec.t * direction.length_squared();
            let cosine = (direction.dot(rec.normal) / direction.length()).abs();
            distance_squared / (cosine * area)
        } else {
            0.0
        }
    }

    fn random(&self, origin: Point3) -> Vec3A {
        let a = self.a0 + utils::random() * (self.a1 - self.a0);
        let b = self.b0 + utils::random() * (self.b1 - self.b0);
        self.assemble(a, b, self.k) - origin
    }

    fn is_light_shape(&self) -> bool {
        self.light_shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::texture::ConstantTexture;
    use utils::Color;

    fn xz_rect() -> AxisRect {
        let mat = Arc::new(Lambertian::new(Arc::new(ConstantTexture::new(Color::ONE))));
        AxisRect::new(Plane::Xz, 0.0, 2.0, 0.0, 4.0, 1.0, mat)
    }

    #[test]
    fn hits_inside_the_range_only() {
        let rect = xz_rect();
        let down = Vec3A::new(0.0, -1.0, 0.0);
        let inside = Ray::new(Point3::new(1.0, 3.0, 2.0), down);
        let outside = Ray::new(Point3::new(3.0, 3.0, 2.0), down);
        let rec = rect.hit(&inside, 0.001, f32::MAX).unwrap();
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert_eq!(rec.normal, Vec3A::Y);
        assert!((rec.u - 0.5).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
        assert!(rect.hit(&outside, 0.001, f32::MAX).is_none());
    }

    #[test]
    fn parallel_rays_miss() {
        let rect = xz_rect();
        let ray = Ray::new(Point3::new(0.0, 1.0, -5.0), Vec3A::new(0.0, 0.0, 1.0));
        assert!(rect.hit(&ray, 0.001, f32::MAX).is_none());
    }

    #[test]
    fn pdf_matches_the_area_form() {
        let rect = xz_rect();
        let origin = Point3::new(1.0, 4.0, 2.0);
        let direction = Vec3A::new(0.0, -1.0, 0.0);
        // Straight down: distance 3, cosine 1, area 8.
        let expected = 9.0 / 8.0;
        assert!((rect.pdf_value(origin, direction) - expected).abs() < 1e-4);
        // A direction that misses has zero density.
        assert_eq!(rect.pdf_value(origin, Vec3A::new(0.0, 1.0, 0.0)), 0.0);
    }

    #[test]
    fn sampled_directions_land_on_the_rect() {
        utils::seed_thread_rng(41);
        let rect = xz_rect();
        let origin = Point3::new(1.0, 5.0, 2.0);
        for _ in 0..128 {
            let dir = rect.random(origin);
            assert!(rect.hit(&Ray::new(origin, dir), 0.001, f32::MAX).is_some());
        }
    }

    #[test]
    fn bounding_box_pads_the_flat_axis() {
        let rect = xz_rect();
        let bb = rect.bounding_box(0.0, 1.0).unwrap();
        assert!(bb.maximum.y > bb.minimum.y);
        assert!(bb.maximum.y - bb.minimum.y < 1e-2);
    }
}
