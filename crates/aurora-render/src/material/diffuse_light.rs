use crate::hittable::HitRecord;
use crate::material::Material;
use crate::ray::Ray;
use crate::texture::Texture;
use std::sync::Arc;
use utils::{Color, Point3};

/// An emitter. Never scatters; radiates its texture from the front face only.
pub struct DiffuseLight {
    emit: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(emit: Arc<dyn Texture>) -> DiffuseLight {
        DiffuseLight { emit }
    }
}

impl Material for DiffuseLight {
    fn emitted(&self, ray_in: &Ray, hit: &HitRecord, u: f32, v: f32, p: Point3) -> Color {
        if hit.normal.dot(ray_in.direction()) < 0.0 {
            self.emit.value(u, v, p)
        } else {
            Color::ZERO
        }
    }

    fn albedo(&self, u: f32, v: f32, p: Point3) -> Color {
        self.emit.value(u, v, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::ConstantTexture;
    use utils::Vec3A;

    #[test]
    fn emits_only_into_the_front_face() {
        let mat: Arc<dyn Material> = Arc::new(DiffuseLight::new(Arc::new(ConstantTexture::new(
            Color::new(7.0, 7.0, 7.0),
        ))));
        let hit = HitRecord {
            t: 1.0,
            p: Point3::ZERO,
            normal: Vec3A::new(0.0, -1.0, 0.0),
            u: 0.5,
            v: 0.5,
            mat: mat.clone(),
        };
        let toward = Ray::new(Point3::new(0.0, -2.0, 0.0), Vec3A::new(0.0, 1.0, 0.0));
        let away = Ray::new(Point3::new(0.0, 2.0, 0.0), Vec3A::new(0.0, -1.0, 0.0));
        assert_eq!(
            mat.emitted(&toward, &hit, 0.5, 0.5, Point3::ZERO),
            Color::new(7.0, 7.0, 7.0)
        );
        assert_eq!(mat.emitted(&away, &hit, 0.5, 0.5, Point3::ZERO), Color::ZERO);
    }

    #[test]
    fn never_scatters() {
        let mat = DiffuseLight::new(Arc::new(ConstantTexture::new(Color::ONE)));
        let arc: Arc<dyn Material> = Arc::new(DiffuseLight::new(Arc::new(ConstantTexture::new(
            Color::ONE,
        ))));
        let hit = HitRecord {
            t: 1.0,
            p: Point3::ZERO,
            normal: Vec3A::Y,
            u: 0.0,
            v: 0.0,
            mat: arc,
        };
        let ray = Ray::new(Point3::ZERO, Vec3A::Y);
        assert!(mat.scatter(&ray, &hit).is_none());
    }
}
