use crate::aabb::Aabb;
use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::ray::Ray;
use std::sync::Arc;
use utils::{Color, Point3, Vec3A};

#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3,
    pub normal: Vec3A,
    pub color: Color,
    pub uv: [f32; 2],
}

/// A single triangle with per-vertex attributes, intersected with
/// Moeller-Trumbore.
pub struct Triangle {
    vertices: [Vertex; 3],
    mat: Arc<dyn Material>,
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex, mat: Arc<dyn Material>) -> Triangle {
        Triangle {
            vertices: [v0, v1, v2],
            mat,
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        const EPSILON: f32 = 1e-7;

        let [v0, v1, v2] = &self.vertices;
        let edge1 = v1.position - v0.position;
        let edge2 = v2.position - v0.position;

        let h = ray.direction().cross(edge2);
        let a = edge1.dot(h);
        if a.abs() < EPSILON {
            // Ray parallel to the triangle plane.
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin() - v0.position;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        if t <= EPSILON || t <= t_min || t >= t_max {
            return None;
        }

        let w = 1.0 - u - v;
        let uv = [
            w * v0.uv[0] + u * v1.uv[0] + v * v2.uv[0],
            w * v0.uv[1] + u * v1.uv[1] + v * v2.uv[1],
        ];
        let normal = w * v0.normal + u * v1.normal + v * v2.normal;

        Some(HitRecord {
            t,
            p: ray.at(t),
            normal,
            u: uv[0],
            v: uv[1],
            mat: self.mat.clone(),
        })
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let [v0, v1, v2] = &self.vertices;
        Some(Aabb::new(
            v0.position.min(v1.position).min(v2.position),
            v0.position.max(v1.position).max(v2.position),
        ))
    }
}
