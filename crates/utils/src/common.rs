use glam::Vec3A;
use std::f32::consts::PI;

pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    if x < min {
        return min;
    }
    if x > max {
        return max;
    }
    x
}

pub fn dot(a: Vec3A, b: Vec3A) -> f32 {
    a.dot(b)
}

pub fn unit_vector(v: Vec3A) -> Vec3A {
    v.normalize()
}

/// A direction too short to scatter along. Guards the 1/length math downstream.
pub fn near_zero(v: Vec3A) -> bool {
    const EPS: f32 = 1.0e-8;
    v.abs().max_element() < EPS
}

pub fn reflect(v: Vec3A, n: Vec3A) -> Vec3A {
    v - 2.0 * v.dot(n) * n
}

/// Snell refraction of `v` about the outward normal `n`. Returns `None` on
/// total internal reflection.
pub fn refract(v: Vec3A, n: Vec3A, ni_over_nt: f32) -> Option<Vec3A> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some(ni_over_nt * (uv - n * dt) - n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of the Fresnel reflectance.
pub fn schlick(cosine: f32, ref_idx: f32) -> f32 {
    let mut r0 = (1.0 - ref_idx) / (1.0 + ref_idx);
    r0 = r0 * r0;
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
