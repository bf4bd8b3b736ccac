use utils::{Point3, Vec3A};

/// A ray with a shutter timestamp. The inverse direction is precomputed once
/// so the AABB slab test never divides.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    orig: Point3,
    dir: Vec3A,
    inv_dir: Vec3A,
    time: f32,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vec3A) -> Ray {
        Ray::with_time(origin, direction, 0.0)
    }

    pub fn with_time(origin: Point3, direction: Vec3A, time: f32) -> Ray {
        Ray {
            orig: origin,
            dir: direction,
            inv_dir: direction.recip(),
            time,
        }
    }

    pub fn origin(&self) -> Point3 {
        self.orig
    }

    pub fn direction(&self) -> Vec3A {
        self.dir
    }

    pub fn inverse_direction(&self) -> Vec3A {
        self.inv_dir
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// The point at parameter `t`, in units of the (unnormalised) direction.
    pub fn at(&self, t: f32) -> Point3 {
        self.orig + t * self.dir
    }
}
