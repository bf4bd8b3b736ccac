mod common;
mod onb;
mod rng;

pub use common::{
    clamp, degrees_to_radians, dot, near_zero, reflect, refract, schlick, unit_vector,
};
pub use onb::Onb;
pub use rng::{
    random, random_cosine_direction, random_in_unit_disk, random_in_unit_sphere, random_index,
    random_range, random_to_sphere, seed_thread_rng,
};

pub use glam::{Vec3, Vec3A};

/// A position in 3D space. Four lanes wide for SIMD; the last lane is unused.
pub type Point3 = glam::Vec3A;
/// An RGB color carried through the light-transport math.
pub type Color = glam::Vec3A;
