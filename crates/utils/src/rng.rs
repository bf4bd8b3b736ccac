use glam::Vec3A;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::f32::consts::PI;

// Every random draw in the renderer goes through this thread-local generator.
// Workers reseed it from the master seed at spawn, which makes single-threaded
// renders bit-exact reproducible.
thread_local! {
    static THREAD_RNG: RefCell<SmallRng> = RefCell::new(SmallRng::seed_from_u64(0x5eed));
}

/// Reseed the calling thread's generator.
pub fn seed_thread_rng(seed: u64) {
    THREAD_RNG.with(|rng| *rng.borrow_mut() = SmallRng::seed_from_u64(seed));
}

/// A random real in [0, 1).
pub fn random() -> f32 {
    THREAD_RNG.with(|rng| rng.borrow_mut().random())
}

/// A random real in [min, max).
pub fn random_range(min: f32, max: f32) -> f32 {
    min + (max - min) * random()
}

/// A random index in [0, bound).
pub fn random_index(bound: usize) -> usize {
    THREAD_RNG.with(|rng| rng.borrow_mut().random_range(0..bound))
}

pub fn random_in_unit_sphere() -> Vec3A {
    loop {
        let p = 2.0 * Vec3A::new(random(), random(), random()) - Vec3A::ONE;
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

pub fn random_in_unit_disk() -> Vec3A {
    loop {
        let p = 2.0 * Vec3A::new(random(), random(), 0.0) - Vec3A::new(1.0, 1.0, 0.0);
        if p.dot(p) < 1.0 {
            return p;
        }
    }
}

/// A direction in the +Z hemisphere distributed as cos(theta)/pi.
pub fn random_cosine_direction() -> Vec3A {
    let r1 = random();
    let r2 = random();
    let z = (1.0 - r2).sqrt();
    let phi = 2.0 * PI * r1;
    let x = phi.cos() * r2.sqrt();
    let y = phi.sin() * r2.sqrt();
    Vec3A::new(x, y, z)
}

/// A direction toward a sphere of `radius` seen from `distance_squared` away,
/// uniform over the subtended solid angle. Local frame, +Z toward the center.
pub fn random_to_sphere(radius: f32, distance_squared: f32) -> Vec3A {
    let r1 = random();
    let r2 = random();
    let z = 1.0 + r2 * ((1.0 - radius * radius / distance_squared).max(0.0).sqrt() - 1.0);
    let phi = 2.0 * PI * r1;
    let x = phi.cos() * (1.0 - z * z).max(0.0).sqrt();
    let y = phi.sin() * (1.0 - z * z).max(0.0).sqrt();
    Vec3A::new(x, y, z)
}
