use utils::{Point3, Vec3A};

const POINT_COUNT: usize = 256;

/// Gradient-noise tables. Built once at scene construction from the seeded
/// thread RNG and shared between textures via `Arc`.
pub struct Perlin {
    ran_vec: Vec<Vec3A>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new() -> Perlin {
        let ran_vec = (0..POINT_COUNT)
            .map(|_| {
                Vec3A::new(
                    utils::random_range(-1.0, 1.0),
                    utils::random_range(-1.0, 1.0),
                    utils::random_range(-1.0, 1.0),
                )
                .normalize()
            })
            .collect();

        Perlin {
            ran_vec,
            perm_x: generate_perm(),
            perm_y: generate_perm(),
            perm_z: generate_perm(),
        }
    }

    pub fn noise(&self, p: Point3) -> f32 {
        let mut u = p.x - p.x.floor();
        let mut v = p.y - p.y.floor();
        let mut w = p.z - p.z.floor();

        // Hermite cubic to round off the interpolation.
        u = u * u * (3.0 - 2.0 * u);
        v = v * v * (3.0 - 2.0 * v);
        w = w * w * (3.0 - 2.0 * w);

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        let mut c = [[[Vec3A::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i32) & 255) as usize]
                        ^ self.perm_y[((j + dj as i32) & 255) as usize]
                        ^ self.perm_z[((k + dk as i32) & 255) as usize];
                    *cell = self.ran_vec[idx];
                }
            }
        }

        perlin_interp(&c, u, v, w)
    }

    /// Turbulence: summed noise over `depth` octaves, amplitude halving and
    /// frequency doubling each step.
    pub fn turb(&self, p: Point3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp_p = p;
        let mut weight = 1.0;
        for _ in 0..depth {
            accum += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }
        accum.abs()
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

fn generate_perm() -> Vec<usize> {
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    for i in (1..POINT_COUNT).rev() {
        let target = utils::random_index(i + 1);
        p.swap(i, target);
    }
    p
}

fn perlin_interp(c: &[[[Vec3A; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    // The blend coefficients take a second Hermite pass; the gradient
    // offsets below use the once-smoothed fractions as passed in.
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accum = 0.0;
    for (i, plane) in c.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, cell) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = Vec3A::new(u - fi, v - fj, w - fk);
                accum += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * cell.dot(weight);
            }
        }
    }

    accum.abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_deterministic_for_a_seed() {
        utils::seed_thread_rng(11);
        let a = Perlin::new();
        utils::seed_thread_rng(11);
        let b = Perlin::new();
        let p = Point3::new(1.3, 4.7, 2.9);
        assert_eq!(a.noise(p), b.noise(p));
        assert_eq!(a.turb(p, 7), b.turb(p, 7));
    }

    #[test]
    fn turbulence_is_non_negative_and_bounded() {
        utils::seed_thread_rng(11);
        let perlin = Perlin::new();
        for i in 0..64 {
            let p = Point3::new(i as f32 * 0.37, i as f32 * 0.11, i as f32 * 0.73);
            let t = perlin.turb(p, 7);
            assert!(t >= 0.0);
            assert!(t < 2.0);
        }
    }

    #[test]
    fn permutation_tables_are_permutations() {
        utils::seed_thread_rng(11);
        let mut p = generate_perm();
        p.sort_unstable();
        assert_eq!(p, (0..POINT_COUNT).collect::<Vec<_>>());
    }
}
