use glam::Vec3A;

/// An orthonormal basis built around a surface normal, used to move
/// hemisphere samples from local space into world space.
#[derive(Debug, Clone, Copy)]
pub struct Onb {
    axis: [Vec3A; 3],
}

impl Onb {
    pub fn build_from_w(n: Vec3A) -> Onb {
        let w = n.normalize();
        let a = if w.x.abs() > 0.9 {
            Vec3A::new(0.0, 1.0, 0.0)
        } else {
            Vec3A::new(1.0, 0.0, 0.0)
        };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Onb { axis: [u, v, w] }
    }

    pub fn u(&self) -> Vec3A {
        self.axis[0]
    }

    pub fn v(&self) -> Vec3A {
        self.axis[1]
    }

    pub fn w(&self) -> Vec3A {
        self.axis[2]
    }

    pub fn local(&self, a: Vec3A) -> Vec3A {
        a.x * self.u() + a.y * self.v() + a.z * self.w()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_is_orthonormal() {
        for n in [
            Vec3A::new(0.0, 1.0, 0.0),
            Vec3A::new(1.0, 0.0, 0.0),
            Vec3A::new(-0.3, 0.5, 2.0),
            Vec3A::new(0.95, 0.1, 0.0),
        ] {
            let onb = Onb::build_from_w(n);
            assert!((onb.u().length() - 1.0).abs() < 1e-5);
            assert!((onb.v().length() - 1.0).abs() < 1e-5);
            assert!((onb.w().length() - 1.0).abs() < 1e-5);
            assert!(onb.u().dot(onb.v()).abs() < 1e-5);
            assert!(onb.u().dot(onb.w()).abs() < 1e-5);
            assert!(onb.v().dot(onb.w()).abs() < 1e-5);
        }
    }

    #[test]
    fn local_z_recovers_the_normal() {
        let n = Vec3A::new(0.2, -0.4, 0.9).normalize();
        let onb = Onb::build_from_w(n);
        assert!((onb.local(Vec3A::Z) - n).length() < 1e-5);
    }
}
