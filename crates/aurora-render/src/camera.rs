use crate::ray::Ray;
use utils::{Color, Point3, Vec3A};

/// The `Camera` struct models a thin-lens camera with a shutter interval.
/// It is responsible for generating the primary rays: each ray starts on
/// the lens disk and carries a time sampled uniformly across the shutter,
/// which is what produces defocus blur and motion blur.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// Where the camera sits in world space.
    look_from: Point3,
    /// The point the camera looks at.
    look_at: Point3,
    /// The "up" direction used to orient the frame.
    vup: Vec3A,
    /// Vertical field of view in degrees.
    vert_fov: f32,
    /// Viewport aspect ratio (width / height).
    aspect: f32,
    /// Lens aperture; zero gives a pinhole camera.
    aperture: f32,
    /// Distance to the plane of perfect focus.
    focus_dist: f32,
    /// Shutter open time.
    time0: f32,
    /// Shutter close time.
    time1: f32,
    /// Radiance returned for rays that escape the scene.
    background: Color,

    /// The origin primary rays start from (before the lens offset).
    origin: Point3,
    /// The lower-left corner of the focus-plane viewport.
    lower_left_corner: Point3,
    /// The horizontal span of the viewport.
    horizontal: Vec3A,
    /// The vertical span of the viewport.
    vertical: Vec3A,
    /// The camera's local horizontal axis.
    u: Vec3A,
    /// The camera's local vertical axis.
    v: Vec3A,
    /// The camera's local depth axis, pointing backwards.
    w: Vec3A,
    /// Half the aperture.
    lens_radius: f32,
}

impl Camera {
    /// Creates a new `Camera` with the specified parameters.
    ///
    /// # Parameters
    /// - `look_from`: The position of the camera in 3D space.
    /// - `look_at`: The point in 3D space the camera is looking at.
    /// - `vup`: The "up" direction vector for the camera.
    /// - `vert_fov`: The vertical field-of-view in degrees.
    /// - `aspect`: The aspect ratio of the viewport (width/height).
    /// - `aperture`: The aperture size (controls depth of field).
    /// - `focus_dist`: The distance to the focus plane.
    /// - `time0`, `time1`: The shutter interval primary rays sample.
    /// - `background`: The color returned for rays that miss everything.
    ///
    /// # Returns
    /// - A new instance of `Camera`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        look_from: Point3,
        look_at: Point3,
        vup: Vec3A,
        vert_fov: f32,
        aspect: f32,
        aperture: f32,
        focus_dist: f32,
        time0: f32,
        time1: f32,
        background: Color,
    ) -> Camera {
        let mut camera = Camera {
            look_from,
            look_at,
            vup,
            vert_fov,
            aspect,
            aperture,
            focus_dist,
            time0,
            time1,
            background,
            origin: Point3::ZERO,
            lower_left_corner: Point3::ZERO,
            horizontal: Vec3A::ZERO,
            vertical: Vec3A::ZERO,
            u: Vec3A::ZERO,
            v: Vec3A::ZERO,
            w: Vec3A::ZERO,
            lens_radius: 0.0,
        };
        camera.update_internals();
        camera
    }

    /// Changes the viewport aspect ratio and rebuilds the derived frame.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_internals();
    }

    /// Focuses the lens on the look-at point.
    pub fn set_focus_distance_to_look_at(&mut self) {
        self.focus_dist = (self.look_at - self.look_from).length();
        self.update_internals();
    }

    fn update_internals(&mut self) {
        let theta = utils::degrees_to_radians(self.vert_fov);
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        self.origin = self.look_from;
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);
        self.lens_radius = self.aperture / 2.0;
        self.lower_left_corner = self.origin
            - half_width * self.focus_dist * self.u
            - half_height * self.focus_dist * self.v
            - self.focus_dist * self.w;
        self.horizontal = 2.0 * half_width * self.focus_dist * self.u;
        self.vertical = 2.0 * half_height * self.focus_dist * self.v;
    }

    /// Generates a primary ray through the viewport.
    ///
    /// # Parameters
    /// - `s`: The horizontal coordinate on the viewport (normalized to [0, 1]).
    /// - `t`: The vertical coordinate on the viewport (normalized to [0, 1]).
    ///
    /// # Returns
    /// - A `Ray` starting on the lens disk, aimed through `(s, t)` on the
    ///   focus plane, stamped with a time uniform in the shutter interval.
    pub fn get_ray(&self, s: f32, t: f32) -> Ray {
        let rd = self.lens_radius * utils::random_in_unit_disk();
        let offset = self.u * rd.x + self.v * rd.y;
        let time = self.time0 + utils::random() * (self.time1 - self.time0);
        Ray::with_time(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical - self.origin - offset,
            time,
        )
    }

    /// Returns the color for rays that escape the scene.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Returns the `(time0, time1)` shutter interval.
    pub fn shutter_time(&self) -> (f32, f32) {
        (self.time0, self.time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_camera(aperture: f32) -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, -5.0),
            Point3::ZERO,
            Vec3A::Y,
            60.0,
            1.0,
            aperture,
            5.0,
            0.0,
            1.0,
            Color::new(0.7, 0.7, 0.7),
        )
    }

    #[test]
    fn the_center_ray_points_at_the_target() {
        utils::seed_thread_rng(71);
        let cam = test_camera(0.0);
        let ray = cam.get_ray(0.5, 0.5);
        let dir = ray.direction().normalize();
        assert!((dir - Vec3A::new(0.0, 0.0, 1.0)).length() < 1e-4);
        assert_eq!(ray.origin(), Point3::new(0.0, 0.0, -5.0));
    }

    #[test]
    fn ray_times_sample_the_shutter_interval() {
        utils::seed_thread_rng(72);
        let cam = test_camera(0.0);
        for _ in 0..128 {
            let time = cam.get_ray(0.3, 0.6).time();
            assert!((0.0..1.0).contains(&time));
        }
    }

    #[test]
    fn aperture_perturbs_the_origin_within_the_lens() {
        utils::seed_thread_rng(73);
        let cam = test_camera(0.5);
        for _ in 0..64 {
            let ray = cam.get_ray(0.5, 0.5);
            let offset = (ray.origin() - Point3::new(0.0, 0.0, -5.0)).length();
            assert!(offset <= 0.25 + 1e-5);
        }
    }

    #[test]
    fn orthonormal_frame_is_right_handed() {
        let cam = test_camera(0.0);
        assert!((cam.u.dot(cam.v)).abs() < 1e-5);
        assert!((cam.u.dot(cam.w)).abs() < 1e-5);
        assert!((cam.u.cross(cam.v) - cam.w).length() < 1e-5);
    }
}
