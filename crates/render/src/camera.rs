use glam::{Mat4, Vec3};

/// Camera that slides along the view axis.
///
/// The view matrix is a pure translation by `(0, 0, distance)`; the distance
/// scalar is owned by the input layer and copied in each frame.
#[derive(Debug, Clone, Copy)]
pub struct DollyCamera {
    pub distance: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for DollyCamera {
    fn default() -> Self {
        Self {
            distance: -3.0,
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }
}

impl DollyCamera {
    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, self.distance))
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

/// Free camera: a position moved along fixed front/up vectors.
///
/// Movement is scaled by `speed * dt`, so it is frame-rate independent,
/// unlike the dolly's fixed per-frame step.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub speed: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            speed: 10.0,
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 100.0,
        }
    }
}

impl FlyCamera {
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    pub fn move_forward(&mut self, dt: f32) {
        self.position += self.front * self.speed * dt;
    }

    pub fn move_backward(&mut self, dt: f32) {
        self.position -= self.front * self.speed * dt;
    }

    pub fn move_left(&mut self, dt: f32) {
        self.position -= self.right() * self.speed * dt;
    }

    pub fn move_right(&mut self, dt: f32) {
        self.position += self.right() * self.speed * dt;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn assert_mat4_eq(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((x - y).abs() < EPS, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn dolly_view_is_translation_by_distance() {
        let camera = DollyCamera {
            distance: -3.0,
            ..DollyCamera::default()
        };
        let view = camera.view();
        assert_eq!(view.w_axis.z, -3.0);
        assert_eq!(view.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn projection_matches_perspective_formula() {
        let camera = DollyCamera::default();
        let aspect = 1280.0 / 720.0;

        // Standard right-handed perspective with 0..1 clip depth, from
        // fov = 60 degrees, aspect, near = 0.1, far = 100.
        let (sin_fov, cos_fov) = (0.5 * camera.fov).sin_cos();
        let h = cos_fov / sin_fov;
        let w = h / aspect;
        let r = camera.far / (camera.near - camera.far);
        let expected = Mat4::from_cols_array_2d(&[
            [w, 0.0, 0.0, 0.0],
            [0.0, h, 0.0, 0.0],
            [0.0, 0.0, r, -1.0],
            [0.0, 0.0, r * camera.near, 0.0],
        ]);

        assert_mat4_eq(camera.projection(aspect), expected);
    }

    #[test]
    fn projection_is_deterministic() {
        let camera = DollyCamera::default();
        assert_eq!(
            camera.projection(1.5).to_cols_array(),
            camera.projection(1.5).to_cols_array()
        );
    }

    #[test]
    fn fly_forward_scales_with_dt_and_speed() {
        let mut camera = FlyCamera::default();
        let start = camera.position;
        camera.move_forward(0.5);
        assert_mat4_eq(
            Mat4::from_translation(camera.position),
            Mat4::from_translation(start + Vec3::new(0.0, 0.0, -5.0)),
        );
    }

    #[test]
    fn fly_strafe_is_perpendicular_to_front() {
        let mut camera = FlyCamera::default();
        let start = camera.position;
        camera.move_right(1.0);
        let delta = camera.position - start;
        assert!(delta.dot(camera.front).abs() < EPS);
        assert!(delta.length() > 0.0);
    }

    #[test]
    fn fly_left_then_right_round_trips() {
        let mut camera = FlyCamera::default();
        let start = camera.position;
        camera.move_left(0.25);
        camera.move_right(0.25);
        assert!((camera.position - start).length() < EPS);
    }
}
