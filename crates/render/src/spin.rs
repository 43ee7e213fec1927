use glam::Mat4;

/// Rotation applied each frame, in degrees.
pub const STEP_DEGREES: f32 = 1.0;

/// Accumulating rotation for the spinning-triangle demo.
///
/// Each frame composes a fixed 1-degree z-rotation onto the stored matrix;
/// the absolute angle is never recomputed, so floating-point error
/// accumulates for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct SpinTransform {
    matrix: Mat4,
}

impl Default for SpinTransform {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }
}

impl SpinTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame: rotate the accumulated transform by
    /// [`STEP_DEGREES`] about the z axis.
    pub fn step(&mut self) {
        self.matrix *= Mat4::from_rotation_z(STEP_DEGREES.to_radians());
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_identity() {
        assert_eq!(SpinTransform::new().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn n_steps_equal_sequential_composition() {
        let mut spin = SpinTransform::new();
        let mut expected = Mat4::IDENTITY;
        for _ in 0..360 {
            spin.step();
            expected *= Mat4::from_rotation_z(STEP_DEGREES.to_radians());
        }
        // Same operation sequence, so the results are bitwise identical.
        assert_eq!(spin.matrix().to_cols_array(), expected.to_cols_array());
    }

    #[test]
    fn composition_tracks_the_closed_form_approximately() {
        let mut spin = SpinTransform::new();
        for _ in 0..90 {
            spin.step();
        }
        let closed = Mat4::from_rotation_z(90.0_f32.to_radians());
        for (a, b) in spin
            .matrix()
            .to_cols_array()
            .iter()
            .zip(closed.to_cols_array().iter())
        {
            assert!((a - b).abs() < 1e-4);
        }
    }

    #[test]
    fn step_rotates_counterclockwise() {
        let mut spin = SpinTransform::new();
        spin.step();
        let rotated = spin.matrix().transform_point3(glam::Vec3::X);
        assert!(rotated.y > 0.0);
    }
}
