use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Set of currently held keys, fed from window keyboard events.
///
/// Escape raises a close request that the frame loop checks at the top of
/// its next iteration; the flag never clears.
#[derive(Debug, Default)]
pub struct KeyTracker {
    held: HashSet<KeyCode>,
    close_requested: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.held.insert(key);
            if key == KeyCode::Escape {
                self.close_requested = true;
            }
        } else {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }
}

/// Distance the dolly moves per frame a key is held.
pub const DOLLY_STEP: f32 = 0.1;

/// Camera-distance scalar driven by W/S.
///
/// The scalar is unbounded: holding a key long enough pushes the camera
/// through or arbitrarily far from the scene.
#[derive(Debug, Clone, Copy)]
pub struct DollyControl {
    distance: f32,
}

impl DollyControl {
    pub fn new(initial: f32) -> Self {
        Self { distance: initial }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Apply one frame of key input: +0.1 while W is held, -0.1 while S is.
    pub fn step(&mut self, keys: &KeyTracker) {
        if keys.is_held(KeyCode::KeyW) {
            self.distance += DOLLY_STEP;
        }
        if keys.is_held(KeyCode::KeyS) {
            self.distance -= DOLLY_STEP;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(keys: &mut KeyTracker, key: KeyCode) {
        keys.handle_key(key, true);
    }

    fn release(keys: &mut KeyTracker, key: KeyCode) {
        keys.handle_key(key, false);
    }

    #[test]
    fn tracks_held_keys() {
        let mut keys = KeyTracker::new();
        press(&mut keys, KeyCode::KeyW);
        assert!(keys.is_held(KeyCode::KeyW));
        release(&mut keys, KeyCode::KeyW);
        assert!(!keys.is_held(KeyCode::KeyW));
    }

    #[test]
    fn escape_requests_close() {
        let mut keys = KeyTracker::new();
        assert!(!keys.close_requested());
        press(&mut keys, KeyCode::Escape);
        assert!(keys.close_requested());
        // Releasing Escape does not withdraw the request.
        release(&mut keys, KeyCode::Escape);
        assert!(keys.close_requested());
    }

    #[test]
    fn holding_w_advances_by_step_per_frame() {
        let mut keys = KeyTracker::new();
        let mut dolly = DollyControl::new(-3.0);
        press(&mut keys, KeyCode::KeyW);
        for _ in 0..10 {
            dolly.step(&keys);
        }
        assert!((dolly.distance() - (-3.0 + 10.0 * DOLLY_STEP)).abs() < 1e-5);
    }

    #[test]
    fn holding_s_retreats_by_step_per_frame() {
        let mut keys = KeyTracker::new();
        let mut dolly = DollyControl::new(-3.0);
        press(&mut keys, KeyCode::KeyS);
        for _ in 0..10 {
            dolly.step(&keys);
        }
        assert!((dolly.distance() - (-3.0 - 10.0 * DOLLY_STEP)).abs() < 1e-5);
    }

    #[test]
    fn no_keys_leaves_distance_unchanged() {
        let keys = KeyTracker::new();
        let mut dolly = DollyControl::new(-3.0);
        for _ in 0..100 {
            dolly.step(&keys);
        }
        assert_eq!(dolly.distance(), -3.0);
    }

    #[test]
    fn both_keys_cancel() {
        let mut keys = KeyTracker::new();
        let mut dolly = DollyControl::new(-3.0);
        press(&mut keys, KeyCode::KeyW);
        press(&mut keys, KeyCode::KeyS);
        for _ in 0..10 {
            dolly.step(&keys);
        }
        assert_eq!(dolly.distance(), -3.0);
    }

    #[test]
    fn drift_is_unbounded() {
        let mut keys = KeyTracker::new();
        let mut dolly = DollyControl::new(-3.0);
        press(&mut keys, KeyCode::KeyS);
        for _ in 0..10_000 {
            dolly.step(&keys);
        }
        assert!(dolly.distance() < -1000.0);
    }
}
