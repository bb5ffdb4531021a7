// Per-player input state management

use super::action::Action;
use glam::Vec2;
use std::collections::HashSet;

/// Input state for the controlled character.
///
/// The device layer reports presses/releases and the analog move axis; the
/// controller reads edges (`just_pressed`) during the tick, and the frame is
/// closed with [`PlayerInput::end_frame`].
#[derive(Debug, Default)]
pub struct PlayerInput {
    /// Actions that are currently pressed
    pressed: HashSet<Action>,

    /// Actions that were pressed this frame (press edges)
    just_pressed: HashSet<Action>,

    /// Actions that were released this frame (release edges)
    just_released: HashSet<Action>,

    /// Actions that were pressed in the previous frame
    previous_pressed: HashSet<Action>,

    /// Analog movement (x = strafe, y = forward), length at most 1
    move_axis: Vec2,

    /// Yaw of the viewing camera in radians
    camera_yaw: f32,
}

impl PlayerInput {
    /// Create an empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Check if an action is held (pressed for multiple frames)
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Set the analog movement input, clamped to the unit circle
    pub fn set_move_axis(&mut self, axis: Vec2) {
        self.move_axis = axis.clamp_length_max(1.0);
    }

    /// Get the analog movement input
    pub fn move_axis(&self) -> Vec2 {
        self.move_axis
    }

    /// Set the camera yaw used for camera-relative movement
    pub fn set_camera_yaw(&mut self, yaw: f32) {
        self.camera_yaw = yaw;
    }

    /// Get the camera yaw
    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    /// Close the current frame: clears edges, keeps held state and axes.
    /// Call this once per frame after the controller has ticked.
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed = self.pressed.clone();
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
        self.move_axis = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        assert!(input.is_pressed(Action::Jump));
        assert!(input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_release_action() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.end_frame();
        input.release(Action::Jump);
        assert!(!input.is_pressed(Action::Jump));
        assert!(input.just_released(Action::Jump));
    }

    #[test]
    fn test_just_pressed_cleared_on_end_frame() {
        let mut input = PlayerInput::new();
        input.press(Action::Attack);
        input.end_frame();
        assert!(input.is_pressed(Action::Attack));
        assert!(!input.just_pressed(Action::Attack));
    }

    #[test]
    fn test_holding_does_not_repeat_edge() {
        let mut input = PlayerInput::new();
        input.press(Action::Attack);
        input.end_frame();
        input.press(Action::Attack);
        assert!(!input.just_pressed(Action::Attack));
        assert!(input.is_held(Action::Attack));
    }

    #[test]
    fn test_release_unpressed_action() {
        let mut input = PlayerInput::new();
        input.release(Action::Jump);
        assert!(!input.just_released(Action::Jump));
    }

    #[test]
    fn test_move_axis_clamped() {
        let mut input = PlayerInput::new();
        input.set_move_axis(Vec2::new(1.0, 1.0));
        assert!((input.move_axis().length() - 1.0).abs() < 1e-5);

        input.set_move_axis(Vec2::new(0.3, 0.0));
        assert_eq!(input.move_axis(), Vec2::new(0.3, 0.0));
    }

    #[test]
    fn test_axes_survive_end_frame() {
        let mut input = PlayerInput::new();
        input.set_move_axis(Vec2::Y);
        input.set_camera_yaw(1.5);
        input.end_frame();
        assert_eq!(input.move_axis(), Vec2::Y);
        assert_eq!(input.camera_yaw(), 1.5);
    }

    #[test]
    fn test_reset() {
        let mut input = PlayerInput::new();
        input.press(Action::Jump);
        input.set_move_axis(Vec2::X);
        input.reset();
        assert!(!input.is_pressed(Action::Jump));
        assert_eq!(input.move_axis(), Vec2::ZERO);
    }
}
