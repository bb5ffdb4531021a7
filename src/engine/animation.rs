// Animation collaborator interface
//
// Playback itself happens elsewhere; the controller only pushes parameters
// (triggers, floats, bools) into whatever animator drives the character rig.

use std::collections::{HashMap, HashSet};

/// Parameter names shared with the animation rig
pub mod params {
    /// Generic attack trigger, fired on every accepted attack
    pub const ATTACK: &str = "Attack";
    /// Jump trigger, fired on takeoff
    pub const JUMP: &str = "Jump";
    /// Roll trigger, fired when a roll starts
    pub const ROLL: &str = "Roll";
    /// Lateral locomotion blend
    pub const AXIS_X: &str = "AxisX";
    /// Forward locomotion blend
    pub const AXIS_Y: &str = "AxisY";
    /// Whether the feet are on the ground
    pub const IS_GROUNDED: &str = "IsGrounded";
}

/// Receives animation parameters from the controller
pub trait Animator {
    fn set_trigger(&mut self, name: &str);
    fn reset_trigger(&mut self, name: &str);
    fn set_float(&mut self, param: &str, value: f32);
    fn set_bool(&mut self, param: &str, value: bool);
}

/// Animator that only stores what it is told.
///
/// Useful headless (the demo binary) and as a test double. Triggers stay
/// pending until reset or taken, like a rig that has not consumed them yet.
#[derive(Debug, Default)]
pub struct RecordingAnimator {
    pending_triggers: HashSet<String>,
    fired: Vec<String>,
    floats: HashMap<String, f32>,
    bools: HashMap<String, bool>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a trigger is set and not yet consumed
    pub fn is_pending(&self, name: &str) -> bool {
        self.pending_triggers.contains(name)
    }

    /// Consume a pending trigger, returns true if it was set
    pub fn take_trigger(&mut self, name: &str) -> bool {
        self.pending_triggers.remove(name)
    }

    /// Every trigger fired so far, in order
    pub fn fired(&self) -> &[String] {
        &self.fired
    }

    /// Number of times a trigger was fired
    pub fn fire_count(&self, name: &str) -> usize {
        self.fired.iter().filter(|fired| fired.as_str() == name).count()
    }

    /// Get a float parameter (0.0 if never set)
    pub fn float(&self, param: &str) -> f32 {
        self.floats.get(param).copied().unwrap_or(0.0)
    }

    /// Get a bool parameter, if set
    pub fn bool(&self, param: &str) -> Option<bool> {
        self.bools.get(param).copied()
    }
}

impl Animator for RecordingAnimator {
    fn set_trigger(&mut self, name: &str) {
        self.pending_triggers.insert(name.to_string());
        self.fired.push(name.to_string());
    }

    fn reset_trigger(&mut self, name: &str) {
        self.pending_triggers.remove(name);
    }

    fn set_float(&mut self, param: &str, value: f32) {
        self.floats.insert(param.to_string(), value);
    }

    fn set_bool(&mut self, param: &str, value: bool) {
        self.bools.insert(param.to_string(), value);
    }
}
