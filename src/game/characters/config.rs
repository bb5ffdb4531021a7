// Controller tuning
//
// Every player shares one set of tuning values. Defaults are compiled in and
// can be overridden from a RON file; missing fields keep their defaults.

use super::state::StateTimeouts;
use crate::engine::physics::{LayerMask, ProbeShape};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Movement and jump tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Vertical acceleration (units/second², negative is down)
    pub gravity: f32,
    /// Ground speed (units/second)
    pub move_speed: f32,
    /// Fraction of move speed available while airborne
    pub air_control: f32,
    /// Apex height of a jump
    pub jump_height: f32,
    /// How long an early jump press is remembered
    pub jump_buffer_time: f32,
    /// How long after leaving the ground a jump is still allowed
    pub coyote_time: f32,
    /// Minimum time between jumps
    pub jump_cooldown: f32,
    /// Downward velocity held while grounded, keeps the ground probe in contact
    pub grounded_stick_velocity: f32,
    /// Input magnitude below which the stick counts as centered
    pub input_deadzone: f32,
    /// Free-look rotation smoothing time
    pub rotation_smooth_time: f32,
    /// Lock-on rotation speed (slerp factor per second)
    pub lock_rotation_speed: f32,
    /// How fast the animation axes follow input (per second)
    pub axis_blend_rate: f32,
    pub ground_probe: ProbeShape,
}

/// The one movement tuning used by all players
pub const BASE_MOVEMENT: MovementSettings = MovementSettings {
    gravity: -9.81,
    move_speed: 5.0,
    air_control: 0.6,

    // Jump feel
    jump_height: 2.0,
    jump_buffer_time: 0.15,
    coyote_time: 0.15,
    jump_cooldown: 0.2,
    grounded_stick_velocity: -2.0,

    input_deadzone: 0.1,
    rotation_smooth_time: 0.1,
    lock_rotation_speed: 5.0,
    axis_blend_rate: 5.0,

    ground_probe: ProbeShape {
        radius: 0.28,
        height: 0.14,
    },
};

impl Default for MovementSettings {
    fn default() -> Self {
        BASE_MOVEMENT
    }
}

impl MovementSettings {
    /// Initial upward speed reaching `jump_height` under `gravity`
    pub fn jump_velocity(&self) -> f32 {
        (self.jump_height * 2.0 * self.gravity.abs()).sqrt()
    }
}

/// Hit detection tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatSettings {
    /// Where hits originate, relative to the character and its facing
    pub attack_point: Vec3,
    /// Impact force applied to every target hit
    pub hit_impact_force: f32,
    /// Layers the hit check looks at
    pub target_layers: LayerMask,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            attack_point: Vec3::new(0.0, 1.0, 0.8),
            hit_impact_force: 5.0,
            target_layers: LayerMask::ENEMY,
        }
    }
}

/// Complete tuning for a player character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub movement: MovementSettings,
    pub timeouts: StateTimeouts,
    pub combat: CombatSettings,
    pub max_health: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            movement: MovementSettings::default(),
            timeouts: StateTimeouts::default(),
            combat: CombatSettings::default(),
            max_health: 100.0,
        }
    }
}

impl ControllerConfig {
    /// Load and validate a RON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    /// Parse and validate a RON config string
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: ControllerConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;

        let named = [
            ("movement.gravity", m.gravity),
            ("movement.move_speed", m.move_speed),
            ("movement.air_control", m.air_control),
            ("movement.jump_height", m.jump_height),
            ("movement.jump_buffer_time", m.jump_buffer_time),
            ("movement.coyote_time", m.coyote_time),
            ("movement.jump_cooldown", m.jump_cooldown),
            ("movement.grounded_stick_velocity", m.grounded_stick_velocity),
            ("movement.input_deadzone", m.input_deadzone),
            ("movement.rotation_smooth_time", m.rotation_smooth_time),
            ("movement.lock_rotation_speed", m.lock_rotation_speed),
            ("movement.axis_blend_rate", m.axis_blend_rate),
            ("movement.ground_probe.radius", m.ground_probe.radius),
            ("movement.ground_probe.height", m.ground_probe.height),
            ("timeouts.attacking", self.timeouts.attacking),
            ("timeouts.rolling", self.timeouts.rolling),
            ("timeouts.taking_damage", self.timeouts.taking_damage),
            ("combat.hit_impact_force", self.combat.hit_impact_force),
            ("max_health", self.max_health),
        ];
        if let Some((name, _)) = named.iter().find(|(_, value)| !value.is_finite()) {
            return Err(invalid(format!("{name} must be finite")));
        }
        if !self.combat.attack_point.is_finite() {
            return Err(invalid("combat.attack_point must be finite".to_string()));
        }

        if m.gravity >= 0.0 {
            return Err(invalid(format!("movement.gravity must be negative, got {}", m.gravity)));
        }

        // Speeds and sizes
        for (name, value) in [
            ("movement.move_speed", m.move_speed),
            ("movement.jump_height", m.jump_height),
            ("movement.rotation_smooth_time", m.rotation_smooth_time),
            ("movement.lock_rotation_speed", m.lock_rotation_speed),
            ("movement.ground_probe.radius", m.ground_probe.radius),
            ("max_health", self.max_health),
        ] {
            if value <= 0.0 {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }

        // Timers and factors
        for (name, value) in [
            ("movement.air_control", m.air_control),
            ("movement.jump_buffer_time", m.jump_buffer_time),
            ("movement.coyote_time", m.coyote_time),
            ("movement.jump_cooldown", m.jump_cooldown),
            ("movement.input_deadzone", m.input_deadzone),
            ("movement.axis_blend_rate", m.axis_blend_rate),
            ("movement.ground_probe.height", m.ground_probe.height),
            ("timeouts.attacking", self.timeouts.attacking),
            ("timeouts.rolling", self.timeouts.rolling),
            ("timeouts.taking_damage", self.timeouts.taking_damage),
            ("combat.hit_impact_force", self.combat.hit_impact_force),
        ] {
            if value < 0.0 {
                return Err(invalid(format!("{name} must not be negative, got {value}")));
            }
        }

        if m.grounded_stick_velocity > 0.0 {
            return Err(invalid(format!(
                "movement.grounded_stick_velocity must not be positive, got {}",
                m.grounded_stick_velocity
            )));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> ConfigError {
    ConfigError::Invalid(reason)
}
