// Health tracking and simple damage targets

use crate::core::Damageable;
use glam::Vec3;
use log::{info, warn};

/// Vitality of a character, always within `[0, max_health]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    max_health: f32,
    current_health: f32,
}

impl Health {
    /// Create a tracker at full health
    pub fn new(max_health: f32) -> Self {
        let max_health = max_health.max(0.0);
        Self {
            max_health,
            current_health: max_health,
        }
    }

    /// Subtract `amount`, clamped to the valid range.
    ///
    /// Negative amounts heal.
    pub fn reduce_health(&mut self, amount: f32) {
        if amount.is_nan() {
            warn!("Ignoring NaN damage amount");
            return;
        }
        self.current_health = (self.current_health - amount).clamp(0.0, self.max_health);
    }

    pub fn current(&self) -> f32 {
        self.current_health
    }

    pub fn max(&self) -> f32 {
        self.max_health
    }

    /// Check if no health is left
    pub fn is_depleted(&self) -> bool {
        self.current_health <= 0.0
    }

    /// Current health as a fraction of max (0 when max is 0)
    pub fn fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            self.current_health / self.max_health
        } else {
            0.0
        }
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// A passive target that only soaks up hits
#[derive(Debug, Clone)]
pub struct TrainingDummy {
    pub name: String,
    pub health: Health,
    /// Impact force of the most recent hit
    pub last_impact: Option<f32>,
    /// Number of hits taken
    pub hits: u32,
}

impl TrainingDummy {
    pub fn new(name: &str, max_health: f32) -> Self {
        Self {
            name: name.to_string(),
            health: Health::new(max_health),
            last_impact: None,
            hits: 0,
        }
    }

    /// Knockback as a displacement along `direction`
    pub fn knockback(&self, direction: Vec3) -> Vec3 {
        direction.normalize_or_zero() * self.last_impact.unwrap_or(0.0)
    }
}

impl Damageable for TrainingDummy {
    fn take_damage(&mut self, amount: f32, impact_force: f32) {
        self.health.reduce_health(amount);
        self.last_impact = Some(impact_force);
        self.hits += 1;
        info!(
            "{} took {:.1} damage ({:.1}/{:.1})",
            self.name,
            amount,
            self.health.current(),
            self.health.max()
        );
    }
}
