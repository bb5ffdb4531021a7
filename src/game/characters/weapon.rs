// Weapon definitions
//
// Weapons are plain data produced by whatever loads game assets; combat only
// holds shared references to them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::ConfigError;

/// Problems with weapon data that make an attack impossible
#[derive(Debug, Error, PartialEq)]
pub enum WeaponError {
    #[error("no weapon equipped and no default weapon assigned")]
    NoWeapon,

    #[error("weapon '{0}' has no combo steps")]
    EmptyCombo(String),

    #[error("weapon '{name}' has a non-positive attack range ({range})")]
    InvalidRange { name: String, range: f32 },

    #[error("weapon '{name}' has negative base damage ({damage})")]
    NegativeDamage { name: String, damage: f32 },

    #[error("weapon '{name}' has a negative combo reset time ({time})")]
    NegativeResetTime { name: String, time: f32 },
}

/// One step of a weapon's combo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackAction {
    pub name: String,
    pub damage_multiplier: f32,
    pub impact_force: f32,
    pub combo_window_start: f32,
    pub combo_window_end: f32,
    /// Animation trigger fired when this step starts
    pub anim_trigger: String,
}

impl AttackAction {
    pub fn new(name: &str, anim_trigger: &str) -> Self {
        Self {
            name: name.to_string(),
            damage_multiplier: 1.0,
            impact_force: 5.0,
            combo_window_start: 0.0,
            combo_window_end: 1.0,
            anim_trigger: anim_trigger.to_string(),
        }
    }
}

/// Immutable weapon definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub name: String,
    pub attack_range: f32,
    pub base_damage: f32,
    pub combo_steps: Vec<AttackAction>,
    /// Gap after which the combo restarts from the first step
    pub combo_reset_time: f32,
}

impl WeaponConfig {
    /// Check the data can drive attacks
    pub fn validate(&self) -> Result<(), WeaponError> {
        if self.combo_steps.is_empty() {
            return Err(WeaponError::EmptyCombo(self.name.clone()));
        }
        if !(self.attack_range > 0.0) {
            return Err(WeaponError::InvalidRange {
                name: self.name.clone(),
                range: self.attack_range,
            });
        }
        if !(self.base_damage >= 0.0) {
            return Err(WeaponError::NegativeDamage {
                name: self.name.clone(),
                damage: self.base_damage,
            });
        }
        if !(self.combo_reset_time >= 0.0) {
            return Err(WeaponError::NegativeResetTime {
                name: self.name.clone(),
                time: self.combo_reset_time,
            });
        }
        Ok(())
    }

    /// Step at `index`, if the combo has one
    pub fn step(&self, index: usize) -> Option<&AttackAction> {
        self.combo_steps.get(index)
    }

    pub fn combo_len(&self) -> usize {
        self.combo_steps.len()
    }

    /// Parse a weapon from RON and validate it
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let weapon: WeaponConfig = ron::from_str(source)?;
        weapon
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(weapon)
    }

    /// Three-hit sword used when nothing else is equipped
    pub fn training_sword() -> Self {
        Self {
            name: "Training Sword".to_string(),
            attack_range: 1.5,
            base_damage: 10.0,
            combo_steps: vec![
                AttackAction::new("Slash", "Attack1"),
                AttackAction::new("Backslash", "Attack2"),
                AttackAction {
                    damage_multiplier: 1.5,
                    impact_force: 8.0,
                    ..AttackAction::new("Thrust", "Attack3")
                },
            ],
            combo_reset_time: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_sword_is_valid() {
        let sword = WeaponConfig::training_sword();
        assert_eq!(sword.validate(), Ok(()));
        assert_eq!(sword.combo_len(), 3);
        assert_eq!(sword.step(2).map(|s| s.anim_trigger.as_str()), Some("Attack3"));
        assert!(sword.step(3).is_none());
    }

    #[test]
    fn test_empty_combo_rejected() {
        let weapon = WeaponConfig {
            combo_steps: Vec::new(),
            ..WeaponConfig::training_sword()
        };
        assert_eq!(
            weapon.validate(),
            Err(WeaponError::EmptyCombo("Training Sword".to_string()))
        );
    }

    #[test]
    fn test_bad_numbers_rejected() {
        let sword = WeaponConfig::training_sword();

        let no_range = WeaponConfig {
            attack_range: 0.0,
            ..sword.clone()
        };
        assert!(matches!(no_range.validate(), Err(WeaponError::InvalidRange { .. })));

        let negative_damage = WeaponConfig {
            base_damage: -1.0,
            ..sword.clone()
        };
        assert!(matches!(
            negative_damage.validate(),
            Err(WeaponError::NegativeDamage { .. })
        ));

        let negative_reset = WeaponConfig {
            combo_reset_time: -0.5,
            ..sword
        };
        assert!(matches!(
            negative_reset.validate(),
            Err(WeaponError::NegativeResetTime { .. })
        ));
    }

    #[test]
    fn test_nan_range_rejected() {
        let weapon = WeaponConfig {
            attack_range: f32::NAN,
            ..WeaponConfig::training_sword()
        };
        assert!(weapon.validate().is_err());
    }

    #[test]
    fn test_from_ron() {
        let source = r#"(
            name: "Spear",
            attack_range: 2.5,
            base_damage: 12.0,
            combo_steps: [
                (
                    name: "Poke",
                    damage_multiplier: 1.0,
                    impact_force: 3.0,
                    combo_window_start: 0.2,
                    combo_window_end: 0.8,
                    anim_trigger: "Poke",
                ),
            ],
            combo_reset_time: 1.5,
        )"#;

        let spear = WeaponConfig::from_ron(source).unwrap();
        assert_eq!(spear.name, "Spear");
        assert_eq!(spear.combo_len(), 1);
        assert_eq!(spear.combo_steps[0].anim_trigger, "Poke");
    }

    #[test]
    fn test_from_ron_rejects_empty_combo() {
        let source = r#"(
            name: "Stick",
            attack_range: 1.0,
            base_damage: 1.0,
            combo_steps: [],
            combo_reset_time: 1.0,
        )"#;
        assert!(WeaponConfig::from_ron(source).is_err());
    }
}
