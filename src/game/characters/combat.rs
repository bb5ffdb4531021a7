// Combat controller: combo sequencing and hit checks

use std::sync::Arc;

use glam::Vec3;
use log::{debug, error, info};

use super::config::CombatSettings;
use super::state::{PlayerState, StateMachine};
use super::weapon::{WeaponConfig, WeaponError};
use crate::engine::animation::{params, Animator};
use crate::engine::physics::DamageQuery;

/// Where the character is in its weapon's combo
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComboState {
    /// Step the next attack plays
    pub step_index: usize,
    pub last_attack_time: Option<f32>,
}

#[derive(Debug, Default)]
pub struct CombatController {
    current_weapon: Option<Arc<WeaponConfig>>,
    default_weapon: Option<Arc<WeaponConfig>>,
    combo: ComboState,
    settings: CombatSettings,
}

impl CombatController {
    pub fn new(settings: CombatSettings) -> Self {
        Self {
            current_weapon: None,
            default_weapon: None,
            combo: ComboState::default(),
            settings,
        }
    }

    /// Set the weapon used when nothing is equipped
    pub fn with_default_weapon(mut self, weapon: Arc<WeaponConfig>) -> Self {
        self.default_weapon = Some(weapon);
        self
    }

    pub fn equip(&mut self, weapon: Arc<WeaponConfig>) {
        info!("Equipped {}", weapon.name);
        self.current_weapon = Some(weapon);
        self.combo.step_index = 0;
    }

    /// Drop the equipped weapon, falling back to the default one
    pub fn unequip(&mut self) -> Option<Arc<WeaponConfig>> {
        self.combo.step_index = 0;
        self.current_weapon.take()
    }

    /// Equipped weapon, else the default one
    pub fn active_weapon(&self) -> Option<&Arc<WeaponConfig>> {
        self.current_weapon.as_ref().or(self.default_weapon.as_ref())
    }

    pub fn combo(&self) -> ComboState {
        self.combo
    }

    /// Step the next attack will play
    pub fn combo_step(&self) -> usize {
        self.combo.step_index
    }

    pub fn settings(&self) -> &CombatSettings {
        &self.settings
    }

    fn attack_weapon(&self) -> Result<Arc<WeaponConfig>, WeaponError> {
        let weapon = self.active_weapon().ok_or(WeaponError::NoWeapon)?;
        if weapon.combo_steps.is_empty() {
            return Err(WeaponError::EmptyCombo(weapon.name.clone()));
        }
        Ok(Arc::clone(weapon))
    }

    /// Handle an attack press. Returns true if an attack started.
    ///
    /// A broken weapon setup is logged and the press ignored, leaving the
    /// state untouched.
    pub fn on_attack_pressed(
        &mut self,
        now: f32,
        state: Option<&mut StateMachine>,
        animator: &mut dyn Animator,
    ) -> bool {
        let weapon = match self.attack_weapon() {
            Ok(weapon) => weapon,
            Err(err) => {
                error!("Attack skipped: {}", err);
                return false;
            }
        };

        if let Some(sm) = state {
            if !sm.can_attack() || !sm.try_transition(PlayerState::Attacking, now) {
                return false;
            }
        }

        if self
            .combo
            .last_attack_time
            .is_some_and(|last| now - last > weapon.combo_reset_time)
        {
            debug!("Combo window expired, restarting {}", weapon.name);
            self.combo.step_index = 0;
        }

        let len = weapon.combo_len();
        let index = self.combo.step_index % len;
        let action = &weapon.combo_steps[index];

        animator.set_trigger(params::ATTACK);
        animator.set_trigger(&action.anim_trigger);
        debug!("{} step {}: {}", weapon.name, index, action.name);

        self.combo.step_index = (index + 1) % len;
        self.combo.last_attack_time = Some(now);
        true
    }

    /// Apply the active weapon's damage to everything in reach of `origin`.
    /// Returns the number of targets hit.
    pub fn execute_hit_check(&self, origin: Vec3, query: &mut dyn DamageQuery) -> usize {
        let Some(weapon) = self.active_weapon() else {
            error!("Hit check skipped: {}", WeaponError::NoWeapon);
            return 0;
        };

        let targets = query.damageables_in_range(origin, weapon.attack_range, self.settings.target_layers);
        let hits = targets.len();
        for target in targets {
            target.take_damage(weapon.base_damage, self.settings.hit_impact_force);
        }

        if hits > 0 {
            info!("{} hit {} target(s)", weapon.name, hits);
        }
        hits
    }
}
