// Player character: wires state, movement, combat and health together

use std::sync::Arc;

use glam::Vec3;
use log::{debug, info};

use super::combat::CombatController;
use super::config::ControllerConfig;
use super::health::Health;
use super::movement::MovementController;
use super::state::{PlayerState, StateMachine};
use super::weapon::WeaponConfig;
use crate::core::Damageable;
use crate::engine::animation::{params, Animator};
use crate::engine::game_loop::FrameTime;
use crate::engine::input::{Action, PlayerInput};
use crate::engine::physics::{CharacterBody, DamageQuery};

/// The player-controlled character
#[derive(Debug)]
pub struct PlayerCharacter {
    /// Character name (for display)
    pub name: String,

    state: StateMachine,
    movement: MovementController,
    combat: CombatController,
    health: Health,

    /// Where lock-on would aim if toggled on
    lock_candidate: Option<Vec3>,

    /// Time of the last update
    now: f32,
}

impl PlayerCharacter {
    pub fn new(name: &str, config: &ControllerConfig) -> Self {
        Self {
            name: name.to_string(),
            state: StateMachine::new(config.timeouts),
            movement: MovementController::new(config.movement.clone()),
            combat: CombatController::new(config.combat.clone()),
            health: Health::new(config.max_health),
            lock_candidate: None,
            now: 0.0,
        }
    }

    /// Give the character a fallback weapon
    pub fn with_default_weapon(mut self, weapon: Arc<WeaponConfig>) -> Self {
        self.combat = self.combat.with_default_weapon(weapon);
        self
    }

    /// Run one fixed update.
    ///
    /// Order: state timeouts, input edges, then movement. Movement reads the
    /// state after every request of this tick has been resolved.
    pub fn update(
        &mut self,
        frame: FrameTime,
        input: &PlayerInput,
        body: &mut dyn CharacterBody,
        animator: &mut dyn Animator,
    ) {
        let now = frame.now;
        self.now = now;

        self.state.tick(now);

        if input.just_pressed(Action::Jump) {
            self.movement.request_jump();
        }

        if input.just_pressed(Action::Attack) {
            self.combat.on_attack_pressed(now, Some(&mut self.state), animator);
        }

        if input.just_pressed(Action::Roll) {
            self.try_roll(now, animator);
        }

        if input.just_pressed(Action::LockOn) {
            self.toggle_lock_on();
        }

        self.movement
            .tick(now, frame.dt, input, Some(&mut self.state), body, animator);
    }

    /// Start a dodge roll if the state allows it
    pub fn try_roll(&mut self, now: f32, animator: &mut dyn Animator) -> bool {
        if !self.state.can_roll() || !self.state.try_transition(PlayerState::Rolling, now) {
            return false;
        }
        animator.set_trigger(params::ROLL);
        true
    }

    /// Attack animation reached its end
    pub fn on_attack_finished(&mut self, now: f32) {
        if self.state.state() == PlayerState::Attacking {
            self.state.try_transition(PlayerState::Idle, now);
        }
    }

    /// Where hits originate for a character standing at `position`
    pub fn attack_origin(&self, position: Vec3) -> Vec3 {
        position + self.movement.rotation() * self.combat.settings().attack_point
    }

    /// Attack animation reached its hit frame
    pub fn on_hit_check(&self, position: Vec3, query: &mut dyn DamageQuery) -> usize {
        self.combat
            .execute_hit_check(self.attack_origin(position), query)
    }

    /// Point lock-on aims at when toggled on (usually the nearest enemy)
    pub fn set_lock_candidate(&mut self, target: Option<Vec3>) {
        self.lock_candidate = target;
    }

    fn toggle_lock_on(&mut self) {
        if self.movement.lock_target().is_some() {
            self.movement.set_lock_target(None);
            debug!("{} lock-on released", self.name);
        } else if let Some(target) = self.lock_candidate {
            self.movement.set_lock_target(Some(target));
            debug!("{} locked on at {:?}", self.name, target);
        }
    }

    pub fn state(&self) -> &StateMachine {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut StateMachine {
        &mut self.state
    }

    pub fn movement(&self) -> &MovementController {
        &self.movement
    }

    pub fn movement_mut(&mut self) -> &mut MovementController {
        &mut self.movement
    }

    pub fn combat(&self) -> &CombatController {
        &self.combat
    }

    pub fn combat_mut(&mut self) -> &mut CombatController {
        &mut self.combat
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    /// Check if the character is alive
    pub fn is_alive(&self) -> bool {
        self.state.state() != PlayerState::Dead
    }

    /// Time of the last update
    pub fn now(&self) -> f32 {
        self.now
    }
}

impl Damageable for PlayerCharacter {
    fn take_damage(&mut self, amount: f32, impact_force: f32) {
        if !self.is_alive() {
            return;
        }

        self.health.reduce_health(amount);
        info!(
            "{} took {:.1} damage (impact {:.1}), {:.1} left",
            self.name,
            amount,
            impact_force,
            self.health.current()
        );

        let next = if self.health.is_depleted() {
            PlayerState::Dead
        } else {
            PlayerState::TakingDamage
        };
        self.state.try_transition(next, self.now);
    }
}
