// Character system
//
// This module contains everything related to the playable character:
// - State machine arbitrating what the character may do
// - Movement (gravity, jump buffering, coyote time, facing)
// - Combat (weapon combos and hit checks)
// - Health and damage targets
// - Tuning loaded from RON
// - Diagnostics for debug overlays

pub mod character;
pub mod combat;
pub mod config;
pub mod diagnostics;
pub mod health;
pub mod movement;
pub mod state;
pub mod weapon;

// Re-export commonly used types
pub use character::PlayerCharacter;
pub use combat::{CombatController, ComboState};
pub use config::{CombatSettings, ConfigError, ControllerConfig, MovementSettings};
pub use diagnostics::{DiagnosticsPanel, StateReport};
pub use health::{Health, TrainingDummy};
pub use movement::MovementController;
pub use state::{FollowUp, PlayerState, StateChange, StateMachine, StateTimeouts, SubscriptionId};
pub use weapon::{AttackAction, WeaponConfig, WeaponError};
