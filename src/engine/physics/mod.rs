// Physics collaborators and the rapier3d-backed world

mod collision;
mod world;

pub use collision::{CollisionLayer, LayerMask};
pub use world::PhysicsWorld;

// Re-export the handle type callers keep around
pub use rapier3d::prelude::ColliderHandle;

use crate::core::Damageable;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Sphere used to probe for ground under the character's feet.
///
/// The sphere is centred `height` above the feet, so it reaches
/// `radius - height` below them. It still touches the floor on the frame
/// after takeoff, so landing only counts once the character stops rising.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbeShape {
    pub radius: f32,
    pub height: f32,
}

impl Default for ProbeShape {
    fn default() -> Self {
        Self {
            radius: 0.28,
            height: 0.14,
        }
    }
}

/// The physical body of the controlled character.
///
/// Positions are at the character's feet.
pub trait CharacterBody {
    /// Current feet position
    fn position(&self) -> Vec3;

    /// Check for ground touching a probe placed at `position`
    fn is_grounded(&self, probe: &ProbeShape, position: Vec3) -> bool;

    /// Request a displacement; collisions may shorten it
    fn move_character(&mut self, displacement: Vec3);
}

/// Spatial lookup of things that can be hit
pub trait DamageQuery {
    /// Every damageable whose collider overlaps the sphere and is on `layers`
    fn damageables_in_range(
        &mut self,
        origin: Vec3,
        radius: f32,
        layers: LayerMask,
    ) -> Vec<&mut dyn Damageable>;
}
