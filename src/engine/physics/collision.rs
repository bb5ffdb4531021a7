use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Collision layers for filtering what objects can interact with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionLayer {
    /// The controlled character
    Player = 0b0000_0001,

    /// Hostile targets (anything combat may hit)
    Enemy = 0b0000_0010,

    /// Static ground, platforms and walls
    Environment = 0b0000_0100,
}

impl CollisionLayer {
    /// Mask containing just this layer
    pub fn mask(self) -> LayerMask {
        LayerMask(self as u32)
    }

    /// Convert to rapier3d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // The character is blocked by level geometry and bumps into enemies
            CollisionLayer::Player => Group::from_bits_truncate(
                CollisionLayer::Enemy as u32 | CollisionLayer::Environment as u32,
            ),

            // Enemies collide with everything
            CollisionLayer::Enemy => Group::ALL,

            // Level geometry collides with everything
            CollisionLayer::Environment => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Set of collision layers, used to filter queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const PLAYER: LayerMask = LayerMask(CollisionLayer::Player as u32);
    pub const ENEMY: LayerMask = LayerMask(CollisionLayer::Enemy as u32);
    pub const ENVIRONMENT: LayerMask = LayerMask(CollisionLayer::Environment as u32);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if a layer is part of this mask
    pub fn contains(self, layer: CollisionLayer) -> bool {
        self.0 & layer as u32 != 0
    }

    /// Query groups that accept any collider whose membership is in this mask
    pub fn to_query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, Group::from_bits_truncate(self.0))
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ENEMY
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        LayerMask(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_layer_bits_unique() {
        let layers = [
            CollisionLayer::Player,
            CollisionLayer::Enemy,
            CollisionLayer::Environment,
        ];

        for (i, layer1) in layers.iter().enumerate() {
            for (j, layer2) in layers.iter().enumerate() {
                if i != j {
                    assert_ne!(*layer1 as u32, *layer2 as u32, "Layers must have unique bits");
                }
            }
        }
    }

    #[test]
    fn test_player_does_not_collide_with_player() {
        let groups = CollisionLayer::Player.to_interaction_groups();
        assert!(!groups.filter.contains(groups.memberships));
    }

    #[test]
    fn test_layer_mask_contains() {
        let mask = LayerMask::ENEMY | LayerMask::ENVIRONMENT;
        assert!(mask.contains(CollisionLayer::Enemy));
        assert!(mask.contains(CollisionLayer::Environment));
        assert!(!mask.contains(CollisionLayer::Player));
        assert!(!LayerMask::NONE.contains(CollisionLayer::Enemy));
    }

    #[test]
    fn test_default_mask_targets_enemies() {
        assert_eq!(LayerMask::default(), CollisionLayer::Enemy.mask());
    }
}
