use glam::Vec3;
use rapier3d::control::KinematicCharacterController;
use rapier3d::prelude::*;
use std::collections::HashSet;

use super::collision::{CollisionLayer, LayerMask};
use super::{CharacterBody, DamageQuery, ProbeShape};
use crate::core::Damageable;

/// The kinematic capsule driven by the character controller
struct CharacterProxy {
    body: RigidBodyHandle,
    collider: ColliderHandle,
    /// Distance from the capsule centre down to the feet
    foot_offset: Real,
    controller: KinematicCharacterController,
}

/// A hittable target and the collider it occupies
struct TargetEntry<T> {
    collider: ColliderHandle,
    target: T,
}

/// Physics world hosting the controlled character, level geometry and
/// hittable targets.
///
/// Moves requested through [`CharacterBody::move_character`] are committed
/// by the next [`PhysicsWorld::step`], which also refreshes the query
/// pipeline used by ground probes and hit queries.
pub struct PhysicsWorld<T> {
    /// Gravity vector (only affects dynamic bodies; the character integrates its own)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,

    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for ground probes and hit queries
    query_pipeline: QueryPipeline,

    /// Rigid body set
    rigid_body_set: RigidBodySet,

    /// Collider set
    collider_set: ColliderSet,

    /// The controlled character, once spawned
    character: Option<CharacterProxy>,

    /// Hittable targets
    targets: Vec<TargetEntry<T>>,
}

impl<T> PhysicsWorld<T> {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: to_vector(gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            character: None,
            targets: Vec::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a static box of level geometry
    pub fn add_ground(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_vector(center))
            .collision_groups(CollisionLayer::Environment.to_interaction_groups())
            .build();
        self.collider_set.insert(collider)
    }

    /// Spawn the controlled character as a kinematic capsule standing at `feet`.
    /// Replaces any previously spawned character.
    pub fn spawn_character(&mut self, feet: Vec3, radius: f32, half_height: f32) -> RigidBodyHandle {
        if let Some(previous) = self.character.take() {
            self.rigid_body_set.remove(
                previous.body,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true, // remove attached colliders
            );
        }

        let foot_offset = half_height + radius;
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(vector![feet.x, feet.y + foot_offset, feet.z])
            .build();
        let body = self.rigid_body_set.insert(body);

        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .collision_groups(CollisionLayer::Player.to_interaction_groups())
            .build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);

        self.character = Some(CharacterProxy {
            body,
            collider,
            foot_offset,
            controller: KinematicCharacterController::default(),
        });

        body
    }

    /// Add a hittable target occupying a sphere on the enemy layer
    pub fn add_target(&mut self, position: Vec3, radius: f32, target: T) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius)
            .translation(to_vector(position))
            .collision_groups(CollisionLayer::Enemy.to_interaction_groups())
            .build();
        let collider = self.collider_set.insert(collider);
        self.targets.push(TargetEntry { collider, target });
        collider
    }

    /// Get a target by its collider
    pub fn target(&self, handle: ColliderHandle) -> Option<&T> {
        self.targets
            .iter()
            .find(|entry| entry.collider == handle)
            .map(|entry| &entry.target)
    }

    /// Get all targets
    pub fn targets(&self) -> impl Iterator<Item = &T> {
        self.targets.iter().map(|entry| &entry.target)
    }
}

impl<T> Default for PhysicsWorld<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CharacterBody for PhysicsWorld<T> {
    fn position(&self) -> Vec3 {
        let Some(character) = &self.character else {
            return Vec3::ZERO;
        };
        let Some(body) = self.rigid_body_set.get(character.body) else {
            return Vec3::ZERO;
        };

        let center = body.translation();
        Vec3::new(center.x, center.y - character.foot_offset, center.z)
    }

    fn is_grounded(&self, probe: &ProbeShape, position: Vec3) -> bool {
        let center = position + Vec3::Y * probe.height;
        let shape_pos = Isometry::translation(center.x, center.y, center.z);
        let shape = Ball::new(probe.radius);

        let mut filter = QueryFilter::new().groups(LayerMask::ENVIRONMENT.to_query_groups());
        if let Some(character) = &self.character {
            filter = filter.exclude_rigid_body(character.body);
        }

        self.query_pipeline
            .intersection_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape,
                filter,
            )
            .is_some()
    }

    fn move_character(&mut self, displacement: Vec3) {
        let Some(character) = &self.character else {
            return;
        };
        let (Some(body), Some(collider)) = (
            self.rigid_body_set.get(character.body),
            self.collider_set.get(character.collider),
        ) else {
            return;
        };

        let filter = QueryFilter::new()
            .exclude_rigid_body(character.body)
            .groups(CollisionLayer::Player.to_interaction_groups());

        let movement = character.controller.move_shape(
            self.integration_parameters.dt,
            &self.rigid_body_set,
            &self.collider_set,
            &self.query_pipeline,
            collider.shape(),
            body.position(),
            to_vector(displacement),
            filter,
            |_| {},
        );

        let next = body.translation() + movement.translation;
        if let Some(body) = self.rigid_body_set.get_mut(character.body) {
            body.set_next_kinematic_translation(next);
        }
    }
}

impl<T: Damageable + 'static> DamageQuery for PhysicsWorld<T> {
    fn damageables_in_range(
        &mut self,
        origin: Vec3,
        radius: f32,
        layers: LayerMask,
    ) -> Vec<&mut dyn Damageable> {
        let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);
        let shape = Ball::new(radius);
        let filter = QueryFilter::new().groups(layers.to_query_groups());

        let mut hits = HashSet::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape,
            filter,
            |handle| {
                hits.insert(handle);
                true // keep searching
            },
        );

        self.targets
            .iter_mut()
            .filter(|entry| hits.contains(&entry.collider))
            .map(|entry| &mut entry.target as &mut dyn Damageable)
            .collect()
    }
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}
