// Movement controller
//
// Runs once per tick in a fixed phase order:
// ground probe -> timers -> gravity -> jump -> horizontal -> rotation
// -> apply -> animation sync.
// Each phase reads what the previous one wrote, so the order is load-bearing.

use glam::{Quat, Vec2, Vec3};
use log::debug;

use super::config::MovementSettings;
use super::state::{PlayerState, StateMachine};
use crate::core::math::{heading_direction, heading_of, move_towards, smooth_damp_angle, yaw_of};
use crate::core::GraceWindow;
use crate::engine::animation::{params, Animator};
use crate::engine::input::PlayerInput;
use crate::engine::physics::CharacterBody;

/// Vertical motion, jump timing and facing of the player character
#[derive(Debug)]
pub struct MovementController {
    settings: MovementSettings,

    // Vertical motion
    vertical_velocity: f32,
    grounded: bool,
    jump_consumed: bool,

    // Jump timing
    jump_buffer: GraceWindow,
    coyote: GraceWindow,
    last_jump_time: Option<f32>,

    // Facing
    rotation: Quat,
    yaw_velocity: f32,
    lock_target: Option<Vec3>,

    /// Smoothed animation blend axes
    anim_axes: Vec2,
}

impl MovementController {
    pub fn new(settings: MovementSettings) -> Self {
        Self {
            settings,
            vertical_velocity: 0.0,
            grounded: false,
            jump_consumed: false,
            jump_buffer: GraceWindow::new(),
            coyote: GraceWindow::new(),
            last_jump_time: None,
            rotation: Quat::IDENTITY,
            yaw_velocity: 0.0,
            lock_target: None,
            anim_axes: Vec2::ZERO,
        }
    }

    /// Remember a jump press; it is honored if the character can jump
    /// before the buffer runs out
    pub fn request_jump(&mut self) {
        self.jump_buffer.open(self.settings.jump_buffer_time);
    }

    /// Face a point instead of the movement direction
    pub fn set_lock_target(&mut self, target: Option<Vec3>) {
        self.lock_target = target;
    }

    pub fn lock_target(&self) -> Option<Vec3> {
        self.lock_target
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Ground contact as of the last tick
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_jump_consumed(&self) -> bool {
        self.jump_consumed
    }

    pub fn jump_buffer(&self) -> GraceWindow {
        self.jump_buffer
    }

    pub fn coyote(&self) -> GraceWindow {
        self.coyote
    }

    pub fn last_jump_time(&self) -> Option<f32> {
        self.last_jump_time
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Facing direction on the XZ plane
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn anim_axes(&self) -> Vec2 {
        self.anim_axes
    }

    /// Advance one tick.
    ///
    /// Without a state machine every permission check passes.
    pub fn tick(
        &mut self,
        now: f32,
        dt: f32,
        input: &PlayerInput,
        mut state: Option<&mut StateMachine>,
        body: &mut dyn CharacterBody,
        animator: &mut dyn Animator,
    ) {
        // Ground probe
        let position = body.position();
        self.grounded = body.is_grounded(&self.settings.ground_probe, position);

        // Timers
        if self.grounded {
            self.coyote.open(self.settings.coyote_time);
            self.jump_consumed = false;
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = self.settings.grounded_stick_velocity;
            }
        } else {
            self.coyote.tick(dt);
        }
        self.jump_buffer.tick(dt);

        // Landing; a rising character still inside the probe has not landed
        if self.grounded && self.vertical_velocity <= 0.0 {
            if let Some(sm) = state.as_deref_mut() {
                if sm.state() == PlayerState::Jumping && sm.try_transition(PlayerState::Idle, now) {
                    animator.reset_trigger(params::JUMP);
                }
            }
        }

        // Gravity
        self.vertical_velocity += self.settings.gravity * dt;

        // Jump
        if self.can_start_jump(now, state.as_deref()) {
            self.vertical_velocity = self.settings.jump_velocity();
            self.jump_consumed = true;
            self.jump_buffer.close();
            self.coyote.close();
            self.last_jump_time = Some(now);

            if let Some(sm) = state.as_deref_mut() {
                sm.try_transition(PlayerState::Jumping, now);
            }
            animator.set_trigger(params::JUMP);
            debug!("Jump at {:.2}s, velocity {:.2}", now, self.vertical_velocity);
        }

        // Horizontal
        let axis = input.move_axis();
        let can_move = state.as_deref().map_or(true, StateMachine::can_move);
        let moving = axis.length() > self.settings.input_deadzone && can_move;

        let mut heading = None;
        let mut horizontal = Vec3::ZERO;
        if moving {
            let yaw = heading_of(axis) + input.camera_yaw();
            let speed = if self.grounded {
                self.settings.move_speed
            } else {
                self.settings.move_speed * self.settings.air_control
            };
            horizontal = heading_direction(yaw) * speed;
            heading = Some(yaw);
        }

        if self.grounded {
            if let Some(sm) = state.as_deref_mut() {
                match (sm.state(), moving) {
                    (PlayerState::Idle, true) => {
                        sm.try_transition(PlayerState::Running, now);
                    }
                    (PlayerState::Running, false) => {
                        sm.try_transition(PlayerState::Idle, now);
                    }
                    _ => {}
                }
            }
        }

        // Rotation
        match self.lock_target {
            Some(target) => self.face_target(position, target, dt),
            None => {
                if let Some(yaw) = heading {
                    let current = yaw_of(self.rotation);
                    let smoothed = smooth_damp_angle(
                        current,
                        yaw,
                        &mut self.yaw_velocity,
                        self.settings.rotation_smooth_time,
                        dt,
                    );
                    self.rotation = Quat::from_rotation_y(smoothed);
                }
            }
        }

        // Apply
        let displacement = (horizontal + Vec3::Y * self.vertical_velocity) * dt;
        body.move_character(displacement);

        // Animation sync
        animator.set_bool(params::IS_GROUNDED, self.grounded);
        self.sync_axes(axis, dt, animator);
    }

    fn can_start_jump(&self, now: f32, state: Option<&StateMachine>) -> bool {
        let cooldown_elapsed = self
            .last_jump_time
            .map_or(true, |last| now - last > self.settings.jump_cooldown);

        self.jump_buffer.is_open()
            && self.coyote.is_open()
            && !self.jump_consumed
            && cooldown_elapsed
            && state.map_or(true, |sm| sm.can_jump(now))
    }

    fn face_target(&mut self, position: Vec3, target: Vec3, dt: f32) {
        let to_target = target - position;
        let flat = Vec2::new(to_target.x, to_target.z);
        if flat.length_squared() < 1e-6 {
            return;
        }

        let desired = Quat::from_rotation_y(heading_of(flat));
        let t = (self.settings.lock_rotation_speed * dt).clamp(0.0, 1.0);
        self.rotation = self.rotation.slerp(desired, t).normalize();
        self.yaw_velocity = 0.0;
    }

    fn sync_axes(&mut self, axis: Vec2, dt: f32, animator: &mut dyn Animator) {
        let target = if self.lock_target.is_some() {
            axis
        } else {
            Vec2::new(axis.x, axis.length())
        };

        let step = self.settings.axis_blend_rate * dt;
        self.anim_axes = Vec2::new(
            move_towards(self.anim_axes.x, target.x, step),
            move_towards(self.anim_axes.y, target.y, step),
        );

        animator.set_float(params::AXIS_X, self.anim_axes.x);
        animator.set_float(params::AXIS_Y, self.anim_axes.y);
    }
}

impl Default for MovementController {
    fn default() -> Self {
        Self::new(MovementSettings::default())
    }
}
