use std::sync::Arc;

use anyhow::{Context, Result};
use glam::{Vec2, Vec3};
use log::info;

use rusted_vanguard::core::Damageable;
use rusted_vanguard::engine::animation::RecordingAnimator;
use rusted_vanguard::engine::game_loop::GameLoop;
use rusted_vanguard::engine::input::{Action, PlayerInput};
use rusted_vanguard::engine::physics::{CharacterBody, PhysicsWorld};
use rusted_vanguard::game::characters::{
    ControllerConfig, DiagnosticsPanel, PlayerCharacter, TrainingDummy, WeaponConfig,
};

/// Length of the scripted session
const SESSION_LENGTH: f32 = 5.0;

/// Simulated display refresh, deliberately off the fixed timestep
const FRAME_TIME: f32 = 1.0 / 50.0;

/// Something that happens at a point in the scripted session
#[derive(Debug, Clone, Copy)]
enum Cue {
    Move(Vec2),
    Press(Action),
    Release(Action),
    /// Attack animation reached its hit frame
    HitCheck,
    /// Attack animation ended
    AttackFinished,
    /// The character gets hit by something
    Hurt(f32),
}

const SCRIPT: &[(f32, Cue)] = &[
    (0.10, Cue::Move(Vec2::Y)),
    (0.50, Cue::Press(Action::LockOn)),
    (0.55, Cue::Release(Action::LockOn)),
    (0.80, Cue::Press(Action::Jump)),
    (0.85, Cue::Release(Action::Jump)),
    (1.60, Cue::Move(Vec2::ZERO)),
    // Three-hit combo
    (2.00, Cue::Press(Action::Attack)),
    (2.05, Cue::Release(Action::Attack)),
    (2.20, Cue::HitCheck),
    (2.40, Cue::AttackFinished),
    (2.50, Cue::Press(Action::Attack)),
    (2.55, Cue::Release(Action::Attack)),
    (2.70, Cue::HitCheck),
    (2.90, Cue::AttackFinished),
    (3.00, Cue::Press(Action::Attack)),
    (3.05, Cue::Release(Action::Attack)),
    (3.20, Cue::HitCheck),
    (3.40, Cue::AttackFinished),
    (3.60, Cue::Hurt(20.0)),
    (4.30, Cue::Press(Action::Roll)),
    (4.35, Cue::Release(Action::Roll)),
];

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Rusted Vanguard demo...");

    let config = match std::env::args().nth(1) {
        Some(path) => ControllerConfig::load(&path)
            .with_context(|| format!("loading controller config from {}", path))?,
        None => ControllerConfig::default(),
    };

    // Arena: a floor and one dummy a few steps ahead
    let mut world: PhysicsWorld<TrainingDummy> = PhysicsWorld::new();
    world.add_ground(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));
    world.spawn_character(Vec3::ZERO, 0.3, 0.6);
    let dummy_position = Vec3::new(0.0, 1.0, 9.0);
    world.add_target(dummy_position, 0.5, TrainingDummy::new("Training Dummy", 50.0));
    world.step();

    let mut player = PlayerCharacter::new("Vanguard", &config)
        .with_default_weapon(Arc::new(WeaponConfig::training_sword()));
    player.set_lock_candidate(Some(dummy_position));
    let mut panel = DiagnosticsPanel::attach(player.state_mut(), DiagnosticsPanel::DEFAULT_CAPACITY);

    let mut input = PlayerInput::new();
    let mut animator = RecordingAnimator::new();
    let mut game_loop = GameLoop::new();
    let mut script = SCRIPT.iter().peekable();

    while game_loop.now() < SESSION_LENGTH {
        for frame in game_loop.advance(FRAME_TIME) {
            while let Some(&&(at, cue)) = script.peek() {
                if at > frame.now {
                    break;
                }
                script.next();

                match cue {
                    Cue::Move(axis) => input.set_move_axis(axis),
                    Cue::Press(action) => input.press(action),
                    Cue::Release(action) => input.release(action),
                    Cue::HitCheck => {
                        let hits = player.on_hit_check(world.position(), &mut world);
                        info!("Hit check at {:.2}s: {} target(s)", frame.now, hits);
                    }
                    Cue::AttackFinished => player.on_attack_finished(frame.now),
                    Cue::Hurt(amount) => player.take_damage(amount, 5.0),
                }
            }

            player.update(frame, &input, &mut world, &mut animator);
            world.step();
            input.end_frame();
        }
    }

    info!("Player at {:?}", world.position());
    for line in panel.report(player.state(), game_loop.now()).lines() {
        info!("{}", line);
    }
    for dummy in world.targets() {
        info!(
            "{}: {:.0}/{:.0} health after {} hit(s), knockback {:?}",
            dummy.name,
            dummy.health.current(),
            dummy.health.max(),
            dummy.hits,
            dummy.knockback(player.movement().forward())
        );
    }
    info!(
        "{} updates over {} frames, animation triggers: {:?}",
        game_loop.update_count(),
        game_loop.frame_count(),
        animator.fired()
    );

    panel.detach(player.state_mut());
    info!("Shutting down...");

    Ok(())
}
