// Input handling
//
// The device layer (keyboard, gamepad, network replay...) lives outside this
// crate. It translates device events into `Action` presses/releases and an
// analog move axis on a `PlayerInput`, which the character reads each tick.
//
// ## Usage Example
//
// ```rust
// use rusted_vanguard::engine::input::{Action, PlayerInput};
//
// let mut input = PlayerInput::new();
// input.press(Action::Jump);
// input.set_move_axis(glam::Vec2::Y);
//
// // ... character.update(...) reads the edges ...
//
// input.end_frame();
// ```

pub mod action;
pub mod player;

// Re-export commonly used types
pub use action::Action;
pub use player::PlayerInput;
