//! Third-person action character controller.
//!
//! `core` holds small shared building blocks, `engine` the collaborators the
//! controller talks to (input, animation, physics, timing) and `game` the
//! character itself.

pub mod core;
pub mod engine;
pub mod game;
