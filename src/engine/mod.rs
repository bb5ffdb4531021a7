// Engine modules: game loop, input, animation and physics collaborators

pub mod animation;
pub mod game_loop;
pub mod input;
pub mod physics;
