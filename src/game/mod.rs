// Gameplay logic built on top of the engine layer

pub mod characters;
