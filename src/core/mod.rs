// Core utilities shared by the engine and game layers

pub mod damage;
pub mod math;
pub mod timer;

pub use damage::Damageable;
pub use timer::GraceWindow;
