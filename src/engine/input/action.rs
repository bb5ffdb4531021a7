// Game action definitions

/// Represents all discrete in-game actions.
///
/// Device polling and key bindings live outside this crate; whatever reads
/// the devices reports presses and releases of these actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    Jump,
    Roll,

    // Combat
    Attack,
    LockOn,
}

impl Action {
    /// All actions, in declaration order
    pub const ALL: [Action; 4] = [Action::Jump, Action::Roll, Action::Attack, Action::LockOn];

    /// Human readable name (for logs)
    pub fn name(&self) -> &'static str {
        match self {
            Action::Jump => "jump",
            Action::Roll => "roll",
            Action::Attack => "attack",
            Action::LockOn => "lock_on",
        }
    }
}
