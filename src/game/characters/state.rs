// Player state machine
//
// The single authority on what the character is doing. Movement and combat
// request transitions and read back permission queries; nothing else writes
// the state.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// How long into an attack or roll a jump may cancel it (seconds)
pub const LATE_CANCEL_WINDOW: f32 = 0.3;

/// How many chained transitions listeners may trigger from one request
const MAX_FOLLOW_UP_DEPTH: usize = 1;

/// Represents the current state of the player character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    /// Standing still
    #[default]
    Idle,
    /// Moving on the ground
    Running,
    /// Airborne after a jump
    Jumping,
    /// Playing an attack from the combo
    Attacking,
    /// Hit reaction
    TakingDamage,
    /// Dodge roll
    Rolling,
    /// Character is dead; no way out
    Dead,
}

impl PlayerState {
    /// All states, in declaration order
    pub const ALL: [PlayerState; 7] = [
        PlayerState::Idle,
        PlayerState::Running,
        PlayerState::Jumping,
        PlayerState::Attacking,
        PlayerState::TakingDamage,
        PlayerState::Rolling,
        PlayerState::Dead,
    ];

    /// States reachable through the adjacency table.
    ///
    /// Dead and TakingDamage are also reachable from everywhere through the
    /// global overrides in [`can_transition`].
    pub fn allowed_targets(&self) -> &'static [PlayerState] {
        use PlayerState::*;
        match self {
            Idle => &[Running, Jumping, Attacking, Rolling],
            Running => &[Rolling, Attacking, Idle, Jumping],
            Jumping => &[Idle, Running, TakingDamage],
            Attacking => &[Idle, TakingDamage],
            Rolling => &[Idle, TakingDamage],
            TakingDamage => &[Idle],
            Dead => &[],
        }
    }

    /// Get the name of this state (for logs and diagnostics)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
            Self::Jumping => "Jumping",
            Self::Attacking => "Attacking",
            Self::TakingDamage => "TakingDamage",
            Self::Rolling => "Rolling",
            Self::Dead => "Dead",
        }
    }
}

impl std::fmt::Display for PlayerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Check if `from -> to` is a legal transition.
///
/// Pure function of the two states: same-state requests and anything out of
/// Dead are refused, Dead and TakingDamage are always reachable, everything
/// else goes through the adjacency table.
pub fn can_transition(from: PlayerState, to: PlayerState) -> bool {
    if from == to || from == PlayerState::Dead {
        return false;
    }

    if matches!(to, PlayerState::Dead | PlayerState::TakingDamage) {
        return true;
    }

    from.allowed_targets().contains(&to)
}

/// How long the timed states may last before falling back to Idle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateTimeouts {
    pub attacking: f32,
    pub rolling: f32,
    pub taking_damage: f32,
}

impl StateTimeouts {
    /// Timeout for a state, if that state times out at all
    pub fn for_state(&self, state: PlayerState) -> Option<f32> {
        match state {
            PlayerState::Attacking => Some(self.attacking),
            PlayerState::Rolling => Some(self.rolling),
            PlayerState::TakingDamage => Some(self.taking_damage),
            _ => None,
        }
    }
}

impl Default for StateTimeouts {
    fn default() -> Self {
        Self {
            attacking: 2.0,
            rolling: 1.0,
            taking_damage: 0.5,
        }
    }
}

/// An accepted transition, as delivered to listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateChange {
    pub from: PlayerState,
    pub to: PlayerState,
    /// Time the transition happened
    pub at: f32,
}

/// Slot through which listeners may ask for one more transition.
///
/// Only the first request made during a notification round is kept; it is
/// carried out after every listener has seen the change.
#[derive(Debug, Default)]
pub struct FollowUp {
    requested: Option<PlayerState>,
}

impl FollowUp {
    /// Ask for a transition once notification finishes.
    /// Returns false if another listener already asked for one.
    pub fn request(&mut self, state: PlayerState) -> bool {
        if self.requested.is_some() {
            return false;
        }
        self.requested = Some(state);
        true
    }

    /// The pending request, if any
    pub fn requested(&self) -> Option<PlayerState> {
        self.requested
    }
}

/// Identifies a listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback run on every accepted transition
pub type StateListener = Box<dyn FnMut(&StateChange, &mut FollowUp)>;

/// State machine that owns the authoritative player state
pub struct StateMachine {
    current_state: PlayerState,
    previous_state: PlayerState,
    /// Time the current state was entered
    entered_at: f32,
    timeouts: StateTimeouts,
    listeners: Vec<(SubscriptionId, StateListener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("current_state", &self.current_state)
            .field("previous_state", &self.previous_state)
            .field("entered_at", &self.entered_at)
            .field("timeouts", &self.timeouts)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new(StateTimeouts::default())
    }
}

impl StateMachine {
    /// Create a machine in Idle, entered at time zero
    pub fn new(timeouts: StateTimeouts) -> Self {
        debug!("Initial state: {}", PlayerState::Idle);
        Self {
            current_state: PlayerState::Idle,
            previous_state: PlayerState::Idle,
            entered_at: 0.0,
            timeouts,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Get the current state
    pub fn state(&self) -> PlayerState {
        self.current_state
    }

    /// Get the previous state
    pub fn previous_state(&self) -> PlayerState {
        self.previous_state
    }

    /// Get the time the current state was entered
    pub fn entered_at(&self) -> f32 {
        self.entered_at
    }

    /// Get time spent in the current state
    pub fn state_duration(&self, now: f32) -> f32 {
        now - self.entered_at
    }

    /// Register a listener; listeners run in registration order
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StateChange, &mut FollowUp) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener, returns false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(registered, _)| *registered != id);
        self.listeners.len() != before
    }

    /// Request a transition. Returns false (and changes nothing) if the
    /// transition is not legal from the current state.
    pub fn try_transition(&mut self, new_state: PlayerState, now: f32) -> bool {
        self.transition(new_state, now, 0)
    }

    fn transition(&mut self, new_state: PlayerState, now: f32, depth: usize) -> bool {
        if new_state == self.current_state {
            debug!("Already in {}", new_state);
            return false;
        }

        if !can_transition(self.current_state, new_state) {
            debug!("Transition rejected: {} -> {}", self.current_state, new_state);
            return false;
        }

        let from = self.current_state;
        self.on_state_exit(from);

        self.previous_state = from;
        self.current_state = new_state;
        self.entered_at = now;

        self.on_state_enter(new_state);

        let change = StateChange {
            from,
            to: new_state,
            at: now,
        };
        let mut follow_up = FollowUp::default();
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change, &mut follow_up);
        }

        debug!("State changed: {} -> {}", from, new_state);

        if let Some(next) = follow_up.requested {
            if depth < MAX_FOLLOW_UP_DEPTH {
                self.transition(next, now, depth + 1);
            } else {
                warn!(
                    "Dropping chained transition request to {} (after {} -> {})",
                    next, from, new_state
                );
            }
        }

        true
    }

    /// Update the state machine (called every frame).
    /// Timed states fall back to Idle once their timeout is exceeded.
    pub fn tick(&mut self, now: f32) {
        let Some(timeout) = self.timeouts.for_state(self.current_state) else {
            return;
        };

        if self.state_duration(now) > timeout {
            info!("{} timed out, returning to {}", self.current_state, PlayerState::Idle);
            self.try_transition(PlayerState::Idle, now);
        }
    }

    /// Check if an attack may start
    pub fn can_attack(&self) -> bool {
        !matches!(
            self.current_state,
            PlayerState::Attacking | PlayerState::TakingDamage | PlayerState::Dead | PlayerState::Rolling
        )
    }

    /// Check if a roll may start
    pub fn can_roll(&self) -> bool {
        !matches!(self.current_state, PlayerState::Dead | PlayerState::Rolling)
    }

    /// Check if a jump may start; attacks and rolls can be cancelled into a
    /// jump once they are past [`LATE_CANCEL_WINDOW`]
    pub fn can_jump(&self, now: f32) -> bool {
        match self.current_state {
            PlayerState::Idle | PlayerState::Running => true,
            PlayerState::Attacking | PlayerState::Rolling => {
                self.state_duration(now) > LATE_CANCEL_WINDOW
            }
            PlayerState::Jumping | PlayerState::TakingDamage | PlayerState::Dead => false,
        }
    }

    /// Check if player input may move the character
    pub fn can_move(&self) -> bool {
        !matches!(
            self.current_state,
            PlayerState::Attacking | PlayerState::Rolling | PlayerState::TakingDamage | PlayerState::Dead
        )
    }

    fn on_state_enter(&self, state: PlayerState) {
        match state {
            PlayerState::Attacking => debug!("Entering attack state"),
            PlayerState::Rolling => debug!("Entering roll state"),
            PlayerState::TakingDamage => debug!("Entering hit reaction"),
            PlayerState::Dead => info!("Player died"),
            _ => {}
        }
    }

    fn on_state_exit(&self, state: PlayerState) {
        match state {
            PlayerState::Attacking => debug!("Attack state ended"),
            PlayerState::Rolling => debug!("Roll state ended"),
            PlayerState::TakingDamage => debug!("Hit reaction ended"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Put a fresh machine into `state` through legal transitions
    fn machine_in(state: PlayerState) -> StateMachine {
        let mut sm = StateMachine::default();
        if state != PlayerState::Idle {
            assert!(sm.try_transition(state, 0.0), "could not reach {state} from Idle");
        }
        sm
    }

    #[test]
    fn test_initial_state() {
        let sm = StateMachine::default();
        assert_eq!(sm.state(), PlayerState::Idle);
        assert_eq!(sm.previous_state(), PlayerState::Idle);
        assert_eq!(sm.entered_at(), 0.0);
    }

    #[test]
    fn test_every_pair_follows_the_table() {
        for from in PlayerState::ALL {
            for to in PlayerState::ALL {
                let mut sm = machine_in(from);
                let accepted = sm.try_transition(to, 1.0);

                let expected = from != to
                    && from != PlayerState::Dead
                    && (matches!(to, PlayerState::Dead | PlayerState::TakingDamage)
                        || from.allowed_targets().contains(&to));

                assert_eq!(accepted, expected, "{from} -> {to}");
                assert_eq!(accepted, can_transition(from, to), "{from} -> {to}");
                assert_eq!(sm.state(), if accepted { to } else { from }, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_dead_reachable_from_every_living_state() {
        for from in PlayerState::ALL.into_iter().filter(|s| *s != PlayerState::Dead) {
            let mut sm = machine_in(from);
            assert!(sm.try_transition(PlayerState::Dead, 1.0), "{from} -> Dead");
        }
    }

    #[test]
    fn test_taking_damage_reachable_from_every_living_state() {
        for from in PlayerState::ALL {
            let mut sm = machine_in(from);
            let expected = !matches!(from, PlayerState::Dead | PlayerState::TakingDamage);
            assert_eq!(sm.try_transition(PlayerState::TakingDamage, 1.0), expected, "{from}");
        }
    }

    #[test]
    fn test_dead_is_absorbing() {
        let mut sm = machine_in(PlayerState::Dead);
        for to in PlayerState::ALL {
            assert!(!sm.try_transition(to, 5.0));
            assert_eq!(sm.state(), PlayerState::Dead);
        }
        sm.tick(100.0);
        assert_eq!(sm.state(), PlayerState::Dead);
    }

    #[test]
    fn test_transition_records_previous_and_time() {
        let mut sm = StateMachine::default();
        assert!(sm.try_transition(PlayerState::Running, 1.5));
        assert_eq!(sm.state(), PlayerState::Running);
        assert_eq!(sm.previous_state(), PlayerState::Idle);
        assert_eq!(sm.entered_at(), 1.5);
        assert_eq!(sm.state_duration(2.0), 0.5);
    }

    #[test]
    fn test_rejected_transition_keeps_timestamp() {
        let mut sm = StateMachine::default();
        sm.try_transition(PlayerState::Attacking, 1.0);
        assert!(!sm.try_transition(PlayerState::Running, 1.2));
        assert!(!sm.try_transition(PlayerState::Attacking, 1.3));
        assert_eq!(sm.entered_at(), 1.0);
    }

    #[test]
    fn test_attack_timeout() {
        let mut sm = StateMachine::default();
        assert!(sm.try_transition(PlayerState::Attacking, 0.0));

        sm.tick(1.99);
        assert_eq!(sm.state(), PlayerState::Attacking);

        sm.tick(2.01);
        assert_eq!(sm.state(), PlayerState::Idle);
        assert_eq!(sm.previous_state(), PlayerState::Attacking);
    }

    #[test]
    fn test_timeouts_are_per_state() {
        let timeouts = StateTimeouts {
            attacking: 2.0,
            rolling: 1.0,
            taking_damage: 0.5,
        };

        let mut sm = StateMachine::new(timeouts);
        sm.try_transition(PlayerState::Rolling, 0.0);
        sm.tick(0.9);
        assert_eq!(sm.state(), PlayerState::Rolling);
        sm.tick(1.1);
        assert_eq!(sm.state(), PlayerState::Idle);

        sm.try_transition(PlayerState::TakingDamage, 2.0);
        sm.tick(2.4);
        assert_eq!(sm.state(), PlayerState::TakingDamage);
        sm.tick(2.6);
        assert_eq!(sm.state(), PlayerState::Idle);
    }

    #[test]
    fn test_untimed_states_never_time_out() {
        let mut sm = StateMachine::default();
        sm.try_transition(PlayerState::Running, 0.0);
        sm.tick(1000.0);
        assert_eq!(sm.state(), PlayerState::Running);

        sm.try_transition(PlayerState::Jumping, 1000.0);
        sm.tick(2000.0);
        assert_eq!(sm.state(), PlayerState::Jumping);
    }

    #[test]
    fn test_can_attack() {
        for state in PlayerState::ALL {
            let sm = machine_in(state);
            let expected = matches!(
                state,
                PlayerState::Idle | PlayerState::Running | PlayerState::Jumping
            );
            assert_eq!(sm.can_attack(), expected, "{state}");
        }
    }

    #[test]
    fn test_can_roll() {
        for state in PlayerState::ALL {
            let sm = machine_in(state);
            let expected = !matches!(state, PlayerState::Dead | PlayerState::Rolling);
            assert_eq!(sm.can_roll(), expected, "{state}");
        }
    }

    #[test]
    fn test_can_move() {
        for state in PlayerState::ALL {
            let sm = machine_in(state);
            let expected = matches!(
                state,
                PlayerState::Idle | PlayerState::Running | PlayerState::Jumping
            );
            assert_eq!(sm.can_move(), expected, "{state}");
        }
    }

    #[test]
    fn test_can_jump_late_cancel_window() {
        for state in [PlayerState::Attacking, PlayerState::Rolling] {
            let sm = machine_in(state);
            assert!(!sm.can_jump(0.1), "{state} early");
            assert!(!sm.can_jump(0.3), "{state} at the boundary");
            assert!(sm.can_jump(0.31), "{state} late");
        }

        for state in [PlayerState::Idle, PlayerState::Running] {
            assert!(machine_in(state).can_jump(0.0), "{state}");
        }

        for state in [PlayerState::Jumping, PlayerState::TakingDamage, PlayerState::Dead] {
            assert!(!machine_in(state).can_jump(10.0), "{state}");
        }
    }

    #[test]
    fn test_listeners_notified_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut sm = StateMachine::default();

        let first = Rc::clone(&log);
        sm.subscribe(move |change, _| first.borrow_mut().push(("first", change.from, change.to)));
        let second = Rc::clone(&log);
        sm.subscribe(move |change, _| second.borrow_mut().push(("second", change.from, change.to)));

        sm.try_transition(PlayerState::Running, 0.5);

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", PlayerState::Idle, PlayerState::Running),
                ("second", PlayerState::Idle, PlayerState::Running),
            ]
        );
    }

    #[test]
    fn test_rejected_transition_does_not_notify() {
        let calls = Rc::new(RefCell::new(0));
        let mut sm = StateMachine::default();
        let counter = Rc::clone(&calls);
        sm.subscribe(move |_, _| *counter.borrow_mut() += 1);

        sm.try_transition(PlayerState::Idle, 0.0);
        sm.try_transition(PlayerState::TakingDamage, 0.0);
        sm.try_transition(PlayerState::Running, 0.0);

        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let calls = Rc::new(RefCell::new(0));
        let mut sm = StateMachine::default();
        let counter = Rc::clone(&calls);
        let id = sm.subscribe(move |_, _| *counter.borrow_mut() += 1);

        assert!(sm.unsubscribe(id));
        assert!(!sm.unsubscribe(id));

        sm.try_transition(PlayerState::Running, 0.0);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_follow_up_transition() {
        let mut sm = StateMachine::default();
        // Landing from a jump straight into a run
        sm.subscribe(|change, follow_up| {
            if change.from == PlayerState::Jumping && change.to == PlayerState::Idle {
                follow_up.request(PlayerState::Running);
            }
        });

        sm.try_transition(PlayerState::Jumping, 0.0);
        assert!(sm.try_transition(PlayerState::Idle, 1.0));
        assert_eq!(sm.state(), PlayerState::Running);
        assert_eq!(sm.previous_state(), PlayerState::Idle);
    }

    #[test]
    fn test_follow_up_chain_is_bounded() {
        let calls = Rc::new(RefCell::new(0));
        let mut sm = StateMachine::default();
        let counter = Rc::clone(&calls);
        // Ping-pong listener that would loop forever if chains were unbounded
        sm.subscribe(move |change, follow_up| {
            *counter.borrow_mut() += 1;
            follow_up.request(change.from);
        });

        assert!(sm.try_transition(PlayerState::Running, 0.0));

        // Idle -> Running, then one follow-up Running -> Idle, then stop
        assert_eq!(*calls.borrow(), 2);
        assert_eq!(sm.state(), PlayerState::Idle);
    }

    #[test]
    fn test_only_first_follow_up_request_is_kept() {
        let mut follow_up = FollowUp::default();
        assert!(follow_up.request(PlayerState::Idle));
        assert!(!follow_up.request(PlayerState::Dead));
        assert_eq!(follow_up.requested(), Some(PlayerState::Idle));
    }

    #[test]
    fn test_state_names() {
        assert_eq!(PlayerState::TakingDamage.to_string(), "TakingDamage");
        assert_eq!(PlayerState::Idle.name(), "Idle");
    }
}
