// State diagnostics
//
// Read-only view of a state machine for debug overlays and logs, plus manual
// transition controls. Forced transitions still go through the normal
// transition rules.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use log::info;

use super::state::{PlayerState, StateChange, StateMachine, SubscriptionId};

/// Snapshot of a state machine at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateReport {
    pub current: PlayerState,
    pub previous: PlayerState,
    /// Seconds spent in `current`
    pub duration: f32,
}

impl StateReport {
    pub fn capture(state: &StateMachine, now: f32) -> Self {
        Self {
            current: state.state(),
            previous: state.previous_state(),
            duration: state.state_duration(now),
        }
    }
}

impl fmt::Display for StateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {:.2}s (previous: {})",
            self.current, self.duration, self.previous
        )
    }
}

/// Records recent transitions of one state machine
#[derive(Debug)]
pub struct DiagnosticsPanel {
    history: Rc<RefCell<VecDeque<StateChange>>>,
    subscription: Option<SubscriptionId>,
}

impl DiagnosticsPanel {
    /// Transitions kept by default
    pub const DEFAULT_CAPACITY: usize = 16;

    /// Start recording `state`, keeping at most `capacity` transitions
    pub fn attach(state: &mut StateMachine, capacity: usize) -> Self {
        let history = Rc::new(RefCell::new(VecDeque::with_capacity(capacity)));
        let sink = Rc::clone(&history);

        let subscription = state.subscribe(move |change, _| {
            let mut history = sink.borrow_mut();
            if capacity == 0 {
                return;
            }
            if history.len() == capacity {
                history.pop_front();
            }
            history.push_back(*change);
        });

        Self {
            history,
            subscription: Some(subscription),
        }
    }

    /// Stop recording. Returns false if the panel was already detached.
    pub fn detach(&mut self, state: &mut StateMachine) -> bool {
        match self.subscription.take() {
            Some(id) => state.unsubscribe(id),
            None => false,
        }
    }

    /// Ask for a transition by hand; illegal requests are refused as usual
    pub fn force(&self, state: &mut StateMachine, target: PlayerState, now: f32) -> bool {
        let accepted = state.try_transition(target, now);
        if accepted {
            info!("Forced transition to {}", target);
        } else {
            info!("Forced transition {} -> {} refused", state.state(), target);
        }
        accepted
    }

    /// Recorded transitions, oldest first
    pub fn history(&self) -> Vec<StateChange> {
        self.history.borrow().iter().copied().collect()
    }

    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }

    /// Multi-line summary of the current state and recent transitions
    pub fn report(&self, state: &StateMachine, now: f32) -> String {
        let mut lines = vec![StateReport::capture(state, now).to_string()];
        lines.extend(
            self.history
                .borrow()
                .iter()
                .map(|change| format!("  {:>7.2}s {} -> {}", change.at, change.from, change.to)),
        );
        lines.join("\n")
    }
}
