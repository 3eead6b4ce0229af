//! Per-element interaction state machines
//!
//! Elements define their own state enum and map events to transitions:
//!
//! ```
//! use motiontask_core::events::event_types::*;
//! use motiontask_core::state::{StateTransitions, Stateful};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
//! enum ButtonState {
//!     #[default]
//!     Idle,
//!     Hovered,
//! }
//!
//! impl StateTransitions for ButtonState {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (ButtonState::Idle, POINTER_ENTER) => Some(ButtonState::Hovered),
//!             (ButtonState::Hovered, POINTER_LEAVE) => Some(ButtonState::Idle),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut button = Stateful::new(ButtonState::Idle);
//! assert!(button.dispatch(POINTER_ENTER));
//! assert_eq!(button.state(), ButtonState::Hovered);
//! ```

use std::hash::Hash;

use smallvec::SmallVec;

/// Trait for state types that handle their own transitions
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Callback invoked with `(previous, next)` on every state change
pub type StateCallback<S> = Box<dyn FnMut(&S, &S) + Send>;

/// Holds the current state of one element and notifies listeners on change
pub struct Stateful<S: StateTransitions> {
    state: S,
    listeners: SmallVec<[StateCallback<S>; 2]>,
}

impl<S: StateTransitions> Stateful<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            listeners: SmallVec::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> S {
        self.state
    }

    /// Register a change listener
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: FnMut(&S, &S) + Send + 'static,
    {
        self.listeners.push(Box::new(callback));
    }

    /// Feed an event through the state's transition table
    ///
    /// Returns true if the state changed.
    pub fn dispatch(&mut self, event: u32) -> bool {
        match self.state.on_event(event) {
            Some(next) if next != self.state => {
                self.apply(next);
                true
            }
            _ => false,
        }
    }

    /// Force a state, bypassing the transition table
    ///
    /// Used for transitions driven by context the table cannot see, such as
    /// where the pointer is when a press is released.
    pub fn set(&mut self, next: S) -> bool {
        if next == self.state {
            return false;
        }
        self.apply(next);
        true
    }

    fn apply(&mut self, next: S) {
        let previous = self.state;
        self.state = next;
        tracing::trace!("state transition {:?} -> {:?}", previous, next);
        for listener in self.listeners.iter_mut() {
            listener(&previous, &next);
        }
    }
}

impl<S: StateTransitions + Default> Default for Stateful<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    enum ToggleState {
        #[default]
        Off,
        On,
    }

    impl StateTransitions for ToggleState {
        fn on_event(&self, event: u32) -> Option<Self> {
            match (self, event) {
                (ToggleState::Off, CLICK) => Some(ToggleState::On),
                (ToggleState::On, CLICK) => Some(ToggleState::Off),
                _ => None,
            }
        }
    }

    #[test]
    fn test_toggle_transitions() {
        let mut toggle = Stateful::new(ToggleState::Off);
        assert!(toggle.dispatch(CLICK));
        assert_eq!(toggle.state(), ToggleState::On);
        assert!(!toggle.dispatch(POINTER_ENTER));
        assert!(toggle.dispatch(CLICK));
        assert_eq!(toggle.state(), ToggleState::Off);
    }

    #[test]
    fn test_listeners_fire_on_change_only() {
        let changes = Arc::new(AtomicUsize::new(0));
        let counter = changes.clone();

        let mut toggle = Stateful::<ToggleState>::default();
        toggle.on_change(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        toggle.dispatch(CLICK);
        toggle.set(ToggleState::On);
        toggle.dispatch(KEY_DOWN);
        assert_eq!(changes.load(Ordering::SeqCst), 1);
    }
}
