//! MotionTask Core
//!
//! Foundational primitives shared by the animation engine and the page:
//!
//! - **Events**: event type constants, key codes, and event payloads
//! - **State Machines**: per-element interaction states driven by events

pub mod events;
pub mod state;

pub use events::{event_types, Event, EventData, KeyCode};
pub use state::{StateCallback, StateTransitions, Stateful};
