//! Input events delivered by the host environment
//!
//! Events are identified by a `u32` event type so that state machines can
//! match on plain constants (see [`crate::state::StateTransitions`]).

/// Event type constants
pub mod event_types {
    pub const POINTER_ENTER: u32 = 1;
    pub const POINTER_LEAVE: u32 = 2;
    pub const POINTER_DOWN: u32 = 3;
    pub const POINTER_UP: u32 = 4;
    pub const CLICK: u32 = 5;
    pub const FOCUS: u32 = 10;
    pub const BLUR: u32 = 11;
    pub const KEY_DOWN: u32 = 20;
    pub const KEY_UP: u32 = 21;
    pub const SCROLL: u32 = 30;
    pub const MOUNT: u32 = 40;
    pub const UNMOUNT: u32 = 41;
}

/// Keyboard keys the page reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Enter,
    Space,
    Tab,
    Escape,
    /// Any other key, by character
    Char(char),
}

impl KeyCode {
    /// Parse a DOM-style key name (`"Enter"`, `" "`, `"Tab"`, ...)
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Enter" => KeyCode::Enter,
            " " | "Space" | "Spacebar" => KeyCode::Space,
            "Tab" => KeyCode::Tab,
            "Escape" | "Esc" => KeyCode::Escape,
            other => KeyCode::Char(other.chars().next().unwrap_or('\0')),
        }
    }

    /// Keys that activate a focused button-like element
    pub fn is_activation(&self) -> bool {
        matches!(self, KeyCode::Enter | KeyCode::Space)
    }
}

/// Data carried by an event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventData {
    None,
    Key(KeyCode),
    Scroll { offset_y: f32, viewport_height: f32 },
}

/// An input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub event_type: u32,
    pub data: EventData,
}

impl Event {
    pub fn new(event_type: u32) -> Self {
        Self {
            event_type,
            data: EventData::None,
        }
    }

    pub fn key_down(key: KeyCode) -> Self {
        Self {
            event_type: event_types::KEY_DOWN,
            data: EventData::Key(key),
        }
    }

    pub fn scroll(offset_y: f32, viewport_height: f32) -> Self {
        Self {
            event_type: event_types::SCROLL,
            data: EventData::Scroll {
                offset_y,
                viewport_height,
            },
        }
    }

    /// The key for keyboard events
    pub fn key(&self) -> Option<KeyCode> {
        match self.data {
            EventData::Key(key) => Some(key),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(KeyCode::from_key_name("Enter"), KeyCode::Enter);
        assert_eq!(KeyCode::from_key_name(" "), KeyCode::Space);
        assert_eq!(KeyCode::from_key_name("a"), KeyCode::Char('a'));
        assert!(KeyCode::Space.is_activation());
        assert!(!KeyCode::Tab.is_activation());
    }

    #[test]
    fn test_key_event_data() {
        let event = Event::key_down(KeyCode::Enter);
        assert_eq!(event.event_type, event_types::KEY_DOWN);
        assert_eq!(event.key(), Some(KeyCode::Enter));
        assert_eq!(Event::new(event_types::CLICK).key(), None);
    }
}
