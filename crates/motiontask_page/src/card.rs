//! Interactive feature cards
//!
//! Each card runs its own [`CardState`] machine:
//!
//! ```text
//!            mount                 enter / focus
//! Initial ─────────▶ Entered ◀──────────────────▶ Hovered
//!                       │      leave / blur          │
//!                       │ down / Enter / Space       │
//!                       ▼                            ▼
//!                    Pressed ── release ──▶ Hovered or Entered
//! ```
//!
//! A release settles on `Hovered` while the pointer is inside or the card
//! has focus, otherwise on `Entered`. Only `CLICK` activates a card, so a
//! pointer click (down, up, click) counts once. Enter and Space on a
//! focused card run the same press, release, click sequence.

use motiontask_animation::{
    AnimatedTimeline, AnimatedValue, AnimationResult, Easing, SchedulerHandle, SpringConfig,
    Timeline, TimelineEntryId,
};
use motiontask_core::events::event_types::*;
use motiontask_core::{Event, StateTransitions, Stateful};

use crate::content::FeatureItem;

pub const ENTER_DURATION_MS: u32 = 600;
pub const ENTER_FROM_Y: f32 = 20.0;
pub const HOVER_LIFT_Y: f32 = -8.0;
pub const HOVER_SCALE: f32 = 1.03;
pub const PRESS_SCALE: f32 = 0.98;

/// Interaction state of one card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CardState {
    #[default]
    Initial,
    Entered,
    Hovered,
    Pressed,
}

impl StateTransitions for CardState {
    fn on_event(&self, event: u32) -> Option<Self> {
        match (self, event) {
            (CardState::Initial, MOUNT) => Some(CardState::Entered),
            (CardState::Initial, _) => None,

            (CardState::Entered, POINTER_ENTER | FOCUS) => Some(CardState::Hovered),
            (CardState::Hovered, POINTER_LEAVE | BLUR) => Some(CardState::Entered),

            (CardState::Entered | CardState::Hovered, POINTER_DOWN) => Some(CardState::Pressed),
            (CardState::Pressed, POINTER_UP) => Some(CardState::Hovered),
            (CardState::Pressed, POINTER_LEAVE) => Some(CardState::Entered),

            (_, UNMOUNT) => Some(CardState::Initial),
            _ => None,
        }
    }
}

/// Transform and opacity of a card at the current frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardVisual {
    pub translate_y: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl Default for CardVisual {
    fn default() -> Self {
        Self {
            translate_y: 0.0,
            opacity: 1.0,
            scale: 1.0,
        }
    }
}

struct CardEntrance {
    timeline: AnimatedTimeline,
    y: TimelineEntryId,
    opacity: TimelineEntryId,
}

struct CardMotion {
    entrance: Option<CardEntrance>,
    lift: AnimatedValue,
    scale: AnimatedValue,
}

/// Callback fired when a card is activated
pub type ActivateCallback = Box<dyn FnMut(&FeatureItem) + Send>;

/// A focusable, clickable feature card
pub struct InteractiveCard {
    feature: FeatureItem,
    machine: Stateful<CardState>,
    pointer_inside: bool,
    focused: bool,
    reduce_motion: bool,
    activations: u32,
    on_activate: Option<ActivateCallback>,
    motion: Option<CardMotion>,
}

impl InteractiveCard {
    pub fn new(feature: FeatureItem) -> Self {
        Self {
            feature,
            machine: Stateful::new(CardState::Initial),
            pointer_inside: false,
            focused: false,
            reduce_motion: false,
            activations: 0,
            on_activate: None,
            motion: None,
        }
    }

    pub fn on_activate<F>(&mut self, callback: F)
    where
        F: FnMut(&FeatureItem) + Send + 'static,
    {
        self.on_activate = Some(Box::new(callback));
    }

    pub fn feature(&self) -> &FeatureItem {
        &self.feature
    }

    pub fn state(&self) -> CardState {
        self.machine.state()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Number of times the card has been activated
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// Play the entrance and enter the `Entered` state
    ///
    /// With `reduce_motion` the card appears in its final state and hover
    /// feedback snaps instead of springing.
    pub fn mount(&mut self, handle: &SchedulerHandle, reduce_motion: bool) -> AnimationResult<()> {
        self.reduce_motion = reduce_motion;

        let entrance = if reduce_motion {
            None
        } else {
            let mut timeline = Timeline::new();
            let y = timeline.add_with_easing(0, ENTER_DURATION_MS, ENTER_FROM_Y, 0.0, Easing::EaseOut);
            let opacity = timeline.add_with_easing(0, ENTER_DURATION_MS, 0.0, 1.0, Easing::EaseOut);
            let timeline = AnimatedTimeline::new(handle.clone(), timeline)?;
            timeline.start();
            Some(CardEntrance {
                timeline,
                y,
                opacity,
            })
        };

        self.motion = Some(CardMotion {
            entrance,
            lift: AnimatedValue::new(handle.clone(), 0.0, SpringConfig::interactive()),
            scale: AnimatedValue::new(handle.clone(), 1.0, SpringConfig::interactive()).unit_scale(),
        });
        self.machine.dispatch(MOUNT);
        self.apply_visual_targets();
        Ok(())
    }

    /// Release animations and return to `Initial`
    pub fn unmount(&mut self) {
        self.motion = None;
        self.pointer_inside = false;
        self.focused = false;
        self.machine.dispatch(UNMOUNT);
    }

    /// Route an input event to the card
    ///
    /// Returns true if the card changed state or was activated.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        if self.state() == CardState::Initial {
            return false;
        }

        match event.event_type {
            POINTER_ENTER => {
                self.pointer_inside = true;
                self.settle()
            }
            POINTER_LEAVE => {
                self.pointer_inside = false;
                // Leaving while pressed cancels the press
                self.settle_from_any()
            }
            FOCUS => {
                self.focused = true;
                self.settle()
            }
            BLUR => {
                self.focused = false;
                self.settle_from_any()
            }
            POINTER_DOWN => self.press(),
            // Activation comes from the click that follows the release
            POINTER_UP => self.state() == CardState::Pressed && self.settle_from_any(),
            CLICK => {
                self.activate();
                true
            }
            KEY_DOWN => match event.key() {
                Some(key) if self.focused && key.is_activation() => {
                    self.press();
                    self.settle_from_any();
                    self.activate();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Current transform and opacity, including the entrance
    pub fn visual(&self) -> CardVisual {
        let Some(motion) = &self.motion else {
            return CardVisual {
                translate_y: ENTER_FROM_Y,
                opacity: 0.0,
                scale: 1.0,
            };
        };

        let (enter_y, opacity) = match &motion.entrance {
            Some(entrance) => (
                entrance.timeline.get(entrance.y).unwrap_or(0.0),
                entrance.timeline.get(entrance.opacity).unwrap_or(1.0),
            ),
            None => (0.0, 1.0),
        };

        CardVisual {
            translate_y: enter_y + motion.lift.get(),
            opacity,
            scale: motion.scale.get(),
        }
    }

    fn resting_state(&self) -> CardState {
        if self.pointer_inside || self.focused {
            CardState::Hovered
        } else {
            CardState::Entered
        }
    }

    /// Settle on the resting state unless a press is in progress
    fn settle(&mut self) -> bool {
        if self.state() == CardState::Pressed {
            return false;
        }
        self.settle_from_any()
    }

    fn settle_from_any(&mut self) -> bool {
        let changed = self.machine.set(self.resting_state());
        if changed {
            self.apply_visual_targets();
        }
        changed
    }

    fn press(&mut self) -> bool {
        let changed = self.machine.dispatch(POINTER_DOWN);
        if changed {
            self.apply_visual_targets();
        }
        changed
    }

    fn activate(&mut self) {
        self.activations += 1;
        tracing::debug!(
            "card {} ({}) activated",
            self.feature.id,
            self.feature.title
        );
        if let Some(callback) = self.on_activate.as_mut() {
            callback(&self.feature);
        }
    }

    fn apply_visual_targets(&mut self) {
        let hovering = self.pointer_inside || self.focused;
        let (lift, scale) = match self.state() {
            CardState::Hovered => (HOVER_LIFT_Y, HOVER_SCALE),
            CardState::Pressed if hovering => (HOVER_LIFT_Y, PRESS_SCALE),
            CardState::Pressed => (0.0, PRESS_SCALE),
            CardState::Initial | CardState::Entered => (0.0, 1.0),
        };

        let reduce_motion = self.reduce_motion;
        if let Some(motion) = self.motion.as_mut() {
            if reduce_motion {
                motion.lift.set_immediate(lift);
                motion.scale.set_immediate(scale);
            } else {
                motion.lift.set_target(lift);
                motion.scale.set_target(scale);
            }
        }
    }
}
