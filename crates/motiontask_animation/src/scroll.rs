//! Scroll-position triggers
//!
//! A [`ScrollTrigger`] watches one element's position relative to the
//! viewport and drives a timeline when a configured trigger point is
//! crossed. The trigger point pairs an anchor on the element with an anchor
//! on the viewport: `"top center"` fires when the element's top edge reaches
//! the vertical center of the viewport.

use crate::error::{AnimationError, AnimationResult};
use crate::scheduler::TimelineId;
use crate::timeline::Timeline;

/// A point along an element or the viewport
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Fraction of the height (`top` = 0.0, `center` = 0.5, `bottom` = 1.0)
    Fraction(f32),
    /// Fixed pixel distance from the top edge
    Pixels(f32),
}

impl Anchor {
    pub const TOP: Anchor = Anchor::Fraction(0.0);
    pub const CENTER: Anchor = Anchor::Fraction(0.5);
    pub const BOTTOM: Anchor = Anchor::Fraction(1.0);

    fn parse(token: &str) -> Option<Self> {
        match token {
            "top" => Some(Anchor::TOP),
            "center" => Some(Anchor::CENTER),
            "bottom" => Some(Anchor::BOTTOM),
            _ => {
                if let Some(pct) = token.strip_suffix('%') {
                    pct.parse::<f32>().ok().map(|p| Anchor::Fraction(p / 100.0))
                } else if let Some(px) = token.strip_suffix("px") {
                    px.parse::<f32>().ok().map(Anchor::Pixels)
                } else {
                    token.parse::<f32>().ok().map(Anchor::Pixels)
                }
            }
        }
    }

    fn resolve(&self, extent: f32) -> f32 {
        match *self {
            Anchor::Fraction(f) => f * extent,
            Anchor::Pixels(px) => px,
        }
    }
}

/// Element anchor paired with a viewport anchor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerPoint {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl TriggerPoint {
    /// Element top reaches viewport center
    pub const TOP_CENTER: TriggerPoint = TriggerPoint {
        element: Anchor::TOP,
        viewport: Anchor::CENTER,
    };

    /// Parse `"<element> <viewport>"`, e.g. `"top center"` or `"top 80%"`
    pub fn parse(input: &str) -> AnimationResult<Self> {
        let mut parts = input.split_whitespace();
        let invalid = || AnimationError::InvalidTriggerPoint(input.to_string());

        let element = parts.next().and_then(Anchor::parse).ok_or_else(invalid)?;
        let viewport = parts.next().and_then(Anchor::parse).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { element, viewport })
    }

    /// Scroll offset at which this point is reached
    pub fn scroll_offset(&self, bounds: TriggerBounds, viewport_height: f32) -> f32 {
        bounds.top + self.element.resolve(bounds.height) - self.viewport.resolve(viewport_height)
    }
}

/// Document-space bounds of the trigger element
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TriggerBounds {
    pub top: f32,
    pub height: f32,
}

impl TriggerBounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }
}

/// Current scroll offset and viewport size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollPosition {
    pub offset_y: f32,
    pub viewport_height: f32,
}

impl Default for ScrollPosition {
    fn default() -> Self {
        Self {
            offset_y: 0.0,
            viewport_height: 800.0,
        }
    }
}

/// What a trigger does to its timeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TriggerAction {
    #[default]
    None,
    /// Resume from the current time
    Play,
    Pause,
    /// Start over from time zero
    Restart,
    /// Rewind to time zero and pause
    Reset,
}

impl TriggerAction {
    pub(crate) fn apply(&self, timeline: &mut Timeline) {
        match self {
            TriggerAction::None => {}
            TriggerAction::Play => timeline.resume(),
            TriggerAction::Pause => timeline.pause(),
            TriggerAction::Restart => timeline.start(),
            TriggerAction::Reset => timeline.stop(),
        }
    }
}

/// Binds a timeline to an element's scroll position
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollTrigger {
    timeline: TimelineId,
    bounds: TriggerBounds,
    start: TriggerPoint,
    on_enter: TriggerAction,
    on_leave_back: TriggerAction,
    active: bool,
}

impl ScrollTrigger {
    /// Play `timeline` when the element's top reaches the viewport center
    pub fn new(timeline: TimelineId, bounds: TriggerBounds) -> Self {
        Self {
            timeline,
            bounds,
            start: TriggerPoint::TOP_CENTER,
            on_enter: TriggerAction::Play,
            on_leave_back: TriggerAction::None,
            active: false,
        }
    }

    pub fn start(mut self, start: TriggerPoint) -> Self {
        self.start = start;
        self
    }

    /// Action when scrolling forward past the start point
    pub fn on_enter(mut self, action: TriggerAction) -> Self {
        self.on_enter = action;
        self
    }

    /// Action when scrolling back above the start point
    pub fn on_leave_back(mut self, action: TriggerAction) -> Self {
        self.on_leave_back = action;
        self
    }

    pub fn timeline(&self) -> TimelineId {
        self.timeline
    }

    pub fn bounds(&self) -> TriggerBounds {
        self.bounds
    }

    /// Whether the scroll position is past the start point
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Re-evaluate against a scroll position
    ///
    /// Returns the action to run, if the start point was crossed.
    pub fn update(&mut self, position: ScrollPosition) -> Option<TriggerAction> {
        let start = self.start.scroll_offset(self.bounds, position.viewport_height);
        let active = position.offset_y >= start;
        if active == self.active {
            return None;
        }
        self.active = active;
        let action = if active {
            self.on_enter
        } else {
            self.on_leave_back
        };
        (action != TriggerAction::None).then_some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn timeline_id() -> TimelineId {
        TimelineId::from(KeyData::from_ffi(1))
    }

    fn at(offset_y: f32) -> ScrollPosition {
        ScrollPosition {
            offset_y,
            viewport_height: 800.0,
        }
    }

    #[test]
    fn test_parse_trigger_points() {
        assert_eq!(TriggerPoint::parse("top center"), Ok(TriggerPoint::TOP_CENTER));
        assert_eq!(
            TriggerPoint::parse("top 80%").map(|p| p.viewport),
            Ok(Anchor::Fraction(0.8))
        );
        assert_eq!(
            TriggerPoint::parse("100px bottom").map(|p| p.element),
            Ok(Anchor::Pixels(100.0))
        );
        assert!(TriggerPoint::parse("top").is_err());
        assert!(TriggerPoint::parse("top center bottom").is_err());
        assert!(TriggerPoint::parse("middle center").is_err());
    }

    #[test]
    fn test_top_center_offset() {
        let bounds = TriggerBounds::new(1200.0, 600.0);
        assert_eq!(TriggerPoint::TOP_CENTER.scroll_offset(bounds, 800.0), 800.0);
    }

    #[test]
    fn test_fires_once_per_crossing() {
        let mut trigger = ScrollTrigger::new(timeline_id(), TriggerBounds::new(1200.0, 600.0));

        assert_eq!(trigger.update(at(0.0)), None);
        assert_eq!(trigger.update(at(799.0)), None);
        assert_eq!(trigger.update(at(800.0)), Some(TriggerAction::Play));
        assert_eq!(trigger.update(at(900.0)), None);
        assert!(trigger.is_active());

        // Leaving back does nothing by default, re-entering plays again
        assert_eq!(trigger.update(at(100.0)), None);
        assert_eq!(trigger.update(at(1000.0)), Some(TriggerAction::Play));
    }

    #[test]
    fn test_leave_back_action() {
        let mut trigger = ScrollTrigger::new(timeline_id(), TriggerBounds::new(0.0, 100.0))
            .start(TriggerPoint::parse("top top").unwrap())
            .on_leave_back(TriggerAction::Reset);

        assert_eq!(trigger.update(at(10.0)), Some(TriggerAction::Play));
        assert_eq!(trigger.update(at(-1.0)), Some(TriggerAction::Reset));
    }

    #[test]
    fn test_actions_drive_timeline() {
        let mut timeline = Timeline::new();
        timeline.add(0, 100, 0.0, 1.0);

        TriggerAction::Play.apply(&mut timeline);
        assert!(timeline.is_playing());
        timeline.tick(50.0);

        TriggerAction::Pause.apply(&mut timeline);
        assert!(timeline.is_paused());

        TriggerAction::Restart.apply(&mut timeline);
        assert_eq!(timeline.time_ms(), 0.0);
        assert!(timeline.is_playing());

        TriggerAction::Reset.apply(&mut timeline);
        assert!(timeline.is_paused());
    }
}
