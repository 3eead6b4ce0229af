//! Staggered "from" tweens and sequencing
//!
//! A [`Tween`] animates a named group of elements from the given property
//! values back to their resting values. A [`SequenceBuilder`] places tweens
//! one after another on a [`Timeline`], each at a [`Position`] relative to
//! the end of everything added so far.
//!
//! ```
//! use motiontask_animation::{Easing, Position, SequenceBuilder, Tween};
//!
//! let (timeline, layout) = SequenceBuilder::new(800, Easing::EaseOutQuart)
//!     .from(Tween::new("heading", 1).y(30.0).opacity(0.0), Position::Start(0))
//!     .from(Tween::new("sub", 1).y(20.0).opacity(0.0), Position::parse("-=0.5").unwrap())
//!     .build();
//!
//! assert_eq!(layout.step("sub").unwrap().start_ms, 300);
//! assert_eq!(timeline.duration_ms(), 1100);
//! ```

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{AnimationError, AnimationResult};
use crate::timeline::{Timeline, TimelineEntryId};

/// An animatable visual property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    /// Vertical offset in pixels
    TranslateY,
    Opacity,
    Scale,
}

impl Property {
    /// Value the property settles at when no animation applies
    pub fn resting_value(&self) -> f32 {
        match self {
            Property::TranslateY => 0.0,
            Property::Opacity => 1.0,
            Property::Scale => 1.0,
        }
    }
}

/// Where a step starts on the timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Absolute time in milliseconds
    Start(i32),
    /// At the current end of the timeline
    End,
    /// This many milliseconds before the current end (`-=`)
    Overlap(u32),
    /// This many milliseconds after the current end (`+=`)
    Gap(u32),
}

impl Position {
    /// Parse a position string with values in seconds
    ///
    /// Accepts `"-=0.5"`, `"+=0.25"`, `"<"`/`">"` (timeline end), and absolute
    /// seconds like `"1.2"`.
    pub fn parse(input: &str) -> AnimationResult<Self> {
        let trimmed = input.trim();
        let invalid = || AnimationError::InvalidPosition(input.to_string());

        let seconds = |s: &str| -> AnimationResult<u32> {
            let value: f32 = s.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() || value < 0.0 {
                return Err(invalid());
            }
            Ok((value * 1000.0).round() as u32)
        };

        if trimmed.is_empty() || trimmed == ">" || trimmed == "<" {
            return Ok(Position::End);
        }
        if let Some(rest) = trimmed.strip_prefix("-=") {
            return Ok(Position::Overlap(seconds(rest)?));
        }
        if let Some(rest) = trimmed.strip_prefix("+=") {
            return Ok(Position::Gap(seconds(rest)?));
        }
        Ok(Position::Start(seconds(trimmed)? as i32))
    }

    fn resolve(&self, timeline_end_ms: i32) -> i32 {
        match *self {
            Position::Start(ms) => ms,
            Position::End => timeline_end_ms,
            Position::Overlap(ms) => timeline_end_ms - ms as i32,
            Position::Gap(ms) => timeline_end_ms + ms as i32,
        }
    }
}

/// Animates `count` elements of a target group from the given values
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    target: String,
    count: usize,
    from: SmallVec<[(Property, f32); 3]>,
    duration_ms: Option<u32>,
    easing: Option<Easing>,
    stagger_ms: u32,
}

impl Tween {
    pub fn new(target: impl Into<String>, count: usize) -> Self {
        Self {
            target: target.into(),
            count,
            from: SmallVec::new(),
            duration_ms: None,
            easing: None,
            stagger_ms: 0,
        }
    }

    /// Start from a property value
    pub fn from_value(mut self, property: Property, value: f32) -> Self {
        if let Some(slot) = self.from.iter_mut().find(|(p, _)| *p == property) {
            slot.1 = value;
        } else {
            self.from.push((property, value));
        }
        self
    }

    pub fn y(self, value: f32) -> Self {
        self.from_value(Property::TranslateY, value)
    }

    pub fn opacity(self, value: f32) -> Self {
        self.from_value(Property::Opacity, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.from_value(Property::Scale, value)
    }

    /// Override the sequence's default duration
    pub fn duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Override the sequence's default easing
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Delay between consecutive elements of the group
    pub fn stagger(mut self, stagger_ms: u32) -> Self {
        self.stagger_ms = stagger_ms;
        self
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

/// Timeline entries for one element of a step
#[derive(Clone, Debug, PartialEq)]
pub struct ElementTracks {
    pub start_ms: i32,
    pub tracks: SmallVec<[(Property, TimelineEntryId); 3]>,
}

impl ElementTracks {
    pub fn entry(&self, property: Property) -> Option<TimelineEntryId> {
        self.tracks
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, id)| *id)
    }
}

/// Where one step landed on the timeline
#[derive(Clone, Debug, PartialEq)]
pub struct StepLayout {
    pub target: String,
    pub start_ms: i32,
    /// End of the step's last staggered element
    pub end_ms: i32,
    pub duration_ms: u32,
    pub stagger_ms: u32,
    pub elements: Vec<ElementTracks>,
}

/// Placement of every step of a built sequence
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceLayout {
    pub steps: Vec<StepLayout>,
}

impl SequenceLayout {
    pub fn step(&self, target: &str) -> Option<&StepLayout> {
        self.steps.iter().find(|s| s.target == target)
    }

    /// Entry driving `property` of element `index` in `target`
    pub fn entry(&self, target: &str, index: usize, property: Property) -> Option<TimelineEntryId> {
        self.step(target)?.elements.get(index)?.entry(property)
    }
}

/// Builds an ordered sequence of tweens on one timeline
pub struct SequenceBuilder {
    timeline: Timeline,
    layout: SequenceLayout,
    default_duration_ms: u32,
    default_easing: Easing,
    end_ms: i32,
}

impl SequenceBuilder {
    pub fn new(default_duration_ms: u32, default_easing: Easing) -> Self {
        Self {
            timeline: Timeline::new(),
            layout: SequenceLayout::default(),
            default_duration_ms,
            default_easing,
            end_ms: 0,
        }
    }

    /// Append a tween at `position`
    pub fn from(mut self, tween: Tween, position: Position) -> Self {
        let duration_ms = tween.duration_ms.unwrap_or(self.default_duration_ms);
        let easing = tween.easing.unwrap_or(self.default_easing);
        let start_ms = position.resolve(self.end_ms);

        let elements: Vec<ElementTracks> = (0..tween.count)
            .map(|index| {
                let element_start = start_ms + (index as u32 * tween.stagger_ms) as i32;
                let tracks = tween
                    .from
                    .iter()
                    .map(|&(property, from)| {
                        let id = self.timeline.add_with_easing(
                            element_start,
                            duration_ms,
                            from,
                            property.resting_value(),
                            easing,
                        );
                        (property, id)
                    })
                    .collect();
                ElementTracks {
                    start_ms: element_start,
                    tracks,
                }
            })
            .collect();

        let last_start = elements.last().map(|e| e.start_ms).unwrap_or(start_ms);
        let end_ms = last_start + duration_ms as i32;
        self.end_ms = self.end_ms.max(end_ms);

        tracing::trace!(
            "sequence step {:?}: {}..{}ms ({} elements)",
            tween.target,
            start_ms,
            end_ms,
            tween.count
        );

        self.layout.steps.push(StepLayout {
            target: tween.target,
            start_ms,
            end_ms,
            duration_ms,
            stagger_ms: tween.stagger_ms,
            elements,
        });
        self
    }

    /// Finish the sequence; the timeline starts paused
    pub fn build(self) -> (Timeline, SequenceLayout) {
        (self.timeline, self.layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positions() {
        assert_eq!(Position::parse("-=0.5"), Ok(Position::Overlap(500)));
        assert_eq!(Position::parse("+=0.25"), Ok(Position::Gap(250)));
        assert_eq!(Position::parse("1.2"), Ok(Position::Start(1200)));
        assert_eq!(Position::parse(">"), Ok(Position::End));
        assert!(Position::parse("-=abc").is_err());
        assert!(Position::parse("-=-1").is_err());
    }

    #[test]
    fn test_stagger_offsets_each_element() {
        let (timeline, layout) = SequenceBuilder::new(800, Easing::EaseOut)
            .from(
                Tween::new("shape", 3).scale(0.0).opacity(0.0).stagger(80),
                Position::Start(100),
            )
            .build();

        let step = layout.step("shape").unwrap();
        let starts: Vec<i32> = step.elements.iter().map(|e| e.start_ms).collect();
        assert_eq!(starts, vec![100, 180, 260]);
        assert_eq!(step.end_ms, 1060);
        assert_eq!(timeline.entry_count(), 6);
        assert_eq!(timeline.duration_ms(), 1060);
    }

    #[test]
    fn test_from_values_render_before_start() {
        let (timeline, layout) = SequenceBuilder::new(500, Easing::Linear)
            .from(Tween::new("card", 1).y(40.0).opacity(0.0), Position::Start(0))
            .build();

        let y = layout.entry("card", 0, Property::TranslateY).unwrap();
        let opacity = layout.entry("card", 0, Property::Opacity).unwrap();
        assert_eq!(timeline.value(y), Some(40.0));
        assert_eq!(timeline.value(opacity), Some(0.0));
        assert!(layout.entry("card", 0, Property::Scale).is_none());
    }

    #[test]
    fn test_per_tween_overrides() {
        let (_, layout) = SequenceBuilder::new(800, Easing::EaseOut)
            .from(Tween::new("a", 1).opacity(0.0), Position::Start(0))
            .from(
                Tween::new("b", 1).opacity(0.0).duration(200),
                Position::Gap(100),
            )
            .build();

        let b = layout.step("b").unwrap();
        assert_eq!(b.start_ms, 900);
        assert_eq!(b.end_ms, 1100);
        assert_eq!(b.duration_ms, 200);
    }

    #[test]
    fn test_repeated_property_overrides_value() {
        let tween = Tween::new("x", 1).y(10.0).y(30.0);
        let (timeline, layout) = SequenceBuilder::new(100, Easing::Linear)
            .from(tween, Position::Start(0))
            .build();
        assert_eq!(timeline.entry_count(), 1);
        let y = layout.entry("x", 0, Property::TranslateY).unwrap();
        assert_eq!(timeline.value(y), Some(30.0));
    }
}
