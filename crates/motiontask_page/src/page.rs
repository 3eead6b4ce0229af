//! Page controller
//!
//! Owns the page's entrance sequence, its scroll binding, the hero
//! entrance and the feature cards. Everything animated is acquired on
//! [`PageController::mount`] and released on [`PageController::unmount`],
//! on a motion-preference change, or when mounting fails part way.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use motiontask_animation::{
    global_scheduler, AnimatedTimeline, AnimationScope, Easing, Position, Property,
    SchedulerHandle, ScrollTrigger, ScrollTriggerId, SequenceBuilder, SequenceLayout, Timeline,
    TimelineEntryId, TimelineFrame, TimelineId, TriggerAction, TriggerBounds, TriggerPoint,
    Tween, UpdateCallback,
};
use motiontask_core::event_types::SCROLL;
use motiontask_core::{Event, EventData};

use crate::card::InteractiveCard;
use crate::config::PageSettings;
use crate::content::{DECOR_SHAPES, FEATURES};
use crate::error::{PageError, PageResult};
use crate::preference::MotionPreferenceSource;

/// Default step duration of the entrance sequence
pub const SEQUENCE_DURATION_MS: u32 = 800;
pub const SEQUENCE_EASING: Easing = Easing::EaseOutQuart;

pub const SUBHEADING_OVERLAP_MS: u32 = 500;
pub const SHAPES_OVERLAP_MS: u32 = 400;
pub const CARDS_OVERLAP_MS: u32 = 400;
pub const SHAPES_STAGGER_MS: u32 = 80;
pub const CARDS_STAGGER_MS: u32 = 120;

pub const HERO_DURATION_MS: u32 = 800;
pub const HERO_FROM_Y: f32 = 18.0;

/// Element groups animated by the entrance sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetGroup {
    Heading,
    Subheading,
    DecorShapes,
    Cards,
}

impl TargetGroup {
    pub const ALL: [TargetGroup; 4] = [
        TargetGroup::Heading,
        TargetGroup::Subheading,
        TargetGroup::DecorShapes,
        TargetGroup::Cards,
    ];

    /// Class carried by every element of the group
    pub fn class(&self) -> &'static str {
        match self {
            TargetGroup::Heading => "hero-heading",
            TargetGroup::Subheading => "hero-sub",
            TargetGroup::DecorShapes => "decor-shape",
            TargetGroup::Cards => "feature-card",
        }
    }

    /// Number of elements in the group
    pub fn count(&self) -> usize {
        match self {
            TargetGroup::Heading | TargetGroup::Subheading => 1,
            TargetGroup::DecorShapes => DECOR_SHAPES.len(),
            TargetGroup::Cards => FEATURES.len(),
        }
    }
}

/// Build the page's entrance sequence
///
/// The timeline comes back paused; the scroll trigger plays it.
pub fn page_sequence() -> (Timeline, SequenceLayout) {
    SequenceBuilder::new(SEQUENCE_DURATION_MS, SEQUENCE_EASING)
        .from(
            Tween::new(TargetGroup::Heading.class(), 1).y(30.0).opacity(0.0),
            Position::Start(0),
        )
        .from(
            Tween::new(TargetGroup::Subheading.class(), 1).y(20.0).opacity(0.0),
            Position::Overlap(SUBHEADING_OVERLAP_MS),
        )
        .from(
            Tween::new(TargetGroup::DecorShapes.class(), TargetGroup::DecorShapes.count())
                .scale(0.0)
                .opacity(0.0)
                .stagger(SHAPES_STAGGER_MS),
            Position::Overlap(SHAPES_OVERLAP_MS),
        )
        .from(
            Tween::new(TargetGroup::Cards.class(), TargetGroup::Cards.count())
                .y(40.0)
                .opacity(0.0)
                .stagger(CARDS_STAGGER_MS),
            Position::Overlap(CARDS_OVERLAP_MS),
        )
        .build()
}

/// Transform and opacity applied to a rendered element
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementStyle {
    pub translate_y: f32,
    pub opacity: f32,
    pub scale: f32,
}

impl ElementStyle {
    pub const IDENTITY: Self = Self {
        translate_y: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Stack another layer's transform on top of this one
    pub fn combine(self, other: ElementStyle) -> Self {
        Self {
            translate_y: self.translate_y + other.translate_y,
            opacity: self.opacity * other.opacity,
            scale: self.scale * other.scale,
        }
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The live sequence and its scroll binding
struct LiveSequence {
    scope: AnimationScope,
    timeline: TimelineId,
    trigger: ScrollTriggerId,
    layout: SequenceLayout,
}

struct HeroEntrance {
    timeline: AnimatedTimeline,
    y: TimelineEntryId,
    opacity: TimelineEntryId,
}

/// Owns the lifecycle of every animation on the page
pub struct PageController {
    handle: SchedulerHandle,
    settings: PageSettings,
    mounted: bool,
    reduce_motion: bool,
    playing: bool,
    scroll_y: f32,
    sequence: Option<LiveSequence>,
    hero: Option<HeroEntrance>,
    cards: Vec<InteractiveCard>,
    on_sequence_update: Option<UpdateCallback>,
}

impl PageController {
    pub fn new(handle: SchedulerHandle, settings: PageSettings) -> Self {
        Self {
            handle,
            settings,
            mounted: false,
            reduce_motion: false,
            playing: true,
            scroll_y: 0.0,
            sequence: None,
            hero: None,
            cards: FEATURES.iter().copied().map(InteractiveCard::new).collect(),
            on_sequence_update: None,
        }
    }

    /// Create a controller on the process-wide scheduler
    pub fn from_global(settings: PageSettings) -> PageResult<Self> {
        Ok(Self::new(global_scheduler()?, settings))
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Mount the page, reading the motion preference once
    ///
    /// Mounting an already mounted page remounts it. On failure nothing
    /// stays registered with the scheduler.
    pub fn mount(&mut self, source: &dyn MotionPreferenceSource) -> PageResult<()> {
        if self.mounted {
            self.unmount();
        }
        let reduce_motion = self.settings.reduced_motion.unwrap_or_else(|| source.reduce_motion());
        self.mount_with(reduce_motion)
    }

    fn mount_with(&mut self, reduce_motion: bool) -> PageResult<()> {
        if !self.handle.is_alive() {
            return Err(PageError::EngineUnavailable);
        }

        self.reduce_motion = reduce_motion;
        // A fresh sequence plays, so the toggle starts from "Pause"
        self.playing = true;
        if let Err(err) = self.acquire() {
            tracing::warn!("page mount failed: {}", err);
            self.release();
            return Err(err);
        }
        self.mounted = true;

        tracing::info!(
            "page mounted (reduce_motion: {}, sequence: {})",
            reduce_motion,
            self.sequence.is_some()
        );
        Ok(())
    }

    fn acquire(&mut self) -> PageResult<()> {
        for card in &mut self.cards {
            card.mount(&self.handle, self.reduce_motion)?;
        }

        if self.reduce_motion {
            return Ok(());
        }

        self.hero = Some(self.build_hero()?);
        self.sequence = Some(self.bind_sequence()?);
        Ok(())
    }

    fn build_hero(&self) -> PageResult<HeroEntrance> {
        let mut timeline = Timeline::new();
        let y = timeline.add_with_easing(0, HERO_DURATION_MS, HERO_FROM_Y, 0.0, Easing::EaseOut);
        let opacity = timeline.add_with_easing(0, HERO_DURATION_MS, 0.0, 1.0, Easing::EaseOut);
        let timeline = AnimatedTimeline::new(self.handle.clone(), timeline)?;
        timeline.start();
        Ok(HeroEntrance {
            timeline,
            y,
            opacity,
        })
    }

    /// Build the sequence and bind it to the page section
    fn bind_sequence(&self) -> PageResult<LiveSequence> {
        let (mut timeline, layout) = page_sequence();
        if let Some(callback) = &self.on_sequence_update {
            timeline.on_update(callback.clone());
        }
        tracing::debug!("entrance sequence built: {}ms", timeline.duration_ms());

        // Dropping the scope on an early return releases the timeline
        let mut scope = AnimationScope::new(self.handle.clone());
        let timeline_id = scope.add_timeline(timeline)?;

        self.handle
            .update_scroll(self.scroll_y, self.settings.viewport_height);
        let trigger = ScrollTrigger::new(timeline_id, self.section_bounds())
            .start(TriggerPoint::TOP_CENTER)
            .on_enter(TriggerAction::Play);
        let trigger_id = scope.add_scroll_trigger(trigger)?;

        Ok(LiveSequence {
            scope,
            timeline: timeline_id,
            trigger: trigger_id,
            layout,
        })
    }

    fn section_bounds(&self) -> TriggerBounds {
        TriggerBounds::new(self.settings.section_top, self.settings.section_height)
    }

    /// Release the sequence, its binding and all card animations
    ///
    /// Safe to call at any time, any number of times.
    pub fn unmount(&mut self) {
        let was_mounted = self.mounted;
        self.release();
        self.mounted = false;
        if was_mounted {
            tracing::info!("page unmounted");
        }
    }

    fn release(&mut self) {
        if let Some(mut sequence) = self.sequence.take() {
            sequence.scope.revert();
        }
        self.hero = None;
        for card in &mut self.cards {
            card.unmount();
        }
    }

    /// React to a new motion preference
    ///
    /// A real change tears the page down and mounts it again under the new
    /// preference, which starts playback over. An unmounted page ignores the
    /// change since [`mount`](Self::mount) reads the preference itself.
    pub fn on_motion_preference_change(&mut self, reduce_motion: bool) -> PageResult<()> {
        if !self.mounted || reduce_motion == self.reduce_motion {
            return Ok(());
        }

        tracing::debug!("motion preference changed (reduce_motion: {})", reduce_motion);
        self.unmount();
        self.mount_with(reduce_motion)
    }

    /// Flip the sequence between playing and paused
    ///
    /// Does nothing without a live sequence or once the engine is gone.
    pub fn handle_play_pause(&mut self) {
        let Some(sequence) = &self.sequence else {
            return;
        };

        match self.handle.is_timeline_paused(sequence.timeline) {
            Some(true) => {
                self.handle.resume_timeline(sequence.timeline);
                self.playing = true;
            }
            Some(false) => {
                self.handle.pause_timeline(sequence.timeline);
                self.playing = false;
            }
            None => return,
        }
        tracing::debug!("playback toggled (playing: {})", self.playing);
    }

    /// Forward a scroll position from the host
    pub fn handle_scroll(&mut self, offset_y: f32) {
        self.scroll_y = offset_y;
        self.handle
            .update_scroll(offset_y, self.settings.viewport_height);
    }

    /// Route a page-level event
    ///
    /// Scroll events carry the viewport height along with the offset.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event.data {
            EventData::Scroll {
                offset_y,
                viewport_height,
            } if event.event_type == SCROLL => {
                self.settings.viewport_height = viewport_height;
                self.handle_scroll(offset_y);
                true
            }
            _ => false,
        }
    }

    /// Route an input event to the card at `index`
    pub fn dispatch_card_event(&mut self, index: usize, event: &Event) -> bool {
        match self.cards.get_mut(index) {
            Some(card) => card.handle_event(event),
            None => false,
        }
    }

    /// Observe every frame of the entrance sequence
    ///
    /// Callbacks run on the frame tick and must not call back into the
    /// scheduler. They stop firing once the page unmounts.
    pub fn on_sequence_update<F>(&mut self, callback: F)
    where
        F: Fn(&TimelineFrame) + Send + Sync + 'static,
    {
        let callback: UpdateCallback = Arc::new(callback);
        if let Some(sequence) = &self.sequence {
            let attached = callback.clone();
            self.handle
                .with_timeline(sequence.timeline, |t| t.on_update(attached));
        }
        self.on_sequence_update = Some(callback);
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn reduce_motion(&self) -> bool {
        self.reduce_motion
    }

    /// Playback state shown by the play/pause control
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play_pause_label(&self) -> &'static str {
        if self.playing {
            "Pause"
        } else {
            "Play"
        }
    }

    pub fn has_sequence(&self) -> bool {
        self.sequence.is_some()
    }

    pub fn sequence_timeline(&self) -> Option<TimelineId> {
        self.sequence.as_ref().map(|s| s.timeline)
    }

    pub fn scroll_trigger(&self) -> Option<ScrollTriggerId> {
        self.sequence.as_ref().map(|s| s.trigger)
    }

    pub fn sequence_layout(&self) -> Option<&SequenceLayout> {
        self.sequence.as_ref().map(|s| &s.layout)
    }

    /// Clock position of the sequence, in milliseconds
    pub fn sequence_time_ms(&self) -> Option<f32> {
        let sequence = self.sequence.as_ref()?;
        self.handle.with_timeline(sequence.timeline, |t| t.time_ms())
    }

    pub fn cards(&self) -> &[InteractiveCard] {
        &self.cards
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut InteractiveCard> {
        self.cards.get_mut(index)
    }

    /// Current style of the hero copy block
    pub fn hero_style(&self) -> ElementStyle {
        let Some(hero) = &self.hero else {
            return ElementStyle::IDENTITY;
        };
        ElementStyle {
            translate_y: hero.timeline.get(hero.y).unwrap_or(0.0),
            opacity: hero.timeline.get(hero.opacity).unwrap_or(1.0),
            scale: 1.0,
        }
    }

    /// Current sequence styles, keyed by group and element index
    ///
    /// Empty without a live sequence.
    pub fn sequence_styles(&self) -> FxHashMap<(TargetGroup, usize), ElementStyle> {
        let mut styles = FxHashMap::default();
        let Some(sequence) = &self.sequence else {
            return styles;
        };

        self.handle.with_timeline(sequence.timeline, |timeline| {
            for group in TargetGroup::ALL {
                let Some(step) = sequence.layout.step(group.class()) else {
                    continue;
                };
                for (index, element) in step.elements.iter().enumerate() {
                    let value = |property: Property| {
                        element
                            .entry(property)
                            .and_then(|id| timeline.value(id))
                            .unwrap_or(property.resting_value())
                    };
                    styles.insert(
                        (group, index),
                        ElementStyle {
                            translate_y: value(Property::TranslateY),
                            opacity: value(Property::Opacity),
                            scale: value(Property::Scale),
                        },
                    );
                }
            }
        });
        styles
    }

    /// Style of a card: the sequence layer stacked with the card's own motion
    pub fn card_style(&self, index: usize) -> ElementStyle {
        let Some(card) = self.cards.get(index) else {
            return ElementStyle::IDENTITY;
        };
        let visual = card.visual();
        let own = ElementStyle {
            translate_y: visual.translate_y,
            opacity: visual.opacity,
            scale: visual.scale,
        };
        let sequence = self
            .sequence_styles()
            .get(&(TargetGroup::Cards, index))
            .copied()
            .unwrap_or_default();
        sequence.combine(own)
    }
}

impl Drop for PageController {
    fn drop(&mut self) {
        self.unmount();
    }
}
