//! Animation scheduler
//!
//! Owns every live spring, timeline, and scroll trigger and advances them
//! once per frame. Components talk to it through a weak [`SchedulerHandle`],
//! so that dropping the scheduler turns every handle operation into a no-op.
//!
//! The scheduler is driven by the host's frame loop: call [`tick`] with the
//! wall clock, or [`advance`] with an explicit frame delta. Scroll positions
//! are pushed in through [`SchedulerHandle::update_scroll`].
//!
//! [`tick`]: AnimationScheduler::tick
//! [`advance`]: AnimationScheduler::advance

use crate::error::{AnimationError, AnimationResult};
use crate::scroll::{ScrollPosition, ScrollTrigger};
use crate::spring::{RestThreshold, Spring, SpringConfig};
use crate::timeline::{Timeline, TimelineEntryId};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};
use std::time::Instant;

// ============================================================================
// Global Animation Scheduler State
// ============================================================================

static GLOBAL_SCHEDULER: OnceLock<SchedulerHandle> = OnceLock::new();

/// Longest single spring integration step, in milliseconds
const MAX_SPRING_STEP_MS: f32 = 16.0;

/// Install the process-wide scheduler handle
///
/// Call once at startup, before any page is constructed. A second call
/// fails with [`AnimationError::AlreadyInitialized`].
pub fn set_global_scheduler(handle: SchedulerHandle) -> AnimationResult<()> {
    GLOBAL_SCHEDULER
        .set(handle)
        .map_err(|_| AnimationError::AlreadyInitialized)?;
    tracing::debug!("global animation scheduler initialized");
    Ok(())
}

/// Get the process-wide scheduler handle
pub fn global_scheduler() -> AnimationResult<SchedulerHandle> {
    GLOBAL_SCHEDULER
        .get()
        .cloned()
        .ok_or(AnimationError::NotInitialized)
}

/// Check if the global scheduler has been initialized
pub fn is_scheduler_initialized() -> bool {
    GLOBAL_SCHEDULER.get().is_some()
}

new_key_type! {
    /// Handle to a registered spring animation
    pub struct SpringId;
    /// Handle to a registered timeline
    pub struct TimelineId;
    /// Handle to a registered scroll trigger
    pub struct ScrollTriggerId;
}

struct SchedulerInner {
    springs: SlotMap<SpringId, Spring>,
    timelines: SlotMap<TimelineId, Timeline>,
    triggers: SlotMap<ScrollTriggerId, ScrollTrigger>,
    scroll: ScrollPosition,
    last_frame: Instant,
}

impl SchedulerInner {
    fn step(&mut self, dt_ms: f32) -> bool {
        // RK4 diverges on stiff springs with long frames, so long frames are
        // split into sub-steps
        for (_, spring) in self.springs.iter_mut() {
            let mut remaining = dt_ms;
            loop {
                let step_ms = remaining.min(MAX_SPRING_STEP_MS);
                spring.step(step_ms / 1000.0);
                remaining -= step_ms;
                if remaining <= 0.0 || spring.is_settled() {
                    break;
                }
            }
        }

        for (_, timeline) in self.timelines.iter_mut() {
            timeline.tick(dt_ms);
        }

        // Animations are only removed when their owner drops or reverts them,
        // so finished timelines can still be replayed.
        self.has_active()
    }

    fn has_active(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
            || self.timelines.iter().any(|(_, t)| t.is_playing())
    }

    fn evaluate_trigger(&mut self, id: ScrollTriggerId) {
        let scroll = self.scroll;
        let Some(trigger) = self.triggers.get_mut(id) else {
            return;
        };
        let timeline_id = trigger.timeline();
        if let Some(action) = trigger.update(scroll) {
            match self.timelines.get_mut(timeline_id) {
                Some(timeline) => {
                    tracing::debug!("scroll trigger {:?} fired {:?}", id, action);
                    action.apply(timeline);
                }
                None => tracing::warn!("scroll trigger {:?} references a removed timeline", id),
            }
        }
    }
}

/// The animation scheduler that ticks all active animations
///
/// Held by the application and shared with components via [`SchedulerHandle`].
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    target_fps: u32,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                springs: SlotMap::with_key(),
                timelines: SlotMap::with_key(),
                triggers: SlotMap::with_key(),
                scroll: ScrollPosition::default(),
                last_frame: Instant::now(),
            })),
            target_fps: 120,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps.max(1);
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Frame length at the target frame rate, in milliseconds
    pub fn frame_ms(&self) -> f32 {
        1000.0 / self.target_fps as f32
    }

    /// Tick all animations by the wall-clock time since the last frame
    ///
    /// Returns true if any animations are still active (need another tick).
    pub fn tick(&self) -> bool {
        let mut inner = self.lock();
        let now = Instant::now();
        let dt_ms = (now - inner.last_frame).as_secs_f32() * 1000.0;
        inner.last_frame = now;
        inner.step(dt_ms)
    }

    /// Tick all animations by an explicit frame delta
    pub fn advance(&self, dt_ms: f32) -> bool {
        let mut inner = self.lock();
        inner.last_frame = Instant::now();
        inner.step(dt_ms)
    }

    pub fn has_active_animations(&self) -> bool {
        self.lock().has_active()
    }

    pub fn spring_count(&self) -> usize {
        self.lock().springs.len()
    }

    pub fn timeline_count(&self) -> usize {
        self.lock().timelines.len()
    }

    pub fn scroll_trigger_count(&self) -> usize {
        self.lock().triggers.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// Registration methods return `None` once the scheduler is gone; every
/// other operation silently does nothing.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    fn with_inner<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut SchedulerInner) -> R,
    {
        let inner = self.inner.upgrade()?;
        let mut guard = inner.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut guard))
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    // =========================================================================
    // Spring Operations
    // =========================================================================

    pub fn register_spring(&self, spring: Spring) -> Option<SpringId> {
        self.with_inner(|inner| {
            // Avoid a huge first dt for springs created after an idle period
            inner.last_frame = Instant::now();
            inner.springs.insert(spring)
        })
    }

    pub fn set_spring_target(&self, id: SpringId, target: f32) {
        self.with_inner(|inner| {
            // A host may stop ticking while nothing moves; restart the clock
            // so the first tick after the idle period is a short one
            if !inner.has_active() {
                inner.last_frame = Instant::now();
            }
            if let Some(spring) = inner.springs.get_mut(id) {
                spring.set_target(target);
            }
        });
    }

    pub fn get_spring_value(&self, id: SpringId) -> Option<f32> {
        self.with_inner(|inner| inner.springs.get(id).map(|s| s.value()))
            .flatten()
    }

    /// A missing spring counts as settled
    pub fn is_spring_settled(&self, id: SpringId) -> bool {
        self.with_inner(|inner| inner.springs.get(id).map(|s| s.is_settled()))
            .flatten()
            .unwrap_or(true)
    }

    pub fn remove_spring(&self, id: SpringId) {
        self.with_inner(|inner| inner.springs.remove(id));
    }

    // =========================================================================
    // Timeline Operations
    // =========================================================================

    pub fn register_timeline(&self, timeline: Timeline) -> Option<TimelineId> {
        self.with_inner(|inner| inner.timelines.insert(timeline))
    }

    /// Access a registered timeline
    ///
    /// Returns None if the scheduler is dropped or the timeline was removed.
    pub fn with_timeline<F, R>(&self, id: TimelineId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Timeline) -> R,
    {
        self.with_inner(|inner| inner.timelines.get_mut(id).map(f))
            .flatten()
    }

    pub fn start_timeline(&self, id: TimelineId) {
        self.with_timeline(id, Timeline::start);
    }

    pub fn pause_timeline(&self, id: TimelineId) {
        self.with_timeline(id, Timeline::pause);
    }

    pub fn resume_timeline(&self, id: TimelineId) {
        self.with_timeline(id, Timeline::resume);
    }

    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.with_timeline(id, |t| t.is_playing()).unwrap_or(false)
    }

    /// `None` when the timeline no longer exists
    pub fn is_timeline_paused(&self, id: TimelineId) -> Option<bool> {
        self.with_timeline(id, |t| t.is_paused())
    }

    pub fn timeline_value(&self, id: TimelineId, entry: TimelineEntryId) -> Option<f32> {
        self.with_timeline(id, |t| t.value(entry)).flatten()
    }

    /// Remove a timeline, cancelling its pending updates
    pub fn remove_timeline(&self, id: TimelineId) -> bool {
        self.with_inner(|inner| inner.timelines.remove(id).is_some())
            .unwrap_or(false)
    }

    pub fn has_timeline(&self, id: TimelineId) -> bool {
        self.with_inner(|inner| inner.timelines.contains_key(id))
            .unwrap_or(false)
    }

    // =========================================================================
    // Scroll Operations
    // =========================================================================

    /// Register a scroll trigger
    ///
    /// The trigger is evaluated against the current scroll position right
    /// away, so an element already past its start point fires immediately.
    pub fn register_scroll_trigger(&self, trigger: ScrollTrigger) -> Option<ScrollTriggerId> {
        self.with_inner(|inner| {
            let id = inner.triggers.insert(trigger);
            inner.evaluate_trigger(id);
            id
        })
    }

    /// Detach a scroll trigger
    pub fn remove_scroll_trigger(&self, id: ScrollTriggerId) -> bool {
        self.with_inner(|inner| inner.triggers.remove(id).is_some())
            .unwrap_or(false)
    }

    pub fn has_scroll_trigger(&self, id: ScrollTriggerId) -> bool {
        self.with_inner(|inner| inner.triggers.contains_key(id))
            .unwrap_or(false)
    }

    pub fn is_scroll_trigger_active(&self, id: ScrollTriggerId) -> bool {
        self.with_inner(|inner| inner.triggers.get(id).map(|t| t.is_active()))
            .flatten()
            .unwrap_or(false)
    }

    /// Push a new scroll position and fire any crossed triggers
    pub fn update_scroll(&self, offset_y: f32, viewport_height: f32) {
        self.with_inner(|inner| {
            inner.scroll = ScrollPosition {
                offset_y,
                viewport_height,
            };
            let ids: SmallVec<[ScrollTriggerId; 4]> = inner.triggers.keys().collect();
            for id in ids {
                inner.evaluate_trigger(id);
            }
        });
    }

    pub fn scroll_position(&self) -> Option<ScrollPosition> {
        self.with_inner(|inner| inner.scroll)
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

// ============================================================================
// Animated Value (Spring-based)
// ============================================================================

/// A spring-animated value registered with the scheduler on first retarget
///
/// ```
/// use motiontask_animation::{AnimatedValue, AnimationScheduler, SpringConfig};
///
/// let scheduler = AnimationScheduler::new();
/// let mut lift = AnimatedValue::new(scheduler.handle(), 0.0, SpringConfig::interactive());
///
/// lift.set_target(-8.0);
/// scheduler.advance(16.0);
/// assert!(lift.get() < 0.0);
/// ```
pub struct AnimatedValue {
    handle: SchedulerHandle,
    spring_id: Option<SpringId>,
    config: SpringConfig,
    rest: RestThreshold,
    current: f32,
    target: f32,
}

impl AnimatedValue {
    pub fn new(handle: SchedulerHandle, initial: f32, config: SpringConfig) -> Self {
        Self {
            handle,
            spring_id: None,
            config,
            rest: RestThreshold::PIXELS,
            current: initial,
            target: initial,
        }
    }

    /// Use settle thresholds suited to unit-scale values like scale factors
    pub fn unit_scale(mut self) -> Self {
        self.rest = RestThreshold::UNIT;
        self
    }

    /// Set the target value - starts animating if it differs from current
    pub fn set_target(&mut self, target: f32) {
        self.target = target;

        if let Some(id) = self.spring_id {
            self.handle.set_spring_target(id, target);
        } else if (target - self.current).abs() > f32::EPSILON {
            let spring = Spring::new(self.config, self.current).with_rest(self.rest);
            if let Some(id) = self.handle.register_spring(spring) {
                self.spring_id = Some(id);
                self.handle.set_spring_target(id, target);
            } else {
                // No scheduler to animate with
                self.current = target;
            }
        }
    }

    /// Get the current animated value
    pub fn get(&self) -> f32 {
        match self.spring_id {
            Some(id) => self.handle.get_spring_value(id).unwrap_or(self.target),
            None => self.current,
        }
    }

    /// Set value immediately without animation
    pub fn set_immediate(&mut self, value: f32) {
        if let Some(id) = self.spring_id.take() {
            self.handle.remove_spring(id);
        }
        self.current = value;
        self.target = value;
    }

    pub fn is_animating(&self) -> bool {
        self.spring_id
            .map(|id| !self.handle.is_spring_settled(id))
            .unwrap_or(false)
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.spring_id {
            self.handle.remove_spring(id);
        }
    }
}

// ============================================================================
// Animated Timeline
// ============================================================================

/// A timeline registered with the scheduler for as long as this value lives
pub struct AnimatedTimeline {
    handle: SchedulerHandle,
    timeline_id: TimelineId,
}

impl AnimatedTimeline {
    /// Register `timeline` with the scheduler
    pub fn new(handle: SchedulerHandle, timeline: Timeline) -> AnimationResult<Self> {
        let timeline_id = handle
            .register_timeline(timeline)
            .ok_or(AnimationError::SchedulerUnavailable)?;
        Ok(Self {
            handle,
            timeline_id,
        })
    }

    pub fn id(&self) -> TimelineId {
        self.timeline_id
    }

    pub fn start(&self) {
        self.handle.start_timeline(self.timeline_id);
    }

    pub fn pause(&self) {
        self.handle.pause_timeline(self.timeline_id);
    }

    pub fn resume(&self) {
        self.handle.resume_timeline(self.timeline_id);
    }

    pub fn is_playing(&self) -> bool {
        self.handle.is_timeline_playing(self.timeline_id)
    }

    pub fn get(&self, entry: TimelineEntryId) -> Option<f32> {
        self.handle.timeline_value(self.timeline_id, entry)
    }

    pub fn progress(&self) -> f32 {
        self.handle
            .with_timeline(self.timeline_id, |t| t.progress())
            .unwrap_or(0.0)
    }
}

impl Drop for AnimatedTimeline {
    fn drop(&mut self) {
        self.handle.remove_timeline(self.timeline_id);
    }
}
