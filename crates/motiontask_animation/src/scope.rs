//! Scoped animation resources
//!
//! An [`AnimationScope`] records every timeline and scroll trigger created
//! through it and releases all of them together, either on [`revert`] or
//! when the scope is dropped. Reverting is idempotent.
//!
//! [`revert`]: AnimationScope::revert

use smallvec::SmallVec;

use crate::error::{AnimationError, AnimationResult};
use crate::scheduler::{SchedulerHandle, ScrollTriggerId, TimelineId};
use crate::scroll::ScrollTrigger;
use crate::timeline::Timeline;

/// Owns the timelines and scroll triggers of one component
pub struct AnimationScope {
    handle: SchedulerHandle,
    timelines: SmallVec<[TimelineId; 2]>,
    triggers: SmallVec<[ScrollTriggerId; 2]>,
}

impl AnimationScope {
    pub fn new(handle: SchedulerHandle) -> Self {
        Self {
            handle,
            timelines: SmallVec::new(),
            triggers: SmallVec::new(),
        }
    }

    pub fn handle(&self) -> &SchedulerHandle {
        &self.handle
    }

    /// Register a timeline owned by this scope
    pub fn add_timeline(&mut self, timeline: Timeline) -> AnimationResult<TimelineId> {
        let id = self
            .handle
            .register_timeline(timeline)
            .ok_or(AnimationError::SchedulerUnavailable)?;
        self.timelines.push(id);
        Ok(id)
    }

    /// Register a scroll trigger owned by this scope
    pub fn add_scroll_trigger(&mut self, trigger: ScrollTrigger) -> AnimationResult<ScrollTriggerId> {
        let id = self
            .handle
            .register_scroll_trigger(trigger)
            .ok_or(AnimationError::SchedulerUnavailable)?;
        self.triggers.push(id);
        Ok(id)
    }

    pub fn timelines(&self) -> &[TimelineId] {
        &self.timelines
    }

    pub fn scroll_triggers(&self) -> &[ScrollTriggerId] {
        &self.triggers
    }

    pub fn is_empty(&self) -> bool {
        self.timelines.is_empty() && self.triggers.is_empty()
    }

    /// Detach every trigger, then remove every timeline
    ///
    /// Triggers go first so none can fire against a half-removed scope.
    pub fn revert(&mut self) {
        if self.is_empty() {
            return;
        }

        let triggers = self.triggers.len();
        let timelines = self.timelines.len();
        for id in self.triggers.drain(..) {
            self.handle.remove_scroll_trigger(id);
        }
        for id in self.timelines.drain(..) {
            self.handle.remove_timeline(id);
        }

        tracing::debug!(
            "animation scope reverted ({} triggers, {} timelines)",
            triggers,
            timelines
        );
    }
}

impl Drop for AnimationScope {
    fn drop(&mut self) {
        self.revert();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::AnimationScheduler;
    use crate::scroll::TriggerBounds;

    fn scoped(scheduler: &AnimationScheduler) -> AnimationScope {
        let mut scope = AnimationScope::new(scheduler.handle());
        let mut timeline = Timeline::new();
        timeline.add(0, 500, 0.0, 1.0);
        let id = scope.add_timeline(timeline).unwrap();
        scope
            .add_scroll_trigger(ScrollTrigger::new(id, TriggerBounds::new(0.0, 100.0)))
            .unwrap();
        scope
    }

    #[test]
    fn test_revert_releases_everything() {
        let scheduler = AnimationScheduler::new();
        let mut scope = scoped(&scheduler);
        assert_eq!(scheduler.timeline_count(), 1);
        assert_eq!(scheduler.scroll_trigger_count(), 1);

        scope.revert();
        assert!(scope.is_empty());
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.scroll_trigger_count(), 0);

        // Second revert is a no-op
        scope.revert();
        assert_eq!(scheduler.timeline_count(), 0);
    }

    #[test]
    fn test_drop_reverts() {
        let scheduler = AnimationScheduler::new();
        {
            let _scope = scoped(&scheduler);
            assert_eq!(scheduler.timeline_count(), 1);
        }
        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.scroll_trigger_count(), 0);
    }

    #[test]
    fn test_empty_scope_and_dead_scheduler() {
        let mut scope = AnimationScope::new(AnimationScheduler::new().handle());
        scope.revert();
        assert_eq!(
            scope.add_timeline(Timeline::new()),
            Err(AnimationError::SchedulerUnavailable)
        );
        assert!(scope.is_empty());
    }
}
