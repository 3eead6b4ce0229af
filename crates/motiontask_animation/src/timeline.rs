//! Timeline orchestration
//!
//! A timeline owns a set of entries, each interpolating one value from a
//! start to an end over `[offset, offset + duration]` on a shared clock.
//! Entries never run ahead of their offset: before it they hold their start
//! value, after it their end value.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::easing::Easing;

/// Identifies an entry within one timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineEntryId(u32);

impl TimelineEntryId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
struct TimelineEntry {
    offset_ms: i32,
    duration_ms: u32,
    start_value: f32,
    end_value: f32,
    easing: Easing,
}

impl TimelineEntry {
    fn end_ms(&self) -> i32 {
        self.offset_ms + self.duration_ms as i32
    }

    fn progress_at(&self, time_ms: f32) -> f32 {
        if self.duration_ms == 0 {
            return if time_ms >= self.offset_ms as f32 { 1.0 } else { 0.0 };
        }
        ((time_ms - self.offset_ms as f32) / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    fn value_at(&self, time_ms: f32) -> f32 {
        let t = self.easing.apply(self.progress_at(time_ms));
        self.start_value + (self.end_value - self.start_value) * t
    }
}

/// Run state of a timeline
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlayState {
    /// Not advancing; `resume()` continues from the current time
    #[default]
    Paused,
    Playing,
    /// Reached its end while playing
    Finished,
}

/// Snapshot passed to update callbacks after each advancing tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineFrame {
    pub time_ms: f32,
    pub progress: f32,
}

/// Callback invoked after every tick that advanced the timeline
///
/// Runs while the scheduler is locked; it must not call back into the
/// scheduler.
pub type UpdateCallback = Arc<dyn Fn(&TimelineFrame) + Send + Sync>;

/// A set of timed value transitions on a shared clock
///
/// New timelines start paused at time zero.
pub struct Timeline {
    entries: Vec<TimelineEntry>,
    current_ms: f32,
    state: PlayState,
    on_update: SmallVec<[UpdateCallback; 1]>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            current_ms: 0.0,
            state: PlayState::Paused,
            on_update: SmallVec::new(),
        }
    }

    /// Add a linear entry
    pub fn add(
        &mut self,
        offset_ms: i32,
        duration_ms: u32,
        start_value: f32,
        end_value: f32,
    ) -> TimelineEntryId {
        self.add_with_easing(offset_ms, duration_ms, start_value, end_value, Easing::Linear)
    }

    /// Add an entry with a specific easing curve
    pub fn add_with_easing(
        &mut self,
        offset_ms: i32,
        duration_ms: u32,
        start_value: f32,
        end_value: f32,
        easing: Easing,
    ) -> TimelineEntryId {
        let id = TimelineEntryId(self.entries.len() as u32);
        self.entries.push(TimelineEntry {
            offset_ms,
            duration_ms,
            start_value,
            end_value,
            easing,
        });
        id
    }

    /// Register a callback fired after each advancing tick
    pub fn on_update(&mut self, callback: UpdateCallback) {
        self.on_update.push(callback);
    }

    /// End of the last entry, in milliseconds (zero when empty)
    pub fn duration_ms(&self) -> u32 {
        self.entries
            .iter()
            .map(TimelineEntry::end_ms)
            .max()
            .unwrap_or(0)
            .max(0) as u32
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_ids(&self) -> Vec<TimelineEntryId> {
        (0..self.entries.len() as u32).map(TimelineEntryId).collect()
    }

    /// Offset of an entry, in milliseconds
    pub fn entry_offset(&self, id: TimelineEntryId) -> Option<i32> {
        self.entries.get(id.index()).map(|e| e.offset_ms)
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlayState::Paused
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlayState::Finished
    }

    /// Current clock position, in milliseconds
    pub fn time_ms(&self) -> f32 {
        self.current_ms
    }

    /// Restart from time zero and play
    pub fn start(&mut self) {
        self.current_ms = 0.0;
        self.state = PlayState::Playing;
    }

    /// Reset to time zero without playing
    pub fn stop(&mut self) {
        self.current_ms = 0.0;
        self.state = PlayState::Paused;
    }

    /// Pause at the current time
    pub fn pause(&mut self) {
        self.state = PlayState::Paused;
    }

    /// Continue playing from the current time
    ///
    /// A timeline resumed at its end finishes on the next tick.
    pub fn resume(&mut self) {
        if self.state == PlayState::Paused {
            self.state = PlayState::Playing;
        }
    }

    /// Jump to a time position, keeping the run state
    pub fn seek(&mut self, time_ms: f32) {
        self.current_ms = time_ms.clamp(0.0, self.duration_ms() as f32);
    }

    /// Overall progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let duration = self.duration_ms();
        if duration == 0 {
            return if self.state == PlayState::Finished { 1.0 } else { 0.0 };
        }
        (self.current_ms / duration as f32).clamp(0.0, 1.0)
    }

    /// Current value of an entry
    pub fn value(&self, id: TimelineEntryId) -> Option<f32> {
        self.entries
            .get(id.index())
            .map(|e| e.value_at(self.current_ms))
    }

    /// Linear progress of a single entry (0.0 to 1.0)
    pub fn entry_progress(&self, id: TimelineEntryId) -> Option<f32> {
        self.entries
            .get(id.index())
            .map(|e| e.progress_at(self.current_ms))
    }

    /// Advance the clock by `dt_ms` milliseconds
    ///
    /// Returns true if the timeline moved.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.state != PlayState::Playing {
            return false;
        }

        let duration = self.duration_ms() as f32;
        self.current_ms = (self.current_ms + dt_ms).min(duration);
        if self.current_ms >= duration {
            self.state = PlayState::Finished;
        }

        if !self.on_update.is_empty() {
            let frame = TimelineFrame {
                time_ms: self.current_ms,
                progress: self.progress(),
            };
            for callback in &self.on_update {
                callback(&frame);
            }
        }
        true
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("entries", &self.entries.len())
            .field("current_ms", &self.current_ms)
            .field("state", &self.state)
            .finish()
    }
}
