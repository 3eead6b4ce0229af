//! Frame-by-frame playback sessions

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use motiontask_animation::AnimationScheduler;
use motiontask_core::{event_types, Event, KeyCode};
use motiontask_page::PageController;
use serde::Serialize;
use tracing::debug;

/// What happens during a session
#[derive(Debug, Clone, Default)]
pub struct SessionPlan {
    pub frames: u32,
    /// `(frame, offset)` of a scroll jump
    pub scroll: Option<(u32, f32)>,
    pub toggles: Vec<u32>,
    pub activate_cards: Vec<usize>,
    /// Key used to activate cards (Enter when unset)
    pub activation_key: Option<KeyCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleRecord {
    pub frame: u32,
    pub playing: bool,
}

/// JSON summary printed by `motiontask simulate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub frames: u32,
    pub frame_ms: f32,
    pub reduce_motion: bool,
    pub sequence_bound: bool,
    pub playing: bool,
    pub label: &'static str,
    pub sequence_time_ms: Option<f32>,
    pub sequence_updates: usize,
    pub toggles: Vec<ToggleRecord>,
    pub card_activations: Vec<u32>,
}

pub struct Session<'a> {
    scheduler: &'a AnimationScheduler,
    page: PageController,
    updates: Arc<AtomicUsize>,
}

impl<'a> Session<'a> {
    pub fn new(scheduler: &'a AnimationScheduler, mut page: PageController) -> Self {
        let updates = Arc::new(AtomicUsize::new(0));
        let counter = updates.clone();
        page.on_sequence_update(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        Self {
            scheduler,
            page,
            updates,
        }
    }

    pub fn run(&mut self, plan: &SessionPlan) -> SessionSummary {
        let frame_ms = self.scheduler.frame_ms();
        let mut toggles = Vec::new();

        let key = plan.activation_key.unwrap_or(KeyCode::Enter);
        for &index in &plan.activate_cards {
            self.activate_card(index, key);
        }

        for frame in 0..plan.frames {
            if let Some((at, offset)) = plan.scroll {
                if at == frame {
                    debug!("frame {}: scroll to {}", frame, offset);
                    let viewport_height = self.page.settings().viewport_height;
                    self.page
                        .handle_event(&Event::scroll(offset, viewport_height));
                }
            }

            for _ in plan.toggles.iter().filter(|&&at| at == frame) {
                self.page.handle_play_pause();
                toggles.push(ToggleRecord {
                    frame,
                    playing: self.page.is_playing(),
                });
            }

            self.scheduler.advance(frame_ms);
        }

        SessionSummary {
            frames: plan.frames,
            frame_ms,
            reduce_motion: self.page.reduce_motion(),
            sequence_bound: self.page.has_sequence(),
            playing: self.page.is_playing(),
            label: self.page.play_pause_label(),
            sequence_time_ms: self.page.sequence_time_ms(),
            sequence_updates: self.updates.load(Ordering::Relaxed),
            toggles,
            card_activations: self.page.cards().iter().map(|c| c.activations()).collect(),
        }
    }

    /// Focus a card, press `key`, and move focus away again
    fn activate_card(&mut self, index: usize, key: KeyCode) {
        let handled = self
            .page
            .dispatch_card_event(index, &Event::new(event_types::FOCUS));
        if !handled {
            tracing::warn!("no card at index {}", index);
            return;
        }
        self.page
            .dispatch_card_event(index, &Event::key_down(key));
        self.page
            .dispatch_card_event(index, &Event::new(event_types::BLUR));
    }

    /// Unmount the page
    pub fn finish(mut self) {
        self.page.unmount();
    }
}
