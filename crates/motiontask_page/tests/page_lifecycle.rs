//! Mount, scroll, toggle, and unmount through the public page API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use motiontask_animation::{
    global_scheduler, set_global_scheduler, AnimationScheduler, Position, Property,
};
use motiontask_core::events::event_types::*;
use motiontask_core::{Event, KeyCode};
use motiontask_page::page::{CARDS_OVERLAP_MS, SHAPES_OVERLAP_MS, SUBHEADING_OVERLAP_MS};
use motiontask_page::{
    page_sequence, CardState, FixedPreference, PageController, PageSettings, TargetGroup,
    FEATURES,
};

const FRAME_MS: f32 = 1000.0 / 60.0;

fn page(scheduler: &AnimationScheduler) -> PageController {
    PageController::new(scheduler.handle(), PageSettings::default())
}

fn below_the_fold(scheduler: &AnimationScheduler) -> PageController {
    PageController::new(
        scheduler.handle(),
        PageSettings {
            section_top: 2000.0,
            ..PageSettings::default()
        },
    )
}

#[test]
fn reduced_motion_builds_nothing_and_toggle_is_noop() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::REDUCE).unwrap();

    assert!(page.is_mounted());
    assert!(!page.has_sequence());
    assert_eq!(scheduler.scroll_trigger_count(), 0);
    assert_eq!(scheduler.timeline_count(), 0);

    let before = page.is_playing();
    for _ in 0..3 {
        page.handle_play_pause();
        assert_eq!(page.is_playing(), before);
    }
}

#[test]
fn unavailable_preference_means_motion() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::UNAVAILABLE).unwrap();
    assert!(page.has_sequence());
}

#[test]
fn mount_binds_one_sequence_and_unmount_releases_it() {
    let scheduler = AnimationScheduler::new();
    let handle = scheduler.handle();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();

    let timeline = page.sequence_timeline().unwrap();
    let trigger = page.scroll_trigger().unwrap();
    assert_eq!(scheduler.scroll_trigger_count(), 1);
    assert!(handle.has_timeline(timeline));
    assert!(handle.has_scroll_trigger(trigger));

    page.unmount();
    assert!(!page.has_sequence());
    assert!(!handle.has_timeline(timeline));
    assert!(!handle.has_scroll_trigger(trigger));
    assert_eq!(scheduler.scroll_trigger_count(), 0);
    assert_eq!(scheduler.timeline_count(), 0);
    assert_eq!(scheduler.spring_count(), 0);

    let before = page.is_playing();
    page.handle_play_pause();
    assert_eq!(page.is_playing(), before);

    // Teardown is idempotent
    page.unmount();
    page.unmount();
}

#[test]
fn toggle_alternates_from_playing() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();
    scheduler.advance(FRAME_MS);
    assert!(page.is_playing());

    for n in 0..5 {
        for _ in 0..n {
            page.handle_play_pause();
            assert!(!page.is_playing());
            assert_eq!(page.play_pause_label(), "Play");

            page.handle_play_pause();
            assert!(page.is_playing());
            assert_eq!(page.play_pause_label(), "Pause");
        }
        assert!(page.is_playing());
    }
}

#[test]
fn paused_sequence_holds_its_clock() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();

    scheduler.advance(200.0);
    page.handle_play_pause();
    scheduler.advance(500.0);
    assert_eq!(page.sequence_time_ms(), Some(200.0));

    page.handle_play_pause();
    scheduler.advance(100.0);
    assert_eq!(page.sequence_time_ms(), Some(300.0));
}

#[test]
fn toggle_after_sequence_finishes_still_alternates() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();
    scheduler.advance(10_000.0);

    page.handle_play_pause();
    assert!(!page.is_playing());
    page.handle_play_pause();
    assert!(page.is_playing());
}

#[test]
fn scroll_trigger_plays_at_viewport_center() {
    let scheduler = AnimationScheduler::new();
    let mut page = below_the_fold(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();

    scheduler.advance(500.0);
    assert_eq!(page.sequence_time_ms(), Some(0.0));

    // Section top (2000) meets the viewport center (900 / 2) at 1550
    page.handle_scroll(1500.0);
    scheduler.advance(500.0);
    assert_eq!(page.sequence_time_ms(), Some(0.0));

    page.handle_scroll(1550.0);
    scheduler.advance(500.0);
    assert_eq!(page.sequence_time_ms(), Some(500.0));
}

#[test]
fn keyboard_activation_matches_pointer_click_for_every_card() {
    let scheduler = AnimationScheduler::new();

    for key in [KeyCode::Enter, KeyCode::Space] {
        let mut pointer = page(&scheduler);
        pointer.mount(&FixedPreference::ALLOW).unwrap();
        let mut keyboard = page(&scheduler);
        keyboard.mount(&FixedPreference::ALLOW).unwrap();

        for index in 0..FEATURES.len() {
            pointer.dispatch_card_event(index, &Event::new(FOCUS));
            pointer.dispatch_card_event(index, &Event::new(POINTER_DOWN));
            pointer.dispatch_card_event(index, &Event::new(POINTER_UP));
            pointer.dispatch_card_event(index, &Event::new(CLICK));

            keyboard.dispatch_card_event(index, &Event::new(FOCUS));
            assert!(keyboard.dispatch_card_event(index, &Event::key_down(key)));

            let (p, k) = (&pointer.cards()[index], &keyboard.cards()[index]);
            assert_eq!(k.activations(), 1);
            assert_eq!(p.activations(), k.activations());
            assert_eq!(k.state(), p.state());
            assert_eq!(k.state(), CardState::Hovered);
        }

        for _ in 0..120 {
            scheduler.advance(FRAME_MS);
        }
        for index in 0..FEATURES.len() {
            let (p, k) = (&pointer.cards()[index], &keyboard.cards()[index]);
            let (pv, kv) = (p.visual(), k.visual());
            assert!((pv.translate_y - kv.translate_y).abs() < 0.01);
            assert!((pv.scale - kv.scale).abs() < 0.001);
        }
    }
}

#[test]
fn card_events_out_of_range_are_ignored() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();
    assert!(!page.dispatch_card_event(FEATURES.len(), &Event::new(CLICK)));
}

#[test]
fn step_offsets_honor_overlaps() {
    let (_, layout) = page_sequence();
    let step = |group: TargetGroup| layout.step(group.class()).unwrap();

    let heading = step(TargetGroup::Heading);
    let sub = step(TargetGroup::Subheading);
    let shapes = step(TargetGroup::DecorShapes);
    let cards = step(TargetGroup::Cards);

    assert_eq!(heading.start_ms, 0);
    assert_eq!(sub.start_ms, heading.end_ms - SUBHEADING_OVERLAP_MS as i32);
    assert_eq!(shapes.start_ms, sub.end_ms - SHAPES_OVERLAP_MS as i32);
    assert_eq!(cards.start_ms, shapes.end_ms - CARDS_OVERLAP_MS as i32);

    assert_eq!(
        Position::parse("-=0.5").unwrap(),
        Position::Overlap(SUBHEADING_OVERLAP_MS)
    );

    let starts: Vec<i32> = cards.elements.iter().map(|e| e.start_ms).collect();
    assert_eq!(starts, vec![1260, 1380, 1500]);
    assert!(cards.elements.iter().all(|e| e.entry(Property::Scale).is_none()));
}

#[test]
fn unmount_mid_sequence_stops_updates() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);

    let frames = Arc::new(AtomicUsize::new(0));
    let counter = frames.clone();
    page.on_sequence_update(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    page.mount(&FixedPreference::ALLOW).unwrap();

    for _ in 0..10 {
        scheduler.advance(FRAME_MS);
    }
    let seen = frames.load(Ordering::SeqCst);
    assert_eq!(seen, 10);

    page.unmount();
    for _ in 0..200 {
        scheduler.advance(FRAME_MS);
    }
    assert_eq!(frames.load(Ordering::SeqCst), seen);
}

#[test]
fn update_callback_attaches_to_live_sequence() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();

    let frames = Arc::new(AtomicUsize::new(0));
    let counter = frames.clone();
    page.on_sequence_update(move |frame| {
        assert!(frame.progress <= 1.0);
        counter.fetch_add(1, Ordering::SeqCst);
    });

    scheduler.advance(FRAME_MS);
    assert_eq!(frames.load(Ordering::SeqCst), 1);
}

#[test]
fn preference_change_remounts() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();
    let first = page.sequence_timeline().unwrap();

    page.on_motion_preference_change(true).unwrap();
    assert!(page.is_mounted());
    assert!(!page.has_sequence());
    assert!(!scheduler.handle().has_timeline(first));
    assert_eq!(scheduler.scroll_trigger_count(), 0);
    assert_eq!(scheduler.timeline_count(), 0);

    // Same value again does nothing
    page.on_motion_preference_change(true).unwrap();
    assert!(!page.has_sequence());

    page.on_motion_preference_change(false).unwrap();
    assert!(page.has_sequence());
    assert_eq!(scheduler.scroll_trigger_count(), 1);
    assert_ne!(page.sequence_timeline(), Some(first));
}

#[test]
fn remount_resets_paused_toggle() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();

    page.handle_play_pause();
    assert!(!page.is_playing());
    assert_eq!(page.play_pause_label(), "Play");

    page.on_motion_preference_change(true).unwrap();
    page.on_motion_preference_change(false).unwrap();
    assert!(page.is_playing());
    assert_eq!(page.play_pause_label(), "Pause");

    // The new sequence is running, so the next press pauses it
    scheduler.advance(FRAME_MS);
    assert!(scheduler.handle().is_timeline_playing(page.sequence_timeline().unwrap()));
    page.handle_play_pause();
    assert!(!page.is_playing());

    page.unmount();
    page.mount(&FixedPreference::ALLOW).unwrap();
    assert!(page.is_playing());
}

#[test]
fn preference_change_before_mount_is_ignored() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);

    page.on_motion_preference_change(true).unwrap();
    assert!(!page.is_mounted());
    assert!(!page.reduce_motion());

    // Mount reads the source, not the earlier change
    page.mount(&FixedPreference::ALLOW).unwrap();
    assert!(!page.reduce_motion());
    assert!(page.has_sequence());
}

#[test]
fn cards_enter_after_mount() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    assert!(page.cards().iter().all(|c| c.state() == CardState::Initial));

    page.mount(&FixedPreference::ALLOW).unwrap();
    assert!(page.cards().iter().all(|c| c.state() == CardState::Entered));

    page.unmount();
    assert!(page.cards().iter().all(|c| c.state() == CardState::Initial));
}

#[test]
fn dropped_engine_makes_toggle_a_noop() {
    let scheduler = AnimationScheduler::new();
    let mut page = page(&scheduler);
    page.mount(&FixedPreference::ALLOW).unwrap();
    scheduler.advance(FRAME_MS);
    drop(scheduler);

    page.handle_play_pause();
    assert!(page.is_playing());
    page.unmount();
}

#[test]
fn global_scheduler_is_initialized_once() {
    let scheduler = AnimationScheduler::new();
    set_global_scheduler(scheduler.handle()).unwrap();
    assert!(set_global_scheduler(scheduler.handle()).is_err());
    assert!(global_scheduler().is_ok());

    let mut page = PageController::from_global(PageSettings::default()).unwrap();
    page.mount(&FixedPreference::ALLOW).unwrap();
    assert_eq!(scheduler.scroll_trigger_count(), 1);
}
