//! MotionTask Animation Engine
//!
//! Timelines, springs, and scroll triggers for page choreography.
//!
//! # Features
//!
//! - **Timelines**: Entries on a shared clock with offsets, easing, and pause/resume
//! - **Sequences**: Staggered "from" tweens placed at relative positions (`-=0.5`)
//! - **Spring Physics**: RK4-integrated springs for interactive transforms
//! - **Scroll Triggers**: Drive a timeline when an element crosses a viewport point
//! - **Scopes**: Release every timeline and trigger of a component at once
//! - **Global Scheduler**: One explicitly initialized process-wide handle

pub mod easing;
pub mod error;
pub mod scheduler;
pub mod scope;
pub mod scroll;
pub mod spring;
pub mod timeline;
pub mod tween;

pub use easing::Easing;
pub use error::{AnimationError, AnimationResult};
pub use scheduler::{
    global_scheduler, is_scheduler_initialized, set_global_scheduler, AnimatedTimeline,
    AnimatedValue, AnimationScheduler, SchedulerHandle, ScrollTriggerId, SpringId, TimelineId,
};
pub use scope::AnimationScope;
pub use scroll::{
    Anchor, ScrollPosition, ScrollTrigger, TriggerAction, TriggerBounds, TriggerPoint,
};
pub use spring::{RestThreshold, Spring, SpringConfig};
pub use timeline::{PlayState, Timeline, TimelineEntryId, TimelineFrame, UpdateCallback};
pub use tween::{
    ElementTracks, Position, Property, SequenceBuilder, SequenceLayout, StepLayout, Tween,
};
