//! Error types for motiontask_animation

use thiserror::Error;

/// Errors raised by the animation engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The scheduler behind a handle has been dropped
    #[error("animation scheduler is no longer alive")]
    SchedulerUnavailable,

    /// `set_global_scheduler()` was called a second time
    #[error("global animation scheduler already initialized")]
    AlreadyInitialized,

    /// The global scheduler was read before `set_global_scheduler()`
    #[error("global animation scheduler not initialized")]
    NotInitialized,

    /// A relative timeline position such as `-=0.5` could not be parsed
    #[error("invalid timeline position: {0:?}")]
    InvalidPosition(String),

    /// A scroll trigger point such as `top center` could not be parsed
    #[error("invalid scroll trigger point: {0:?}")]
    InvalidTriggerPoint(String),
}

/// Result type alias using AnimationError
pub type AnimationResult<T> = Result<T, AnimationError>;
