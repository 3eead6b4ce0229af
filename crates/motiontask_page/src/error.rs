//! Error types for motiontask_page

use std::path::PathBuf;

use motiontask_animation::AnimationError;
use thiserror::Error;

/// Errors that can occur while configuring or mounting the page
#[derive(Error, Debug)]
pub enum PageError {
    /// The animation scheduler behind the page's handle is gone
    #[error("animation engine unavailable")]
    EngineUnavailable,

    /// Engine-level failure other than a dead scheduler
    #[error("animation error: {0}")]
    Animation(AnimationError),

    /// Config file could not be parsed
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<AnimationError> for PageError {
    fn from(err: AnimationError) -> Self {
        match err {
            AnimationError::SchedulerUnavailable => PageError::EngineUnavailable,
            other => PageError::Animation(other),
        }
    }
}

/// Result type alias using PageError
pub type PageResult<T> = Result<T, PageError>;
