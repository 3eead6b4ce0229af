//! MotionTask Page
//!
//! The MotionTask landing page: static content, keyboard-accessible feature
//! cards, and an entrance sequence bound to the page's scroll position.
//!
//! # Example
//!
//! ```
//! use motiontask_animation::AnimationScheduler;
//! use motiontask_page::{FixedPreference, PageController, PageSettings};
//!
//! let scheduler = AnimationScheduler::new();
//! let mut page = PageController::new(scheduler.handle(), PageSettings::default());
//! page.mount(&FixedPreference::ALLOW)?;
//!
//! scheduler.advance(16.0);
//! page.handle_play_pause();
//! assert_eq!(page.play_pause_label(), "Play");
//!
//! page.unmount();
//! # Ok::<(), motiontask_page::PageError>(())
//! ```

pub mod card;
pub mod config;
pub mod content;
pub mod element;
pub mod error;
pub mod page;
pub mod preference;
pub mod view;

pub use card::{CardState, CardVisual, InteractiveCard};
pub use config::{EngineSettings, PageConfig, PageSettings, CONFIG_FILE};
pub use content::{FeatureItem, StagePanel, FEATURES, STAGES};
pub use element::{Element, Node};
pub use error::{PageError, PageResult};
pub use page::{page_sequence, ElementStyle, PageController, TargetGroup};
pub use preference::{
    EnvPreference, FixedPreference, MotionPreferenceSource, OverridePreference,
    REDUCED_MOTION_ENV,
};
pub use view::{render, render_html};
