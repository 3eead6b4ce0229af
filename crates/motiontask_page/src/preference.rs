//! Reduced-motion preference
//!
//! The preference is an external signal read once per mount. A source that
//! cannot answer returns `None`, which the page treats as "motion allowed".

/// Environment variable read by [`EnvPreference::default`]
pub const REDUCED_MOTION_ENV: &str = "MOTIONTASK_REDUCED_MOTION";

/// Something that knows whether the user asked for reduced motion
pub trait MotionPreferenceSource {
    /// `Some(true)` if reduced motion is requested, `None` if unknown
    fn prefers_reduced_motion(&self) -> Option<bool>;

    /// Resolve the signal, defaulting to motion allowed
    fn reduce_motion(&self) -> bool {
        self.prefers_reduced_motion().unwrap_or(false)
    }
}

/// A fixed answer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPreference(pub Option<bool>);

impl FixedPreference {
    pub const REDUCE: Self = Self(Some(true));
    pub const ALLOW: Self = Self(Some(false));
    pub const UNAVAILABLE: Self = Self(None);
}

impl MotionPreferenceSource for FixedPreference {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.0
    }
}

/// Reads the preference from an environment variable
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvPreference {
    var: String,
}

impl EnvPreference {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvPreference {
    fn default() -> Self {
        Self::new(REDUCED_MOTION_ENV)
    }
}

impl MotionPreferenceSource for EnvPreference {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        let value = std::env::var(&self.var).ok()?;
        let parsed = parse_flag(&value);
        if parsed.is_none() {
            tracing::warn!("ignoring unrecognized {}={:?}", self.var, value);
        }
        parsed
    }
}

/// Uses an override when present, otherwise asks the fallback source
pub struct OverridePreference<S> {
    pub value: Option<bool>,
    pub fallback: S,
}

impl<S: MotionPreferenceSource> MotionPreferenceSource for OverridePreference<S> {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        self.value.or_else(|| self.fallback.prefers_reduced_motion())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" | "reduce" => Some(true),
        "0" | "false" | "no" | "off" | "no-preference" => Some(false),
        _ => None,
    }
}
