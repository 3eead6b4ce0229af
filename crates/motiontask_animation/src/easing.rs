//! Easing curves
//!
//! Every curve maps `t` in `0.0..=1.0` to eased progress with `f(0) = 0` and
//! `f(1) = 1`. Input outside the unit range is clamped.

/// An easing function
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// Cubic acceleration
    EaseIn,
    /// Cubic deceleration
    EaseOut,
    /// Cubic acceleration then deceleration
    EaseInOut,
    /// Quartic acceleration
    EaseInQuart,
    /// Quartic deceleration; the strong "settle in" curve used for entrances
    EaseOutQuart,
    /// Quartic acceleration then deceleration
    EaseInOutQuart,
}

impl Easing {
    /// Apply the easing curve to a linear progress value
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::EaseInQuart => t.powi(4),
            Easing::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
        }
    }
}
