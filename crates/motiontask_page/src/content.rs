//! Static page content

/// A feature card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureItem {
    pub id: u32,
    pub title: &'static str,
    pub text: &'static str,
}

impl FeatureItem {
    /// Accessible name announced for the card
    pub fn aria_label(&self) -> String {
        format!("{} — {}", self.title, self.text)
    }
}

/// Feature cards, in render order
pub const FEATURES: [FeatureItem; 3] = [
    FeatureItem {
        id: 1,
        title: "Smooth Entrance",
        text: "Hero and card entrances using Framer Motion.",
    },
    FeatureItem {
        id: 2,
        title: "Hover Interactions",
        text: "Motion-driven hover and focus states accessible by keyboard.",
    },
    FeatureItem {
        id: 3,
        title: "Scroll Timeline",
        text: "GSAP timeline controlled by ScrollTrigger and controls.",
    },
];

/// A panel of the "stages" exposition block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagePanel {
    pub title: &'static str,
    pub text: &'static str,
    pub gradient: &'static str,
    /// Tint of the panel's body text
    pub text_class: &'static str,
}

pub const STAGES: [StagePanel; 3] = [
    StagePanel {
        title: "Stage A",
        text: "Entry animation from below, part of the timeline.",
        gradient: "from-indigo-700 to-indigo-500",
        text_class: "text-indigo-100/90",
    },
    StagePanel {
        title: "Stage B",
        text: "Scaling and rotation the timeline coordinates.",
        gradient: "from-emerald-600 to-teal-500",
        text_class: "text-teal-100/90",
    },
    StagePanel {
        title: "Stage C",
        text: "Final flourish with subtle motion and fade out.",
        gradient: "from-pink-500 to-rose-400",
        text_class: "text-pink-50/90",
    },
];

/// A run of footer text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(&'static str),
    /// Rendered in a `<code>` element
    Code(&'static str),
}

pub const FOOTER_NOTES: [&[Inline]; 4] = [
    &[
        Inline::Text("Respects "),
        Inline::Code("prefers-reduced-motion"),
        Inline::Text(" heavy timelines are disabled when this is set."),
    ],
    &[Inline::Text("Animations use transform and opacity only (no layout thrashing).")],
    &[Inline::Text(
        "Keyboard navigable interactive elements (tabindex, focus styles, Enter/Space handlers).",
    )],
    &[
        Inline::Text("Use "),
        Inline::Code("will-change: transform"),
        Inline::Text(" and "),
        Inline::Code("transform-gpu"),
        Inline::Text(" utility classes for smoother motion."),
    ],
];

pub const BRAND: &str = "MotionTask";
pub const NAV_LINKS: [&str; 2] = ["Docs", "Examples"];
pub const NAV_CTA: &str = "Get Started";

pub const HERO_HEADING: &str = "Advanced Animations Smooth, Accessible, Performant";
pub const HERO_SUBHEADING: &str = "A small demo combining Framer Motion for interactive micro \
    interactions and GSAP for timeline, scroll-driven choreography. Includes reduced-motion \
    support and keyboard accessibility.";
pub const HERO_CTA: &str = "Try the Demo";

pub const TIMELINE_HEADING: &str = "Timeline Choreography (GSAP + ScrollTrigger)";
pub const TIMELINE_BLURB: &str = "This panel shows a timeline sequence and scroll based trigger. \
    Use Play/Pause above to control it. If you prefer reduced motion, the animation is disabled.";

pub const FOOTER_HEADING: &str = "Accessibility & Performance";

/// Decorative hero shapes: size, gradient and placement classes
pub const DECOR_SHAPES: [&str; 3] = [
    "w-32 h-32 rounded-full bg-gradient-to-br from-pink-500 to-yellow-400 opacity-60 blur-2xl transform-gpu",
    "w-24 h-24 rounded-full bg-gradient-to-br from-cyan-400 to-indigo-500 opacity-50 blur-lg transform-gpu absolute left-6 top-8",
    "w-20 h-20 rounded-full bg-gradient-to-br from-lime-300 to-emerald-400 opacity-40 blur-md transform-gpu absolute right-8 bottom-10",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_ids_are_ordered_and_unique() {
        let ids: Vec<u32> = FEATURES.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_footer_notes_mark_code_runs() {
        let code: Vec<&str> = FOOTER_NOTES
            .iter()
            .flat_map(|note| note.iter())
            .filter_map(|run| match run {
                Inline::Code(code) => Some(*code),
                Inline::Text(_) => None,
            })
            .collect();
        assert_eq!(code, vec!["prefers-reduced-motion", "will-change: transform", "transform-gpu"]);
    }

    #[test]
    fn test_aria_label() {
        assert_eq!(
            FEATURES[1].aria_label(),
            "Hover Interactions — Motion-driven hover and focus states accessible by keyboard."
        );
    }
}
