//! Page rendering
//!
//! Builds the element tree for the current controller state. Animated
//! elements carry their current transform and opacity as inline style;
//! elements at rest carry none.

use crate::content::{
    FeatureItem, Inline, StagePanel, BRAND, DECOR_SHAPES, FOOTER_HEADING, FOOTER_NOTES,
    HERO_CTA, HERO_HEADING, HERO_SUBHEADING, NAV_CTA, NAV_LINKS, STAGES, TIMELINE_BLURB,
    TIMELINE_HEADING,
};
use crate::element::{div, el, text, Element, Node};
use crate::page::{ElementStyle, PageController, TargetGroup};

const FOCUS_RING: &str = "focus:outline-none focus:ring-4 focus:ring-indigo-400";

/// Render the whole page
pub fn render(page: &PageController) -> Element {
    let styles = page.sequence_styles();
    let style_of = |group: TargetGroup, index: usize| {
        styles.get(&(group, index)).copied().unwrap_or_default()
    };

    el("section")
        .class("min-h-screen py-20 px-6 bg-gradient-to-b from-indigo-900 via-slate-900 to-gray-900 text-slate-100")
        .child(nav())
        .child(
            div()
                .class("max-w-6xl mx-auto grid grid-cols-1 lg:grid-cols-2 gap-12 items-center")
                .child(hero_copy(page, &style_of))
                .child(shapes(&style_of)),
        )
        .child(
            div()
                .class("max-w-6xl mx-auto mt-12 grid grid-cols-1 sm:grid-cols-3 gap-6")
                .children(page.cards().iter().enumerate().map(|(index, card)| {
                    feature_card(card.feature(), page.card_style(index))
                })),
        )
        .child(stages())
        .child(footer())
}

/// Render the page to an HTML document fragment
pub fn render_html(page: &PageController) -> String {
    render(page).to_html()
}

fn nav() -> Element {
    let mut links: Vec<Element> = NAV_LINKS
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let class = if i == 0 { "hidden sm:block text-sm" } else { "text-sm" };
            el("li").class(class).text(*link)
        })
        .collect();
    links.push(
        el("li").child(
            el("button")
                .class("text-sm bg-indigo-600 px-3 py-1 rounded-md hover:underline")
                .class("focus:outline-none focus:ring-2 focus:ring-indigo-400")
                .text(NAV_CTA),
        ),
    );

    el("nav")
        .class("max-w-6xl mx-auto flex items-center justify-between mb-12")
        .child(div().class("text-xl font-semibold").text(BRAND))
        .child(el("ul").class("flex gap-4 items-center").children(links))
}

fn hero_copy(page: &PageController, style_of: &dyn Fn(TargetGroup, usize) -> ElementStyle) -> Element {
    let play_pause = el("button")
        .class("px-4 py-2 rounded-md bg-slate-800 border border-slate-700")
        .class(FOCUS_RING)
        .attr("aria-pressed", (!page.is_playing()).to_string())
        .text(page.play_pause_label());

    let copy = div()
        .class("space-y-6")
        .child(with_style(
            el("h1")
                .class(TargetGroup::Heading.class())
                .class("text-4xl sm:text-5xl font-extrabold leading-tight")
                .text(HERO_HEADING),
            style_of(TargetGroup::Heading, 0),
        ))
        .child(with_style(
            el("p")
                .class(TargetGroup::Subheading.class())
                .class("text-lg text-slate-300 max-w-xl")
                .text(HERO_SUBHEADING),
            style_of(TargetGroup::Subheading, 0),
        ))
        .child(
            div()
                .class("flex gap-4 items-center mt-4")
                .child(
                    el("button")
                        .class("px-5 py-2 rounded-md bg-gradient-to-r from-indigo-500 to-purple-500 shadow-lg transform-gpu")
                        .class("hover:scale-[1.02]")
                        .class(FOCUS_RING)
                        .attr("aria-label", "Primary action")
                        .text(HERO_CTA),
                )
                .child(play_pause),
        );

    with_style(copy, page.hero_style())
}

fn shapes(style_of: &dyn Fn(TargetGroup, usize) -> ElementStyle) -> Element {
    let group = TargetGroup::DecorShapes;
    div()
        .class("relative h-64 sm:h-80 rounded-xl overflow-hidden")
        .attr("aria-hidden", "true")
        .child(
            div()
                .class("absolute inset-0 flex items-center justify-center")
                .children(DECOR_SHAPES.iter().enumerate().map(|(index, classes)| {
                    with_style(
                        div().class(group.class()).class(classes),
                        style_of(group, index),
                    )
                })),
        )
}

fn feature_card(feature: &FeatureItem, style: ElementStyle) -> Element {
    let card = el("article")
        .class(TargetGroup::Cards.class())
        .class("bg-white/5 p-6 rounded-2xl backdrop-blur-sm border border-white/6 shadow-md transform-gpu")
        .attr("tabindex", "0")
        .attr("role", "button")
        .attr("aria-label", feature.aria_label())
        .child(el("h3").class("text-xl font-semibold mb-2").text(feature.title))
        .child(el("p").class("text-slate-300").text(feature.text))
        .child(
            div()
                .class("mt-4 flex items-center gap-2")
                .child(el("span").class("text-indigo-400 text-sm").text("Learn more"))
                .child(arrow_icon()),
        );
    with_style(card, style)
}

fn arrow_icon() -> Element {
    el("svg")
        .class("w-4 h-4")
        .attr("fill", "none")
        .attr("stroke", "currentColor")
        .attr("viewBox", "0 0 24 24")
        .child(
            el("path")
                .attr("stroke-width", "2")
                .attr("stroke-linecap", "round")
                .attr("stroke-linejoin", "round")
                .attr("d", "M17 8l4 4m0 0l-4 4m4-4H3"),
        )
}

fn stage_panel(stage: &StagePanel) -> Element {
    div()
        .class("p-6 rounded-xl feature-panel bg-gradient-to-br")
        .class(stage.gradient)
        .class("text-white transform-gpu")
        .child(el("h4").class("font-semibold mb-2").text(stage.title))
        .child(el("p").class("text-sm").class(stage.text_class).text(stage.text))
}

fn stages() -> Element {
    div()
        .class("max-w-6xl mx-auto mt-20 p-6 bg-white/3 rounded-2xl border border-white/6")
        .child(el("h2").class("text-2xl font-bold mb-4").text(TIMELINE_HEADING))
        .child(el("p").class("text-slate-300 mb-6").text(TIMELINE_BLURB))
        .child(
            div()
                .class("grid grid-cols-1 md:grid-cols-3 gap-4")
                .children(STAGES.iter().map(stage_panel)),
        )
}

fn footer() -> Element {
    el("footer")
        .class("max-w-6xl mx-auto mt-12 text-slate-300")
        .child(el("h3").class("font-semibold mb-2").text(FOOTER_HEADING))
        .child(
            el("ul")
                .class("list-disc ml-5 space-y-1")
                .children(
                    FOOTER_NOTES
                        .iter()
                        .map(|note| el("li").children(note.iter().map(inline))),
                ),
        )
}

fn inline(run: &Inline) -> Node {
    match run {
        Inline::Text(content) => text(*content),
        Inline::Code(content) => el("code").text(*content).into(),
    }
}

/// Apply an animated style; identity styles leave the element untouched
fn with_style(element: Element, style: ElementStyle) -> Element {
    if style.is_identity() {
        return element;
    }

    let mut transforms = Vec::new();
    if style.translate_y != 0.0 {
        transforms.push(format!("translateY({}px)", round(style.translate_y)));
    }
    if style.scale != 1.0 {
        transforms.push(format!("scale({})", round(style.scale)));
    }

    let mut element = element.style("will-change", "transform, opacity");
    if !transforms.is_empty() {
        element = element.style("transform", transforms.join(" "));
    }
    if style.opacity != 1.0 {
        element = element.style("opacity", round(style.opacity).to_string());
    }
    element
}

fn round(value: f32) -> f32 {
    // Avoid "-0" in the output
    ((value * 1000.0).round() / 1000.0) + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageSettings;
    use crate::content::FEATURES;
    use crate::preference::FixedPreference;
    use motiontask_animation::AnimationScheduler;

    fn mounted(scheduler: &AnimationScheduler, reduce_motion: bool) -> PageController {
        let mut page = PageController::new(scheduler.handle(), PageSettings::default());
        let source = if reduce_motion {
            FixedPreference::REDUCE
        } else {
            FixedPreference::ALLOW
        };
        page.mount(&source).unwrap();
        page
    }

    fn play_pause_button(tree: &Element) -> Element {
        tree.find_by_class("bg-slate-800")[0].clone()
    }

    #[test]
    fn test_round() {
        assert_eq!(round(0.12345), 0.123);
        assert_eq!(round(-0.0001).to_string(), "0");
    }

    #[test]
    fn test_play_pause_label_and_aria() {
        let scheduler = AnimationScheduler::new();
        let mut page = mounted(&scheduler, false);
        scheduler.advance(100.0);

        let button = play_pause_button(&render(&page));
        assert_eq!(button.get_attr("aria-pressed"), Some("false"));
        assert!(button.to_html().contains(">Pause<"));

        page.handle_play_pause();
        let button = play_pause_button(&render(&page));
        assert_eq!(button.get_attr("aria-pressed"), Some("true"));
        assert!(button.to_html().contains(">Play<"));
    }

    #[test]
    fn test_cards_are_accessible_buttons() {
        let scheduler = AnimationScheduler::new();
        let page = mounted(&scheduler, true);
        let tree = render(&page);

        let cards = tree.find_by_class("feature-card");
        assert_eq!(cards.len(), FEATURES.len());
        for (card, feature) in cards.iter().zip(FEATURES.iter()) {
            assert_eq!(card.tag, "article");
            assert_eq!(card.get_attr("role"), Some("button"));
            assert_eq!(card.get_attr("tabindex"), Some("0"));
            assert_eq!(card.get_attr("aria-label"), Some(feature.aria_label().as_str()));
        }
    }

    #[test]
    fn test_reduced_motion_has_no_inline_styles() {
        let scheduler = AnimationScheduler::new();
        let page = mounted(&scheduler, true);
        let html = render_html(&page);
        assert!(!html.contains("style="));
        assert_eq!(render(&page).find_by_class("decor-shape").len(), 3);
    }

    #[test]
    fn test_sequence_start_is_hidden() {
        let scheduler = AnimationScheduler::new();
        let page = mounted(&scheduler, false);
        let tree = render(&page);

        let heading = tree.find_by_class("hero-heading")[0];
        assert_eq!(heading.get_style("transform"), Some("translateY(30px)"));
        assert_eq!(heading.get_style("opacity"), Some("0"));

        let shape = tree.find_by_class("decor-shape")[0];
        assert_eq!(shape.get_style("transform"), Some("scale(0)"));

        let shapes = tree.find_by_class("relative")[0];
        assert_eq!(shapes.get_attr("aria-hidden"), Some("true"));
    }

    #[test]
    fn test_settled_page_drops_styles() {
        let scheduler = AnimationScheduler::new();
        let page = mounted(&scheduler, false);
        scheduler.advance(5000.0);
        assert!(!render_html(&page).contains("style="));
    }

    #[test]
    fn test_cards_end_with_arrow_icon() {
        let scheduler = AnimationScheduler::new();
        let page = mounted(&scheduler, true);
        let tree = render(&page);

        for card in tree.find_by_class("feature-card") {
            let html = card.to_html();
            assert!(html.contains(
                "<span class=\"text-indigo-400 text-sm\">Learn more</span><svg class=\"w-4 h-4\""
            ));
            assert!(html.contains("d=\"M17 8l4 4m0 0l-4 4m4-4H3\""));
        }
    }

    #[test]
    fn test_static_copy() {
        let scheduler = AnimationScheduler::new();
        let page = mounted(&scheduler, true);
        let html = render_html(&page);

        assert!(html.contains(">Timeline Choreography (GSAP + ScrollTrigger)</h2>"));
        assert!(html.contains("Framer Motion for interactive micro interactions and GSAP"));
        assert!(html.contains(
            "<li>Respects <code>prefers-reduced-motion</code> heavy timelines are disabled when this is set.</li>"
        ));
        assert!(html.contains("<code>will-change: transform</code> and <code>transform-gpu</code>"));
        assert!(html.contains("<p class=\"text-sm text-teal-100/90\">"));
        assert!(html.contains(
            "class=\"p-6 rounded-xl feature-panel bg-gradient-to-br from-pink-500 to-rose-400 text-white transform-gpu\""
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        let scheduler = AnimationScheduler::new();
        let page = mounted(&scheduler, true);
        let html = render_html(&page);
        assert!(html.contains("Accessibility &amp; Performance"));
        assert!(html.starts_with("<section "));
    }
}
