//! Element tree and HTML output
//!
//! A minimal builder in the style of `div().class(..).child(..)`:
//!
//! ```
//! use motiontask_page::element::{el, text};
//!
//! let html = el("button")
//!     .class("px-4 py-2")
//!     .attr("aria-pressed", "false")
//!     .child(text("Pause"))
//!     .to_html();
//! assert_eq!(html, r#"<button class="px-4 py-2" aria-pressed="false">Pause</button>"#);
//! ```

use std::fmt::Write;

/// A node in the rendered tree
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(content) => out.push_str(&escape(content)),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Concatenated text content
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(content) => content.clone(),
            Node::Element(element) => element.children.iter().map(Node::text_content).collect(),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with classes, attributes, inline style, and children
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<String>,
    pub attrs: Vec<(&'static str, String)>,
    pub style: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// Create an element
pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        classes: Vec::new(),
        attrs: Vec::new(),
        style: Vec::new(),
        children: Vec::new(),
    }
}

pub fn div() -> Element {
    el("div")
}

/// Create a text node
pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}

const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "input"];

impl Element {
    /// Add space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    /// Set an attribute, replacing an earlier value
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attrs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    /// Set an inline style property
    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.style.iter_mut().find(|(p, _)| *p == property) {
            Some(slot) => slot.1 = value,
            None => self.style.push((property, value)),
        }
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I, N>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Shorthand for a single text child
    pub fn text(self, content: impl Into<String>) -> Self {
        self.child(text(content))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first search for elements carrying `class`
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(element) = child {
                element.collect_by_class(class, found);
            }
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        if !self.classes.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&self.classes.join(" ")));
        }
        for (name, value) in &self.attrs {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if !self.style.is_empty() {
            let style: Vec<String> = self
                .style
                .iter()
                .map(|(p, v)| format!("{}: {}", p, v))
                .collect();
            let _ = write!(out, " style=\"{}\"", escape(&style.join("; ")));
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }
}

/// Escape text for HTML content and attribute values
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_nested_html_with_style() {
        let node = div()
            .class("card")
            .style("opacity", "0.5")
            .style("transform", "translateY(4px)")
            .child(el("h3").text("A & B"))
            .child(el("br"));

        assert_eq!(
            node.to_html(),
            "<div class=\"card\" style=\"opacity: 0.5; transform: translateY(4px)\">\
             <h3>A &amp; B</h3><br></div>"
        );
    }

    #[test]
    fn test_attr_and_style_replace() {
        let node = div()
            .attr("aria-pressed", "true")
            .attr("aria-pressed", "false")
            .style("opacity", "0")
            .style("opacity", "1");
        assert_eq!(node.get_attr("aria-pressed"), Some("false"));
        assert_eq!(node.get_style("opacity"), Some("1"));
        assert_eq!(node.attrs.len(), 1);
    }

    #[test]
    fn test_find_by_class_and_text() {
        let tree = div()
            .child(div().class("item").text("one"))
            .child(div().child(div().class("item extra").text("two")));

        let items = tree.find_by_class("item");
        assert_eq!(items.len(), 2);
        assert!(items[1].has_class("extra"));
        assert_eq!(Node::from(tree).text_content(), "onetwo");
    }
}
