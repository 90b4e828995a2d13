//! Structured HTML fragments.
//!
//! Everything displayed is built as a `Node` tree and serialized with
//! `to_html`, which escapes every text node and attribute value. There is
//! no way to splice a raw string into the output.

pub mod cards;
pub mod inventory;

use std::collections::BTreeMap;
use std::time::Duration;

/// Delay between consecutive item entrance animations.
pub const STAGGER_STEP: Duration = Duration::from_millis(100);

/// How long an error notice stays up before removing itself.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// Grid shows compact cards, list shows expanded rows. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum ViewMode {
    #[name = "grid"]
    Grid,
    #[name = "list"]
    List,
}

impl Default for ViewMode {
    fn default() -> Self {
        ViewMode::Grid
    }
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "grid" => Some(ViewMode::Grid),
            "list" => Some(ViewMode::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

pub fn el(tag: &'static str) -> Element {
    Element {
        tag,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

/// `<i class="...">`, the icon idiom used throughout the pages.
pub fn icon(class: &str) -> Element {
    el("i").class(class)
}

impl Element {
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = impl Into<Node>>) -> Self {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    /// Append `node` only when it is `Some`.
    pub fn maybe(self, node: Option<impl Into<Node>>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Self {
        Node::Element(e)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Text(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Text(s)
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

impl Node {
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Element(e) => {
                out.push('<');
                out.push_str(e.tag);
                for (name, value) in &e.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(&e.tag) {
                    return;
                }
                for child in &e.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(e.tag);
                out.push('>');
            }
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Element(e) => e.children.iter().map(Node::text_content).collect(),
        }
    }
}

pub fn to_html(nodes: &[Node]) -> String {
    nodes.iter().map(Node::to_html).collect()
}

/// A region of the page whose content is replaced wholesale on render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    pub id: String,
    pub class: String,
    pub children: Vec<Node>,
}

impl Container {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn replace(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn to_html(&self) -> String {
        let mut root = el("div").attr("id", self.id.as_str());
        if !self.class.is_empty() {
            root = root.class(&self.class);
        }
        Node::from(root.children(self.children.iter().cloned())).to_html()
    }
}

/// The anchor elements a page offers, by id.
#[derive(Debug, Clone, Default)]
pub struct Document {
    containers: BTreeMap<String, Container>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor(mut self, id: &str) -> Self {
        self.containers.insert(id.to_string(), Container::new(id));
        self
    }

    pub fn has(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Container> {
        self.containers.get_mut(id)
    }
}

/// Entrance delay of the item at `index`.
pub fn stagger(index: usize) -> Duration {
    STAGGER_STEP * index as u32
}

/// Attach the entrance delay to a rendered item.
pub fn staggered(item: Node, index: usize) -> Node {
    match item {
        Node::Element(e) => Node::Element(e.attr(
            "style",
            format!("animation-delay: {}ms", stagger(index).as_millis()),
        )),
        text => text,
    }
}

/// First `max` characters, trimmed, with an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Value of `data-action` on the empty state's button.
pub const CLEAR_FILTERS_ACTION: &str = "clear-filters";

/// Shown instead of an empty container when nothing passes the filters.
pub fn empty_state(plural: &str) -> Node {
    el("div")
        .class(&format!("no-{}-state", plural))
        .child(
            el("div")
                .class("empty-state")
                .child(icon("fas fa-search"))
                .child(el("h3").text(format!("No {} Found", capitalize(plural))))
                .child(el("p").text("Try adjusting your search criteria or clearing filters"))
                .child(
                    el("button")
                        .class("btn btn-primary")
                        .attr("data-action", CLEAR_FILTERS_ACTION)
                        .child(icon("fas fa-refresh"))
                        .text(" Clear Filters"),
                ),
        )
        .into()
}

/// Dismissible error notice that expires after `NOTICE_TTL`.
pub fn notice(message: &str) -> Node {
    el("div")
        .class("alert alert-danger")
        .attr("role", "alert")
        .attr("data-expires-ms", NOTICE_TTL.as_millis().to_string())
        .child(el("strong").text("Error:"))
        .text(format!(" {}", message))
        .child(
            el("button")
                .attr("type", "button")
                .attr("data-action", "dismiss")
                .text("×"),
        )
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let node: Node = el("a")
            .attr("href", "https://x.org/?a=1&b=\"2\"")
            .text("<script>alert('x')</script>")
            .into();
        assert_eq!(
            node.to_html(),
            "<a href=\"https://x.org/?a=1&amp;b=&quot;2&quot;\">&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;</a>"
        );
    }

    #[test]
    fn test_void_tags_have_no_close() {
        let node: Node = el("div").child(el("img").attr("src", "a.png")).into();
        assert_eq!(node.to_html(), "<div><img src=\"a.png\"></div>");
    }

    #[test]
    fn test_stagger_is_monotonic() {
        assert_eq!(stagger(0), Duration::ZERO);
        assert_eq!(stagger(3), Duration::from_millis(300));
        assert!((0..10).all(|i| stagger(i) < stagger(i + 1)));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 11), "exactly ten");
        assert_eq!(truncate("a long sentence here", 7), "a long...");
        assert_eq!(truncate("Côte d'Ivoire", 4), "Côte...");
    }

    #[test]
    fn test_empty_state_offers_clear_filters() {
        let html = empty_state("projects").to_html();
        assert!(html.contains("No Projects Found"));
        assert!(html.contains("data-action=\"clear-filters\""));
        assert!(html.contains("Clear Filters"));
    }

    #[test]
    fn test_notice_expires_and_escapes() {
        let html = notice("bad <input>").to_html();
        assert!(html.contains("data-expires-ms=\"5000\""));
        assert!(html.contains("bad &lt;input&gt;"));
        assert!(html.contains("data-action=\"dismiss\""));
    }

    #[test]
    fn test_document_anchors() {
        let mut doc = Document::new().with_anchor("project-grid");
        assert!(doc.has("project-grid"));
        assert!(!doc.has("platforms-grid"));
        let grid = doc.get_mut("project-grid").unwrap();
        grid.replace(vec!["hello".into()]);
        assert_eq!(
            doc.get("project-grid").unwrap().to_html(),
            "<div id=\"project-grid\">hello</div>"
        );
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!(ViewMode::parse(" List "), Some(ViewMode::List));
        assert_eq!(ViewMode::parse("grid"), Some(ViewMode::Grid));
        assert_eq!(ViewMode::parse("table"), None);
        assert_eq!(ViewMode::default(), ViewMode::Grid);
    }
}
