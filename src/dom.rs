//! The slice of the HTML document the site scripts touch.
//!
//! Controllers only talk to [`Dom`]. The browser binding implements it over
//! `web_sys`; [`MemoryDocument`] implements it in-process so the CLI and the
//! tests can drive the same controllers without a browser.

use std::collections::BTreeMap;

/// Inline `display` value a controller may set on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// No inline override; the stylesheet decides.
    #[default]
    Unset,
    Block,
    None,
}

impl Display {
    pub fn as_css(&self) -> &'static str {
        match self {
            Display::Unset => "",
            Display::Block => "block",
            Display::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    Loading,
    Interactive,
    #[default]
    Complete,
}

impl ReadyState {
    /// Maps `document.readyState`. Unknown values count as complete.
    pub fn from_document_state(state: &str) -> Self {
        match state {
            "loading" => ReadyState::Loading,
            "interactive" => ReadyState::Interactive,
            _ => ReadyState::Complete,
        }
    }
}

pub trait Dom {
    type Node: Clone;

    fn ready_state(&self) -> ReadyState;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// Elements carrying any of `classes`, in document order, each once.
    fn elements_by_classes(&self, classes: &[String]) -> Vec<Self::Node>;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    /// Rendered text of the element.
    fn text(&self, node: &Self::Node) -> String;
    fn set_inner_html(&mut self, node: &Self::Node, html: &str);
    fn set_display(&mut self, node: &Self::Node, display: Display);
    fn set_class(&mut self, node: &Self::Node, class: &str, on: bool);

    fn input_value(&self, node: &Self::Node) -> String;
    fn set_input_value(&mut self, node: &Self::Node, value: &str);
    fn focus(&mut self, node: &Self::Node);

    fn root_attribute(&self, name: &str) -> Option<String>;
    fn set_root_attribute(&mut self, name: &str, value: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub text: String,
    pub inner_html: String,
    pub display: Display,
    pub value: String,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Flat, in-process document: a list of elements plus the root attributes.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
    root_attributes: BTreeMap<String, String>,
    ready_state: ReadyState,
    focused: Option<NodeId>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading() -> Self {
        Self {
            ready_state: ReadyState::Loading,
            ..Self::default()
        }
    }

    pub fn push(&mut self, element: MemoryElement) -> NodeId {
        self.elements.push(element);
        NodeId(self.elements.len() - 1)
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    pub fn get(&self, node: NodeId) -> &MemoryElement {
        &self.elements[node.0]
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    fn get_mut(&mut self, node: NodeId) -> &mut MemoryElement {
        &mut self.elements[node.0]
    }
}

impl Dom for MemoryDocument {
    type Node = NodeId;

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .position(|el| el.id.as_deref() == Some(id))
            .map(NodeId)
    }

    fn elements_by_classes(&self, classes: &[String]) -> Vec<NodeId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| classes.iter().any(|class| el.has_class(class)))
            .map(|(idx, _)| NodeId(idx))
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.get(*node).attributes.get(name).cloned()
    }

    fn text(&self, node: &NodeId) -> String {
        self.get(*node).text.clone()
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) {
        self.get_mut(*node).inner_html = html.to_string();
    }

    fn set_display(&mut self, node: &NodeId, display: Display) {
        self.get_mut(*node).display = display;
    }

    fn set_class(&mut self, node: &NodeId, class: &str, on: bool) {
        let element = self.get_mut(*node);
        let present = element.has_class(class);
        if on && !present {
            element.classes.push(class.to_string());
        } else if !on && present {
            element.classes.retain(|c| c != class);
        }
    }

    fn input_value(&self, node: &NodeId) -> String {
        self.get(*node).value.clone()
    }

    fn set_input_value(&mut self, node: &NodeId, value: &str) {
        self.get_mut(*node).value = value.to_string();
    }

    fn focus(&mut self, node: &NodeId) {
        self.focused = Some(*node);
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root_attributes.get(name).cloned()
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.root_attributes.insert(name.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_query_is_document_ordered_and_deduplicated() {
        let mut doc = MemoryDocument::new();
        let a = doc.push(MemoryElement::new().with_class("post"));
        doc.push(MemoryElement::new().with_class("other"));
        let c = doc.push(
            MemoryElement::new()
                .with_class("featured-post")
                .with_class("post"),
        );
        let found = doc.elements_by_classes(&["post".to_string(), "featured-post".to_string()]);
        assert_eq!(found, vec![a, c]);
    }

    #[test]
    fn document_ready_state_strings_map() {
        assert_eq!(ReadyState::from_document_state("loading"), ReadyState::Loading);
        assert_eq!(
            ReadyState::from_document_state("interactive"),
            ReadyState::Interactive
        );
        assert_eq!(ReadyState::from_document_state("complete"), ReadyState::Complete);
        assert_eq!(ReadyState::from_document_state(""), ReadyState::Complete);
    }

    #[test]
    fn root_attribute_overwrites() {
        let mut doc = MemoryDocument::new();
        assert_eq!(doc.root_attribute("data-theme"), None);
        doc.set_root_attribute("data-theme", "dark");
        doc.set_root_attribute("data-theme", "light");
        assert_eq!(doc.root_attribute("data-theme").as_deref(), Some("light"));
    }

    #[test]
    fn set_class_toggles_once() {
        let mut doc = MemoryDocument::new();
        let node = doc.push(MemoryElement::new());
        doc.set_class(&node, "active", true);
        doc.set_class(&node, "active", true);
        assert_eq!(doc.get(node).classes, vec!["active"]);
        doc.set_class(&node, "active", false);
        assert!(doc.get(node).classes.is_empty());
    }
}
