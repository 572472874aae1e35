//! An in-memory host document. Backs the native build and the tests, and
//! counts every mutation so callers can assert that a tick left the page alone.

use crate::control::ControlView;
use crate::dom::{ControlElements, DomError, HostDocument};
use crate::geometry::{Rect, Viewport};
use crate::selectors::{
    ACTIVE_CLASS, CONTAINER_CLASS, DROPDOWN_CLASS, MENU_CLASS, MENU_ITEM_CLASS, PRIMARY_CLASS,
    TONE_ATTRIBUTE,
};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

const MENU_ITEM_HEIGHT: f64 = 38.0;
const MENU_PADDING: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    caret: Option<usize>,
    rect: Rect,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

pub struct MemoryDocument {
    nodes: Vec<Node>,
    body: NodeId,
    viewport: Viewport,
    focused: Option<NodeId>,
    mutations: usize,
    views: HashMap<NodeId, ControlView>,
}

impl MemoryDocument {
    pub fn new(viewport: Viewport) -> Self {
        let body = Node {
            tag: "body".to_string(),
            rect: Rect::new(0.0, 0.0, viewport.width, viewport.height),
            ..Node::default()
        };
        Self {
            nodes: vec![body],
            body: NodeId(0),
            viewport,
            focused: None,
            mutations: 0,
            views: HashMap::new(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    /// Creates a detached element. Detached elements are not part of the
    /// document, so creating one is not a mutation.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.mutations += 1;
    }

    pub fn insert_first_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(0, child);
        self.mutations += 1;
    }

    pub fn remove(&mut self, node: NodeId) {
        if self.detach(node) {
            self.mutations += 1;
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
        self.touch(node);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        self.nodes[node.0].classes.retain(|c| c != class);
        self.touch(node);
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].classes.iter().any(|c| c == class)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
        self.touch(node);
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attributes.get(name).map(String::as_str)
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        self.nodes[node.0]
            .style
            .insert(property.to_string(), value.to_string());
        self.touch(node);
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0].style.get(property).map(String::as_str)
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        let n = &mut self.nodes[node.0];
        n.text = text.to_string();
        n.caret = None;
        self.touch(node);
    }

    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].text
    }

    /// Moves the caret to a character offset; by default it sits at the end.
    pub fn set_caret(&mut self, node: NodeId, offset: usize) {
        self.nodes[node.0].caret = Some(offset);
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        self.nodes[node.0].rect = rect;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.nodes[self.body.0].rect = Rect::new(0.0, 0.0, viewport.width, viewport.height);
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// The last view rendered into the control whose container is `container`.
    pub fn control_view(&self, container: NodeId) -> Option<&ControlView> {
        self.views.get(&container)
    }

    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let Some(compiled) = Selector::parse(selector) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        self.collect(self.body, &compiled, &mut found);
        found
    }

    fn collect(&self, node: NodeId, selector: &Selector, found: &mut Vec<NodeId>) {
        for &child in &self.nodes[node.0].children {
            if selector.matches(&self.nodes[child.0]) {
                found.push(child);
            }
            self.collect(child, selector, found);
        }
    }

    fn find_first(&self, root: NodeId, selector: &Selector) -> Option<NodeId> {
        for &child in &self.nodes[root.0].children {
            if selector.matches(&self.nodes[child.0]) {
                return Some(child);
            }
            if let Some(found) = self.find_first(child, selector) {
                return Some(found);
            }
        }
        None
    }

    fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|&c| c != node);
        true
    }

    fn connected(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.body {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn touch(&mut self, node: NodeId) {
        if self.connected(node) {
            self.mutations += 1;
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut Vec<String>) {
        let n = &self.nodes[node.0];
        if !n.text.is_empty() {
            out.push(n.text.clone());
        }
        for &child in &n.children {
            self.collect_text(child, out);
        }
    }
}

impl HostDocument for MemoryDocument {
    type Element = NodeId;

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        let compiled = Selector::parse(selector)?;
        self.find_first(self.body, &compiled)
    }

    fn query_selector_within(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        let compiled = Selector::parse(selector)?;
        self.find_first(*root, &compiled)
    }

    fn is_connected(&self, element: &NodeId) -> bool {
        self.connected(*element)
    }

    fn inner_text(&self, element: &NodeId) -> String {
        let mut parts = Vec::new();
        self.collect_text(*element, &mut parts);
        parts.join("\n")
    }

    fn bounding_rect(&self, element: &NodeId) -> Rect {
        self.nodes[element.0].rect
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn mount_control(
        &mut self,
        toolbar: &NodeId,
        view: &ControlView,
    ) -> Result<ControlElements<NodeId>, DomError> {
        if !self.connected(*toolbar) {
            return Err(DomError::Insert("toolbar is detached".to_string()));
        }
        let anchor = self.nodes[toolbar.0].rect;

        let container = self.create_element("div");
        self.add_class(container, CONTAINER_CLASS);
        self.set_rect(container, Rect::new(anchor.left, anchor.top, 150.0, 36.0));

        let primary = self.create_element("button");
        self.add_class(primary, PRIMARY_CLASS);
        self.set_text(primary, view.label);
        self.set_rect(primary, Rect::new(anchor.left, anchor.top, 118.0, 36.0));
        self.append_child(container, primary);

        let dropdown = self.create_element("button");
        self.add_class(dropdown, DROPDOWN_CLASS);
        self.set_rect(dropdown, Rect::new(anchor.left + 118.0, anchor.top, 32.0, 36.0));
        self.append_child(container, dropdown);

        let menu = self.create_element("div");
        self.add_class(menu, MENU_CLASS);
        self.set_style(menu, "display", "none");
        let mut items = Vec::with_capacity(view.tones.len());
        for &tone in view.tones {
            let item = self.create_element("div");
            self.add_class(item, MENU_ITEM_CLASS);
            self.set_attribute(item, TONE_ATTRIBUTE, tone.wire_value());
            self.set_text(item, tone.label());
            self.append_child(menu, item);
            items.push((tone, item));
        }

        self.insert_first_child(*toolbar, container);
        let body = self.body;
        self.append_child(body, menu);

        let elements = ControlElements {
            container,
            primary,
            dropdown,
            menu,
            items,
        };
        self.render_control(&elements, view)?;
        Ok(elements)
    }

    fn render_control(
        &mut self,
        elements: &ControlElements<NodeId>,
        view: &ControlView,
    ) -> Result<(), DomError> {
        self.set_text(elements.primary, view.label);
        self.set_style(
            elements.primary,
            "pointer-events",
            if view.busy { "none" } else { "auto" },
        );

        let menu = elements.menu;
        self.set_style(
            menu,
            "display",
            if view.menu_displayed { "block" } else { "none" },
        );
        self.set_style(menu, "opacity", &view.menu_opacity.to_string());
        let mut rect = self.nodes[menu.0].rect;
        if let Some(position) = view.menu_position {
            rect.top = position.top;
            rect.left = position.left;
            self.set_style(menu, "top", &format!("{}px", position.top));
            self.set_style(menu, "left", &format!("{}px", position.left));
        }
        if view.menu_displayed {
            rect.width = crate::geometry::MENU_WIDTH;
            rect.height = view.tones.len() as f64 * MENU_ITEM_HEIGHT + MENU_PADDING;
        } else {
            rect.width = 0.0;
            rect.height = 0.0;
        }
        self.set_rect(menu, rect);

        for (tone, item) in &elements.items {
            if *tone == view.active_tone {
                self.add_class(*item, ACTIVE_CLASS);
            } else {
                self.remove_class(*item, ACTIVE_CLASS);
            }
        }

        self.views.insert(elements.container, view.clone());
        Ok(())
    }

    fn remove_control(&mut self, elements: &ControlElements<NodeId>) {
        self.remove(elements.container);
        self.remove(elements.menu);
        self.views.remove(&elements.container);
    }

    fn focus(&mut self, element: &NodeId) {
        self.focused = Some(*element);
    }

    fn insert_text(&mut self, element: &NodeId, text: &str) -> Result<(), DomError> {
        if self.focused != Some(*element) {
            return Err(DomError::Edit("element is not focused".to_string()));
        }
        if !self.connected(*element) {
            return Err(DomError::Edit("element is detached".to_string()));
        }
        let node = &mut self.nodes[element.0];
        let chars = node.text.chars().count();
        let caret = node.caret.unwrap_or(chars).min(chars);
        let byte_offset = node
            .text
            .char_indices()
            .nth(caret)
            .map(|(i, _)| i)
            .unwrap_or(node.text.len());
        node.text.insert_str(byte_offset, text);
        node.caret = Some(caret + text.chars().count());
        self.mutations += 1;
        Ok(())
    }
}

/// A compound selector: optional tag, classes and attribute tests, e.g.
/// `div.a3s.aiL` or `[role="textbox"][g_editable="true"]`.
struct Selector {
    tag: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Selector {
    fn parse(selector: &str) -> Option<Self> {
        static SHAPE: OnceLock<Regex> = OnceLock::new();
        static PART: OnceLock<Regex> = OnceLock::new();
        let shape = SHAPE.get_or_init(|| {
            Regex::new(r#"^([A-Za-z][\w-]*)?((?:\.[\w-]+|\[[\w-]+(?:="[^"]*")?\])*)$"#)
                .expect("valid selector regex")
        });
        let part = PART.get_or_init(|| {
            Regex::new(r#"\.([\w-]+)|\[([\w-]+)(?:="([^"]*)")?\]"#).expect("valid selector regex")
        });

        let caps = shape.captures(selector.trim())?;
        let tag = caps.get(1).map(|m| m.as_str().to_lowercase());
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        let mut classes = Vec::new();
        let mut attributes = Vec::new();
        for p in part.captures_iter(rest) {
            if let Some(class) = p.get(1) {
                classes.push(class.as_str().to_string());
            } else if let Some(name) = p.get(2) {
                attributes.push((
                    name.as_str().to_string(),
                    p.get(3).map(|v| v.as_str().to_string()),
                ));
            }
        }

        if tag.is_none() && classes.is_empty() && attributes.is_empty() {
            return None;
        }
        Some(Self {
            tag,
            classes,
            attributes,
        })
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(tag) = &self.tag {
            if !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        let classes_match = self
            .classes
            .iter()
            .all(|class| node.classes.iter().any(|c| c == class));
        let attributes_match = self.attributes.iter().all(|(name, expected)| {
            match (node.attributes.get(name), expected) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        });
        classes_match && attributes_match
    }
}
