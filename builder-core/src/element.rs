//! Builder elements - the placeable units of a page's content tree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The type tag of an element.
///
/// The tag decides which `content` keys are meaningful by convention and
/// whether the element may nest children (only section-like containers do).
/// Unknown tags encountered during deserialization map to [`Custom`].
///
/// [`Custom`]: ElementKind::Custom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    /// A block of text.
    Text,
    /// A page header bar.
    Header,
    /// A page footer bar.
    Footer,
    /// A layout container. The only kind that nests children by default.
    Section,
    /// A static image.
    Image,
    /// An embedded video.
    Video,
    /// A clickable button.
    Button,
    /// An input form.
    Form,
    /// An escape hatch for domain-specific widgets (product grids, embeds).
    Custom,
}

impl ElementKind {
    /// Whether this kind accepts child elements by default.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Section)
    }

    /// The wire tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Section => "section",
            Self::Image => "image",
            Self::Video => "video",
            Self::Button => "button",
            Self::Form => "form",
            Self::Custom => "custom",
        }
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "text" => Self::Text,
            "header" => Self::Header,
            "footer" => Self::Footer,
            "section" => Self::Section,
            "image" => Self::Image,
            "video" => Self::Video,
            "button" => Self::Button,
            "form" => Self::Form,
            _ => Self::Custom,
        }
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        kind.as_str().to_string()
    }
}

/// One placeable unit in a page's content tree.
///
/// The envelope (`id`, `styles`, `props`, optional `children`) is shared by
/// every kind; `content` keys are interpreted per [`ElementKind`] by the
/// renderer, not validated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier, assigned at creation, never reused.
    pub id: ElementId,
    /// Element type tag.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Type-dependent content values (text, URLs, labels).
    #[serde(default)]
    pub content: HashMap<String, serde_json::Value>,
    /// CSS-like property names to values. No cascade is resolved here.
    #[serde(default)]
    pub styles: HashMap<String, serde_json::Value>,
    /// Cross-cutting flags (`hidden`, `className`, domain tags).
    #[serde(default)]
    pub props: HashMap<String, serde_json::Value>,
    /// Ordered child elements. Present only on container-capable elements;
    /// order is visual top-to-bottom.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

impl Element {
    /// Create a new element of the given kind with a fresh ID.
    ///
    /// Container kinds start with an empty child list; leaf kinds carry no
    /// child list at all.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            content: HashMap::new(),
            styles: HashMap::new(),
            props: HashMap::new(),
            children: if kind.is_container() {
                Some(Vec::new())
            } else {
                None
            },
        }
    }

    /// Set a content value.
    #[must_use]
    pub fn with_content(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    /// Set a style value.
    #[must_use]
    pub fn with_style(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    /// Set a prop value.
    #[must_use]
    pub fn with_prop(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Replace the child list, making this element a container.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = Some(children);
        self
    }

    /// Whether this element accepts dropped children.
    ///
    /// True for container kinds and, by convention, for any element that
    /// already carries a child list.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind.is_container() || self.children.is_some()
    }

    /// Find a node in the subtree rooted here, including this element.
    ///
    /// Traversal is depth-first pre-order with children in array order; the
    /// same order defines overlay paint order, so it must stay deterministic.
    #[must_use]
    pub fn find(&self, id: ElementId) -> Option<&Element> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_deref()
            .and_then(|children| children.iter().find_map(|child| child.find(id)))
    }

    /// Find a node mutably in the subtree rooted here.
    pub fn find_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        if self.id == id {
            return Some(self);
        }
        self.children
            .as_deref_mut()
            .and_then(|children| children.iter_mut().find_map(|child| child.find_mut(id)))
    }

    /// Whether the subtree rooted here contains the given ID.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.find(id).is_some()
    }

    /// Visit every node in the subtree in pre-order.
    pub fn visit<F: FnMut(&Element)>(&self, f: &mut F) {
        f(self);
        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.visit(f);
            }
        }
    }

    /// Deep-clone the subtree, assigning a fresh ID to every node.
    ///
    /// Content, styles, props, and child order are preserved exactly.
    #[must_use]
    pub fn with_fresh_ids(&self) -> Element {
        let mut clone = self.clone();
        clone.refresh_ids();
        clone
    }

    fn refresh_ids(&mut self) {
        self.id = ElementId::new();
        if let Some(children) = self.children.as_deref_mut() {
            for child in children {
                child.refresh_ids();
            }
        }
    }

    /// Count of nodes in the subtree, including this element.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }

    /// Apply a patch to this element.
    pub fn apply_patch(&mut self, patch: ElementPatch) {
        self.content.extend(patch.content);
        self.styles.extend(patch.styles);
        self.props.extend(patch.props);
        if let Some(children) = patch.children {
            self.children = Some(children);
        }
    }
}

/// A shallow patch applied to an existing element.
///
/// Map entries are merged key-by-key (new keys added, existing keys
/// overwritten, unmentioned keys kept). A provided child list replaces the
/// existing one wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    /// Content entries to merge in.
    #[serde(default)]
    pub content: HashMap<String, serde_json::Value>,
    /// Style entries to merge in.
    #[serde(default)]
    pub styles: HashMap<String, serde_json::Value>,
    /// Prop entries to merge in.
    #[serde(default)]
    pub props: HashMap<String, serde_json::Value>,
    /// Replacement child list, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

impl ElementPatch {
    /// Create an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a content entry to the patch.
    #[must_use]
    pub fn with_content(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.content.insert(key.into(), value.into());
        self
    }

    /// Add a style entry to the patch.
    #[must_use]
    pub fn with_style(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.styles.insert(key.into(), value.into());
        self
    }

    /// Add a prop entry to the patch.
    #[must_use]
    pub fn with_prop(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Set the replacement child list.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = Some(children);
        self
    }
}
