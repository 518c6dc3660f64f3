//! Pages - routable documents composed of an element forest plus metadata.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BuilderError, BuilderResult, Element, ElementId};

/// Unique identifier for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(Uuid);

impl PageId {
    /// Create a new unique page ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a page ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Search-engine metadata for a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMeta {
    /// Title shown in search results and the browser tab.
    #[serde(default)]
    pub title: String,
    /// Meta description.
    #[serde(default)]
    pub description: String,
    /// Meta keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// An immutable named snapshot of a page's full state.
///
/// Snapshots are created on demand and never auto-pruned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageVersion {
    /// Display name of the snapshot.
    pub name: String,
    /// Whether this snapshot has been published.
    pub published: bool,
    /// When the snapshot was taken (ms since epoch).
    pub created_at: u64,
    /// Element forest at snapshot time.
    pub elements: Vec<Element>,
    /// SEO metadata at snapshot time.
    pub seo: SeoMeta,
    /// Custom CSS at snapshot time.
    pub custom_css: String,
    /// Custom JS at snapshot time.
    pub custom_js: String,
}

/// One routable document: an ordered element forest plus page metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier.
    pub id: PageId,
    /// Display name.
    pub name: String,
    /// URL path. Unique across the document store's page collection.
    pub slug: String,
    /// Origin template key, or `"custom"` for blank pages.
    pub template: String,
    /// Root-level elements, in visual top-to-bottom order.
    pub elements: Vec<Element>,
    /// Search-engine metadata.
    #[serde(default)]
    pub seo: SeoMeta,
    /// Page-scoped custom CSS.
    #[serde(default)]
    pub custom_css: String,
    /// Page-scoped custom JS.
    #[serde(default)]
    pub custom_js: String,
    /// Creation timestamp (ms since epoch).
    pub created_at: u64,
    /// Last mutation timestamp (ms since epoch).
    pub updated_at: u64,
    /// Named snapshots, in creation order.
    #[serde(default)]
    pub versions: Vec<PageVersion>,
}

impl Page {
    /// Create a blank page with the given name and slug.
    #[must_use]
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: PageId::new(),
            name: name.into(),
            slug: slug.into(),
            template: "custom".to_string(),
            elements: Vec::new(),
            seo: SeoMeta::default(),
            custom_css: String::new(),
            custom_js: String::new(),
            created_at: now,
            updated_at: now,
            versions: Vec::new(),
        }
    }

    /// Set the origin template key.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Set the element forest.
    #[must_use]
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Find an element anywhere in the forest.
    ///
    /// Roots are scanned in order, each subtree depth-first pre-order.
    #[must_use]
    pub fn find_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find_map(|root| root.find(id))
    }

    /// Find an element mutably anywhere in the forest.
    pub fn find_element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find_map(|root| root.find_mut(id))
    }

    /// Whether the forest contains the given element ID.
    #[must_use]
    pub fn contains_element(&self, id: ElementId) -> bool {
        self.find_element(id).is_some()
    }

    /// Detach an element (and its whole subtree) from wherever it sits.
    ///
    /// Returns the removed subtree, or `None` if the ID is absent.
    pub fn remove_element(&mut self, id: ElementId) -> Option<Element> {
        remove_from(&mut self.elements, id)
    }

    /// Insert an element under the given parent at the given index.
    ///
    /// `parent: None` targets the root sequence. An out-of-bounds or missing
    /// index appends. The inserted element's ID is returned.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ElementNotFound`] if the parent ID is absent
    /// or references an element that cannot nest children. Stale and
    /// unusable parents look the same to callers; only the placement engine
    /// distinguishes them, internally.
    pub fn insert_element(
        &mut self,
        element: Element,
        parent: Option<ElementId>,
        index: Option<usize>,
    ) -> BuilderResult<ElementId> {
        let id = element.id;
        match parent {
            None => {
                let at = index.unwrap_or(self.elements.len()).min(self.elements.len());
                self.elements.insert(at, element);
            }
            Some(parent_id) => {
                let target = self
                    .find_element_mut(parent_id)
                    .ok_or_else(|| BuilderError::ElementNotFound(parent_id.to_string()))?;
                if !target.is_container() {
                    return Err(BuilderError::ElementNotFound(parent_id.to_string()));
                }
                let children = target.children.get_or_insert_with(Vec::new);
                let at = index.unwrap_or(children.len()).min(children.len());
                children.insert(at, element);
            }
        }
        Ok(id)
    }

    /// Insert an element immediately after an existing sibling.
    ///
    /// # Errors
    ///
    /// Returns the element back unchanged if the sibling is absent.
    pub fn insert_after(&mut self, sibling: ElementId, element: Element) -> Result<(), Element> {
        insert_after_in(&mut self.elements, sibling, element)
    }

    /// All elements in the forest, flattened depth-first pre-order.
    ///
    /// This order is deterministic and doubles as overlay paint order.
    #[must_use]
    pub fn flatten(&self) -> Vec<&Element> {
        let mut flat = Vec::new();
        for root in &self.elements {
            collect_refs(root, &mut flat);
        }
        flat
    }

    /// Total number of elements in the forest.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.iter().map(Element::subtree_len).sum()
    }

    /// Record a mutation by bumping `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = now_ms();
    }

    /// Serialize the page to JSON (the structural dump consumed by
    /// persistence collaborators).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> BuilderResult<String> {
        serde_json::to_string(self).map_err(BuilderError::Serialization)
    }

    /// Deserialize a page from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> BuilderResult<Self> {
        serde_json::from_str(json).map_err(BuilderError::Serialization)
    }
}

fn collect_refs<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    out.push(element);
    if let Some(children) = element.children.as_deref() {
        for child in children {
            collect_refs(child, out);
        }
    }
}

fn remove_from(nodes: &mut Vec<Element>, id: ElementId) -> Option<Element> {
    if let Some(pos) = nodes.iter().position(|e| e.id == id) {
        return Some(nodes.remove(pos));
    }
    for node in &mut *nodes {
        if let Some(children) = node.children.as_mut() {
            if let Some(removed) = remove_from(children, id) {
                return Some(removed);
            }
        }
    }
    None
}

fn insert_after_in(
    nodes: &mut Vec<Element>,
    sibling: ElementId,
    element: Element,
) -> Result<(), Element> {
    if let Some(pos) = nodes.iter().position(|e| e.id == sibling) {
        nodes.insert(pos + 1, element);
        return Ok(());
    }
    let mut element = element;
    for node in &mut *nodes {
        if let Some(children) = node.children.as_mut() {
            match insert_after_in(children, sibling, element) {
                Ok(()) => return Ok(()),
                Err(returned) => element = returned,
            }
        }
    }
    Err(element)
}

/// Derive a URL slug from a display name.
///
/// Lowercases, maps runs of non-alphanumeric characters to single dashes,
/// and trims leading/trailing dashes. An empty result becomes `"page"`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "page".to_string()
    } else {
        slug
    }
}

/// Current Unix timestamp in milliseconds.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
