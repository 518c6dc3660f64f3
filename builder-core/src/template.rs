//! Template catalog and instantiation.
//!
//! Templates are named, read-only element subtrees used to seed new pages or
//! drop pre-built blocks onto the canvas. Instantiation always deep-clones
//! with fresh IDs on every node, so repeated instantiations of the same
//! template never share identity.
//!
//! ## Built-in templates
//!
//! | Key               | Contents                                   |
//! |-------------------|--------------------------------------------|
//! | `landing`         | Header, hero section, footer               |
//! | `product-listing` | Header, product grid section, footer       |
//! | `blog-post`       | Header, title + body section               |
//! | `contact`         | Header, contact form section               |

use serde::{Deserialize, Serialize};

use crate::{BuilderError, BuilderResult, Element, ElementKind};

/// A named, reusable element subtree definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    key: String,
    name: String,
    description: String,
    elements: Vec<Element>,
}

impl Template {
    /// Define a template.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        elements: Vec<Element>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            elements,
        }
    }

    /// Catalog key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The prototype elements. Read-only; use [`Template::instantiate`] to
    /// produce an insertable copy.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Produce a fresh copy of the template's elements.
    ///
    /// Every node in the result, nested ones included, gets a newly generated
    /// ID, so two instantiations are structurally equal but id-disjoint.
    #[must_use]
    pub fn instantiate(&self) -> Vec<Element> {
        self.elements.iter().map(Element::with_fresh_ids).collect()
    }
}

/// Read-only collection of templates, looked up by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
}

impl TemplateCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog shipped with the builder.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.register(landing());
        catalog.register(product_listing());
        catalog.register(blog_post());
        catalog.register(contact());
        catalog
    }

    /// Add a template. A template with a duplicate key replaces the old one.
    pub fn register(&mut self, template: Template) {
        if let Some(existing) = self.templates.iter_mut().find(|t| t.key == template.key) {
            *existing = template;
        } else {
            self.templates.push(template);
        }
    }

    /// Look up a template by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.key == key)
    }

    /// All templates, in registration order (palette display order).
    pub fn list(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Instantiate a template by key.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::TemplateNotFound`] if the key is absent.
    pub fn instantiate(&self, key: &str) -> BuilderResult<Vec<Element>> {
        self.get(key)
            .map(Template::instantiate)
            .ok_or_else(|| BuilderError::TemplateNotFound(key.to_string()))
    }
}

fn header(title: &str) -> Element {
    Element::new(ElementKind::Header)
        .with_content("title", title)
        .with_content("showNav", true)
        .with_style("padding", "16px 32px")
}

fn footer() -> Element {
    Element::new(ElementKind::Footer)
        .with_content("text", "© Your Company")
        .with_style("padding", "24px 32px")
}

fn landing() -> Template {
    let hero = Element::new(ElementKind::Section)
        .with_content("title", "Hero")
        .with_style("minHeight", "480px")
        .with_style("textAlign", "center")
        .with_children(vec![
            Element::new(ElementKind::Text)
                .with_content("text", "Welcome to your new site")
                .with_style("fontSize", 48),
            Element::new(ElementKind::Text)
                .with_content("text", "Describe what makes you different.")
                .with_style("fontSize", 20),
            Element::new(ElementKind::Button)
                .with_content("label", "Get Started")
                .with_content("href", "#"),
        ]);
    Template::new(
        "landing",
        "Landing Page",
        "Header, hero section with call to action, and footer",
        vec![header("Your Company"), hero, footer()],
    )
}

fn product_listing() -> Template {
    let grid = Element::new(ElementKind::Section)
        .with_content("title", "Products")
        .with_prop("ecommerce", "product-grid")
        .with_style("display", "grid")
        .with_style("gridTemplateColumns", "repeat(3, 1fr)")
        .with_children(vec![product_card(), product_card(), product_card()]);
    Template::new(
        "product-listing",
        "Product Listing",
        "Header, three-column product grid, and footer",
        vec![header("Shop"), grid, footer()],
    )
}

fn product_card() -> Element {
    Element::new(ElementKind::Section)
        .with_prop("ecommerce", "product-card")
        .with_children(vec![
            Element::new(ElementKind::Image)
                .with_content("src", "https://placehold.co/400x300")
                .with_content("alt", "Product photo"),
            Element::new(ElementKind::Text).with_content("text", "Product name"),
            Element::new(ElementKind::Text)
                .with_content("text", "$0.00")
                .with_style("fontWeight", "bold"),
            Element::new(ElementKind::Button).with_content("label", "Add to Cart"),
        ])
}

fn blog_post() -> Template {
    let body = Element::new(ElementKind::Section)
        .with_content("title", "Article")
        .with_style("maxWidth", "720px")
        .with_children(vec![
            Element::new(ElementKind::Text)
                .with_content("text", "Post title")
                .with_style("fontSize", 36),
            Element::new(ElementKind::Image)
                .with_content("src", "https://placehold.co/720x400")
                .with_content("alt", "Cover image"),
            Element::new(ElementKind::Text)
                .with_content("text", "Write your story here."),
        ]);
    Template::new(
        "blog-post",
        "Blog Post",
        "Header and a single-column article layout",
        vec![header("Blog"), body],
    )
}

fn contact() -> Template {
    let section = Element::new(ElementKind::Section)
        .with_content("title", "Contact")
        .with_children(vec![
            Element::new(ElementKind::Text)
                .with_content("text", "Get in touch")
                .with_style("fontSize", 32),
            Element::new(ElementKind::Form)
                .with_content("fields", serde_json::json!(["name", "email", "message"]))
                .with_content("submitLabel", "Send"),
        ]);
    Template::new(
        "contact",
        "Contact Page",
        "Header, contact form, and footer",
        vec![header("Contact"), section, footer()],
    )
}
