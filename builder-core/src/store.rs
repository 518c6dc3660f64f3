//! The document store - owner of all pages, the current-page pointer, and
//! the editor state.
//!
//! The store is an explicit context object: surrounding panels hold one
//! value (or a reference to it) and route every document mutation through
//! the operations here. Nothing in the crate is ambient or `static`. All
//! operations are synchronous and run to completion on the caller's thread,
//! so each mutation is atomic with respect to the others.

use serde::{Deserialize, Serialize};

use crate::page::{now_ms, slugify};
use crate::{
    BuilderError, BuilderResult, EditorState, Element, ElementId, ElementPatch, Page, PageId,
    PageVersion, Panel, PreviewDevice, TemplateCatalog,
};

/// In-memory workspace: page collection, current-page pointer, editor state,
/// and the template catalog used to seed pages.
///
/// Exactly one page is current at a time (or none, after deleting the
/// current page). Element operations target the current page and fail with
/// [`BuilderError::NoCurrentPage`] when there is none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStore {
    pages: Vec<Page>,
    current: Option<PageId>,
    editor: EditorState,
    #[serde(skip, default = "TemplateCatalog::builtin")]
    templates: TemplateCatalog,
}

impl DocumentStore {
    /// Create an empty store with the built-in template catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(TemplateCatalog::builtin())
    }

    /// Create an empty store with a custom template catalog.
    #[must_use]
    pub fn with_catalog(templates: TemplateCatalog) -> Self {
        Self {
            pages: Vec::new(),
            current: None,
            editor: EditorState::new(),
            templates,
        }
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    /// All pages, in creation order.
    #[must_use]
    pub fn list_pages(&self) -> &[Page] {
        &self.pages
    }

    /// Look up a page by ID.
    #[must_use]
    pub fn page(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// The current page, if one is loaded.
    #[must_use]
    pub fn current_page(&self) -> Option<&Page> {
        self.current.and_then(|id| self.page(id))
    }

    /// Find an element in the current page's tree.
    #[must_use]
    pub fn find_element(&self, id: ElementId) -> Option<&Element> {
        self.current_page().and_then(|page| page.find_element(id))
    }

    /// The selected element, resolved live against the current page's tree.
    ///
    /// Returns `None` when nothing is selected or the selected ID no longer
    /// resolves (weak-reference semantics).
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.editor
            .selected_element()
            .and_then(|id| self.find_element(id))
    }

    /// The editor state (selection, preview, panel).
    #[must_use]
    pub fn editor(&self) -> &EditorState {
        &self.editor
    }

    /// The template catalog.
    #[must_use]
    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    // -----------------------------------------------------------------------
    // Selection / preview / panel
    // -----------------------------------------------------------------------

    /// Select an element by ID, or clear the selection with `None`.
    ///
    /// The ID is stored as-is; resolution happens at read time, so selecting
    /// a stale ID simply reads back as no selection.
    pub fn select_element(&mut self, id: Option<ElementId>) {
        self.editor.select(id);
    }

    /// Set the preview device width hint.
    pub fn set_preview_device(&mut self, device: PreviewDevice) {
        self.editor.set_preview_device(device);
    }

    /// Enable or disable preview mode.
    pub fn set_preview(&mut self, enabled: bool) {
        self.editor.set_preview(enabled);
    }

    /// Toggle preview mode, returning the new value.
    pub fn toggle_preview(&mut self) -> bool {
        self.editor.toggle_preview()
    }

    /// Open a side panel, or close all with `None`.
    pub fn set_active_panel(&mut self, panel: Option<Panel>) {
        self.editor.set_active_panel(panel);
    }

    // -----------------------------------------------------------------------
    // Page operations
    // -----------------------------------------------------------------------

    /// Create a page and make it current.
    ///
    /// With a template key, the page is seeded from the catalog; otherwise it
    /// starts blank. The slug is derived from `name`, with a numeric suffix
    /// on collision.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::TemplateNotFound`] for an unknown template
    /// key; no page is created in that case.
    pub fn create_page(&mut self, name: &str, template: Option<&str>) -> BuilderResult<PageId> {
        let elements = match template {
            Some(key) => self.templates.instantiate(key)?,
            None => Vec::new(),
        };
        let slug = self.unique_slug(&slugify(name));
        let page = Page::new(name, slug)
            .with_template(template.unwrap_or("custom"))
            .with_elements(elements);
        let id = page.id;
        tracing::debug!("Created page {id} ({name})");
        self.pages.push(page);
        self.set_current(Some(id));
        Ok(id)
    }

    /// Make a page current.
    ///
    /// Silently ignores unknown IDs: page lists shown in the UI may be
    /// stale, and a dead click must not crash the editor.
    pub fn load_page(&mut self, id: PageId) {
        if self.page(id).is_some() {
            self.set_current(Some(id));
        } else {
            tracing::debug!("Ignoring load of unknown page {id}");
        }
    }

    /// Deep-clone a page, including all elements with fresh IDs.
    ///
    /// The copy gets a `<slug>-copy` slug (disambiguated on collision), a new
    /// creation timestamp, and an empty version history. The current pointer
    /// is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::PageNotFound`] for an unknown ID.
    pub fn duplicate_page(&mut self, id: PageId) -> BuilderResult<PageId> {
        let original = self
            .page(id)
            .ok_or_else(|| BuilderError::PageNotFound(id.to_string()))?;

        let elements = original
            .elements
            .iter()
            .map(Element::with_fresh_ids)
            .collect();
        let slug = self.unique_slug(&format!("{}-copy", original.slug));
        let mut copy = Page::new(format!("{} Copy", original.name), slug)
            .with_template(original.template.clone())
            .with_elements(elements);
        copy.seo = original.seo.clone();
        copy.custom_css = original.custom_css.clone();
        copy.custom_js = original.custom_js.clone();

        let copy_id = copy.id;
        tracing::debug!("Duplicated page {id} as {copy_id}");
        self.pages.push(copy);
        Ok(copy_id)
    }

    /// Delete a page.
    ///
    /// Deleting the current page leaves the store with no current page;
    /// callers must load another page before further element operations.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::PageNotFound`] for an unknown ID.
    pub fn delete_page(&mut self, id: PageId) -> BuilderResult<()> {
        let pos = self
            .pages
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| BuilderError::PageNotFound(id.to_string()))?;
        self.pages.remove(pos);
        tracing::debug!("Deleted page {id}");
        if self.current == Some(id) {
            self.set_current(None);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Element operations (scoped to the current page)
    // -----------------------------------------------------------------------

    /// Insert an element into the current page.
    ///
    /// `parent: None` targets the root sequence; an omitted or out-of-bounds
    /// index appends. The selection is not changed. If any ID in the incoming
    /// subtree already exists in the page, the whole subtree is re-identified
    /// to keep IDs unique tree-wide.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded, or
    /// [`BuilderError::ElementNotFound`] for a parent that is missing or
    /// cannot nest children.
    pub fn add_element(
        &mut self,
        element: Element,
        parent: Option<ElementId>,
        index: Option<usize>,
    ) -> BuilderResult<ElementId> {
        let page = self.current_page_mut()?;

        let mut incoming = Vec::new();
        element.visit(&mut |e| incoming.push(e.id));
        let element = if incoming.iter().any(|&eid| page.contains_element(eid)) {
            tracing::debug!("Re-identifying inserted subtree to avoid ID collision");
            element.with_fresh_ids()
        } else {
            element
        };

        let id = page.insert_element(element, parent, index)?;
        page.touch();
        tracing::debug!("Added element {id}");
        Ok(id)
    }

    /// Append an element to the current page's root sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded.
    pub fn append_element(&mut self, element: Element) -> BuilderResult<ElementId> {
        self.add_element(element, None, None)
    }

    /// Patch an element in the current page.
    ///
    /// Content, styles, and props merge shallowly; a provided child list
    /// replaces the existing one wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded, or
    /// [`BuilderError::ElementNotFound`] for an unknown ID.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> BuilderResult<()> {
        let page = self.current_page_mut()?;
        let element = page
            .find_element_mut(id)
            .ok_or_else(|| BuilderError::ElementNotFound(id.to_string()))?;
        element.apply_patch(patch);
        page.touch();
        Ok(())
    }

    /// Remove an element and its entire subtree from the current page.
    ///
    /// Idempotent: a missing ID is a no-op, because UI double-fires are
    /// expected. If the removed subtree contains the selected element, the
    /// selection is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded.
    pub fn delete_element(&mut self, id: ElementId) -> BuilderResult<()> {
        let page = self.current_page_mut()?;
        let Some(removed) = page.remove_element(id) else {
            return Ok(());
        };
        page.touch();
        if let Some(selected) = self.editor.selected_element() {
            if removed.contains(selected) {
                self.editor.select(None);
            }
        }
        tracing::debug!("Deleted element {id}");
        Ok(())
    }

    /// Deep-clone an element subtree with fresh IDs, inserting the clone
    /// immediately after the original in its parent's sequence.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded, or
    /// [`BuilderError::ElementNotFound`] for an unknown ID.
    pub fn duplicate_element(&mut self, id: ElementId) -> BuilderResult<ElementId> {
        let page = self.current_page_mut()?;
        let clone = page
            .find_element(id)
            .ok_or_else(|| BuilderError::ElementNotFound(id.to_string()))?
            .with_fresh_ids();
        let clone_id = clone.id;
        // The sibling was just found, so reattachment cannot miss.
        if page.insert_after(id, clone).is_err() {
            return Err(BuilderError::ElementNotFound(id.to_string()));
        }
        page.touch();
        tracing::debug!("Duplicated element {id} as {clone_id}");
        Ok(clone_id)
    }

    // -----------------------------------------------------------------------
    // Versioning
    // -----------------------------------------------------------------------

    /// Snapshot the current page's full state under `name`.
    ///
    /// Snapshots start unpublished and are never auto-pruned.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded.
    pub fn create_version(&mut self, name: &str) -> BuilderResult<()> {
        let page = self.current_page_mut()?;
        let version = PageVersion {
            name: name.to_string(),
            published: false,
            created_at: now_ms(),
            elements: page.elements.clone(),
            seo: page.seo.clone(),
            custom_css: page.custom_css.clone(),
            custom_js: page.custom_js.clone(),
        };
        page.versions.push(version);
        tracing::debug!("Created version \"{name}\" of page {}", page.id);
        Ok(())
    }

    /// Mark the most recent version with the given name as published.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded, or
    /// [`BuilderError::VersionNotFound`] for an unknown name.
    pub fn publish_version(&mut self, name: &str) -> BuilderResult<()> {
        let page = self.current_page_mut()?;
        let version = page
            .versions
            .iter_mut()
            .rev()
            .find(|v| v.name == name)
            .ok_or_else(|| BuilderError::VersionNotFound(name.to_string()))?;
        version.published = true;
        Ok(())
    }

    /// Restore the current page's content from the most recent version with
    /// the given name.
    ///
    /// Elements, SEO metadata, and custom CSS/JS are replaced wholesale;
    /// version history is kept.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] with no page loaded, or
    /// [`BuilderError::VersionNotFound`] for an unknown name.
    pub fn restore_version(&mut self, name: &str) -> BuilderResult<()> {
        let page = self.current_page_mut()?;
        let version = page
            .versions
            .iter()
            .rev()
            .find(|v| v.name == name)
            .ok_or_else(|| BuilderError::VersionNotFound(name.to_string()))?;
        page.elements = version.elements.clone();
        page.seo = version.seo.clone();
        page.custom_css = version.custom_css.clone();
        page.custom_js = version.custom_js.clone();
        page.touch();
        tracing::debug!("Restored version \"{name}\" of page {}", page.id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn current_page_mut(&mut self) -> BuilderResult<&mut Page> {
        let id = self.current.ok_or(BuilderError::NoCurrentPage)?;
        self.pages
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| BuilderError::PageNotFound(id.to_string()))
    }

    /// Switch the current pointer, dropping any selection into the old page.
    fn set_current(&mut self, id: Option<PageId>) {
        if self.current != id {
            self.editor.select(None);
        }
        self.current = id;
    }

    /// Disambiguate a slug against the existing page collection.
    fn unique_slug(&self, base: &str) -> String {
        if !self.slug_taken(base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.slug_taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn slug_taken(&self, slug: &str) -> bool {
        self.pages.iter().any(|p| p.slug == slug)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ElementKind;

    fn store_with_page() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.create_page("Home", None).expect("create page");
        store
    }

    #[test]
    fn test_create_page_sets_current_and_slug() {
        let mut store = DocumentStore::new();
        let id = store.create_page("About Us", None).expect("create");
        let page = store.current_page().expect("current");
        assert_eq!(page.id, id);
        assert_eq!(page.slug, "about-us");
        assert_eq!(page.template, "custom");
        assert!(page.elements.is_empty());
    }

    #[test]
    fn test_slug_collision_appends_suffix() {
        let mut store = DocumentStore::new();
        store.create_page("Home", None).expect("create");
        store.create_page("Home", None).expect("create");
        store.create_page("Home", None).expect("create");
        let slugs: Vec<_> = store.list_pages().iter().map(|p| p.slug.clone()).collect();
        assert_eq!(slugs, vec!["home", "home-2", "home-3"]);
    }

    #[test]
    fn test_create_page_from_template() {
        let mut store = DocumentStore::new();
        store
            .create_page("Shop", Some("product-listing"))
            .expect("create");
        let page = store.current_page().expect("current");
        assert_eq!(page.template, "product-listing");
        assert!(!page.elements.is_empty());
    }

    #[test]
    fn test_create_page_unknown_template_creates_nothing() {
        let mut store = DocumentStore::new();
        let result = store.create_page("Shop", Some("nope"));
        assert!(matches!(result, Err(BuilderError::TemplateNotFound(_))));
        assert!(store.list_pages().is_empty());
        assert!(store.current_page().is_none());
    }

    #[test]
    fn test_load_unknown_page_is_noop() {
        let mut store = store_with_page();
        let current = store.current_page().expect("current").id;
        store.load_page(PageId::new());
        assert_eq!(store.current_page().expect("current").id, current);
    }

    #[test]
    fn test_element_ops_require_current_page() {
        let mut store = DocumentStore::new();
        let result = store.append_element(Element::new(ElementKind::Text));
        assert!(matches!(result, Err(BuilderError::NoCurrentPage)));

        let result = store.delete_element(ElementId::new());
        assert!(matches!(result, Err(BuilderError::NoCurrentPage)));
    }

    #[test]
    fn test_delete_current_page_clears_pointer() {
        let mut store = store_with_page();
        let id = store.current_page().expect("current").id;
        store.delete_page(id).expect("delete");
        assert!(store.current_page().is_none());
        assert!(matches!(
            store.append_element(Element::new(ElementKind::Text)),
            Err(BuilderError::NoCurrentPage)
        ));
    }

    #[test]
    fn test_add_element_missing_parent_fails() {
        let mut store = store_with_page();
        let result = store.add_element(
            Element::new(ElementKind::Text),
            Some(ElementId::new()),
            None,
        );
        assert!(matches!(result, Err(BuilderError::ElementNotFound(_))));
    }

    #[test]
    fn test_add_element_leaf_parent_fails_as_not_found() {
        let mut store = store_with_page();
        let button_id = store
            .append_element(Element::new(ElementKind::Button))
            .expect("add");

        // A parent that exists but cannot nest reports not-found to callers;
        // the invalid-target distinction stays inside the placement engine.
        let result = store.add_element(Element::new(ElementKind::Text), Some(button_id), None);
        assert!(matches!(result, Err(BuilderError::ElementNotFound(_))));
        assert_eq!(store.current_page().expect("page").element_count(), 1);
    }

    #[test]
    fn test_add_element_does_not_change_selection() {
        let mut store = store_with_page();
        let first = store
            .append_element(Element::new(ElementKind::Text))
            .expect("add");
        store.select_element(Some(first));
        store
            .append_element(Element::new(ElementKind::Button))
            .expect("add");
        assert_eq!(store.editor().selected_element(), Some(first));
    }

    #[test]
    fn test_add_element_reidentifies_on_collision() {
        let mut store = store_with_page();
        let element = Element::new(ElementKind::Text);
        let original_id = element.id;
        store.append_element(element.clone()).expect("add");
        let second_id = store.append_element(element).expect("add again");

        assert_ne!(second_id, original_id);
        assert_eq!(store.current_page().expect("page").element_count(), 2);
    }

    #[test]
    fn test_update_element_merges() {
        let mut store = store_with_page();
        let id = store
            .append_element(Element::new(ElementKind::Text).with_content("text", "old"))
            .expect("add");

        store
            .update_element(id, ElementPatch::new().with_content("text", "new"))
            .expect("update");

        let element = store.find_element(id).expect("element");
        assert_eq!(element.content["text"], "new");

        let missing = store.update_element(ElementId::new(), ElementPatch::new());
        assert!(matches!(missing, Err(BuilderError::ElementNotFound(_))));
    }

    #[test]
    fn test_delete_element_idempotent() {
        let mut store = store_with_page();
        let id = store
            .append_element(Element::new(ElementKind::Text))
            .expect("add");

        store.delete_element(id).expect("first delete");
        let after_first = store.current_page().expect("page").clone();

        // Second delete of the same ID is a no-op, not an error.
        store.delete_element(id).expect("second delete");
        let after_second = store.current_page().expect("page");
        assert_eq!(after_second.elements, after_first.elements);
    }

    #[test]
    fn test_delete_clears_selection_of_descendant() {
        let mut store = store_with_page();
        let section_id = store
            .append_element(Element::new(ElementKind::Section))
            .expect("add");
        let text_id = store
            .add_element(Element::new(ElementKind::Text), Some(section_id), None)
            .expect("nest");

        store.select_element(Some(text_id));
        assert!(store.selected_element().is_some());

        // Deleting the ancestor drops the selection into its subtree.
        store.delete_element(section_id).expect("delete");
        assert!(store.selected_element().is_none());
        assert_eq!(store.editor().selected_element(), None);
    }

    #[test]
    fn test_duplicate_inserts_after_original() {
        let mut store = store_with_page();
        let first = store
            .append_element(Element::new(ElementKind::Text).with_content("text", "a"))
            .expect("add");
        store
            .append_element(Element::new(ElementKind::Button))
            .expect("add");

        let clone_id = store.duplicate_element(first).expect("duplicate");
        let page = store.current_page().expect("page");
        assert_eq!(page.elements.len(), 3);
        assert_eq!(page.elements[0].id, first);
        assert_eq!(page.elements[1].id, clone_id);
        assert_eq!(page.elements[1].content["text"], "a");
    }

    #[test]
    fn test_duplicate_page_resets_versions_and_freshens_ids() {
        let mut store = store_with_page();
        let original_id = store.current_page().expect("page").id;
        let element_id = store
            .append_element(Element::new(ElementKind::Text))
            .expect("add");
        store.create_version("v1").expect("version");

        let copy_id = store.duplicate_page(original_id).expect("duplicate");
        let copy = store.page(copy_id).expect("copy");

        assert_eq!(copy.slug, "home-copy");
        assert!(copy.versions.is_empty());
        assert_eq!(copy.element_count(), 1);
        assert!(!copy.contains_element(element_id));

        // Current pointer still on the original.
        assert_eq!(store.current_page().expect("current").id, original_id);
    }

    #[test]
    fn test_duplicate_page_slug_disambiguation() {
        let mut store = store_with_page();
        let id = store.current_page().expect("page").id;
        let first = store.duplicate_page(id).expect("dup");
        let second = store.duplicate_page(id).expect("dup");
        assert_eq!(store.page(first).expect("copy").slug, "home-copy");
        assert_eq!(store.page(second).expect("copy").slug, "home-copy-2");
    }

    #[test]
    fn test_version_create_publish_restore() {
        let mut store = store_with_page();
        let id = store
            .append_element(Element::new(ElementKind::Text).with_content("text", "v1"))
            .expect("add");
        store.create_version("draft").expect("version");

        store
            .update_element(id, ElementPatch::new().with_content("text", "v2"))
            .expect("update");

        store.publish_version("draft").expect("publish");
        let page = store.current_page().expect("page");
        assert!(page.versions[0].published);

        store.restore_version("draft").expect("restore");
        let element = store.find_element(id).expect("element");
        assert_eq!(element.content["text"], "v1");

        assert!(matches!(
            store.publish_version("nope"),
            Err(BuilderError::VersionNotFound(_))
        ));
    }

    #[test]
    fn test_selection_cleared_on_page_switch() {
        let mut store = store_with_page();
        let id = store
            .append_element(Element::new(ElementKind::Text))
            .expect("add");
        store.select_element(Some(id));

        store.create_page("Other", None).expect("create");
        assert_eq!(store.editor().selected_element(), None);
    }
}
