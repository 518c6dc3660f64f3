//! End-to-end builder flows
//!
//! Exercises the complete path from template or palette payload through
//! placement to committed document mutations:
//! - Page authoring (create, duplicate, delete, version)
//! - Element tree editing across nested containers
//! - Drag gestures with retargeting, fallback, and cancellation
//! - Template seeding and isolation

use builder_core::{
    DocumentStore, DropOutcome, DropTarget, Element, ElementId, ElementKind, ElementPatch,
    PlacementEngine, PreviewDevice,
};

/// Collect every element ID in a page's forest, pre-order.
fn all_ids(store: &DocumentStore) -> Vec<ElementId> {
    store
        .current_page()
        .expect("current page")
        .flatten()
        .iter()
        .map(|e| e.id)
        .collect()
}

/// A text payload as the palette would produce it.
fn text(content: &str) -> Element {
    Element::new(ElementKind::Text).with_content("text", content)
}

// ============================================================================
// Page Authoring
// ============================================================================

#[test]
fn test_home_page_build_script() {
    let mut store = DocumentStore::new();
    store.create_page("Home", None).expect("create page");

    store
        .append_element(Element::new(ElementKind::Header).with_content("title", "Shop"))
        .expect("add header");
    let section_id = store
        .append_element(Element::new(ElementKind::Section).with_content("title", "Body"))
        .expect("add section");
    store
        .add_element(text("Hi"), Some(section_id), None)
        .expect("add nested text");

    let page = store.current_page().expect("current page");
    assert_eq!(page.elements.len(), 2);
    let children = page.elements[1].children.as_deref().expect("children");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].content["text"], "Hi");
}

#[test]
fn test_ids_unique_across_template_seeding_and_edits() {
    let mut store = DocumentStore::new();
    store
        .create_page("Shop", Some("product-listing"))
        .expect("create page");

    // Drop another template block and duplicate part of the tree.
    let blocks = store
        .templates()
        .instantiate("product-listing")
        .expect("instantiate");
    for element in blocks {
        store.append_element(element).expect("append");
    }
    let first_root = store.current_page().expect("page").elements[0].id;
    store.duplicate_element(first_root).expect("duplicate");

    let ids = all_ids(&store);
    let mut deduped = ids.clone();
    deduped.sort_by_key(ElementId::to_string);
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len(), "duplicate element IDs in page");
}

#[test]
fn test_version_snapshot_survives_later_edits() {
    let mut store = DocumentStore::new();
    store.create_page("Home", None).expect("create page");
    let id = store.append_element(text("before")).expect("add");
    store.create_version("launch").expect("version");

    store
        .update_element(id, ElementPatch::new().with_content("text", "after"))
        .expect("update");
    store.delete_element(id).expect("delete");
    assert!(store.current_page().expect("page").elements.is_empty());

    store.restore_version("launch").expect("restore");
    let restored = store.find_element(id).expect("element restored");
    assert_eq!(restored.content["text"], "before");
}

// ============================================================================
// Drag Gestures
// ============================================================================

#[test]
fn test_drag_retarget_then_commit() {
    let mut store = DocumentStore::new();
    store.create_page("Home", None).expect("create page");
    let hero = store
        .append_element(Element::new(ElementKind::Section).with_content("title", "Hero"))
        .expect("add hero");
    let body = store
        .append_element(Element::new(ElementKind::Section).with_content("title", "Body"))
        .expect("add body");

    let mut engine = PlacementEngine::new();
    engine.begin_drag(text("dragged"));
    engine.hover(DropTarget::inside(hero, 0));
    engine.hover_none();
    engine.hover(DropTarget::inside(body, 0));

    let outcome = engine.commit(&mut store).expect("commit");
    assert!(matches!(outcome, DropOutcome::Placed(_)));

    let body_children = store
        .find_element(body)
        .and_then(|s| s.children.as_deref())
        .expect("body children");
    assert_eq!(body_children.len(), 1);
    let hero_children = store
        .find_element(hero)
        .and_then(|s| s.children.as_deref())
        .expect("hero children");
    assert!(hero_children.is_empty());
}

#[test]
fn test_gesture_lifecycle_never_loses_or_invents_elements() {
    let mut store = DocumentStore::new();
    store.create_page("Home", None).expect("create page");
    let button = store
        .append_element(Element::new(ElementKind::Button))
        .expect("add button");

    let mut engine = PlacementEngine::new();

    // Cancelled gesture: nothing inserted.
    engine.begin_drag(text("a"));
    engine.hover(DropTarget::root());
    engine.cancel();
    assert_eq!(store.current_page().expect("page").element_count(), 1);

    // Invalid target: inserted at root, exactly once.
    engine.begin_drag(text("b"));
    engine.hover(DropTarget::inside(button, 0));
    let outcome = engine.commit(&mut store).expect("commit");
    assert!(matches!(outcome, DropOutcome::RootFallback(_)));
    assert_eq!(store.current_page().expect("page").element_count(), 2);

    // Drop outside all zones: nothing inserted.
    engine.begin_drag(text("c"));
    let outcome = engine.commit(&mut store).expect("commit");
    assert_eq!(outcome, DropOutcome::Cancelled);
    assert_eq!(store.current_page().expect("page").element_count(), 2);
}

#[test]
fn test_preview_mode_freezes_canvas_but_not_api() {
    let mut store = DocumentStore::new();
    store.create_page("Home", None).expect("create page");
    store.set_preview_device(PreviewDevice::Mobile);
    store.set_preview(true);

    let mut engine = PlacementEngine::new();
    engine.begin_drag(text("blocked"));
    engine.hover(DropTarget::root());
    assert_eq!(engine.commit(&mut store).expect("commit"), DropOutcome::Cancelled);
    assert_eq!(
        PlacementEngine::click_insert(&mut store, text("blocked")).expect("click"),
        DropOutcome::Cancelled
    );
    assert!(store.current_page().expect("page").elements.is_empty());

    // The programmatic surface stays live while previewing.
    store.append_element(text("api")).expect("append");
    assert_eq!(store.current_page().expect("page").elements.len(), 1);

    store.toggle_preview();
    assert_eq!(
        store.editor().preview_device(),
        PreviewDevice::Mobile,
        "device hint survives leaving preview"
    );
    let outcome = PlacementEngine::click_insert(&mut store, text("works")).expect("click");
    assert!(matches!(outcome, DropOutcome::Placed(_)));
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn test_template_instances_are_isolated() {
    let mut store = DocumentStore::new();
    store.create_page("A", Some("landing")).expect("create");
    let page_a = store.current_page().expect("page").id;
    store.create_page("B", Some("landing")).expect("create");

    // Mutate page B's header; page A must be unaffected.
    let b_header = store.current_page().expect("page").elements[0].id;
    store
        .update_element(b_header, ElementPatch::new().with_content("title", "Changed"))
        .expect("update");

    store.load_page(page_a);
    let a_header = &store.current_page().expect("page").elements[0];
    assert_eq!(a_header.content["title"], "Your Company");
}

#[test]
fn test_duplicated_page_is_isolated_from_original() {
    let mut store = DocumentStore::new();
    store.create_page("Home", Some("landing")).expect("create");
    let original = store.current_page().expect("page").id;
    let copy = store.duplicate_page(original).expect("duplicate");

    store.load_page(copy);
    let copy_header = store.current_page().expect("page").elements[0].id;
    store.delete_element(copy_header).expect("delete");

    store.load_page(original);
    assert_eq!(
        store.current_page().expect("page").elements[0].kind,
        ElementKind::Header,
        "original keeps its header"
    );
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_selection_follows_weak_reference_semantics() {
    let mut store = DocumentStore::new();
    store.create_page("Home", None).expect("create page");
    let id = store.append_element(text("sel")).expect("add");

    store.select_element(Some(id));
    assert_eq!(store.selected_element().expect("selected").id, id);

    store.delete_element(id).expect("delete");
    assert!(store.selected_element().is_none());

    // Selecting a stale ID reads back as no selection.
    store.select_element(Some(id));
    assert!(store.selected_element().is_none());
}
