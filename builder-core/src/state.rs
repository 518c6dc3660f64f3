//! Editor state - selection, preview mode, and the active side panel.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Device width hint used when previewing a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewDevice {
    /// Full-width desktop viewport.
    #[default]
    Desktop,
    /// Tablet-width viewport.
    Tablet,
    /// Phone-width viewport.
    Mobile,
}

impl PreviewDevice {
    /// Canvas width in CSS pixels for this device.
    #[must_use]
    pub const fn width_px(self) -> u32 {
        match self {
            Self::Desktop => 1280,
            Self::Tablet => 768,
            Self::Mobile => 375,
        }
    }
}

/// Side panels of the builder UI.
///
/// Tracked here because panel state shares the editor state container; it
/// never affects the document model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    /// Component palette.
    Elements,
    /// Layer tree view.
    Layers,
    /// Page settings (name, slug, template).
    Settings,
    /// SEO metadata editor.
    Seo,
    /// Custom CSS/JS editor.
    Code,
}

/// Selection and preview state for the current editing session.
///
/// The selection is a weak reference: only the element ID is stored, and
/// lookups go through the live tree, so deleting the element invalidates the
/// selection without extra bookkeeping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorState {
    selected_element: Option<ElementId>,
    preview_device: PreviewDevice,
    preview_enabled: bool,
    active_panel: Option<Panel>,
}

impl EditorState {
    /// Create a fresh editor state: nothing selected, desktop, editing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected element ID, if any.
    #[must_use]
    pub const fn selected_element(&self) -> Option<ElementId> {
        self.selected_element
    }

    /// Select an element by ID, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.selected_element = id;
    }

    /// Clear the selection if it points at the given ID.
    pub fn deselect_if(&mut self, id: ElementId) {
        if self.selected_element == Some(id) {
            self.selected_element = None;
        }
    }

    /// The active preview device.
    #[must_use]
    pub const fn preview_device(&self) -> PreviewDevice {
        self.preview_device
    }

    /// Set the preview device. A pure rendering hint; legal at any time.
    pub fn set_preview_device(&mut self, device: PreviewDevice) {
        self.preview_device = device;
    }

    /// Whether preview mode is active.
    #[must_use]
    pub const fn is_preview(&self) -> bool {
        self.preview_enabled
    }

    /// Enable or disable preview mode.
    pub fn set_preview(&mut self, enabled: bool) {
        self.preview_enabled = enabled;
    }

    /// Toggle preview mode, returning the new value.
    pub fn toggle_preview(&mut self) -> bool {
        self.preview_enabled = !self.preview_enabled;
        self.preview_enabled
    }

    /// Whether canvas-originated mutations are currently allowed.
    ///
    /// Preview mode gates drops and click-inserts; programmatic store calls
    /// are never gated.
    #[must_use]
    pub const fn can_edit_canvas(&self) -> bool {
        !self.preview_enabled
    }

    /// The open side panel, if any.
    #[must_use]
    pub const fn active_panel(&self) -> Option<Panel> {
        self.active_panel
    }

    /// Open a side panel, or close all with `None`.
    pub fn set_active_panel(&mut self, panel: Option<Panel>) {
        self.active_panel = panel;
    }
}
