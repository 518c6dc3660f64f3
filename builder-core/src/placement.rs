//! # Placement engine
//!
//! Resolves drag-and-drop and click-to-insert gestures into tree mutations.
//!
//! A drag gesture is an explicit state machine rather than scattered event
//! handlers, so cancellation and fallback behavior are testable without any
//! UI toolkit:
//!
//! ```text
//! Idle --begin_drag--> Dragging --hover--> Hovering --commit--> Idle
//!   ^                     |                   |  ^____hover____/
//!   \____cancel / commit-without-target______/
//! ```
//!
//! A drop on a target that cannot nest children is downgraded to a root
//! append rather than surfaced as an error: a drag gesture must never lose
//! the dragged element. Click-to-insert skips the drag states entirely and
//! always appends to the root sequence; that asymmetry with drag targeting
//! is intentional.

use serde::{Deserialize, Serialize};

use crate::{BuilderError, BuilderResult, DocumentStore, Element, ElementId};

/// A candidate drop location: a parent (or the root sequence) plus an
/// insertion index within it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    /// Target container, or `None` for the page's root sequence.
    pub parent: Option<ElementId>,
    /// Insertion index; omitted or out-of-bounds appends.
    pub index: Option<usize>,
}

impl DropTarget {
    /// The root sequence, appending.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            parent: None,
            index: None,
        }
    }

    /// Inside a container at the given index.
    #[must_use]
    pub const fn inside(parent: ElementId, index: usize) -> Self {
        Self {
            parent: Some(parent),
            index: Some(index),
        }
    }
}

/// Phase of the current drag gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No gesture in flight.
    #[default]
    Idle,
    /// A payload is being dragged but no drop zone is hovered.
    Dragging {
        /// The element literal that will be inserted on commit.
        payload: Element,
    },
    /// A payload is being dragged over a candidate drop zone.
    Hovering {
        /// The element literal that will be inserted on commit.
        payload: Element,
        /// The most recent candidate target (last write wins).
        target: DropTarget,
    },
}

/// Outcome of committing a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// The payload was inserted at the hovered target.
    Placed(ElementId),
    /// The hovered target was invalid; the payload was appended to the
    /// page's root sequence instead.
    RootFallback(ElementId),
    /// Nothing was inserted: no gesture in flight, no hovered zone at
    /// commit time, or preview mode is active.
    Cancelled,
}

/// State machine over a single drag gesture.
///
/// The engine owns no document state; commits go through
/// [`DocumentStore::add_element`], and preview mode rejects commits before
/// any mutation happens.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    state: DragState,
}

impl PlacementEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current gesture phase.
    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether a gesture is in flight.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    /// Start dragging a payload (from the palette or the template browser).
    ///
    /// A gesture already in flight is discarded: pointer-down supersedes
    /// whatever came before it.
    pub fn begin_drag(&mut self, payload: Element) {
        if self.is_dragging() {
            tracing::debug!("Discarding stale drag gesture");
        }
        self.state = DragState::Dragging { payload };
    }

    /// Record the pointer crossing a candidate drop zone.
    ///
    /// Recomputed continuously while dragging; the last hover wins. Ignored
    /// when no gesture is in flight.
    pub fn hover(&mut self, target: DropTarget) {
        self.state = match std::mem::take(&mut self.state) {
            DragState::Idle => DragState::Idle,
            DragState::Dragging { payload } | DragState::Hovering { payload, .. } => {
                DragState::Hovering { payload, target }
            }
        };
    }

    /// Record the pointer leaving all drop zones without ending the drag.
    pub fn hover_none(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            DragState::Idle => DragState::Idle,
            DragState::Dragging { payload } | DragState::Hovering { payload, .. } => {
                DragState::Dragging { payload }
            }
        };
    }

    /// Cancel the gesture (escape key, drop outside the canvas). No
    /// mutation occurs.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Commit the gesture on pointer-up.
    ///
    /// From `Hovering`, inserts the payload at the target, falling back to a
    /// root append when the target is missing or cannot nest children. From
    /// `Dragging` (no zone hovered) or `Idle`, nothing is inserted. Preview
    /// mode rejects the commit outright. The engine returns to idle in every
    /// case.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] if no page is loaded; the
    /// payload is dropped in that case.
    pub fn commit(&mut self, store: &mut DocumentStore) -> BuilderResult<DropOutcome> {
        let state = std::mem::take(&mut self.state);
        let DragState::Hovering { payload, target } = state else {
            return Ok(DropOutcome::Cancelled);
        };
        if !store.editor().can_edit_canvas() {
            tracing::debug!("Drop rejected: preview mode is active");
            return Ok(DropOutcome::Cancelled);
        }

        match validate_target(store, target) {
            Ok(()) => {
                let id = store.add_element(payload, target.parent, target.index)?;
                Ok(DropOutcome::Placed(id))
            }
            Err(BuilderError::ElementNotFound(_) | BuilderError::InvalidTarget(_)) => {
                // Never lose a drag gesture: downgrade to a root append.
                tracing::debug!("Invalid drop target, appending to root");
                let id = store.append_element(payload)?;
                Ok(DropOutcome::RootFallback(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Insert a payload via a palette click, with no drag gesture.
    ///
    /// The degenerate path: always appends to the page's root sequence,
    /// never targets nested containers. Preview mode rejects the insert.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::NoCurrentPage`] if no page is loaded.
    pub fn click_insert(
        store: &mut DocumentStore,
        payload: Element,
    ) -> BuilderResult<DropOutcome> {
        if !store.editor().can_edit_canvas() {
            tracing::debug!("Click-insert rejected: preview mode is active");
            return Ok(DropOutcome::Cancelled);
        }
        let id = store.append_element(payload)?;
        Ok(DropOutcome::Placed(id))
    }
}

/// Check that a hovered target can receive a dropped payload.
///
/// The exists-but-cannot-nest case is reported as
/// [`BuilderError::InvalidTarget`]; it never leaves this module, since
/// [`PlacementEngine::commit`] downgrades it to a root append.
fn validate_target(store: &DocumentStore, target: DropTarget) -> BuilderResult<()> {
    let Some(parent_id) = target.parent else {
        return Ok(());
    };
    let parent = store
        .find_element(parent_id)
        .ok_or_else(|| BuilderError::ElementNotFound(parent_id.to_string()))?;
    if parent.is_container() {
        Ok(())
    } else {
        Err(BuilderError::InvalidTarget(parent_id.to_string()))
    }
}
