//! # Forgeline Builder Core
//!
//! Page document model and placement engine for the Forgeline drag-and-drop
//! site builder. The surrounding UI (sidebar, canvas, properties panel,
//! toolbar) renders from this model and routes every mutation through it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                builder-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Document Store  │  Placement Engine        │
//! │  - Pages         │  - Drag state machine    │
//! │  - Element tree  │  - Drop target rules     │
//! │  - Versions      │  - Root-append fallback  │
//! ├─────────────────────────────────────────────┤
//! │  Editor State    │  Template Catalog        │
//! │  - Selection     │  - Named subtrees        │
//! │  - Preview mode  │  - Fresh-ID expansion    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Templates or the component palette produce [`Element`] literals, the
//! [`PlacementEngine`] resolves a gesture against the current page's tree,
//! and the [`DocumentStore`] commits the mutation. Renderers walk the tree
//! to paint the canvas; they never mutate it directly.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod element;
pub mod error;
pub mod page;
pub mod placement;
pub mod state;
pub mod store;
pub mod template;

pub use element::{Element, ElementId, ElementKind, ElementPatch};
pub use error::{BuilderError, BuilderResult};
pub use page::{Page, PageId, PageVersion, SeoMeta};
pub use placement::{DragState, DropOutcome, DropTarget, PlacementEngine};
pub use state::{EditorState, Panel, PreviewDevice};
pub use store::DocumentStore;
pub use template::{Template, TemplateCatalog};

/// Builder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
