//! Error types for builder operations.

use thiserror::Error;

/// Result type for builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur in builder operations.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Referenced element does not exist in the current page's tree.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Referenced page does not exist in the document store.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Referenced template key is not in the catalog.
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Referenced version snapshot does not exist on the current page.
    #[error("Version not found: {0}")]
    VersionNotFound(String),

    /// An element operation was attempted with no page loaded.
    #[error("No page is currently loaded")]
    NoCurrentPage,

    /// A hovered drop target exists but cannot accept children.
    ///
    /// Raised and consumed inside the placement engine, which downgrades
    /// the commit to a root append; store operations report missing and
    /// unusable parents alike as [`Self::ElementNotFound`].
    #[error("Invalid drop target: {0}")]
    InvalidTarget(String),

    /// Page serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
