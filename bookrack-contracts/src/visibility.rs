//! Policy deciding which document fields are exposed.

use thiserror::Error;

/// Failure while asking a policy whether a field may be shown.
///
/// Callers treat every error as "not visible".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VisibilityError {
    /// The policy has no entry for the field.
    #[error("unknown display field: {0}")]
    UnknownField(String),
}

/// Decides which document fields are exposed to clients.
pub trait FieldVisibility: Send + Sync {
    /// `field` uses catalog lookup keys such as `authors`, `#pages`, or
    /// `pubdate`.
    fn is_visible(&self, field: &str) -> Result<bool, VisibilityError>;

    /// Collapses policy errors to hidden.
    fn shows(&self, field: &str) -> bool {
        self.is_visible(field).unwrap_or(false)
    }
}

impl<T: FieldVisibility + ?Sized> FieldVisibility for std::sync::Arc<T> {
    fn is_visible(&self, field: &str) -> Result<bool, VisibilityError> {
        (**self).is_visible(field)
    }
}
