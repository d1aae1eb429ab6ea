/// Library core errors
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Library core error types
///
/// Per-row write failures during an import are not errors at this
/// level; they land inside the `ImportReport`. Only failures outside
/// any single row's scope (loading the existing library, counting
/// entries) surface here.
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Underlying storage failure
    #[error(transparent)]
    Storage(#[from] soundmark_storage::StorageError),
}
