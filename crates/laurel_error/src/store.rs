//! Store error types.

/// Kinds of store errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Failed to create the data directory
    #[display("Failed to create data directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write the store file
    #[display("Failed to write store file: {}", _0)]
    FileWrite(String),
    /// Failed to read the store file
    #[display("Failed to read store file: {}", _0)]
    FileRead(String),
    /// Failed to serialize store contents
    #[display("Failed to serialize store contents: {}", _0)]
    Serialize(String),
    /// Invalid store path
    #[display("Invalid store path: {}", _0)]
    InvalidPath(String),
}

/// Store error with location tracking.
///
/// # Examples
///
/// ```
/// use laurel_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::FileWrite("disk full".to_string()));
/// assert!(format!("{}", err).contains("disk full"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
