//! Top-level error wrapper types.

use crate::{ConfigError, StoreError};

/// Foundation error enum for the Laurel workspace.
///
/// # Examples
///
/// ```
/// use laurel_error::{ConfigError, LaurelError};
///
/// let config_err = ConfigError::new("missing token");
/// let err: LaurelError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum LaurelErrorKind {
    /// Store error
    #[from(StoreError)]
    Store(StoreError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Laurel error with kind discrimination.
///
/// # Examples
///
/// ```
/// use laurel_error::{ConfigError, LaurelResult};
///
/// fn might_fail() -> LaurelResult<()> {
///     Err(ConfigError::new("missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Laurel Error: {}", _0)]
pub struct LaurelError(Box<LaurelErrorKind>);

impl LaurelError {
    /// Create a new error from a kind.
    pub fn new(kind: LaurelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LaurelErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to LaurelErrorKind
impl<T> From<T> for LaurelError
where
    T: Into<LaurelErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Laurel operations.
///
/// # Examples
///
/// ```
/// use laurel_error::{LaurelResult, StoreError, StoreErrorKind};
///
/// fn write_file() -> LaurelResult<()> {
///     Err(StoreError::new(StoreErrorKind::FileWrite("read-only".to_string())))?
/// }
/// ```
pub type LaurelResult<T> = std::result::Result<T, LaurelError>;
