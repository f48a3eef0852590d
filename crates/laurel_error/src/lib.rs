//! Error types for the Laurel testimonial bot.
//!
//! This crate provides the foundation error types used throughout the Laurel workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use laurel_error::{ConfigError, LaurelResult};
//!
//! fn read_token() -> LaurelResult<String> {
//!     Err(ConfigError::new("DISCORD_TOKEN is not set"))?
//! }
//!
//! match read_token() {
//!     Ok(token) => println!("Got token of length {}", token.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod store;

pub use config::ConfigError;
pub use error::{LaurelError, LaurelErrorKind, LaurelResult};
pub use store::{StoreError, StoreErrorKind};
