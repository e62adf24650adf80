//! Domain types shared across Faceless.
//!
//! The domain layer provides:
//! - **Error types** ([`FacelessError`], [`ProducerError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, FacelessError>`]:
//!
//! ```rust,no_run
//! use faceless::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = faceless::config::load_config("faceless.toml")?;
//!     config.anonymization.validate()?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{FacelessError, ProducerError};
pub use result::Result;
