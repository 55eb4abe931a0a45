//! Listing Data Validation
//!
//! Checks raw listing fields (entity keys, coordinates, reporting months) at
//! the table-loading boundary. Errors carry the row and entity they came from.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{RowContext, ValidationConfig, Validator};
