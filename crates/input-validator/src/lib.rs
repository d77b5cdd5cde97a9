//! Input Validation
//!
//! Range checking for the numeric fields of a car specification before it
//! reaches the price model.

mod error;
mod validator;

pub use error::{RangeConfigError, ValidationError};
pub use validator::{ValidationConfig, ValidationResult, Validator};
