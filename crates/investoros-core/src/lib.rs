pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "underwriting")]
pub mod underwriting;

pub use error::{FieldViolation, UnderwritingError};
pub use types::*;

/// Standard result type for all investoros operations
pub type CoreResult<T> = Result<T, UnderwritingError>;
