//! Data models for the back-office client
//!
//! - `types`: typed mirrors of the POS service resources
//! - `errors`: centralized error handling with unique error codes

pub mod errors;
pub mod types;

pub use errors::{AppError, AppResult, ErrorCode};
pub use types::*;
