pub mod cache;
pub mod contributions;
pub mod eligibility;
pub mod error;
pub mod evaluation;
pub mod metrics;
pub mod types;

pub use error::GroupnestError;
pub use types::*;

/// Standard result type for all groupnest operations
pub type GroupnestResult<T> = Result<T, GroupnestError>;
