pub mod comparison;
pub mod error;
pub mod lease;
pub mod loan;
pub mod time_value;
pub mod types;

mod validation;

#[cfg(feature = "rates")]
pub mod rates;

#[cfg(feature = "assistant")]
pub mod assistant;

pub use error::AutoDealError;
pub use validation::MAX_TERM_MONTHS;
pub use types::*;

/// Standard result type for all autodeal operations
pub type AutoDealResult<T> = Result<T, AutoDealError>;
