pub mod calculator;
pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "lending")]
pub mod lending;

#[cfg(feature = "real_assets")]
pub mod real_assets;

#[cfg(feature = "wealth")]
pub mod wealth;

pub use calculator::Calculator;
pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
