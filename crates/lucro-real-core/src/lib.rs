pub mod business;
pub mod config;
pub mod error;
pub mod format;
pub mod metrics;
pub mod snapshot;
pub mod types;

#[cfg(feature = "alerts")]
pub mod alerts;

#[cfg(feature = "analysis")]
pub mod analysis;

#[cfg(all(feature = "alerts", feature = "analysis"))]
pub mod diagnosis;

#[cfg(feature = "intake")]
pub mod intake;

#[cfg(feature = "levels")]
pub mod levels;

pub use error::LucroRealError;
pub use types::*;

/// Standard result type for all lucro-real operations
pub type LucroRealResult<T> = Result<T, LucroRealError>;
