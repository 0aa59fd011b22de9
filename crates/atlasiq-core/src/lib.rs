pub mod error;
pub mod statements;
pub mod types;

#[cfg(feature = "risk")]
pub mod config;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "normalization")]
pub mod normalization;

pub use error::AtlasError;
pub use types::*;

/// Standard result type for all AtlasIQ operations
pub type AtlasResult<T> = Result<T, AtlasError>;
