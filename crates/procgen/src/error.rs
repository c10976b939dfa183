//! Errors raised while validating a grass field configuration.

use thiserror::Error;

/// A grass field configuration that violates a builder precondition.
/// Nothing is generated when this is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("blade count must be greater than zero")]
    ZeroBlades,
    #[error("blade count {count} exceeds the maximum of {max} (indices and draw ranges are 32-bit)")]
    TooManyBlades { count: u32, max: u32 },
    #[error("{name} must be greater than zero, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("height variation must not be negative, got {0}")]
    NegativeHeightVariation(f32),
}
