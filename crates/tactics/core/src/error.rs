//! Error types of the pure core.
//!
//! Domain failures (no selection, no position, tier none) are data, not
//! errors. The only error here rejects configuration in strict mode.

/// Configuration rejected by [`crate::TacticsConfig::validate`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} is out of range (got {value})")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("inconsistent configuration: {reason}")]
    Inconsistent { reason: &'static str },
}
