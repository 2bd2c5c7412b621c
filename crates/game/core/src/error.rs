//! Common error infrastructure for game-core.
//!
//! Business-rule rejections (insufficient currency, max level, invalid target)
//! are returned as plain outcome values by the subsystems that produce them.
//! The error types in this crate cover the remaining cases: malformed
//! configuration and actions that cannot be executed against the current
//! battle state.
//!
//! Every error enum implements [`GameError`] so callers can classify failures
//! uniformly without matching on concrete variants.

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Ask for another command; nothing changed (target already defeated,
    /// item not usable in battle).
    Recoverable,
    /// The input is malformed and will fail again unchanged (target index
    /// out of range, probability outside `[0, 1]`).
    Validation,
    /// The engine reached a state it should never reach.
    Internal,
    /// The session cannot continue.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Internal and fatal errors point at a bug rather than bad input.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Classification shared by every error enum in this crate.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs and clients. Defaults to the type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while validating a [`crate::GameConfig`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} bounds are inverted: min {min} > max {max}")]
    InvertedBounds {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("enemy policy weights must not all be zero")]
    EmptyPolicy,
}

impl GameError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ProbabilityOutOfRange { .. } => "CONFIG_PROBABILITY_OUT_OF_RANGE",
            Self::InvertedBounds { .. } => "CONFIG_INVERTED_BOUNDS",
            Self::NotPositive { .. } => "CONFIG_NOT_POSITIVE",
            Self::EmptyPolicy => "CONFIG_EMPTY_POLICY",
        }
    }
}
