//! Error types for the `backdrop-quality` crate.
//!
//! Only construction can fail. Once a governor exists, frame hooks and
//! settings polls are infallible.

/// Errors raised while building a quality governor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QualityError {
    /// The tier list, thresholds, or sampling parameters are unusable.
    #[error("invalid quality configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl QualityError {
    /// Shorthand for [`QualityError::InvalidConfig`].
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
