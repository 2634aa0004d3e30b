//! Error types for the recommendation core.

pub type Result<T> = std::result::Result<T, RecommendError>;

/// Errors surfaced by the recommendation pipeline.
///
/// Numeric edge cases (zero-norm vectors, items with no similarity support)
/// are handled locally with epsilon guards or by exclusion and never appear
/// here; these variants cover conditions the caller has to decide about.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// Malformed or empty input during matrix construction.
    #[error("invalid rating data: {0}")]
    Data(String),

    /// Target user has no rows in the interaction matrix. Cold-start
    /// fallback (e.g. the popularity ranking) is the caller's decision.
    #[error("unknown user: {0}")]
    UnknownUser(u32),

    /// Evaluation cannot produce a meaningful metric.
    #[error("insufficient data for evaluation: {0}")]
    InsufficientData(String),
}
