use thiserror::Error;

/// Errors surfaced by the simulation pipeline.
///
/// Each variant is raised by the first stage that can observe the
/// violation; later stages never re-check or silently recover.
#[derive(Debug, Error)]
pub enum SimError {
    /// Physical parameters, solver options, or the time grid fall
    /// outside the accepted domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The trajectory has too few samples for interior-point analysis.
    #[error("trajectory of {len} samples is too short to analyze (need at least 3)")]
    EmptyTrajectory { len: usize },

    /// The trajectory never turns in one of the two directions, so no
    /// alternating schedule exists. Typical for heavy damping or a
    /// time span shorter than half an oscillation period.
    #[error("trajectory has {minima} minima and {maxima} maxima; need at least one of each")]
    InsufficientOscillation { minima: usize, maxima: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
