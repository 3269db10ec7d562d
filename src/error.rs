use thiserror::Error;

/// Top-level error type for the trigon geometry core.
#[derive(Debug, Error)]
pub enum TrigonError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    PolyFile(#[from] PolyFileError),
}

impl TrigonError {
    /// Returns `true` if the error was caused by the caller's input rather
    /// than by the solver or the environment.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Geometry(_))
    }
}

/// Input rejected before it reaches the solver.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("at least {required} points are required, got {found}")]
    TooFewPoints { required: usize, found: usize },

    #[error("segment {segment} references point {index}, but only {len} points exist")]
    SegmentOutOfRange {
        segment: usize,
        index: usize,
        len: usize,
    },

    #[error("point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("no triangulated mesh is available")]
    EmptyMesh,

    #[error("session not found")]
    SessionNotFound,
}

/// Failures reported by the triangulation solver.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver failed: {0}")]
    Failed(String),

    #[error("out of memory while marshalling solver buffers: {0}")]
    ResourceExhausted(String),
}

/// Errors related to geometric degeneracies.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while reading a `.poly` file.
#[derive(Debug, Error)]
pub enum PolyFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("unexpected end of file while reading {expected}")]
    UnexpectedEof { expected: &'static str },
}

/// Convenience type alias for results using [`TrigonError`].
pub type Result<T> = std::result::Result<T, TrigonError>;
