use crate::coordinator::CoordinatorState;

#[derive(Debug)]
pub enum HistError {
    /// Worker pool size was zero.
    InvalidWorkerCount(usize),
    /// Block size was zero.
    InvalidBlockSize(usize),
    /// First failure observed on the input stream, passed through untouched.
    Io(std::io::Error),
    /// A worker thread terminated without reporting an outcome. Needs
    /// unwinding panics; under `panic = "abort"` the process ends instead.
    WorkerPanicked { worker: usize },
    /// The coordinator already reached a terminal state.
    Spent(CoordinatorState),
    Config(String),
}

impl From<std::io::Error> for HistError {
    fn from(e: std::io::Error) -> Self {
        HistError::Io(e)
    }
}

impl From<toml::de::Error> for HistError {
    fn from(e: toml::de::Error) -> Self {
        HistError::Config(e.to_string())
    }
}

impl std::fmt::Display for HistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistError::InvalidWorkerCount(n) => write!(f, "worker count must be at least 1 (got {})", n),
            HistError::InvalidBlockSize(n) => write!(f, "block size must be at least 1 (got {})", n),
            HistError::Io(e) => write!(f, "I/O error: {}", e),
            HistError::WorkerPanicked { worker } => write!(f, "worker {} exited without reporting", worker),
            HistError::Spent(state) => write!(f, "coordinator already {:?}", state),
            HistError::Config(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for HistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl HistError {
    /// True for argument errors raised before any worker was spawned.
    pub fn is_precondition(&self) -> bool {
        matches!(self, HistError::InvalidWorkerCount(_) | HistError::InvalidBlockSize(_))
    }

    /// The underlying stream error, if this build failed on I/O.
    pub fn as_io(&self) -> Option<&std::io::Error> {
        match self {
            HistError::Io(e) => Some(e),
            _ => None,
        }
    }
}

pub type HistResult<T> = Result<T, HistError>;
