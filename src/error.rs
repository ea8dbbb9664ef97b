//! Error types.
//!
//! - [`FitError`] is the library error: everything below `app` returns it.
//! - [`AppError`] is the binary-facing error: a message plus a process exit code.
//!
//! Exit codes used by the binary:
//! - `2`: usage / IO problems (bad flags, unreadable files)
//! - `3`: invalid data (empty dataset, wrong parameter count, bad noise level)
//! - `4`: computation failures (non-finite loss, singular system, minimizer error)

use argmin::core::ArgminError;

/// Failures of the fitting core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("dataset is empty; at least one (x, y) point is required")]
    EmptyDataset,

    #[error("model {model} expects {expected} parameters, got {actual}")]
    ParamCountMismatch {
        model: String,
        expected: usize,
        actual: usize,
    },

    #[error("non-finite {what} at index {index}: {value}")]
    NonFiniteInput {
        what: &'static str,
        index: usize,
        value: f64,
    },

    #[error("loss evaluated to a non-finite value ({value}) at params {params:?}")]
    NonFiniteLoss { value: f64, params: Vec<f64> },

    #[error("polynomial degree {degree} needs more than {degree} points, dataset has {n}")]
    DegreeTooHigh { degree: usize, n: usize },

    #[error("noise standard deviation must be finite and >= 0, got {sigma}")]
    InvalidNoise { sigma: f64 },

    #[error("invalid grid: {reason}")]
    InvalidGrid { reason: String },

    #[error("invalid fit options: {reason}")]
    InvalidOptions { reason: String },

    #[error("least-squares system is singular or ill-conditioned (n={n}, k={k})")]
    Singular { n: usize, k: usize },

    #[error("minimizer failed: {text}")]
    Minimizer { text: String },
}

impl FitError {
    /// Exit code used when this error reaches the binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::EmptyDataset
            | FitError::ParamCountMismatch { .. }
            | FitError::NonFiniteInput { .. }
            | FitError::DegreeTooHigh { .. }
            | FitError::InvalidNoise { .. } => 3,
            FitError::InvalidGrid { .. } | FitError::InvalidOptions { .. } => 2,
            FitError::NonFiniteLoss { .. } | FitError::Singular { .. } | FitError::Minimizer { .. } => 4,
        }
    }
}

impl From<argmin::core::Error> for FitError {
    fn from(err: argmin::core::Error) -> Self {
        // Errors raised by our own cost function travel through argmin boxed;
        // recover them so callers can match on the original variant.
        let err = match err.downcast::<FitError>() {
            Ok(fit_err) => return fit_err,
            Err(err) => err,
        };
        match err.downcast_ref::<ArgminError>() {
            Some(ArgminError::InvalidParameter { text }) => FitError::InvalidOptions {
                reason: text.clone(),
            },
            Some(other) => FitError::Minimizer {
                text: other.to_string(),
            },
            None => FitError::Minimizer {
                text: err.to_string(),
            },
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
