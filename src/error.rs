use std::fmt;

/// Name of the argument that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    A,
    B,
    N,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Param::A => "a",
            Param::B => "b",
            Param::N => "N",
        };
        f.write_str(name)
    }
}

/// Errors raised by the generator and its lifecycle handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FibonacciError {
    /// An argument is outside the range the generator accepts.
    #[error("invalid value for argument {param}")]
    InvalidArgument { param: Param },
    /// A term would exceed the configured bound.
    #[error("max integer exceeded at term {step} (bound {bound})")]
    RangeExceeded { step: u16, bound: u32 },
    /// The handle has been deinitialized.
    #[error("object has been deinitialized and can no longer be used")]
    Deinitialized,
}

impl FibonacciError {
    pub(crate) fn invalid(param: Param) -> Self {
        FibonacciError::InvalidArgument { param }
    }
}

pub type Result<T> = std::result::Result<T, FibonacciError>;
