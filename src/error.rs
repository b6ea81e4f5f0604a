//! Error types for the VRPTW engine.
//!
//! Route infeasibility is not an error: it is reported through
//! [`Reconstruction`](crate::feasibility::Reconstruction). The variants here
//! cover inputs the engine cannot work with at all.

/// Possible errors
#[derive(Debug, thiserror::Error)]
pub enum VrptwError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The instance is malformed (missing depot, no vehicles, bad windows...).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// A tunable is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Construction ran out of vehicles before every customer was routed.
    #[error("{} customer(s) could not be routed with the available fleet: {customers:?}", customers.len())]
    Unroutable { customers: Vec<usize> },

    /// A Solomon instance file could not be parsed.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type Result<T> = core::result::Result<T, VrptwError>;
