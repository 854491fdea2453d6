//! Error types for the scene bridge
//!
//! Failures raised by the renderer or by a node-operations implementation are
//! carried through unchanged. Disposal never produces an error: missing or
//! already-freed resources are treated as no-ops.

use std::fmt;

/// Result type for scene bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scene bridge errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Renderer/backend failure (draw call, resource release)
    BackendError(String),

    /// No constructor registered for an element tag
    UnknownElement(String),

    /// Node key does not refer to a live scene node
    InvalidNode(String),

    /// A node-operations call failed (create, insert, remove, patch)
    NodeOpsFailed(String),

    /// Operation not allowed in the current lifecycle state
    InvalidState(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::UnknownElement(tag) => write!(f, "Unknown element: {}", tag),
            Error::InvalidNode(msg) => write!(f, "Invalid node: {}", msg),
            Error::NodeOpsFailed(msg) => write!(f, "Node operation failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an [`Error`] and log it at ERROR severity with file:line.
///
/// ```ignore
/// return Err(bridge_err!("scenebridge::Catalogue", UnknownElement, "{}", tag));
/// ```
#[macro_export]
macro_rules! bridge_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::bridge_error!($source, "{}", message);
        $crate::scenebridge::Error::$variant(message)
    }};
}

/// Log and return an [`Error`] from the enclosing function.
#[macro_export]
macro_rules! bridge_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::bridge_err!($source, $variant, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
