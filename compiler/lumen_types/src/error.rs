//! Errors raised by host code and by type definition.

use thiserror::Error;

/// Failure raised by a native member body.
///
/// This is the host-side "exception": the engine wraps it into an
/// invocation-target error carrying the node and target type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The body was invoked on a receiver of the wrong representation.
    pub fn unexpected_receiver(expected: &str) -> Self {
        Self::new(format!("receiver is not a {expected}"))
    }

    /// An argument did not have the representation the body expects.
    pub fn unexpected_argument(index: usize, expected: &str) -> Self {
        Self::new(format!("argument {index} is not a {expected}"))
    }
}

/// Failure while defining a class against the registry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("`{0}` is not an interface")]
    NotAnInterface(String),
    #[error("`{name}` declares {count} abstract methods, expected exactly one")]
    NotFunctional { name: String, count: usize },
}
