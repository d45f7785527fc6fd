//! Error types for member resolution and invocation.
//!
//! `EvalErrorKind` is the typed failure category. Factory functions
//! (`not_found()`, `ambiguous()`, ...) are the construction API; the engine
//! attaches the node identity and the target's runtime type afterwards with
//! `at()` and `on()`.

use std::fmt;

use lumen_ir::ExprId;
use lumen_types::Value;
use thiserror::Error;

/// Result of evaluation.
pub type EvalResult = Result<Value, EvalError>;

/// Typed failure category.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    /// No candidate for the member name and arity.
    #[error("no member `{member}` accepting {arguments}")]
    NotFound { member: String, arguments: String },

    /// More than one candidate shares the best score.
    #[error("ambiguous reference to `{member}`: {} match equally well", candidates.join(", "))]
    Ambiguous {
        member: String,
        candidates: Vec<String>,
    },

    /// A candidate exists but is not visible.
    #[error("`{member}` is not accessible")]
    AccessDenied { member: String },

    /// An argument cannot be converted to the parameter it was matched to.
    #[error("cannot convert {from} to {to}")]
    Conversion { from: String, to: String },

    /// The member body itself failed.
    #[error("invocation failed: {message}")]
    InvocationTarget { message: String },

    /// A constructor or `instanceof` names a type the registry does not know.
    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    /// Member access on `null`.
    #[error("cannot access `{member}` on null")]
    NullTarget { member: String },
}

/// Evaluation error with diagnostic context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// The expression node being evaluated.
    pub node: Option<ExprId>,
    /// Name of the target's runtime type.
    pub target_type: Option<String>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        Self {
            kind,
            node: None,
            target_type: None,
        }
    }

    /// Attach the node identity, keeping an innermost one already set.
    #[must_use]
    pub fn at(mut self, node: ExprId) -> Self {
        self.node.get_or_insert(node);
        self
    }

    /// Attach the target's runtime type, keeping one already set.
    #[must_use]
    pub fn on(mut self, target_type: &str) -> Self {
        if self.target_type.is_none() {
            self.target_type = Some(target_type.to_owned());
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        match (&self.target_type, self.node) {
            (Some(ty), Some(node)) => write!(f, " (on {ty} at {node})"),
            (Some(ty), None) => write!(f, " (on {ty})"),
            (None, Some(node)) => write!(f, " (at {node})"),
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for EvalError {}

// Factories

#[cold]
pub fn not_found(member: &str, arguments: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotFound {
        member: member.to_owned(),
        arguments: arguments.to_owned(),
    })
}

#[cold]
pub fn ambiguous(member: &str, candidates: Vec<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Ambiguous {
        member: member.to_owned(),
        candidates,
    })
}

#[cold]
pub fn access_denied(member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AccessDenied {
        member: member.to_owned(),
    })
}

#[cold]
pub fn conversion_failed(from: &str, to: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Conversion {
        from: from.to_owned(),
        to: to.to_owned(),
    })
}

#[cold]
pub fn invocation_failed(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvocationTarget {
        message: message.into(),
    })
}

#[cold]
pub fn unknown_type(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnknownType {
        name: name.to_owned(),
    })
}

#[cold]
pub fn null_target(member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NullTarget {
        member: member.to_owned(),
    })
}
