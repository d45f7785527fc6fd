//! Lumen Eval - member resolution and invocation for the Lumen expression
//! evaluator.
//!
//! Given a member access node, a runtime target and argument values, the
//! engine finds the member to call, converts the arguments and invokes it:
//!
//! - `resolvers`: the candidate-gathering chain (direct lookup, indexers,
//!   functional-interface fallback, host resolvers)
//! - `Engine`: scores candidates by conversion cost and selects the unique
//!   best one
//! - `InvocationCache`: per-node memo of resolved invokers, keyed by the
//!   runtime type fingerprint
//! - `Expression`: an expression tree plus its cache, evaluated against an
//!   `EvaluationContext`

mod builder;
mod cache;
mod candidate;
mod context;
mod convert;
mod engine;
pub mod errors;
mod expression;
mod invoker;
pub mod resolvers;

use std::sync::Once;

pub use builder::EngineBuilder;
pub use cache::{CacheKey, CacheStats, InvocationCache};
pub use candidate::{
    arity_matches, CandidateDisplay, CandidateMember, ElementAccess, MemberBinding, MemberKind,
};
pub use context::EvaluationContext;
pub use convert::{
    Conversion, ConversionKind, TypeConverter, BOXING, EXACT, SUPERTYPE, TEXT_PARSE, VARARGS, WIDENING,
};
pub use engine::{Engine, MemberAccess, Resolution};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use expression::Expression;
pub use invoker::{ConversionPlan, ResolvedInvoker};
pub use resolvers::{FunctionalFallback, LookupRequest, MemberResolver};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and only the first call has any
/// effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
