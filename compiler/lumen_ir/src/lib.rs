//! Lumen IR - names and expression trees for the Lumen expression evaluator.
//!
//! - `Name` / `StringInterner` / `SharedInterner`: interned identifiers
//! - `ExprArena` / `ExprId` / `ExprKind`: flat, immutable expression trees
//! - `ExprBuilder`: programmatic construction of trees

mod expr;
mod interner;
mod name;

pub use expr::{CallNode, ExprArena, ExprBuilder, ExprId, ExprKind, Literal};
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
