//! Candidate members produced by resolvers.

use std::fmt;

use lumen_ir::StringInterner;
use lumen_types::{display_params, ClassRef, TypeShape};

/// What a member access node asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Property,
    Constructor,
    Indexer,
}

/// Built-in element access on collection-like values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementAccess {
    /// Arrays and lists, integral index.
    Sequence,
    /// Maps, text key.
    Map,
    /// Strings, integral index yielding a `char`.
    Text,
}

/// How an invoker reaches the member once it is selected.
#[derive(Clone)]
pub enum MemberBinding {
    /// Method `index` of the declaring class.
    Method(usize),
    /// Interface method reached through the implementing class's method
    /// `index`, which may be synthetic.
    Virtual { implementor: ClassRef, index: usize },
    /// Field `index` of the declaring class.
    Field(usize),
    /// Constructor `index` of the declaring class.
    Constructor(usize),
    Element(ElementAccess),
}

/// A member considered as a possible match for a node.
#[derive(Clone)]
pub struct CandidateMember {
    pub kind: MemberKind,
    pub declaring: ClassRef,
    pub params: Vec<TypeShape>,
    /// The last parameter is an array accepting zero or more arguments.
    pub varargs: bool,
    pub accessible: bool,
    pub binding: MemberBinding,
}

impl CandidateMember {
    /// Whether this candidate can take `argc` arguments.
    pub fn accepts_arity(&self, argc: usize) -> bool {
        arity_matches(self.params.len(), self.varargs, argc)
    }

    /// Whether the definition this candidate was bound against has been
    /// replaced or unloaded.
    pub fn is_stale(&self) -> bool {
        self.declaring.is_retired()
            || matches!(&self.binding, MemberBinding::Virtual { implementor, .. } if implementor.is_retired())
    }

    /// The member's display name.
    pub fn member_name(&self, interner: &StringInterner) -> String {
        let declaring = &self.declaring;
        match &self.binding {
            MemberBinding::Method(i) => declaring
                .method(*i)
                .map_or_else(String::new, |m| interner.lookup(m.name).to_owned()),
            MemberBinding::Virtual { implementor, index } => implementor
                .method(*index)
                .map_or_else(String::new, |m| interner.lookup(m.name).to_owned()),
            MemberBinding::Field(i) => declaring
                .field(*i)
                .map_or_else(String::new, |f| interner.lookup(f.name).to_owned()),
            MemberBinding::Constructor(_) => "<init>".to_owned(),
            MemberBinding::Element(_) => "[]".to_owned(),
        }
    }

    /// Render as `Declaring.member(params)` for diagnostics.
    pub fn describe<'a>(&'a self, interner: &'a StringInterner) -> CandidateDisplay<'a> {
        CandidateDisplay {
            candidate: self,
            interner,
        }
    }
}

impl fmt::Debug for CandidateMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateMember")
            .field("kind", &self.kind)
            .field("declaring", &self.declaring.name())
            .field("params", &self.params)
            .field("varargs", &self.varargs)
            .field("accessible", &self.accessible)
            .finish_non_exhaustive()
    }
}

/// Helper for displaying a `CandidateMember` with resolved names.
pub struct CandidateDisplay<'a> {
    candidate: &'a CandidateMember,
    interner: &'a StringInterner,
}

impl fmt::Display for CandidateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.candidate;
        let declaring = self.interner.lookup(c.declaring.name());
        let member = c.member_name(self.interner);
        match c.kind {
            MemberKind::Property if matches!(c.binding, MemberBinding::Field(_)) => {
                write!(f, "{declaring}.{member}")
            }
            _ => write!(
                f,
                "{declaring}.{member}{}",
                display_params(&c.params, self.interner)
            ),
        }
    }
}

/// Arity check accounting for a trailing variadic parameter.
pub fn arity_matches(params: usize, varargs: bool, argc: usize) -> bool {
    if varargs && params > 0 {
        argc >= params - 1
    } else {
        argc == params
    }
}
