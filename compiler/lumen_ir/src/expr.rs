//! Flat expression trees.
//!
//! Expressions live in an `ExprArena` and refer to their children by
//! `ExprId`. An `ExprId` is the identity of a node: the invocation cache keys
//! on it, so it must stay stable for the lifetime of the parsed expression.
//! Nodes are immutable once allocated.

use std::fmt;

use crate::{Name, StringInterner};

/// Index into an expression arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Literal value embedded in an expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Str(Name),
}

/// Expression node kinds.
///
/// A missing `receiver` means the member is looked up on the context's root
/// object.
#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    /// `#root`
    Root,
    /// `#name`
    Variable(Name),
    /// `receiver.method(args...)`
    MethodCall {
        receiver: Option<ExprId>,
        method: Name,
        args: Vec<ExprId>,
    },
    /// `receiver.name`
    Property {
        receiver: Option<ExprId>,
        name: Name,
    },
    /// `new TypeName(args...)`
    Construct { type_name: Name, args: Vec<ExprId> },
    /// `receiver[index]`
    Index {
        receiver: Option<ExprId>,
        index: ExprId,
    },
    /// `operand instanceof T(TypeName)`
    InstanceOf { operand: ExprId, type_name: Name },
}

/// Borrowed view of a node that names a member: identity, member name and
/// ordered argument sub-expressions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CallNode<'a> {
    pub id: ExprId,
    pub member: Name,
    pub args: &'a [ExprId],
}

/// Owner of all nodes of one parsed expression.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExprArena {
    exprs: Vec<ExprKind>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node, returning its identity.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` nodes.
    pub fn alloc(&mut self, kind: ExprKind) -> ExprId {
        let id = match u32::try_from(self.exprs.len()) {
            Ok(id) => ExprId::new(id),
            Err(_) => panic!("expression arena exceeded u32::MAX nodes"),
        };
        self.exprs.push(kind);
        id
    }

    pub fn get(&self, id: ExprId) -> Option<&ExprKind> {
        self.exprs.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    /// The member-naming view of a node, if it names a member.
    ///
    /// Property and indexer nodes report no arguments of their own; the
    /// indexer's key is its single argument.
    pub fn call_node(&self, id: ExprId) -> Option<CallNode<'_>> {
        match self.get(id)? {
            ExprKind::MethodCall { method, args, .. } => Some(CallNode {
                id,
                member: *method,
                args,
            }),
            ExprKind::Construct { type_name, args } => Some(CallNode {
                id,
                member: *type_name,
                args,
            }),
            ExprKind::Property { name, .. } => Some(CallNode {
                id,
                member: *name,
                args: &[],
            }),
            ExprKind::Index { index, .. } => Some(CallNode {
                id,
                member: Name::EMPTY,
                args: std::slice::from_ref(index),
            }),
            ExprKind::Literal(_)
            | ExprKind::Root
            | ExprKind::Variable(_)
            | ExprKind::InstanceOf { .. } => None,
        }
    }
}

/// Programmatic construction of expression trees.
///
/// The grammar lives outside this workspace; hosts and tests build trees with
/// this builder instead.
pub struct ExprBuilder<'i> {
    interner: &'i StringInterner,
    arena: ExprArena,
}

impl<'i> ExprBuilder<'i> {
    pub fn new(interner: &'i StringInterner) -> Self {
        Self {
            interner,
            arena: ExprArena::new(),
        }
    }

    pub fn null(&mut self) -> ExprId {
        self.arena.alloc(ExprKind::Literal(Literal::Null))
    }

    pub fn bool(&mut self, value: bool) -> ExprId {
        self.arena.alloc(ExprKind::Literal(Literal::Bool(value)))
    }

    pub fn int(&mut self, value: i32) -> ExprId {
        self.arena.alloc(ExprKind::Literal(Literal::Int(value)))
    }

    pub fn long(&mut self, value: i64) -> ExprId {
        self.arena.alloc(ExprKind::Literal(Literal::Long(value)))
    }

    pub fn double(&mut self, value: f64) -> ExprId {
        self.arena.alloc(ExprKind::Literal(Literal::Double(value)))
    }

    pub fn string(&mut self, value: &str) -> ExprId {
        let name = self.interner.intern(value);
        self.arena.alloc(ExprKind::Literal(Literal::Str(name)))
    }

    pub fn root(&mut self) -> ExprId {
        self.arena.alloc(ExprKind::Root)
    }

    pub fn var(&mut self, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.arena.alloc(ExprKind::Variable(name))
    }

    pub fn call(&mut self, receiver: Option<ExprId>, method: &str, args: Vec<ExprId>) -> ExprId {
        let method = self.interner.intern(method);
        self.arena.alloc(ExprKind::MethodCall {
            receiver,
            method,
            args,
        })
    }

    pub fn prop(&mut self, receiver: Option<ExprId>, name: &str) -> ExprId {
        let name = self.interner.intern(name);
        self.arena.alloc(ExprKind::Property { receiver, name })
    }

    pub fn construct(&mut self, type_name: &str, args: Vec<ExprId>) -> ExprId {
        let type_name = self.interner.intern(type_name);
        self.arena.alloc(ExprKind::Construct { type_name, args })
    }

    pub fn index(&mut self, receiver: Option<ExprId>, index: ExprId) -> ExprId {
        self.arena.alloc(ExprKind::Index { receiver, index })
    }

    pub fn instance_of(&mut self, operand: ExprId, type_name: &str) -> ExprId {
        let type_name = self.interner.intern(type_name);
        self.arena.alloc(ExprKind::InstanceOf { operand, type_name })
    }

    pub fn finish(self) -> ExprArena {
        self.arena
    }
}
