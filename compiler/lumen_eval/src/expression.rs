//! Compiled expressions.
//!
//! An `Expression` owns an immutable node tree and the invocation cache of
//! every member access in it. Evaluating it many times, from many threads,
//! resolves each access once per observed runtime type.

use lumen_ir::{ExprArena, ExprId, ExprKind, Literal, Name};
use lumen_types::Value;

use crate::cache::InvocationCache;
use crate::candidate::MemberKind;
use crate::context::EvaluationContext;
use crate::engine::{Engine, MemberAccess};
use crate::errors::{invocation_failed, unknown_type, EvalError, EvalResult};

pub struct Expression {
    arena: ExprArena,
    root: ExprId,
    cache: InvocationCache,
}

impl Expression {
    /// Wrap a tree whose value is produced by `root`.
    pub fn new(arena: ExprArena, root: ExprId) -> Self {
        Self {
            arena,
            root,
            cache: InvocationCache::new(),
        }
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn root_node(&self) -> ExprId {
        self.root
    }

    pub fn cache(&self) -> &InvocationCache {
        &self.cache
    }

    pub fn get_value(&self, engine: &Engine, context: &EvaluationContext) -> EvalResult {
        Evaluator {
            expr: self,
            engine,
            context,
        }
        .eval(self.root)
    }
}

impl std::fmt::Debug for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expression")
            .field("nodes", &self.arena.len())
            .field("root", &self.root)
            .field("cache", &self.cache)
            .finish()
    }
}

/// One evaluation of an expression.
struct Evaluator<'a> {
    expr: &'a Expression,
    engine: &'a Engine,
    context: &'a EvaluationContext,
}

impl Evaluator<'_> {
    fn eval(&self, id: ExprId) -> EvalResult {
        let Some(kind) = self.expr.arena.get(id) else {
            return Err(invocation_failed(format!("no node {id}")).at(id));
        };
        match kind {
            ExprKind::Literal(literal) => Ok(self.literal(literal)),
            ExprKind::Root => Ok(self.context.root().clone()),
            ExprKind::Variable(name) => Ok(self.context.variable(*name)),
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let target = self.receiver(*receiver)?;
                let args = self.args(args)?;
                self.member(id, MemberKind::Method, *method, &target, &args)
            }
            ExprKind::Property { receiver, name } => {
                let target = self.receiver(*receiver)?;
                self.member(id, MemberKind::Property, *name, &target, &[])
            }
            ExprKind::Construct { type_name, args } => {
                let args = self.args(args)?;
                self.member(id, MemberKind::Constructor, *type_name, &Value::Null, &args)
            }
            ExprKind::Index { receiver, index } => {
                let target = self.receiver(*receiver)?;
                let key = self.eval(*index)?;
                self.member(id, MemberKind::Indexer, Name::EMPTY, &target, &[key])
            }
            ExprKind::InstanceOf { operand, type_name } => {
                let value = self.eval(*operand)?;
                self.instance_of(id, &value, *type_name)
            }
        }
    }

    fn literal(&self, literal: &Literal) -> Value {
        match literal {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::Int(*i),
            Literal::Long(l) => Value::Long(*l),
            Literal::Double(d) => Value::Double(*d),
            Literal::Str(s) => Value::string(self.engine.types().interner().lookup(*s)),
        }
    }

    /// An absent receiver means the context's root object.
    fn receiver(&self, receiver: Option<ExprId>) -> EvalResult {
        match receiver {
            Some(id) => self.eval(id),
            None => Ok(self.context.root().clone()),
        }
    }

    fn args(&self, args: &[ExprId]) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|&arg| self.eval(arg)).collect()
    }

    fn member(&self, id: ExprId, kind: MemberKind, name: Name, target: &Value, args: &[Value]) -> EvalResult {
        let access = MemberAccess::new(id, kind, name);
        self.engine.invoke(&self.expr.cache, &access, target, args)
    }

    /// `null` is an instance of nothing.
    fn instance_of(&self, id: ExprId, value: &Value, type_name: Name) -> EvalResult {
        let types = self.engine.types();
        if types.lookup(type_name).is_none() {
            return Err(unknown_type(types.interner().lookup(type_name)).at(id));
        }
        let is_instance = types
            .runtime_class(value)
            .is_some_and(|class| types.is_subclass(class.name(), type_name));
        Ok(Value::Bool(is_instance))
    }
}
