//! Bound invokers.
//!
//! A `ResolvedInvoker` pairs a selected candidate with the plan for
//! converting arguments to its parameters. Conversion runs on every
//! invocation from the actual argument values, so one invoker stays correct
//! for any arguments of the shapes it was resolved for.

use std::sync::Arc;

use lumen_types::{ClassRef, MethodDef, ObjectRef, TypeShape, Value};

use crate::candidate::{CandidateMember, ElementAccess, MemberBinding};
use crate::convert::TypeConverter;
use crate::errors::{invocation_failed, EvalError, EvalResult};

/// One conversion target per parameter, or fixed targets followed by a
/// packing rule for a variadic tail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionPlan {
    targets: Vec<TypeShape>,
    /// Element shape the trailing arguments are packed into.
    tail: Option<TypeShape>,
}

impl ConversionPlan {
    pub fn direct(targets: Vec<TypeShape>) -> Self {
        Self { targets, tail: None }
    }

    pub fn packed(fixed: Vec<TypeShape>, element: TypeShape) -> Self {
        Self {
            targets: fixed,
            tail: Some(element),
        }
    }

    pub fn targets(&self) -> &[TypeShape] {
        &self.targets
    }

    pub fn packs(&self) -> bool {
        self.tail.is_some()
    }

    /// Convert `args` to the values the member body receives.
    pub fn apply(&self, converter: &TypeConverter, args: &[Value]) -> Result<Vec<Value>, EvalError> {
        let fixed = self.targets.len();
        let arity_ok = match self.tail {
            Some(_) => args.len() >= fixed,
            None => args.len() == fixed,
        };
        if !arity_ok {
            return Err(invocation_failed(format!(
                "expected {fixed} arguments, got {}",
                args.len()
            )));
        }

        let mut converted = Vec::with_capacity(fixed + usize::from(self.tail.is_some()));
        for (arg, target) in args.iter().zip(&self.targets) {
            converted.push(converter.convert(arg, target)?);
        }
        if let Some(element) = &self.tail {
            converted.push(converter.pack(&args[fixed..], element)?);
        }
        Ok(converted)
    }
}

/// Internal invocation outcome. `Stale` never reaches callers of the
/// engine's cached path.
#[derive(Debug)]
pub(crate) enum InvokeFailure {
    /// The bound definition was replaced or unloaded.
    Stale,
    Failed(EvalError),
}

impl From<EvalError> for InvokeFailure {
    fn from(err: EvalError) -> Self {
        InvokeFailure::Failed(err)
    }
}

/// A selected member plus its argument-conversion plan.
#[derive(Clone)]
pub struct ResolvedInvoker {
    member: CandidateMember,
    plan: ConversionPlan,
    score: u32,
    /// Argument shapes this invoker was selected for.
    arg_shapes: Vec<TypeShape>,
    converter: TypeConverter,
}

impl ResolvedInvoker {
    pub(crate) fn new(
        member: CandidateMember,
        plan: ConversionPlan,
        score: u32,
        arg_shapes: Vec<TypeShape>,
        converter: TypeConverter,
    ) -> Self {
        Self {
            member,
            plan,
            score,
            arg_shapes,
            converter,
        }
    }

    pub fn member(&self) -> &CandidateMember {
        &self.member
    }

    pub fn plan(&self) -> &ConversionPlan {
        &self.plan
    }

    /// Total conversion cost the member was selected with.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether arguments of `shapes` resolve to this invoker.
    pub fn accepts(&self, shapes: &[TypeShape]) -> bool {
        self.arg_shapes == shapes
    }

    /// Invoke the bound member. `target` is ignored by constructors.
    ///
    /// A member whose definition has been replaced reports an
    /// `InvocationTarget` error here; the engine's cached path re-resolves
    /// instead.
    pub fn invoke(&self, target: &Value, args: &[Value]) -> EvalResult {
        self.try_invoke(target, args).map_err(|failure| match failure {
            InvokeFailure::Stale => {
                let interner = self.converter.types().interner();
                invocation_failed(format!(
                    "`{}` is no longer resolvable",
                    self.member.describe(interner)
                ))
            }
            InvokeFailure::Failed(err) => err,
        })
    }

    pub(crate) fn try_invoke(&self, target: &Value, args: &[Value]) -> Result<Value, InvokeFailure> {
        if self.member.is_stale() {
            return Err(InvokeFailure::Stale);
        }
        let args = self.plan.apply(&self.converter, args)?;
        let declaring = &self.member.declaring;
        let result = match &self.member.binding {
            MemberBinding::Method(index) => call(declaring.method(*index), target, &args),
            MemberBinding::Virtual { implementor, index } => {
                call(implementor.method(*index), target, &args)
            }
            MemberBinding::Field(index) => self.read_field(declaring, *index, target),
            MemberBinding::Constructor(index) => construct(declaring, *index, &args),
            MemberBinding::Element(access) => element(*access, target, &args),
        };
        result.map_err(InvokeFailure::Failed)
    }

    fn read_field(&self, declaring: &ClassRef, index: usize, target: &Value) -> EvalResult {
        let Some(field) = declaring.field(index) else {
            return Err(invocation_failed("field no longer declared"));
        };
        let Some(object) = target.as_object() else {
            let name = self.converter.types().interner().lookup(field.name);
            return Err(invocation_failed(format!(
                "cannot read field `{name}` of {}",
                target.kind_name()
            )));
        };
        Ok(object
            .get_field(field.name)
            .unwrap_or_else(|| Value::default_for(&field.ty)))
    }
}

impl std::fmt::Debug for ResolvedInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedInvoker")
            .field("member", &self.member)
            .field("plan", &self.plan)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

fn call(method: Option<&MethodDef>, target: &Value, args: &[Value]) -> EvalResult {
    let Some(method) = method else {
        return Err(invocation_failed("method no longer declared"));
    };
    let Some(body) = &method.body else {
        return Err(invocation_failed("cannot invoke an abstract method"));
    };
    body(target, args).map_err(|err| invocation_failed(err.message))
}

fn construct(class: &ClassRef, index: usize, args: &[Value]) -> EvalResult {
    let Some(ctor) = class.constructor(index) else {
        return Err(invocation_failed("constructor no longer declared"));
    };
    let object = ObjectRef::new(Arc::clone(class));
    if let Some(body) = &ctor.body {
        body(&object, args).map_err(|err| invocation_failed(err.message))?;
    }
    Ok(Value::Object(object))
}

fn element(access: ElementAccess, target: &Value, args: &[Value]) -> EvalResult {
    let Some(key) = args.first() else {
        return Err(invocation_failed("indexer requires one argument"));
    };
    match (access, target, key) {
        (ElementAccess::Sequence, Value::Array { items, .. } | Value::List(items), Value::Long(i)) => {
            usize::try_from(*i)
                .ok()
                .and_then(|index| items.get(index))
                .cloned()
                .ok_or_else(|| invocation_failed(format!("index {i} out of bounds")))
        }
        (ElementAccess::Text, Value::Str(s), Value::Long(i)) => usize::try_from(*i)
            .ok()
            .and_then(|index| s.chars().nth(index))
            .map(Value::Char)
            .ok_or_else(|| invocation_failed(format!("index {i} out of bounds"))),
        (ElementAccess::Map, Value::Map(entries), Value::Str(k)) => {
            Ok(entries.get(k.as_ref()).cloned().unwrap_or(Value::Null))
        }
        _ => Err(invocation_failed(format!(
            "cannot index {} with {}",
            target.kind_name(),
            key.kind_name()
        ))),
    }
}
