use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use uuid::Uuid;

use crate::{maybe_grow, Error};

/// An immutable type handle: a named leaf, an anonymous universe node, or a
/// composite former. Equality is structural, over universes and recorded
/// values; display names and object identity never participate.
#[derive(Clone)]
pub struct Type(Arc<TypeData>);

struct TypeData {
    name: String,
    universe: Option<u32>,
    /// Explicit sort link; `None` means the sort is derived (universe
    /// arithmetic for anonymous nodes, the builtin `Type` otherwise).
    ty: Option<Type>,
    value: Value,
}

impl Type {
    /// Checked constructor: exactly one of `name` and `universe` must be
    /// supplied. An empty name and universe 0 count as absent; the
    /// universe-0 node is the builtin [`Type::base`] and is never
    /// user-constructed.
    pub fn new(name: Option<&str>, universe: Option<u32>) -> Result<Type, Error> {
        let name = name.filter(|n| !n.is_empty());
        let universe = universe.filter(|u| *u != 0);
        match (name, universe) {
            (Some(n), None) => Ok(Self::make(n, None, None, Value::Opaque(Uuid::new_v4()))),
            (None, Some(u)) => Ok(Self::make("", Some(u), None, Value::Univ)),
            (Some(_), Some(_)) => Err(Error::InvalidConstruction(
                "a type takes a name or a universe, not both".to_string(),
            )),
            (None, None) => Err(Error::InvalidConstruction(
                "a type needs a non-empty name or a positive universe".to_string(),
            )),
        }
    }

    /// A fresh named leaf type; its type is the builtin `Type`.
    pub fn named(name: &str) -> Result<Type, Error> {
        Self::new(Some(name), None)
    }

    /// A fresh named type belonging to an explicit sort.
    pub fn named_in(name: &str, sort: &Type) -> Result<Type, Error> {
        if name.is_empty() {
            return Err(Error::InvalidConstruction(
                "a named type needs a non-empty name".to_string(),
            ));
        }
        Ok(Self::make(
            name,
            None,
            Some(sort.clone()),
            Value::Opaque(Uuid::new_v4()),
        ))
    }

    /// The anonymous universe node at a positive level.
    pub fn univ(universe: u32) -> Result<Type, Error> {
        Self::new(None, Some(universe))
    }

    /// The builtin `Type`, the universe-0 node every named type belongs to.
    pub fn base() -> Type {
        Self::make("", Some(0), None, Value::Univ)
    }

    pub(crate) fn composite(name: &str, value: Value, sort: Option<Type>) -> Type {
        Self::make(name, None, sort, value)
    }

    fn make(name: &str, universe: Option<u32>, ty: Option<Type>, value: Value) -> Type {
        Type(Arc::new(TypeData {
            name: name.to_string(),
            universe,
            ty,
            value,
        }))
    }

    /// The type of this type. Universe arithmetic is computed on every
    /// call, never stored: the universe-`n` node answers the
    /// universe-`n+1` node.
    pub fn type_of(&self) -> Type {
        match (self.0.universe, &self.0.ty) {
            (Some(u), _) => Self::make("", Some(u + 1), None, Value::Univ),
            (None, Some(t)) => t.clone(),
            (None, None) => Self::base(),
        }
    }

    pub fn universe(&self) -> Option<u32> {
        self.0.universe
    }

    pub fn value(&self) -> &Value {
        &self.0.value
    }

    /// Display name; empty for anonymous universe nodes.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// An instance of this type with no recorded payload. Blank witnesses
    /// of the same type are definitionally equal.
    pub fn inst(&self, name: &str) -> Instance {
        self.inst_with(name, Value::Blank)
    }

    /// An instance of this type carrying an explicit payload.
    pub fn inst_with(&self, name: &str, value: Value) -> Instance {
        Instance::make(name, self.clone(), value, None)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        maybe_grow(|| self.0.universe == other.0.universe && self.0.value == other.0.value)
    }
}

impl Eq for Type {}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.0.universe {
            Some(0) => f.write_str("Type"),
            Some(u) => write!(f, "Type(universe={u})"),
            None => f.write_str(&self.0.name),
        }
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// The computation backing a defined arrow, applied to the bound arguments
/// in declaration order.
pub type BodyFn = Arc<dyn Fn(&[Term]) -> Result<Term, Error> + Send + Sync>;

/// A typed value. The type is carried, never checked implicitly; callers
/// decide when to compare it. Equality needs both the type and the recorded
/// value to agree, so independently constructed witnesses coincide exactly
/// when their construction histories do.
#[derive(Clone)]
pub struct Instance(Arc<InstData>);

struct InstData {
    name: String,
    ty: Type,
    value: Value,
    body: Option<BodyFn>,
}

impl Instance {
    pub(crate) fn make(name: &str, ty: Type, value: Value, body: Option<BodyFn>) -> Instance {
        Instance(Arc::new(InstData {
            name: name.to_string(),
            ty,
            value,
            body,
        }))
    }

    pub fn type_of(&self) -> Type {
        self.0.ty.clone()
    }

    pub fn value(&self) -> &Value {
        &self.0.value
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub(crate) fn body(&self) -> Option<&BodyFn> {
        self.0.body.as_ref()
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        maybe_grow(|| self.0.ty == other.0.ty && self.0.value == other.0.value)
    }
}

impl Eq for Instance {}

impl Display for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.name)
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Either side of the type/evidence divide. A type never equals an
/// instance, whatever their values.
#[derive(Clone, PartialEq)]
pub enum Term {
    Type(Type),
    Instance(Instance),
}

impl Eq for Term {}

impl Term {
    pub fn type_of(&self) -> Type {
        match self {
            Term::Type(t) => t.type_of(),
            Term::Instance(i) => i.type_of(),
        }
    }

    pub fn value(&self) -> &Value {
        match self {
            Term::Type(t) => t.value(),
            Term::Instance(i) => i.value(),
        }
    }

    pub fn as_type(&self) -> Option<&Type> {
        match self {
            Term::Type(t) => Some(t),
            Term::Instance(_) => None,
        }
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Term::Type(_) => None,
            Term::Instance(i) => Some(i),
        }
    }
}

impl From<Type> for Term {
    fn from(t: Type) -> Self {
        Term::Type(t)
    }
}

impl From<Instance> for Term {
    fn from(i: Instance) -> Self {
        Term::Instance(i)
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Type(t) => Display::fmt(t, f),
            Term::Instance(i) => Display::fmt(i, f),
        }
    }
}

impl Debug for Term {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Construction history. The basis of definitional equality: two terms are
/// equal when they were built the same way, not when they are the same
/// object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// No recorded payload.
    Blank,
    /// Fresh identity token, minted once per declaration.
    Opaque(Uuid),
    /// The builtin `Type` and anonymous universe nodes.
    Univ,
    /// The sort of propositions.
    PropSort,
    /// Integer payload.
    Lit(u64),
    /// Pi-type signature.
    Sig(Signature),
    /// Conjunction former over proposition types.
    And(Type, Type),
    /// Disjunction former over proposition types.
    Or(Type, Type),
    /// Conjunction evidence.
    AndIntro(Instance, Instance),
    /// Disjunction evidence.
    OrIntro(Instance, Instance),
    /// Case analysis over a disjunction; both branch results are recorded.
    Elim(Term, Term),
    /// An application of an arrow, by call shape.
    Applied(Applied),
}

/// The `(result-or-None, fn, args, kwargs)` application record. Arguments
/// are recorded exactly as passed, before binding; synthesized applications
/// carry no underlying result.
#[derive(Clone, Debug)]
pub struct Applied {
    pub result: Option<Term>,
    pub func: Instance,
    pub args: Vec<Term>,
    pub kwargs: Vec<(String, Term)>,
}

impl PartialEq for Applied {
    fn eq(&self, other: &Self) -> bool {
        self.result == other.result
            && self.func == other.func
            && self.args == other.args
            && kwargs_eq(&self.kwargs, &other.kwargs)
    }
}

impl Eq for Applied {}

/// Keyword records compare by name, not position.
fn kwargs_eq(a: &[(String, Term)], b: &[(String, Term)]) -> bool {
    a.len() == b.len() && a.iter().all(|(k, v)| b.iter().any(|(n, w)| n == k && w == v))
}

/// An ordered parameter slot. The name and default are binding
/// conveniences; only the type takes part in signature equality.
#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub ty: TyExpr,
    pub default: Option<Term>,
}

/// A declarative arrow signature. `ret: None` is the no-annotation
/// sentinel: results of the underlying computation go unchecked.
#[derive(Clone, Debug)]
pub struct Signature {
    pub params: Vec<Param>,
    pub ret: Option<TyExpr>,
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(&other.params)
                .all(|(a, b)| a.ty == b.ty)
            && self.ret == other.ret
    }
}

impl Eq for Signature {}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let params = self
            .params
            .iter()
            .map(|p| p.ty.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        match &self.ret {
            Some(ret) => write!(f, "({params}) -> {ret}"),
            None => write!(f, "({params}) -> _"),
        }
    }
}

/// A parameter or return type: fixed, or computed from the values of the
/// arguments bound before it.
#[derive(Clone, Debug, PartialEq)]
pub enum TyExpr {
    Fixed(Type),
    Dep(DepTy),
}

impl Eq for TyExpr {}

/// A dependent type expression. Carries a fresh identity token: two
/// expressions are equal only when they share it, the analogue of
/// comparing the underlying computation by identity.
#[derive(Clone)]
pub struct DepTy {
    id: Uuid,
    f: Arc<dyn Fn(&[Term]) -> Result<Type, Error> + Send + Sync>,
}

impl TyExpr {
    pub fn dep<F>(f: F) -> TyExpr
    where
        F: Fn(&[Term]) -> Result<Type, Error> + Send + Sync + 'static,
    {
        TyExpr::Dep(DepTy {
            id: Uuid::new_v4(),
            f: Arc::new(f),
        })
    }

    /// Evaluates against the already-bound argument prefix.
    pub fn eval(&self, bound: &[Term]) -> Result<Type, Error> {
        match self {
            TyExpr::Fixed(t) => Ok(t.clone()),
            TyExpr::Dep(d) => (d.f)(bound),
        }
    }
}

impl PartialEq for DepTy {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DepTy {}

impl Display for TyExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TyExpr::Fixed(t) => Display::fmt(t, f),
            TyExpr::Dep(_) => f.write_str("?"),
        }
    }
}

impl Debug for DepTy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DepTy({})", self.id)
    }
}
