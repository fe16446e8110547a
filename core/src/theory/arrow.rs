use std::sync::Arc;

use log::{debug, trace};
use uuid::Uuid;

use crate::theory::data::{Applied, BodyFn, Instance, Param, Signature, Term, TyExpr, Type, Value};
use crate::Error;

/// A fixed-type parameter slot.
pub fn param(name: &str, ty: &Type) -> Param {
    Param {
        name: name.to_string(),
        ty: TyExpr::Fixed(ty.clone()),
        default: None,
    }
}

/// A parameter whose type is computed from the values of the arguments
/// bound before it.
pub fn dep_param<F>(name: &str, f: F) -> Param
where
    F: Fn(&[Term]) -> Result<Type, Error> + Send + Sync + 'static,
{
    Param {
        name: name.to_string(),
        ty: TyExpr::dep(f),
        default: None,
    }
}

/// Declares an uninterpreted arrow: application synthesizes symbolic
/// results of the declared return type.
pub fn postulate(name: &str, params: Vec<Param>, ret: TyExpr) -> Instance {
    declare(
        name,
        Signature {
            params,
            ret: Some(ret),
        },
        None,
    )
}

/// Declares an arrow backed by a computation; results are still checked
/// against the declared return type when one is given.
pub fn define<F>(name: &str, params: Vec<Param>, ret: Option<TyExpr>, body: F) -> Instance
where
    F: Fn(&[Term]) -> Result<Term, Error> + Send + Sync + 'static,
{
    declare(name, Signature { params, ret }, Some(Arc::new(body)))
}

fn declare(name: &str, sig: Signature, body: Option<BodyFn>) -> Instance {
    let ty = Type::composite(&sig.to_string(), Value::Sig(sig), None);
    Instance::make(name, ty, Value::Opaque(Uuid::new_v4()), body)
}

impl Instance {
    /// Applies to positional arguments.
    pub fn apply(&self, args: &[Term]) -> Result<Term, Error> {
        self.apply_with(args, &[])
    }

    /// Applies to positional and keyword arguments. Arguments are bound to
    /// slots first, then each is checked against its (possibly dependent)
    /// parameter type before any argument value flows into a later type
    /// expression.
    pub fn apply_with(&self, args: &[Term], kwargs: &[(&str, Term)]) -> Result<Term, Error> {
        let ty = self.type_of();
        let sig = match ty.value() {
            Value::Sig(sig) => sig.clone(),
            _ => {
                return Err(Error::InvalidConstruction(format!(
                    "{self} of type {ty} cannot be applied"
                )))
            }
        };
        trace!("applying {self} to {} argument(s)", args.len() + kwargs.len());

        let bound = bind(&sig, args, kwargs)?;
        for (i, p) in sig.params.iter().enumerate() {
            let want = p.ty.eval(&bound[..i])?;
            let got = bound[i].type_of();
            if got != want {
                return Err(Error::TypeMismatch { got, want });
            }
        }

        let result = match self.body() {
            Some(f) => f(&bound)?,
            None => self.synthesize(&sig, &bound, args, kwargs)?,
        };
        if let Some(ret) = &sig.ret {
            let want = ret.eval(&bound)?;
            let got = result.type_of();
            if got != want {
                return Err(Error::ResultTypeMismatch { got, want });
            }
        }
        Ok(result)
    }

    /// A fresh result of the declared return type whose value is the
    /// application record. When the return type is a sort, the result is
    /// itself a new composite type; this is what makes an uninterpreted
    /// `List` yield equal `List(A)` types across independent calls.
    fn synthesize(
        &self,
        sig: &Signature,
        bound: &[Term],
        args: &[Term],
        kwargs: &[(&str, Term)],
    ) -> Result<Term, Error> {
        let ret = match &sig.ret {
            Some(r) => r.eval(bound)?,
            None => {
                return Err(Error::InvalidConstruction(format!(
                    "{self} has neither a body nor a return type"
                )))
            }
        };
        let rendered = args
            .iter()
            .map(|a| a.to_string())
            .chain(kwargs.iter().map(|(k, v)| format!("{k}={v}")))
            .collect::<Vec<_>>()
            .join(", ");
        let name = format!("{self}({rendered})");
        let record = Value::Applied(Applied {
            result: None,
            func: self.clone(),
            args: args.to_vec(),
            kwargs: kwargs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        debug!("synthesized {name} : {ret}");
        Ok(match ret.value() {
            Value::Univ if ret == Type::base() => Term::Type(Type::composite(&name, record, None)),
            Value::PropSort => Term::Type(Type::composite(&name, record, Some(ret.clone()))),
            _ => Term::Instance(ret.inst_with(&name, record)),
        })
    }
}

fn bind(sig: &Signature, args: &[Term], kwargs: &[(&str, Term)]) -> Result<Vec<Term>, Error> {
    let want = sig.params.len();
    let got = args.len() + kwargs.len();
    if args.len() > want {
        return Err(Error::ArityMismatch { got, want });
    }
    let mut slots: Vec<Option<Term>> = args.iter().cloned().map(Some).collect();
    slots.resize(want, None);
    for (k, v) in kwargs {
        let i = sig
            .params
            .iter()
            .position(|p| p.name == *k)
            .ok_or_else(|| Error::InvalidConstruction(format!("unknown argument `{k}`")))?;
        if slots[i].is_some() {
            return Err(Error::InvalidConstruction(format!(
                "argument `{k}` bound more than once"
            )));
        }
        slots[i] = Some(v.clone());
    }
    sig.params
        .iter()
        .zip(slots)
        .map(|(p, s)| {
            s.or_else(|| p.default.clone())
                .ok_or(Error::ArityMismatch { got, want })
        })
        .collect()
}
