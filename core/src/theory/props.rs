use log::trace;

use crate::theory::data::{Instance, Term, Type, Value};
use crate::theory::with_needed_parens;
use crate::Error;

/// The sort of propositions. Constant: independent constructions compare
/// equal.
pub fn sort() -> Type {
    Type::composite("Prop", Value::PropSort, None)
}

/// A named proposition.
pub fn prop(name: &str) -> Result<Type, Error> {
    Type::named_in(name, &sort())
}

fn check_prop(t: &Type) -> Result<(), Error> {
    if t.type_of() == sort() {
        Ok(())
    } else {
        Err(Error::InvalidConstruction(format!(
            "{t} is not a proposition"
        )))
    }
}

fn joined(left: &str, symbol: &str, right: &str) -> String {
    format!(
        "{} {symbol} {}",
        with_needed_parens(left),
        with_needed_parens(right)
    )
}

/// Conjunction introduction: on two propositions builds the composite
/// proposition, on two evidence instances builds evidence of the
/// conjunction of their types. Not commutative at the type level.
pub fn and(left: &Term, right: &Term) -> Result<Term, Error> {
    match (left, right) {
        (Term::Type(p), Term::Type(q)) => Ok(Term::Type(and_ty(p, q)?)),
        (Term::Instance(hp), Term::Instance(hq)) => {
            let ty = and_ty(&hp.type_of(), &hq.type_of())?;
            let name = joined(&hp.to_string(), "&", &hq.to_string());
            Ok(Term::Instance(
                ty.inst_with(&name, Value::AndIntro(hp.clone(), hq.clone())),
            ))
        }
        _ => Err(Error::InvalidConstruction(
            "conjunction cannot mix a proposition with evidence".to_string(),
        )),
    }
}

fn and_ty(p: &Type, q: &Type) -> Result<Type, Error> {
    check_prop(p)?;
    check_prop(q)?;
    let name = joined(&p.to_string(), "&", &q.to_string());
    Ok(Type::composite(
        &name,
        Value::And(p.clone(), q.clone()),
        Some(sort()),
    ))
}

/// Disjunction introduction. A bare proposition on either side is promoted
/// to a blank default witness of itself, so evidence of one disjunct
/// suffices.
pub fn or(left: &Term, right: &Term) -> Result<Term, Error> {
    match (left, right) {
        (Term::Type(p), Term::Type(q)) => Ok(Term::Type(or_ty(p, q)?)),
        (Term::Instance(hp), Term::Instance(hq)) => or_intro(hp, hq),
        (Term::Instance(hp), Term::Type(q)) => or_intro(hp, &default_witness(q)?),
        (Term::Type(p), Term::Instance(hq)) => or_intro(&default_witness(p)?, hq),
    }
}

fn or_ty(p: &Type, q: &Type) -> Result<Type, Error> {
    check_prop(p)?;
    check_prop(q)?;
    let name = joined(&p.to_string(), "|", &q.to_string());
    Ok(Type::composite(
        &name,
        Value::Or(p.clone(), q.clone()),
        Some(sort()),
    ))
}

fn or_intro(hp: &Instance, hq: &Instance) -> Result<Term, Error> {
    let ty = or_ty(&hp.type_of(), &hq.type_of())?;
    let name = joined(&hp.to_string(), "|", &hq.to_string());
    Ok(Term::Instance(
        ty.inst_with(&name, Value::OrIntro(hp.clone(), hq.clone())),
    ))
}

fn default_witness(p: &Type) -> Result<Instance, Error> {
    check_prop(p)?;
    Ok(p.inst(&format!("{}()", with_needed_parens(&p.to_string()))))
}

impl Instance {
    /// Left component of connective evidence.
    pub fn left(&self) -> Option<Instance> {
        match self.value() {
            Value::AndIntro(l, _) | Value::OrIntro(l, _) => Some(l.clone()),
            _ => None,
        }
    }

    /// Right component of connective evidence.
    pub fn right(&self) -> Option<Instance> {
        match self.value() {
            Value::AndIntro(_, r) | Value::OrIntro(_, r) => Some(r.clone()),
            _ => None,
        }
    }
}

/// Disjunction elimination. Both case arrows are applied to the recorded
/// sub-terms; the kernel holds no runtime tag saying which disjunct holds,
/// so the result keeps the provenance of both branches. The branches must
/// agree on the goal type.
pub fn elim(h: &Instance, from_left: &Instance, from_right: &Instance) -> Result<Instance, Error> {
    let (l, r) = match h.value() {
        Value::OrIntro(l, r) => (l.clone(), r.clone()),
        _ => {
            return Err(Error::InvalidConstruction(format!(
                "{h} is not disjunction evidence"
            )))
        }
    };
    let left = from_left.apply(&[Term::Instance(l)])?;
    let right = from_right.apply(&[Term::Instance(r)])?;
    let goal = left.type_of();
    if right.type_of() != goal {
        return Err(Error::TypeMismatch {
            got: right.type_of(),
            want: goal,
        });
    }
    trace!("eliminated {h} into {goal}");
    let name = format!("elim({left}, {right})");
    Ok(goal.inst_with(&name, Value::Elim(left, right)))
}
