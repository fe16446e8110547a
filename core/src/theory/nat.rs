use log::debug;

use crate::theory::arrow::{param, postulate};
use crate::theory::data::{Instance, Term, TyExpr, Type, Value};
use crate::{maybe_grow, Error};

/// The Peano theory: the numeral type, its base instance and the
/// postulated operators, built once. Numerals from different theories are
/// unrelated.
pub struct Peano {
    pub nat: Type,
    pub zero: Instance,
    pub succ: Instance,
    pub add: Instance,
    pub mul: Instance,
}

impl Peano {
    pub fn new() -> Result<Peano, Error> {
        let nat = Type::named("Nat")?;
        let zero = nat.inst_with("0", Value::Lit(0));
        let succ = postulate(
            "successor",
            vec![param("n", &nat)],
            TyExpr::Fixed(nat.clone()),
        );
        let add = postulate(
            "add",
            vec![param("n", &nat), param("m", &nat)],
            TyExpr::Fixed(nat.clone()),
        );
        let mul = postulate(
            "mul",
            vec![param("n", &nat), param("m", &nat)],
            TyExpr::Fixed(nat.clone()),
        );
        Ok(Peano {
            nat,
            zero,
            succ,
            add,
            mul,
        })
    }

    /// Converts a non-negative literal by repeated successor application,
    /// giving every numeral the canonical chain value.
    pub fn lit(&self, n: i64) -> Result<Term, Error> {
        if n < 0 {
            return Err(Error::InvalidConstruction(format!(
                "{n} is not a natural number"
            )));
        }
        let mut out = Term::Instance(self.zero.clone());
        for _ in 0..n {
            out = self.succ.apply(&[out])?;
        }
        Ok(out)
    }

    /// Recovers the numeral a successor application was built from; `None`
    /// for zero and free numerals.
    pub fn pred(&self, n: &Term) -> Option<Term> {
        match n.value() {
            Value::Applied(a) if a.func == self.succ => match a.args.as_slice() {
                [p] => Some(p.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Addition by structural recursion over successor chains. Two free
    /// operands stay symbolic: the uninterpreted `add` produces a term
    /// rather than a reduced value.
    pub fn sum(&self, n: &Term, m: &Term) -> Result<Term, Error> {
        maybe_grow(|| {
            let zero = Term::Instance(self.zero.clone());
            if *n == zero {
                return Ok(m.clone());
            }
            if *m == zero {
                return Ok(n.clone());
            }
            if let Some(p) = self.pred(n) {
                return self.succ.apply(&[self.sum(&p, m)?]);
            }
            if let Some(p) = self.pred(m) {
                return self.succ.apply(&[self.sum(n, &p)?]);
            }
            debug!("keeping {n} + {m} symbolic");
            self.add.apply(&[n.clone(), m.clone()])
        })
    }

    /// Multiplication, reducing through the predecessor of either operand.
    /// Only a zero left operand short-circuits.
    pub fn product(&self, n: &Term, m: &Term) -> Result<Term, Error> {
        maybe_grow(|| {
            let zero = Term::Instance(self.zero.clone());
            if *n == zero {
                return Ok(zero);
            }
            if let Some(p) = self.pred(n) {
                return self.sum(&self.product(&p, m)?, m);
            }
            if let Some(p) = self.pred(m) {
                return self.sum(&self.product(n, &p)?, n);
            }
            debug!("keeping {n} * {m} symbolic");
            self.mul.apply(&[n.clone(), m.clone()])
        })
    }

    /// Ordering by peeling the right operand. A fully symbolic comparison
    /// answers `false` instead of an open proposition; known limitation,
    /// kept reproducible.
    pub fn le(&self, n: &Term, m: &Term) -> bool {
        maybe_grow(|| {
            if *n == Term::Instance(self.zero.clone()) || n == m {
                return true;
            }
            match self.pred(m) {
                Some(p) => self.le(n, &p),
                None => false,
            }
        })
    }

    pub fn ge(&self, n: &Term, m: &Term) -> bool {
        self.le(m, n)
    }
}
