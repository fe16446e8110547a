//! Kernel for a universe-indexed dependently-typed calculus: types and
//! typed evidence, Pi-types with value-dependent signatures, and the
//! propositional and Peano layers built on top of them.

use thiserror::Error;

pub mod theory;


pub use theory::data::{Instance, Term, Type, Value};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid construction: {0}")]
    InvalidConstruction(String),
    #[error("mismatched types: got {got}, want {want}")]
    TypeMismatch { got: Type, want: Type },
    #[error("result has type {got} instead of declared {want}")]
    ResultTypeMismatch { got: Type, want: Type },
    #[error("expected {want} argument(s), got {got}")]
    ArityMismatch { got: usize, want: usize },
}

pub(crate) fn maybe_grow<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(512 * 1024, 4 * 1024 * 1024, f)
}
