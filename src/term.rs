//! Bound-term representation
//!
//! A locally-nameless single-binder abstraction: abstracting a name out of a
//! term replaces its free occurrences with a de Bruijn index, so closures can
//! be built and compared without name capture. Two terms are alpha-equivalent
//! exactly when their bodies are structurally equal after this normalization;
//! the optional display name on a binder never participates in equality.

use crate::name::Name;
use crate::syntax::SyntaxKind;

/// A term over which binders can be abstracted.
///
/// Generic over the value type `V` so alternative interpretations keep their
/// own notion of value inside closure bodies.
#[derive(Debug, Clone)]
pub enum Term<V> {
    /// Free occurrence of a source-level name
    Var(Name),
    /// Occurrence of an abstracted binder; 0 is the innermost enclosing binder
    Bound(u32),
    /// A value plugged in by [`BoundTerm::instantiate`]
    Val(V),
    /// A nested single-binder abstraction; the name is display-only metadata
    Lam(Option<Name>, Box<BoundTerm<V>>),
    /// Structural node: a syntax kind over subterms
    Node(SyntaxKind, Vec<Term<V>>),
}

impl<V: PartialEq> PartialEq for Term<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Term::Var(a), Term::Var(b)) => a == b,
            (Term::Bound(a), Term::Bound(b)) => a == b,
            (Term::Val(a), Term::Val(b)) => a == b,
            // display names are metadata only
            (Term::Lam(_, a), Term::Lam(_, b)) => a == b,
            (Term::Node(ka, ta), Term::Node(kb, tb)) => ka == kb && ta == tb,
            _ => false,
        }
    }
}

impl<V: Eq> Eq for Term<V> {}

/// A term with exactly one binder abstracted out.
///
/// Owned exclusively by the closure that carries it; equality is structural
/// on the body, which yields alpha-equivalence for free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundTerm<V> {
    body: Term<V>,
}

impl<V: Clone> BoundTerm<V> {
    /// Abstract `name` out of `term`: every free occurrence becomes a bound
    /// marker referring to this binder.
    pub fn abstracting(name: &Name, term: Term<V>) -> Self {
        Self {
            body: close(term, name, 0),
        }
    }

    /// A binder with zero occurrences; instantiation discards the value.
    pub fn constant(term: Term<V>) -> Self {
        Self { body: term }
    }

    /// Substitute `value` for the bound marker, producing a term with no
    /// dangling bound reference. A zero-occurrence binder simply returns the
    /// body unchanged.
    pub fn instantiate(&self, value: &V) -> Term<V> {
        open(self.body.clone(), value, 0)
    }

    /// The abstracted body
    pub fn body(&self) -> &Term<V> {
        &self.body
    }
}

fn close<V>(term: Term<V>, name: &Name, depth: u32) -> Term<V> {
    match term {
        Term::Var(n) if n == *name => Term::Bound(depth),
        Term::Var(n) => Term::Var(n),
        Term::Bound(i) => Term::Bound(i),
        Term::Val(v) => Term::Val(v),
        Term::Lam(display, inner) => Term::Lam(
            display,
            Box::new(BoundTerm {
                body: close(inner.body, name, depth + 1),
            }),
        ),
        Term::Node(kind, subterms) => Term::Node(
            kind,
            subterms.into_iter().map(|t| close(t, name, depth)).collect(),
        ),
    }
}

fn open<V: Clone>(term: Term<V>, value: &V, depth: u32) -> Term<V> {
    match term {
        Term::Bound(i) if i == depth => Term::Val(value.clone()),
        Term::Bound(i) => Term::Bound(i),
        Term::Var(n) => Term::Var(n),
        Term::Val(v) => Term::Val(v),
        Term::Lam(display, inner) => Term::Lam(
            display,
            Box::new(BoundTerm {
                body: open(inner.body, value, depth + 1),
            }),
        ),
        Term::Node(kind, subterms) => Term::Node(
            kind,
            subterms.into_iter().map(|t| open(t, value, depth)).collect(),
        ),
    }
}
