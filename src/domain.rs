//! Value domain capability
//!
//! Evaluators are written against this trait, never against a concrete value
//! representation, so alternative interpretations (a stricter or lazier
//! domain) can be substituted without touching evaluation logic.

use crate::name::Name;
use crate::term::BoundTerm;
use crate::value::{Closure, Value};
use std::fmt;

/// The set of operations an interpretation must provide: the five value
/// constructors plus the closure elimination the evaluator needs for
/// application.
pub trait Domain {
    type Value: Clone + PartialEq + fmt::Debug;

    /// The result of statements with no data result
    fn unit(&self) -> Self::Value;

    /// A boolean literal abstraction
    fn boolean(&self, value: bool) -> Self::Value;

    /// A string literal abstraction
    fn string(&self, value: &str) -> Self::Value;

    /// An ordered record; fields are already forced, in declaration order
    fn record(&self, fields: Vec<(Name, Self::Value)>) -> Self::Value;

    /// A closure over a bound term; `name` is display-only metadata
    fn closure(&self, name: Option<Name>, body: BoundTerm<Self::Value>) -> Self::Value;

    /// Recover the body of a closure value, if the value is one
    fn closure_body(&self, value: &Self::Value) -> Option<BoundTerm<Self::Value>>;
}

/// The default abstract interpretation over [`Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AbstractDomain;

impl Domain for AbstractDomain {
    type Value = Value;

    fn unit(&self) -> Value {
        Value::Unit
    }

    fn boolean(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn string(&self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn record(&self, fields: Vec<(Name, Value)>) -> Value {
        Value::Record(fields)
    }

    fn closure(&self, name: Option<Name>, body: BoundTerm<Value>) -> Value {
        Value::Closure(Box::new(Closure { name, body }))
    }

    fn closure_body(&self, value: &Value) -> Option<BoundTerm<Value>> {
        match value {
            Value::Closure(closure) => Some(closure.body.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    #[test]
    fn test_constructors() {
        let domain = AbstractDomain;
        assert_eq!(domain.unit(), Value::Unit);
        assert_eq!(domain.boolean(true), Value::Bool(true));
        assert_eq!(domain.string("s"), Value::String("s".into()));
        assert_eq!(
            domain.record(vec![(Name::new("f"), Value::Unit)]),
            Value::Record(vec![(Name::new("f"), Value::Unit)])
        );
    }

    #[test]
    fn test_closure_body_roundtrip() {
        let domain = AbstractDomain;
        let body = BoundTerm::constant(Term::Val(Value::Unit));
        let closure = domain.closure(None, body.clone());
        assert_eq!(domain.closure_body(&closure), Some(body));
        assert_eq!(domain.closure_body(&Value::Unit), None);
    }
}
