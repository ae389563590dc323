//! Abstract values - the concrete default domain
//!
//! The five value shapes an interpretation may produce. Statements with no
//! data result evaluate to `Unit`; objects and namespaces are ordered
//! records; closures carry a capture-safe bound term.

use crate::name::Name;
use crate::term::BoundTerm;
use std::fmt;

/// An abstract evaluation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Result of statements with no data result (imports, declarations)
    Unit,
    /// Boolean literal abstraction
    Bool(bool),
    /// String literal abstraction
    String(String),
    /// Object/namespace: field order is insertion order and is semantically
    /// visible (namespace member order)
    Record(Vec<(Name, Value)>),
    /// A closure over a bound term
    Closure(Box<Closure>),
}

impl Value {
    /// View this value as a record, if it is one
    pub fn as_record(&self) -> Option<&[(Name, Value)]> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Whether this value is the unit value
    pub fn is_unit(&self) -> bool {
        matches!(self, Value::Unit)
    }
}

/// A closure: the optional formal name is metadata for diagnostics and
/// printing; the parameter is referenced inside the body by bound-variable
/// index, never by name.
#[derive(Debug, Clone)]
pub struct Closure {
    pub name: Option<Name>,
    pub body: BoundTerm<Value>,
}

impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        // alpha-equivalence: bodies only, never the display name
        self.body == other.body
    }
}

impl Eq for Closure {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "unit"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, "}}")
            }
            Value::Closure(closure) => match &closure.name {
                Some(name) => write!(f, "closure({})", name),
                None => write!(f, "closure"),
            },
        }
    }
}
