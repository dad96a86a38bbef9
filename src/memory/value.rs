//! Runtime value representation
//!
//! Values are tagged and type-safe. Integers are 32-bit like C `int`; arrays
//! are handles into the [`ArrayHeap`](super::heap::ArrayHeap).
//!
//! # Initialization Tracking
//!
//! The `Uninitialized` variant enables detection of reads from variables that
//! were declared without an initializer.

use std::fmt;

/// Handle to an array block in the heap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayRef(pub usize);

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Int(i32),
    Array(ArrayRef),
    /// Result of calling a `void` function
    Void,
    #[default]
    Uninitialized,
}

impl Value {
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Value::Uninitialized)
    }

    /// Short type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Array(_) => "int[]",
            Value::Void => "void",
            Value::Uninitialized => "uninitialized value",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Array(r) => write!(f, "<array #{}>", r.0),
            Value::Void => write!(f, "void"),
            Value::Uninitialized => write!(f, "?"),
        }
    }
}
