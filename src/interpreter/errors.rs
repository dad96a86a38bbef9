//! Runtime error types for the sandbox interpreter
//!
//! [`RuntimeError`] covers everything that can go wrong while a submission
//! runs, including hitting one of the sandbox limits. All runtime errors halt
//! the run; the grader turns them into a message for the learner.

use crate::memory::heap::HeapError;
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Read from uninitialized variable '{var}' at line {}", .location.line)]
    UninitializedRead {
        var: String,
        location: SourceLocation,
    },

    #[error("Index {index} out of bounds for array of size {size} at line {}", .location.line)]
    BufferOverrun {
        index: i64,
        size: usize,
        location: SourceLocation,
    },

    #[error("Attempted to modify const variable '{var}' at line {}", .location.line)]
    ConstModification {
        var: String,
        location: SourceLocation,
    },

    #[error("Integer overflow in operation: {operation} at line {}", .location.line)]
    IntegerOverflow {
        operation: String,
        location: SourceLocation,
    },

    #[error("Division by zero in operation: {operation} at line {}", .location.line)]
    DivisionByZero {
        operation: String,
        location: SourceLocation,
    },

    #[error("Out of memory: requested {requested} cells, but all arrays alive at once may hold at most {limit}")]
    OutOfMemory { requested: usize, limit: usize },

    #[error("Call to undefined function '{name}' at line {}", .location.line)]
    UndefinedFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("Use of undeclared variable '{name}' at line {}", .location.line)]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("Variable '{name}' is already declared in this scope at line {}", .location.line)]
    Redeclaration {
        name: String,
        location: SourceLocation,
    },

    #[error("Function '{name}' is defined more than once (line {})", .location.line)]
    DuplicateFunction {
        name: String,
        location: SourceLocation,
    },

    #[error("Type error at line {}: expected {expected}, got {got}", .location.line)]
    TypeError {
        expected: String,
        got: String,
        location: SourceLocation,
    },

    #[error("Function '{function}' expects {expected} argument(s) but got {got} at line {}", .location.line)]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        got: usize,
        location: SourceLocation,
    },

    #[error("Function '{function}' must return a value but reached the end of its body")]
    MissingReturn {
        function: String,
        location: SourceLocation,
    },

    #[error("Void function '{function}' cannot return a value at line {}", .location.line)]
    VoidReturnValue {
        function: String,
        location: SourceLocation,
    },

    #[error("'{keyword}' used outside of a loop at line {}", .location.line)]
    StrayControlFlow {
        keyword: &'static str,
        location: SourceLocation,
    },

    #[error("Invalid printf format at line {}: {message}", .location.line)]
    InvalidPrintfFormat {
        message: String,
        location: SourceLocation,
    },

    #[error("Execution budget of {limit} steps exhausted (infinite loop?) at line {}", .location.line)]
    FuelExhausted {
        limit: u64,
        location: SourceLocation,
    },

    #[error("Maximum call depth of {limit} exceeded (runaway recursion?) at line {}", .location.line)]
    CallDepthExceeded {
        limit: usize,
        location: SourceLocation,
    },

    #[error("Evaluation nested more than {limit} levels deep (runaway recursion?) at line {}", .location.line)]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },

    #[error("Unsupported operation: {message} at line {}", .location.line)]
    UnsupportedOperation {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::UninitializedRead { location, .. }
            | RuntimeError::BufferOverrun { location, .. }
            | RuntimeError::ConstModification { location, .. }
            | RuntimeError::IntegerOverflow { location, .. }
            | RuntimeError::DivisionByZero { location, .. }
            | RuntimeError::UndefinedFunction { location, .. }
            | RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::Redeclaration { location, .. }
            | RuntimeError::DuplicateFunction { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::MissingReturn { location, .. }
            | RuntimeError::VoidReturnValue { location, .. }
            | RuntimeError::StrayControlFlow { location, .. }
            | RuntimeError::InvalidPrintfFormat { location, .. }
            | RuntimeError::FuelExhausted { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. }
            | RuntimeError::NestingTooDeep { location, .. }
            | RuntimeError::UnsupportedOperation { location, .. } => Some(location),
            RuntimeError::OutOfMemory { .. } => None,
        }
    }

    /// Attach a source location to a heap failure
    pub(crate) fn from_heap(err: HeapError, location: SourceLocation) -> Self {
        match err {
            HeapError::OutOfMemory { requested, limit } => {
                RuntimeError::OutOfMemory { requested, limit }
            }
            HeapError::OutOfBounds { index, size } => RuntimeError::BufferOverrun {
                index,
                size,
                location,
            },
            HeapError::InvalidRef(id) => RuntimeError::UnsupportedOperation {
                message: format!("dangling array handle #{}", id),
                location,
            },
        }
    }
}
