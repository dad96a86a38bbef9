//! Sandboxed interpreter for submitted sort functions
//!
//! This module provides the core execution logic:
//! - [`engine`]: Interpreter state, function calls and resource limits
//! - [`errors`]: Runtime error types
//! - [`console`]: Captured `printf` output
//!
//! # Execution Model
//!
//! The interpreter walks the AST directly. Statement execution, loops,
//! expression evaluation and built-ins live in their own files as further
//! `impl Interpreter` blocks.
//!
//! # Isolation
//!
//! A submission can only touch its own variables, the arrays it allocates and
//! the array it was called with. Every statement and expression consumes one
//! unit of fuel; call depth, allocated cells and captured output lines are
//! capped by [`Limits`].

pub mod console;
pub mod engine;
pub mod errors;

mod builtins;
mod expressions;
mod loops;
mod statements;

pub use console::Console;
pub use engine::{Interpreter, Limits};
pub use errors::RuntimeError;
