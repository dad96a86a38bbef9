//! Parser for submitted sort functions
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser entry point and shared helpers
//! - [`ast`]: AST node definitions
//!
//! # Supported Subset
//!
//! The sandbox accepts a small, pedagogical subset of C:
//! - Types: `int`, `void`, `int` arrays (`int a[8]`, `int arr[]`)
//! - Statements: declarations, assignments, `if`/`else`, `while`, `do-while`,
//!   `for`, `break`, `continue`, `return`, blocks
//! - Expressions: arithmetic, comparison, logical, bitwise, ternary, calls
//! - `#include` lines are skipped; there is no other preprocessing
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, one precedence level per method.

pub mod ast;
pub mod lexer;
pub mod parse;

mod declarations;
mod expressions;
mod statements;
