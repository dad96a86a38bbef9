//! # Introduction
//!
//! vlab is a terminal Virtual Lab for bubble sort. A learner watches an
//! animated trace, performs the swaps themselves, writes their own
//! `bubble_sort` in a C subset that is graded in a sandbox, and takes a
//! pretest, quiz and posttest. A mock catalogue of other experiments can be
//! browsed, filtered and starred.
//!
//! ## Grading pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST → Interpreter(fuel, limits) → array → compare
//!                                                                   ↑
//!                                                         reference_sort(input)
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST, rejecting code
//!    nested deeper than [`parser::parse::MAX_NESTING`].
//! 2. [`interpreter`]: walks the AST with a fuel budget, call and evaluation
//!    depth limits and an output cap; arrays live in
//!    [`memory::heap::ArrayHeap`], are passed by reference and are freed when
//!    their declaring scope ends.
//! 3. [`grader`]: calls the entry function and compares the mutated array
//!    with [`sort::reference_sort`].
//!
//! ## Other modules
//!
//! - [`sort`]: step generation, playback and practice sessions.
//! - [`quiz`]: question banks and scoring.
//! - [`catalog`]: mock experiment data behind async, delayed lookups.
//! - [`prefs`] and [`config`]: persisted preferences and the TOML config.
//! - [`assistant`]: canned answers to bubble sort questions.
//! - [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported C subset
//!
//! Types: `int`, `void`, one-dimensional `int` arrays, `const`.
//! Control flow: `if/else`, `while`, `for`, `do-while`, `break`, `continue`,
//! `return`. Built-ins: `printf` (`%d`, `%i`, `%s`, `%%`) and `swap`.

pub mod assistant;
pub mod catalog;
pub mod config;
pub mod grader;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod prefs;
pub mod quiz;
pub mod sort;
pub mod ui;
