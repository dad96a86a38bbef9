//! Bubble sort trace engine
//!
//! This module turns an array into a replayable trace and drives it:
//! - [`steps`]: eager step generation, the reference sort, trace replay
//! - [`player`]: timer/manual playback with highlight state
//! - [`practice`]: learner-performed swaps checked against the trace
//!
//! # Trace Model
//!
//! A trace is a `Vec<Step>` computed once, before playback. Replaying it from
//! index 0 against the original array always yields the same result as
//! [`steps::reference_sort`]:
//!
//! ```text
//! [5, 3, 8, 4, 2] → Compare(0,1) Swap(0,1) Compare(1,2) ... MarkSorted(0)
//! ```

pub mod player;
pub mod practice;
pub mod steps;

pub use player::{Highlight, PlayerError, StepPlayer};
pub use practice::{PracticeError, PracticeSession, SwapFeedback};
pub use steps::{generate_steps, generate_steps_with, reference_sort, replay, GeneratorOptions, Step};
