//! Practice exercise: the learner performs the swaps.
//!
//! A swap is accepted only if it is the next `Swap` event bubble sort itself
//! would perform. Comparisons that do not lead to a swap and `MarkSorted`
//! events are skipped over automatically.

use super::steps::{generate_steps, Step};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PracticeError {
    #[error("indices {i} and {j} are not adjacent")]
    NotAdjacent { i: usize, j: usize },

    #[error("index {index} is out of bounds for an array of {len} elements")]
    OutOfBounds { index: usize, len: usize },

    #[error("the array is already sorted")]
    AlreadyComplete,
}

/// Outcome of one attempted swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapFeedback {
    /// The swap was applied
    Correct { complete: bool },
    /// Bubble sort would swap a different pair next; nothing changed
    Incorrect { expected: (usize, usize) },
}

#[derive(Debug, Clone)]
pub struct PracticeSession {
    original: Vec<i32>,
    array: Vec<i32>,
    steps: Vec<Step>,
    cursor: usize,
    sorted: BTreeSet<usize>,
    mistakes: usize,
    swaps_done: usize,
}

impl PracticeSession {
    pub fn new(values: Vec<i32>) -> Self {
        let steps = generate_steps(&values);
        let mut session = PracticeSession {
            array: values.clone(),
            original: values,
            steps,
            cursor: 0,
            sorted: BTreeSet::new(),
            mistakes: 0,
            swaps_done: 0,
        };
        session.skip_to_next_swap();
        session
    }

    /// Try swapping `arr[i]` and `arr[j]`. Order of the two indices is irrelevant.
    pub fn attempt_swap(&mut self, i: usize, j: usize) -> Result<SwapFeedback, PracticeError> {
        let len = self.array.len();
        for index in [i, j] {
            if index >= len {
                return Err(PracticeError::OutOfBounds { index, len });
            }
        }
        let (lo, hi) = (i.min(j), i.max(j));
        if hi - lo != 1 {
            return Err(PracticeError::NotAdjacent { i, j });
        }
        let expected = self.hint().ok_or(PracticeError::AlreadyComplete)?;

        if expected != (lo, hi) {
            self.mistakes += 1;
            tracing::debug!(?expected, got = ?(lo, hi), "practice swap rejected");
            return Ok(SwapFeedback::Incorrect { expected });
        }

        self.array.swap(lo, hi);
        self.swaps_done += 1;
        self.cursor += 1;
        self.skip_to_next_swap();
        Ok(SwapFeedback::Correct {
            complete: self.is_complete(),
        })
    }

    /// The pair bubble sort swaps next, if any
    pub fn hint(&self) -> Option<(usize, usize)> {
        match self.steps.get(self.cursor) {
            Some(Step::Swap(i, j)) => Some((*i, *j)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.hint().is_none()
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.original.clone());
    }

    pub fn array(&self) -> &[i32] {
        &self.array
    }

    pub fn sorted(&self) -> &BTreeSet<usize> {
        &self.sorted
    }

    pub fn mistakes(&self) -> usize {
        self.mistakes
    }

    pub fn swaps_done(&self) -> usize {
        self.swaps_done
    }

    /// Total swaps needed to finish from the original array
    pub fn swaps_total(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Swap(..)))
            .count()
    }

    fn skip_to_next_swap(&mut self) {
        while let Some(step) = self.steps.get(self.cursor) {
            match step {
                Step::Swap(..) => break,
                Step::MarkSorted(i) => {
                    self.sorted.insert(*i);
                }
                Step::Compare(..) => {}
            }
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_sequence_completes() {
        let mut session = PracticeSession::new(vec![3, 1, 2]);
        assert_eq!(session.hint(), Some((0, 1)));
        assert_eq!(
            session.attempt_swap(1, 0),
            Ok(SwapFeedback::Correct { complete: false })
        );
        assert_eq!(
            session.attempt_swap(1, 2),
            Ok(SwapFeedback::Correct { complete: true })
        );
        assert_eq!(session.array(), &[1, 2, 3]);
        assert_eq!(session.mistakes(), 0);
        assert_eq!(session.sorted().len(), 3);
    }

    #[test]
    fn test_wrong_swap_counts_mistake() {
        let mut session = PracticeSession::new(vec![3, 1, 2]);
        assert_eq!(
            session.attempt_swap(1, 2),
            Ok(SwapFeedback::Incorrect { expected: (0, 1) })
        );
        assert_eq!(session.array(), &[3, 1, 2]);
        assert_eq!(session.mistakes(), 1);
    }

    #[test]
    fn test_invalid_swaps() {
        let mut session = PracticeSession::new(vec![3, 1, 2]);
        assert_eq!(
            session.attempt_swap(0, 2),
            Err(PracticeError::NotAdjacent { i: 0, j: 2 })
        );
        assert_eq!(
            session.attempt_swap(2, 3),
            Err(PracticeError::OutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_sorted_input_is_complete() {
        let mut session = PracticeSession::new(vec![1, 2, 3]);
        assert!(session.is_complete());
        assert_eq!(session.swaps_total(), 0);
        assert_eq!(session.attempt_swap(0, 1), Err(PracticeError::AlreadyComplete));
    }

    #[test]
    fn test_reset_keeps_original() {
        let mut session = PracticeSession::new(vec![2, 1]);
        session.attempt_swap(0, 1).unwrap();
        session.reset();
        assert_eq!(session.array(), &[2, 1]);
        assert_eq!(session.swaps_done(), 0);
    }
}
