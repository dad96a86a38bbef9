//! Step generation for the bubble sort trace.

use std::fmt;

/// One discrete recorded action of the bubble sort trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Elements at the two indices are being compared
    Compare(usize, usize),
    /// Elements at the two indices are exchanged
    Swap(usize, usize),
    /// The index holds its final value
    MarkSorted(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Compare(i, j) => write!(f, "Compare({}, {})", i, j),
            Step::Swap(i, j) => write!(f, "Swap({}, {})", i, j),
            Step::MarkSorted(i) => write!(f, "MarkSorted({})", i),
        }
    }
}

/// Knobs for the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Stop after the first pass without a swap (optimized bubble sort)
    pub early_exit: bool,
}

/// Generate the base (no early exit) trace for `values`.
pub fn generate_steps(values: &[i32]) -> Vec<Step> {
    generate_steps_with(values, GeneratorOptions::default())
}

/// Generate the trace for `values` with the given options.
///
/// Empty input yields an empty trace; a single element yields
/// `[MarkSorted(0)]`.
pub fn generate_steps_with(values: &[i32], options: GeneratorOptions) -> Vec<Step> {
    let n = values.len();
    let mut steps = Vec::new();
    if n == 0 {
        return steps;
    }

    let mut work = values.to_vec();
    for pass in 0..n - 1 {
        let mut swapped = false;
        for j in 0..n - 1 - pass {
            steps.push(Step::Compare(j, j + 1));
            if work[j] > work[j + 1] {
                steps.push(Step::Swap(j, j + 1));
                work.swap(j, j + 1);
                swapped = true;
            }
        }
        steps.push(Step::MarkSorted(n - 1 - pass));

        if options.early_exit && !swapped {
            // Everything left of the pass boundary is already in order
            for idx in (1..n - 1 - pass).rev() {
                steps.push(Step::MarkSorted(idx));
            }
            break;
        }
    }
    steps.push(Step::MarkSorted(0));

    steps
}

/// The built-in correct sort used as the grading oracle.
pub fn reference_sort(values: &[i32]) -> Vec<i32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted
}

/// Apply `steps` to a copy of `original` and return the result.
///
/// Only `Swap` events mutate; indices outside the array are ignored.
pub fn replay(original: &[i32], steps: &[Step]) -> Vec<i32> {
    let mut work = original.to_vec();
    for step in steps {
        if let Step::Swap(i, j) = *step {
            if i < work.len() && j < work.len() {
                work.swap(i, j);
            }
        }
    }
    work
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example() {
        let input = [5, 3, 8, 4, 2];
        let steps = generate_steps(&input);

        assert_eq!(steps[0], Step::Compare(0, 1));
        assert_eq!(steps[1], Step::Swap(0, 1));
        assert_eq!(replay(&input, &steps), vec![2, 3, 4, 5, 8]);
        assert_eq!(steps.last(), Some(&Step::MarkSorted(0)));
    }

    #[test]
    fn test_empty_and_single() {
        assert!(generate_steps(&[]).is_empty());
        assert_eq!(generate_steps(&[7]), vec![Step::MarkSorted(0)]);
    }

    #[test]
    fn test_sorted_input_runs_every_pass() {
        let input = [1, 2, 3, 4];
        let steps = generate_steps(&input);

        let compares = steps.iter().filter(|s| matches!(s, Step::Compare(..))).count();
        // 3 + 2 + 1 comparisons across the three passes
        assert_eq!(compares, 6);
        assert!(!steps.iter().any(|s| matches!(s, Step::Swap(..))));
        assert_eq!(
            steps.iter().filter(|s| matches!(s, Step::MarkSorted(_))).count(),
            4
        );
    }

    #[test]
    fn test_early_exit_stops_after_clean_pass() {
        let input = [1, 2, 3, 4];
        let steps = generate_steps_with(&input, GeneratorOptions { early_exit: true });

        assert_eq!(
            steps,
            vec![
                Step::Compare(0, 1),
                Step::Compare(1, 2),
                Step::Compare(2, 3),
                Step::MarkSorted(3),
                Step::MarkSorted(2),
                Step::MarkSorted(1),
                Step::MarkSorted(0),
            ]
        );
    }

    #[test]
    fn test_early_exit_still_sorts() {
        let input = [4, 1, 2, 3, 9, 8];
        let steps = generate_steps_with(&input, GeneratorOptions { early_exit: true });
        assert_eq!(replay(&input, &steps), reference_sort(&input));
    }

    #[test]
    fn test_every_index_marked_once() {
        let input = [9, -2, 7, 7, 0];
        let mut marked: Vec<usize> = generate_steps(&input)
            .into_iter()
            .filter_map(|s| match s {
                Step::MarkSorted(i) => Some(i),
                _ => None,
            })
            .collect();
        marked.sort_unstable();
        assert_eq!(marked, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_equal_elements_are_not_swapped() {
        let steps = generate_steps(&[3, 3]);
        assert_eq!(
            steps,
            vec![Step::Compare(0, 1), Step::MarkSorted(1), Step::MarkSorted(0)]
        );
    }
}
