//! Sandbox grader
//!
//! Runs a submitted `bubble_sort(int arr[], int n)` against a fixed or random
//! input array and compares the mutated array with [`reference_sort`]. Every
//! failure (lexing, parsing, runtime errors, resource limits, wrong result)
//! ends up as a message inside the [`GradeReport`]; grading never fails.
//!
//! Parsing and execution happen on a dedicated thread with a large stack.
//! The parser and interpreter bound their recursion, and the extra stack
//! keeps those bounds well clear of the host's limits.

use crate::interpreter::{Interpreter, Limits};
use crate::memory::value::Value;
use crate::parser::parse::parse_source;
use crate::sort::reference_sort;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;

/// Stack size of the thread that parses and runs a submission
const GRADER_STACK_BYTES: usize = 256 * 1024 * 1024;

/// Input used by the "Run tests" button when no random array is requested
pub const DEFAULT_INPUT: [i32; 8] = [64, 34, 25, 12, 22, 11, 90, 5];

/// Code shown in the editor before the learner types anything
pub const STARTER_CODE: &str = r#"#include <stdio.h>

// Sort arr[0..n) in ascending order, in place.
void bubble_sort(int arr[], int n) {
    // Write your bubble sort here
}
"#;

/// A correct submission, used by the self-check and the tests
pub const REFERENCE_SOLUTION: &str = r#"void bubble_sort(int arr[], int n) {
    for (int i = 0; i < n - 1; i++) {
        for (int j = 0; j < n - i - 1; j++) {
            if (arr[j] > arr[j + 1]) {
                int temp = arr[j];
                arr[j] = arr[j + 1];
                arr[j + 1] = temp;
            }
        }
    }
}
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Name of the function the grader calls
    pub entry_function: String,
    /// Length of randomly generated inputs
    pub random_len: usize,
    pub min_value: i32,
    pub max_value: i32,
    pub fuel: u64,
    pub max_call_depth: usize,
    pub max_array_cells: usize,
    pub max_output_lines: usize,
}

impl Default for GraderConfig {
    fn default() -> Self {
        let limits = Limits::default();
        GraderConfig {
            entry_function: "bubble_sort".to_string(),
            random_len: 8,
            min_value: 1,
            max_value: 100,
            fuel: limits.fuel,
            max_call_depth: limits.max_call_depth,
            max_array_cells: limits.max_array_cells,
            max_output_lines: limits.max_output_lines,
        }
    }
}

impl GraderConfig {
    pub fn limits(&self) -> Limits {
        Limits {
            fuel: self.fuel,
            max_call_depth: self.max_call_depth,
            max_array_cells: self.max_array_cells,
            max_output_lines: self.max_output_lines,
        }
    }
}

/// Which array a submission is tested against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestInput {
    Fixed(Vec<i32>),
    /// Freshly generated from the grader's RNG
    Random,
}

impl Default for TestInput {
    fn default() -> Self {
        TestInput::Fixed(DEFAULT_INPUT.to_vec())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    WrongOutput { message: String },
    Error { message: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "All tests passed!"),
            Outcome::WrongOutput { message } => write!(f, "Wrong output: {}", message),
            Outcome::Error { message } => write!(f, "Error: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeReport {
    pub input: Vec<i32>,
    pub expected: Vec<i32>,
    /// The array after the call; absent when the run failed
    pub actual: Option<Vec<i32>>,
    pub console: Vec<String>,
    pub console_truncated: bool,
    pub fuel_used: u64,
    pub outcome: Outcome,
}

impl GradeReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

pub struct Grader {
    config: GraderConfig,
    rng: StdRng,
}

impl Grader {
    pub fn new(config: GraderConfig) -> Self {
        Grader {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic random inputs
    pub fn with_seed(config: GraderConfig, seed: u64) -> Self {
        Grader {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GraderConfig {
        &self.config
    }

    pub fn random_input(&mut self) -> Vec<i32> {
        let (lo, hi) = (
            self.config.min_value.min(self.config.max_value),
            self.config.min_value.max(self.config.max_value),
        );
        (0..self.config.random_len)
            .map(|_| self.rng.gen_range(lo..=hi))
            .collect()
    }

    pub fn grade(&mut self, source: &str, input: TestInput) -> GradeReport {
        let values = match input {
            TestInput::Fixed(values) => values,
            TestInput::Random => self.random_input(),
        };
        let expected = reference_sort(&values);

        let mut report = GradeReport {
            input: values,
            expected,
            actual: None,
            console: Vec::new(),
            console_truncated: false,
            fuel_used: 0,
            outcome: Outcome::Passed,
        };
        let config = &self.config;
        let outcome = thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name("grader".to_string())
                .stack_size(GRADER_STACK_BYTES)
                .spawn_scoped(scope, || Self::run(config, source, &mut report));
            match worker {
                Ok(handle) => handle.join().unwrap_or_else(|_| Outcome::Error {
                    message: "the submission crashed the grader".to_string(),
                }),
                Err(e) => Outcome::Error {
                    message: format!("could not start the grader: {}", e),
                },
            }
        });
        report.outcome = outcome;

        match &report.outcome {
            Outcome::Passed => tracing::info!(fuel = report.fuel_used, "submission passed"),
            other => tracing::info!(fuel = report.fuel_used, outcome = %other, "submission failed"),
        }
        report
    }

    /// Execute the submission, filling in the run details of `report`
    fn run(config: &GraderConfig, source: &str, report: &mut GradeReport) -> Outcome {
        let program = match parse_source(source) {
            Ok(program) => program,
            Err(e) => return Outcome::Error { message: e.to_string() },
        };

        let mut interp = match Interpreter::new(program, config.limits()) {
            Ok(interp) => interp,
            Err(e) => return Outcome::Error { message: e.to_string() },
        };

        let entry = config.entry_function.as_str();
        if !interp.has_function(entry) {
            return Outcome::Error {
                message: format!("No function named '{}' was defined", entry),
            };
        }

        let arr = match interp.alloc_array(&report.input) {
            Ok(arr) => arr,
            Err(e) => return Outcome::Error { message: e.to_string() },
        };
        let n = i32::try_from(report.input.len()).unwrap_or(i32::MAX);

        let result = interp.call_function(entry, vec![Value::Array(arr), Value::Int(n)]);
        report.console = interp.console().lines().to_vec();
        report.console_truncated = interp.console().is_truncated();
        report.fuel_used = interp.fuel_used();

        if let Err(e) = result {
            return Outcome::Error { message: e.to_string() };
        }

        match interp.read_array(arr) {
            Ok(actual) => {
                let outcome = if actual == report.expected {
                    Outcome::Passed
                } else {
                    Outcome::WrongOutput {
                        message: format!("expected {:?} but got {:?}", report.expected, actual),
                    }
                };
                report.actual = Some(actual);
                outcome
            }
            Err(e) => Outcome::Error { message: e.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grader() -> Grader {
        Grader::with_seed(GraderConfig::default(), 7)
    }

    #[test]
    fn test_reference_passes_fixed_input() {
        let report = grader().grade(REFERENCE_SOLUTION, TestInput::default());
        assert!(report.passed(), "{}", report.outcome);
        assert_eq!(report.actual, Some(vec![5, 11, 12, 22, 25, 34, 64, 90]));
        assert!(report.fuel_used > 0);
    }

    #[test]
    fn test_starter_code_gives_wrong_output() {
        let report = grader().grade(STARTER_CODE, TestInput::Fixed(vec![2, 1]));
        assert_eq!(
            report.outcome,
            Outcome::WrongOutput {
                message: "expected [1, 2] but got [2, 1]".to_string()
            }
        );
    }

    #[test]
    fn test_random_input_shape() {
        let mut grader = grader();
        let input = grader.random_input();
        assert_eq!(input.len(), 8);
        assert!(input.iter().all(|v| (1..=100).contains(v)));
    }

    #[test]
    fn test_same_seed_same_inputs() {
        let a = grader().random_input();
        let b = grader().random_input();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_return_reports_error() {
        let source = "int bubble_sort(int arr[], int n) { n = 0; }";
        let report = grader().grade(source, TestInput::Random);
        match report.outcome {
            Outcome::Error { message } => assert!(message.contains("must return a value")),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(report.actual, None);
    }

    #[test]
    fn test_parse_error_reported() {
        let report = grader().grade("void bubble_sort(int arr[], int n) {", TestInput::Random);
        assert!(matches!(report.outcome, Outcome::Error { .. }));
    }

    #[test]
    fn test_missing_entry_function() {
        let report = grader().grade("void sort(int a[], int n) {}", TestInput::Random);
        assert_eq!(
            report.outcome,
            Outcome::Error {
                message: "No function named 'bubble_sort' was defined".to_string()
            }
        );
    }

    fn assert_error_containing(report: &GradeReport, needle: &str) {
        match &report.outcome {
            Outcome::Error { message } => assert!(message.contains(needle), "{}", message),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_deeply_nested_parentheses_rejected() {
        let levels = 100_000;
        let source = format!(
            "void bubble_sort(int arr[], int n) {{ n = {}1{}; }}",
            "(".repeat(levels),
            ")".repeat(levels)
        );
        let report = grader().grade(&source, TestInput::default());
        assert_error_containing(&report, "nested more than");
        assert_eq!(report.actual, None);
    }

    #[test]
    fn test_deeply_nested_blocks_and_ternaries_rejected() {
        let blocks = format!(
            "void bubble_sort(int arr[], int n) {{ {} }}",
            "{".repeat(50_000)
        );
        assert_error_containing(&grader().grade(&blocks, TestInput::default()), "nested more than");

        let ternaries = format!(
            "void bubble_sort(int arr[], int n) {{ n = {}0; }}",
            "n ? 1 : ".repeat(50_000)
        );
        assert_error_containing(&grader().grade(&ternaries, TestInput::default()), "nested more than");
    }

    #[test]
    fn test_oversized_array_declaration_is_an_error() {
        let source = "void bubble_sort(int arr[], int n) { int big[2000000000] = {1}; }";
        let report = grader().grade(source, TestInput::default());
        assert_error_containing(&report, "Out of memory");
    }

    #[test]
    fn test_runaway_recursion_stops_at_evaluation_depth() {
        let config = GraderConfig {
            max_call_depth: 1_000_000,
            ..GraderConfig::default()
        };
        let source = r#"
            int down(int k) { return down(k + 1); }
            void bubble_sort(int arr[], int n) { down(0); }
        "#;
        let report = Grader::with_seed(config, 7).grade(source, TestInput::default());
        assert_error_containing(&report, "Evaluation nested more than");
    }

    #[test]
    fn test_console_output_captured_on_failure() {
        let source = r#"
            void bubble_sort(int arr[], int n) {
                printf("n = %d\n", n);
                arr[n] = 0;
            }
        "#;
        let report = grader().grade(source, TestInput::Fixed(vec![3, 2, 1]));
        assert_eq!(report.console, vec!["n = 3".to_string()]);
        assert!(matches!(report.outcome, Outcome::Error { .. }));
    }
}
