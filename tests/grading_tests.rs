// End-to-end grading of learner-style submissions

use vlab::grader::{
    GradeReport, Grader, GraderConfig, Outcome, TestInput, DEFAULT_INPUT, REFERENCE_SOLUTION,
    STARTER_CODE,
};

fn grade(source: &str, input: TestInput) -> GradeReport {
    Grader::with_seed(GraderConfig::default(), 42).grade(source, input)
}

fn error_message(report: &GradeReport) -> &str {
    match &report.outcome {
        Outcome::Error { message } => message,
        other => panic!("expected an error, got {:?}", other),
    }
}

#[test]
fn test_reference_passes_many_random_inputs() {
    let mut grader = Grader::with_seed(GraderConfig::default(), 2024);
    for _ in 0..25 {
        let report = grader.grade(REFERENCE_SOLUTION, TestInput::Random);
        assert!(report.passed(), "{:?}: {}", report.input, report.outcome);
        assert_eq!(report.input.len(), 8);
        assert!(report.input.iter().all(|v| (1..=100).contains(v)));
    }
}

#[test]
fn test_worked_example() {
    let report = grade(REFERENCE_SOLUTION, TestInput::Fixed(vec![5, 3, 8, 4, 2]));
    assert!(report.passed());
    assert_eq!(report.expected, vec![2, 3, 4, 5, 8]);
    assert_eq!(report.actual, Some(vec![2, 3, 4, 5, 8]));
}

#[test]
fn test_fixed_input_is_default() {
    let report = grade(REFERENCE_SOLUTION, TestInput::default());
    assert_eq!(report.input, DEFAULT_INPUT.to_vec());
    assert!(report.passed());
}

#[test]
fn test_optimized_submission_with_flag() {
    let source = r#"
        #include <stdio.h>

        void bubble_sort(int arr[], int n) {
            int swapped = 1;
            int pass = 0;
            while (swapped) {
                swapped = 0;
                for (int j = 0; j < n - pass - 1; j++) {
                    if (arr[j] > arr[j + 1]) {
                        swap(arr, j, j + 1);
                        swapped = 1;
                    }
                }
                pass++;
            }
        }
    "#;
    let report = grade(source, TestInput::default());
    assert!(report.passed(), "{}", report.outcome);
}

#[test]
fn test_recursive_submission_with_helper() {
    let source = r#"
        void one_pass(int arr[], int n) {
            for (int j = 0; j < n - 1; j++) {
                if (arr[j] > arr[j + 1]) {
                    int t = arr[j];
                    arr[j] = arr[j + 1];
                    arr[j + 1] = t;
                }
            }
        }

        void bubble_sort(int arr[], int n) {
            if (n <= 1) {
                return;
            }
            one_pass(arr, n);
            bubble_sort(arr, n - 1);
        }
    "#;
    let report = grade(source, TestInput::Fixed(vec![9, -4, 0, 7, 7, -12]));
    assert!(report.passed(), "{}", report.outcome);
}

#[test]
fn test_descending_sort_is_wrong_output() {
    let source = REFERENCE_SOLUTION.replace("arr[j] > arr[j + 1]", "arr[j] < arr[j + 1]");
    let report = grade(&source, TestInput::Fixed(vec![1, 2, 3]));
    assert_eq!(
        report.outcome,
        Outcome::WrongOutput {
            message: "expected [1, 2, 3] but got [3, 2, 1]".to_string()
        }
    );
    assert_eq!(report.actual, Some(vec![3, 2, 1]));
}

#[test]
fn test_starter_code_leaves_input_unsorted() {
    let report = grade(STARTER_CODE, TestInput::default());
    assert!(matches!(report.outcome, Outcome::WrongOutput { .. }));
    assert_eq!(report.actual, Some(DEFAULT_INPUT.to_vec()));
}

#[test]
fn test_off_by_one_reads_past_the_end() {
    let source = REFERENCE_SOLUTION.replace("j < n - i - 1", "j < n - i");
    let report = grade(&source, TestInput::default());
    assert!(report.actual.is_none());
    assert!(error_message(&report).contains("out of bounds"), "{}", report.outcome);
}

#[test]
fn test_non_void_entry_without_return() {
    let source = r#"
        int bubble_sort(int arr[], int n) {
            for (int i = 0; i < n; i++) {
                arr[i] = arr[i];
            }
        }
    "#;
    let report = grade(source, TestInput::default());
    assert!(error_message(&report).contains("must return a value"));
}

#[test]
fn test_infinite_loop_runs_out_of_fuel() {
    let source = "void bubble_sort(int arr[], int n) { while (1) { n = n; } }";
    let config = GraderConfig {
        fuel: 10_000,
        ..GraderConfig::default()
    };
    let report = Grader::with_seed(config, 1).grade(source, TestInput::default());
    assert!(error_message(&report).contains("10000"), "{}", report.outcome);
    assert!(report.fuel_used >= 10_000);
}

#[test]
fn test_printf_debugging_is_captured() {
    let source = r#"
        void bubble_sort(int arr[], int n) {
            for (int i = 0; i < n - 1; i++) {
                for (int j = 0; j < n - i - 1; j++) {
                    if (arr[j] > arr[j + 1]) {
                        swap(arr, j, j + 1);
                    }
                }
                printf("pass %d done\n", i + 1);
            }
        }
    "#;
    let report = grade(source, TestInput::Fixed(vec![3, 1, 2]));
    assert!(report.passed());
    assert_eq!(report.console, vec!["pass 1 done", "pass 2 done"]);
    assert!(!report.console_truncated);
}

#[test]
fn test_deep_parentheses_do_not_crash() {
    let depth = 100_000;
    let source = format!(
        "void bubble_sort(int arr[], int n) {{ n = {}1{}; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let report = grade(&source, TestInput::default());
    assert!(error_message(&report).contains("nested more than"));
}

#[test]
fn test_long_expression_chain_does_not_crash() {
    let source = format!(
        "void bubble_sort(int arr[], int n) {{ n = {}0; }}",
        "n - ".repeat(100_000)
    );
    let report = grade(&source, TestInput::default());
    assert!(error_message(&report).contains("nested more than"));
}

#[test]
fn test_huge_local_array_is_refused() {
    let source = "void bubble_sort(int arr[], int n) { int big[2000000000] = {1}; }";
    let report = grade(source, TestInput::default());
    assert!(error_message(&report).contains("Out of memory"));
}

#[test]
fn test_scratch_array_in_inner_loop_is_reused() {
    let source = r#"
        void bubble_sort(int arr[], int n) {
            for (int i = 0; i < n - 1; i++) {
                for (int j = 0; j < n - i - 1; j++) {
                    int pair[2] = {arr[j], arr[j + 1]};
                    if (pair[0] > pair[1]) {
                        arr[j] = pair[1];
                        arr[j + 1] = pair[0];
                    }
                }
            }
        }
    "#;
    let config = GraderConfig {
        max_array_cells: DEFAULT_INPUT.len() + 2,
        ..GraderConfig::default()
    };
    let report = Grader::with_seed(config, 42).grade(source, TestInput::default());
    assert!(report.passed(), "{}", report.outcome);
}

#[test]
fn test_syntax_error_is_reported() {
    let report = grade("void bubble_sort(int arr[], int n) { int x = ; }", TestInput::default());
    assert!(report.actual.is_none());
    assert!(!report.passed());
}

#[test]
fn test_report_serializes_with_status_tag() {
    let report = grade(REFERENCE_SOLUTION, TestInput::Fixed(vec![2, 1]));
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"]["status"], "passed");
    assert_eq!(json["expected"], serde_json::json!([1, 2]));
}
