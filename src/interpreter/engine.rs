// Execution engine for submitted sort functions

use crate::interpreter::console::{Console, DEFAULT_MAX_LINES};
use crate::interpreter::errors::RuntimeError;
use crate::memory::heap::{ArrayHeap, DEFAULT_MAX_CELLS};
use crate::memory::stack::{LocalVar, Stack, StackFrame};
use crate::memory::value::{ArrayRef, Value};
use crate::parser::ast::{AstNode, Param, Program, SourceLocation, Type};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Deepest statement/expression evaluation, summed over all active calls
pub const MAX_EVAL_DEPTH: usize = 1024;

/// Resource caps for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Statements plus expressions evaluated
    pub fuel: u64,
    pub max_call_depth: usize,
    pub max_array_cells: usize,
    pub max_output_lines: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            fuel: 1_000_000,
            max_call_depth: 64,
            max_array_cells: DEFAULT_MAX_CELLS,
            max_output_lines: DEFAULT_MAX_LINES,
        }
    }
}

/// How the statement just executed left the current function
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

#[derive(Debug)]
pub(crate) struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<AstNode>,
    pub return_type: Type,
    pub location: SourceLocation,
}

/// The interpreter that executes a submitted program
pub struct Interpreter {
    /// Function definitions (name -> FunctionDef)
    function_defs: FxHashMap<String, Rc<FunctionDef>>,

    /// Call stack
    pub(crate) stack: Stack,

    /// Declared return types, innermost call last
    return_types: Vec<Type>,

    /// Array storage
    pub(crate) heap: ArrayHeap,

    /// Captured printf output
    pub(crate) console: Console,

    /// Pending break/continue/return signal
    pub(crate) control_flow: ControlFlow,

    /// Current source location being executed
    pub(crate) current_location: SourceLocation,

    limits: Limits,
    fuel_used: u64,

    /// Statements and expressions currently being evaluated
    nesting: usize,
}

impl Interpreter {
    /// Index the program's functions. Fails if a name is defined twice.
    pub fn new(program: Program, limits: Limits) -> Result<Self, RuntimeError> {
        let mut function_defs = FxHashMap::default();

        for node in program.nodes {
            let AstNode::FunctionDef {
                name,
                params,
                body,
                return_type,
                location,
            } = node
            else {
                continue;
            };
            if function_defs.contains_key(&name) {
                return Err(RuntimeError::DuplicateFunction { name, location });
            }
            function_defs.insert(
                name.clone(),
                Rc::new(FunctionDef {
                    name,
                    params,
                    body,
                    return_type,
                    location,
                }),
            );
        }

        Ok(Interpreter {
            function_defs,
            stack: Stack::new(),
            return_types: Vec::new(),
            heap: ArrayHeap::new(limits.max_array_cells),
            console: Console::new(limits.max_output_lines),
            control_flow: ControlFlow::Normal,
            current_location: SourceLocation::new(1, 1),
            limits,
            fuel_used: 0,
            nesting: 0,
        })
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function_defs.contains_key(name)
    }

    /// Allocate an array outside of any call, e.g. the graded input
    pub fn alloc_array(&mut self, values: &[i32]) -> Result<ArrayRef, RuntimeError> {
        self.heap
            .allocate_from(values)
            .map_err(|e| RuntimeError::from_heap(e, self.current_location))
    }

    /// Read back a whole array. Every cell must have been written.
    pub fn read_array(&self, array: ArrayRef) -> Result<Vec<i32>, RuntimeError> {
        let cells = self
            .heap
            .contents(array)
            .map_err(|e| RuntimeError::from_heap(e, self.current_location))?;
        cells
            .into_iter()
            .enumerate()
            .map(|(i, cell)| {
                cell.ok_or_else(|| RuntimeError::UninitializedRead {
                    var: format!("arr[{}]", i),
                    location: self.current_location,
                })
            })
            .collect()
    }

    /// Call a user-defined function by name with already-evaluated arguments
    pub fn call_function(&mut self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let func = self
            .function_defs
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location: SourceLocation::new(1, 1),
            })?;
        tracing::debug!(function = name, args = args.len(), "calling entry function");
        self.control_flow = ControlFlow::Normal;
        let location = func.location;
        self.invoke(func, args, location)
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn fuel_used(&self) -> u64 {
        self.fuel_used
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub(crate) fn lookup_function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.function_defs.get(name).cloned()
    }

    /// Run a user function: bind parameters, execute the body, check the result
    pub(crate) fn invoke(
        &mut self,
        func: Rc<FunctionDef>,
        args: Vec<Value>,
        call_location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if args.len() != func.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: func.name.clone(),
                expected: func.params.len(),
                got: args.len(),
                location: call_location,
            });
        }
        if self.stack.depth() >= self.limits.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded {
                limit: self.limits.max_call_depth,
                location: call_location,
            });
        }

        let mut frame = StackFrame::new(func.name.clone());
        for (param, value) in func.params.iter().zip(args) {
            let matches = match (&param.param_type, &value) {
                (Type::Int, Value::Int(_)) => true,
                (Type::IntArray(_), Value::Array(_)) => true,
                _ => false,
            };
            if !matches {
                return Err(RuntimeError::TypeError {
                    expected: format!("{} for parameter '{}'", param.param_type, param.name),
                    got: value.type_name().to_string(),
                    location: call_location,
                });
            }
            frame.declare(
                &param.name,
                LocalVar::new(param.param_type, param.is_const, value),
            );
        }

        self.stack.push_frame_with(frame);
        self.return_types.push(func.return_type);
        let outcome = self.execute_body(&func.body);
        self.return_types.pop();
        if let Some(frame) = self.stack.pop_frame() {
            self.free_arrays(frame.into_owned_arrays(), call_location)?;
        }
        outcome?;

        match std::mem::replace(&mut self.control_flow, ControlFlow::Normal) {
            ControlFlow::Return(value) => Ok(value),
            ControlFlow::Normal if func.return_type == Type::Void => Ok(Value::Void),
            ControlFlow::Normal => Err(RuntimeError::MissingReturn {
                function: func.name.clone(),
                location: func.location,
            }),
            ControlFlow::Break => Err(RuntimeError::StrayControlFlow {
                keyword: "break",
                location: self.current_location,
            }),
            ControlFlow::Continue => Err(RuntimeError::StrayControlFlow {
                keyword: "continue",
                location: self.current_location,
            }),
        }
    }

    /// Function bodies share the parameters' scope, so redeclaring a parameter fails
    fn execute_body(&mut self, body: &[AstNode]) -> Result<(), RuntimeError> {
        for stmt in body {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        Ok(())
    }

    pub(crate) fn current_return_type(&self) -> Type {
        self.return_types.last().copied().unwrap_or(Type::Void)
    }

    pub(crate) fn consume_fuel(&mut self, location: SourceLocation) -> Result<(), RuntimeError> {
        self.fuel_used += 1;
        if self.fuel_used > self.limits.fuel {
            tracing::debug!(limit = self.limits.fuel, line = location.line, "fuel exhausted");
            return Err(RuntimeError::FuelExhausted {
                limit: self.limits.fuel,
                location,
            });
        }
        Ok(())
    }

    /// Run `eval` one level deeper, failing past [`MAX_EVAL_DEPTH`]
    pub(crate) fn nested<T>(
        &mut self,
        location: SourceLocation,
        eval: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        if self.nesting >= MAX_EVAL_DEPTH {
            return Err(RuntimeError::NestingTooDeep {
                limit: MAX_EVAL_DEPTH,
                location,
            });
        }
        self.nesting += 1;
        let result = eval(self);
        self.nesting -= 1;
        result
    }

    pub(crate) fn enter_scope(&mut self) {
        if let Some(frame) = self.stack.current_frame_mut() {
            frame.enter_scope();
        }
    }

    pub(crate) fn exit_scope(&mut self) -> Result<(), RuntimeError> {
        let arrays = match self.stack.current_frame_mut() {
            Some(frame) => frame.exit_scope(),
            None => return Ok(()),
        };
        self.free_arrays(arrays, self.current_location)
    }

    fn free_arrays(
        &mut self,
        arrays: Vec<ArrayRef>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        for array in arrays {
            self.heap
                .free(array)
                .map_err(|e| RuntimeError::from_heap(e, location))?;
        }
        Ok(())
    }

    fn frame_mut(&mut self, location: SourceLocation) -> Result<&mut StackFrame, RuntimeError> {
        self.stack
            .current_frame_mut()
            .ok_or_else(|| RuntimeError::UnsupportedOperation {
                message: "no active function call".to_string(),
                location,
            })
    }

    pub(crate) fn declare_var(
        &mut self,
        name: &str,
        var: LocalVar,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let array = match var.value {
            Value::Array(array) => Some(array),
            _ => None,
        };
        let frame = self.frame_mut(location)?;
        if !frame.declare(name, var) {
            return Err(RuntimeError::Redeclaration {
                name: name.to_string(),
                location,
            });
        }
        if let Some(array) = array {
            frame.own_array(array);
        }
        Ok(())
    }

    pub(crate) fn lookup_var(
        &self,
        name: &str,
        location: SourceLocation,
    ) -> Result<&LocalVar, RuntimeError> {
        self.stack
            .current_frame()
            .and_then(|frame| frame.lookup(name))
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })
    }

    pub(crate) fn lookup_var_mut(
        &mut self,
        name: &str,
        location: SourceLocation,
    ) -> Result<&mut LocalVar, RuntimeError> {
        self.frame_mut(location)?
            .lookup_mut(name)
            .ok_or_else(|| RuntimeError::UndefinedVariable {
                name: name.to_string(),
                location,
            })
    }

    /// Read a variable's value, rejecting reads of never-assigned variables
    pub(crate) fn read_var(
        &self,
        name: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let var = self.lookup_var(name, location)?;
        if !var.value.is_initialized() {
            return Err(RuntimeError::UninitializedRead {
                var: name.to_string(),
                location,
            });
        }
        Ok(var.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse_source;

    fn interpreter(source: &str, limits: Limits) -> Interpreter {
        let program = parse_source(source).unwrap();
        Interpreter::new(program, limits).unwrap()
    }

    fn sort_with(source: &str, values: &[i32]) -> Result<Vec<i32>, RuntimeError> {
        let mut interp = interpreter(source, Limits::default());
        let arr = interp.alloc_array(values)?;
        interp.call_function(
            "bubble_sort",
            vec![Value::Array(arr), Value::Int(values.len() as i32)],
        )?;
        interp.read_array(arr)
    }

    #[test]
    fn test_bubble_sort_mutates_argument() {
        let source = r#"
            void bubble_sort(int arr[], int n) {
                for (int i = 0; i < n - 1; i++) {
                    for (int j = 0; j < n - i - 1; j++) {
                        if (arr[j] > arr[j + 1]) {
                            int tmp = arr[j];
                            arr[j] = arr[j + 1];
                            arr[j + 1] = tmp;
                        }
                    }
                }
            }
        "#;
        assert_eq!(sort_with(source, &[5, 3, 8, 4, 2]).unwrap(), vec![2, 3, 4, 5, 8]);
    }

    #[test]
    fn test_user_swap_shadows_builtin() {
        let source = r#"
            void swap(int a[], int i, int j) {
                a[i] = 0;
                a[j] = 0;
            }
            void bubble_sort(int arr[], int n) {
                swap(arr, 0, 1);
            }
        "#;
        assert_eq!(sort_with(source, &[2, 1, 3]).unwrap(), vec![0, 0, 3]);
    }

    #[test]
    fn test_builtin_swap() {
        let source = "void bubble_sort(int arr[], int n) { swap(arr, 0, n - 1); }";
        assert_eq!(sort_with(source, &[1, 2, 3]).unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_missing_return_is_error() {
        let source = "int bubble_sort(int arr[], int n) { n = n + 1; }";
        let err = sort_with(source, &[1]).unwrap_err();
        assert!(matches!(err, RuntimeError::MissingReturn { ref function, .. } if function == "bubble_sort"));
    }

    #[test]
    fn test_infinite_loop_exhausts_fuel() {
        let mut interp = interpreter(
            "void bubble_sort(int arr[], int n) { for (;;) {} }",
            Limits {
                fuel: 500,
                ..Limits::default()
            },
        );
        let arr = interp.alloc_array(&[1]).unwrap();
        let err = interp
            .call_function("bubble_sort", vec![Value::Array(arr), Value::Int(1)])
            .unwrap_err();
        assert!(matches!(err, RuntimeError::FuelExhausted { limit: 500, .. }));
    }

    #[test]
    fn test_runaway_recursion() {
        let mut interp = interpreter(
            "int f(int x) { return f(x + 1); }",
            Limits {
                max_call_depth: 16,
                ..Limits::default()
            },
        );
        let err = interp.call_function("f", vec![Value::Int(0)]).unwrap_err();
        assert!(matches!(err, RuntimeError::CallDepthExceeded { limit: 16, .. }));
    }

    #[test]
    fn test_out_of_bounds_write() {
        let source = "void bubble_sort(int arr[], int n) { arr[n] = 1; }";
        let err = sort_with(source, &[1, 2]).unwrap_err();
        assert!(matches!(err, RuntimeError::BufferOverrun { index: 2, size: 2, .. }));
    }

    #[test]
    fn test_duplicate_function_rejected() {
        let program = parse_source("void f() {} void f() {}").unwrap();
        assert!(matches!(
            Interpreter::new(program, Limits::default()),
            Err(RuntimeError::DuplicateFunction { .. })
        ));
    }

    #[test]
    fn test_argument_count_checked() {
        let mut interp = interpreter(
            "void bubble_sort(int arr[], int n) {}",
            Limits::default(),
        );
        let err = interp.call_function("bubble_sort", vec![]).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::ArgumentCountMismatch {
                expected: 2,
                got: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_undefined_entry() {
        let mut interp = interpreter("void sort(int arr[], int n) {}", Limits::default());
        assert!(matches!(
            interp.call_function("bubble_sort", vec![]),
            Err(RuntimeError::UndefinedFunction { .. })
        ));
    }

    #[test]
    fn test_printf_captured() {
        let mut interp = interpreter(
            r#"int main() { int x = 6 * 7; printf("x = %d, %s%%\n", x, "ok"); return 0; }"#,
            Limits::default(),
        );
        assert_eq!(interp.call_function("main", vec![]).unwrap(), Value::Int(0));
        assert_eq!(interp.console().lines(), &["x = 42, ok%"]);
    }

    #[test]
    fn test_output_cap() {
        let mut interp = interpreter(
            r#"void main() { int i = 0; while (i < 100) { printf("%d\n", i); i++; } }"#,
            Limits {
                max_output_lines: 10,
                ..Limits::default()
            },
        );
        interp.call_function("main", vec![]).unwrap();
        assert_eq!(interp.console().lines().len(), 10);
        assert!(interp.console().is_truncated());
    }
}
