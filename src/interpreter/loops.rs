//! Loop statement execution (`while`, `do-while`, `for`).
//!
//! `break` and `continue` are propagated via `LoopBodyResult` so the loop
//! driver can react without inspecting `control_flow` directly. Every
//! iteration consumes fuel, so even an empty-bodied `for (;;)` terminates.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{AstNode, SourceLocation};

/// How a loop body ended
pub(crate) enum LoopBodyResult {
    /// Body completed normally or via `continue`; iterate again
    Continue,
    /// `break` was encountered
    Break,
    /// `return` was triggered; unwind and leave `control_flow` set
    Exit,
}

impl Interpreter {
    /// Executes all statements in `body` inside a fresh scope.
    pub(crate) fn execute_loop_body(
        &mut self,
        body: &[AstNode],
    ) -> Result<LoopBodyResult, RuntimeError> {
        self.enter_scope();
        for stmt in body {
            self.execute_statement(stmt)?;
            match self.control_flow {
                ControlFlow::Normal => {}
                ControlFlow::Break => {
                    self.control_flow = ControlFlow::Normal;
                    self.exit_scope()?;
                    return Ok(LoopBodyResult::Break);
                }
                ControlFlow::Continue => {
                    self.control_flow = ControlFlow::Normal;
                    self.exit_scope()?;
                    return Ok(LoopBodyResult::Continue);
                }
                ControlFlow::Return(_) => {
                    self.exit_scope()?;
                    return Ok(LoopBodyResult::Exit);
                }
            }
        }
        self.exit_scope()?;
        Ok(LoopBodyResult::Continue)
    }

    pub(crate) fn execute_while(
        &mut self,
        condition: &AstNode,
        body: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        loop {
            self.consume_fuel(location)?;
            if !self.evaluate_condition(condition)? {
                break;
            }
            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
        }
        Ok(())
    }

    /// The body always runs at least once
    pub(crate) fn execute_do_while(
        &mut self,
        body: &[AstNode],
        condition: &AstNode,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        loop {
            self.consume_fuel(location)?;
            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
            if !self.evaluate_condition(condition)? {
                break;
            }
        }
        Ok(())
    }

    /// `for (init; condition; increment)`. A declaration in `init` is scoped
    /// to the loop; a missing condition loops forever.
    pub(crate) fn execute_for(
        &mut self,
        init: Option<&AstNode>,
        condition: Option<&AstNode>,
        increment: Option<&AstNode>,
        body: &[AstNode],
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        self.enter_scope();
        if let Some(init) = init {
            self.execute_statement(init)?;
        }

        loop {
            self.consume_fuel(location)?;
            if let Some(condition) = condition {
                if !self.evaluate_condition(condition)? {
                    break;
                }
            }
            match self.execute_loop_body(body)? {
                LoopBodyResult::Exit | LoopBodyResult::Break => break,
                LoopBodyResult::Continue => {}
            }
            if let Some(increment) = increment {
                self.evaluate_expr(increment)?;
            }
        }

        self.exit_scope()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::{Interpreter, Limits};
    use crate::memory::value::Value;
    use crate::parser::parse::parse_source;

    fn eval(source: &str) -> Value {
        let program = parse_source(source).unwrap();
        let mut interp = Interpreter::new(program, Limits::default()).unwrap();
        interp.call_function("f", vec![]).unwrap()
    }

    #[test]
    fn test_while_with_break_and_continue() {
        let source = r#"
            int f() {
                int i = 0;
                int sum = 0;
                while (1) {
                    i++;
                    if (i % 2 == 0) continue;
                    if (i > 9) break;
                    sum += i;
                }
                return sum;
            }
        "#;
        assert_eq!(eval(source), Value::Int(1 + 3 + 5 + 7 + 9));
    }

    #[test]
    fn test_do_while_runs_once() {
        let source = "int f() { int n = 0; do { n++; } while (0); return n; }";
        assert_eq!(eval(source), Value::Int(1));
    }

    #[test]
    fn test_for_scope_and_return_inside_loop() {
        let source = r#"
            int f() {
                int i = 100;
                for (int i = 0; i < 10; i++) {
                    if (i == 4) return i * 10 + 1;
                }
                return i;
            }
        "#;
        assert_eq!(eval(source), Value::Int(41));

        let source = "int f() { int i = 7; for (int i = 0; i < 3; i++) {} return i; }";
        assert_eq!(eval(source), Value::Int(7));
    }

    #[test]
    fn test_nested_break_only_exits_inner() {
        let source = r#"
            int f() {
                int count = 0;
                for (int i = 0; i < 3; i++) {
                    for (int j = 0; j < 3; j++) {
                        if (j == 1) break;
                        count++;
                    }
                }
                return count;
            }
        "#;
        assert_eq!(eval(source), Value::Int(3));
    }
}
