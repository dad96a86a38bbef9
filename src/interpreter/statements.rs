//! Statement execution
//!
//! Adds `impl Interpreter` methods for declarations, `return`, `if`, blocks
//! and the `break`/`continue` signals. Loops live in `loops.rs`.

use crate::interpreter::engine::{ControlFlow, Interpreter};
use crate::interpreter::errors::RuntimeError;
use crate::memory::stack::LocalVar;
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, SourceLocation, Type};

impl Interpreter {
    /// Execute a single statement. Break/continue/return are left in
    /// `self.control_flow` for the enclosing block or loop to act on.
    pub(crate) fn execute_statement(&mut self, stmt: &AstNode) -> Result<(), RuntimeError> {
        let location = stmt.location();
        self.consume_fuel(location)?;
        self.current_location = location;
        self.nested(location, |interp| interp.execute_node(stmt))
    }

    fn execute_node(&mut self, stmt: &AstNode) -> Result<(), RuntimeError> {
        match stmt {
            AstNode::VarDecl {
                name,
                var_type,
                is_const,
                init,
                location,
            } => self.execute_var_decl(name, *var_type, *is_const, init.as_deref(), *location),

            AstNode::Return { expr, location } => self.execute_return(expr.as_deref(), *location),

            AstNode::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.execute_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.execute_block(else_branch)
                } else {
                    Ok(())
                }
            }

            AstNode::While {
                condition,
                body,
                location,
            } => self.execute_while(condition, body, *location),

            AstNode::DoWhile {
                body,
                condition,
                location,
            } => self.execute_do_while(body, condition, *location),

            AstNode::For {
                init,
                condition,
                increment,
                body,
                location,
            } => self.execute_for(
                init.as_deref(),
                condition.as_deref(),
                increment.as_deref(),
                body,
                *location,
            ),

            AstNode::Block { statements, .. } => self.execute_block(statements),

            AstNode::Break { .. } => {
                self.control_flow = ControlFlow::Break;
                Ok(())
            }

            AstNode::Continue { .. } => {
                self.control_flow = ControlFlow::Continue;
                Ok(())
            }

            AstNode::ExpressionStatement { expr, .. } => {
                self.evaluate_expr(expr)?;
                Ok(())
            }

            AstNode::FunctionDef { name, location, .. } => Err(RuntimeError::UnsupportedOperation {
                message: format!("nested function definition '{}'", name),
                location: *location,
            }),

            expr => {
                self.evaluate_expr(expr)?;
                Ok(())
            }
        }
    }

    /// Execute statements in a fresh scope, stopping at the first control-flow signal
    pub(crate) fn execute_block(&mut self, statements: &[AstNode]) -> Result<(), RuntimeError> {
        self.enter_scope();
        for stmt in statements {
            self.execute_statement(stmt)?;
            if self.control_flow != ControlFlow::Normal {
                break;
            }
        }
        self.exit_scope()?;
        Ok(())
    }

    fn execute_var_decl(
        &mut self,
        name: &str,
        var_type: Type,
        is_const: bool,
        init: Option<&AstNode>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = match var_type {
            Type::Int => match init {
                Some(AstNode::InitializerList(_, loc)) => {
                    return Err(RuntimeError::TypeError {
                        expected: "int".to_string(),
                        got: "initializer list".to_string(),
                        location: *loc,
                    });
                }
                Some(expr) => Value::Int(self.evaluate_int(expr)?),
                None => Value::Uninitialized,
            },

            Type::IntArray(size) => {
                let array = match init {
                    Some(AstNode::InitializerList(items, _)) => {
                        let len = size.unwrap_or(items.len());
                        if items.len() > len {
                            return Err(RuntimeError::UnsupportedOperation {
                                message: format!(
                                    "{} initializers for array '{}' of size {}",
                                    items.len(),
                                    name,
                                    len
                                ),
                                location,
                            });
                        }
                        let array = self
                            .heap
                            .allocate(len)
                            .map_err(|e| RuntimeError::from_heap(e, location))?;
                        for (index, item) in (0_i64..).zip(items) {
                            let value = self.evaluate_int(item)?;
                            self.heap
                                .write(array, index, value)
                                .map_err(|e| RuntimeError::from_heap(e, location))?;
                        }
                        // Elements without an initializer are zeroed
                        self.heap
                            .fill_from(array, items.len(), 0)
                            .map_err(|e| RuntimeError::from_heap(e, location))?;
                        array
                    }
                    Some(other) => {
                        return Err(RuntimeError::TypeError {
                            expected: "initializer list".to_string(),
                            got: "expression".to_string(),
                            location: other.location(),
                        });
                    }
                    None => {
                        let len = size.ok_or_else(|| RuntimeError::UnsupportedOperation {
                            message: format!("array '{}' needs a size or an initializer", name),
                            location,
                        })?;
                        self.heap
                            .allocate(len)
                            .map_err(|e| RuntimeError::from_heap(e, location))?
                    }
                };
                Value::Array(array)
            }

            Type::Void => {
                return Err(RuntimeError::UnsupportedOperation {
                    message: format!("variable '{}' declared void", name),
                    location,
                });
            }
        };

        self.declare_var(name, LocalVar::new(var_type, is_const, value), location)
    }

    fn execute_return(
        &mut self,
        expr: Option<&AstNode>,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        let value = match expr {
            Some(expr) => self.evaluate_expr(expr)?,
            None => Value::Void,
        };

        let return_type = self.current_return_type();
        match (return_type, &value) {
            (Type::Void, Value::Void) | (Type::Int, Value::Int(_)) => {}
            (Type::Void, _) => {
                let function = self
                    .stack
                    .current_frame()
                    .map(|frame| frame.function_name.clone())
                    .unwrap_or_default();
                return Err(RuntimeError::VoidReturnValue { function, location });
            }
            (_, value) => {
                return Err(RuntimeError::TypeError {
                    expected: return_type.to_string(),
                    got: value.type_name().to_string(),
                    location,
                });
            }
        }

        self.control_flow = ControlFlow::Return(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::interpreter::engine::{Interpreter, Limits};
    use crate::interpreter::errors::RuntimeError;
    use crate::memory::value::Value;
    use crate::parser::parse::parse_source;

    fn call(source: &str, function: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let program = parse_source(source).unwrap();
        let mut interp = Interpreter::new(program, Limits::default()).unwrap();
        interp.call_function(function, args)
    }

    #[test]
    fn test_if_else_and_return() {
        let source = "int max(int a, int b) { if (a > b) { return a; } else return b; }";
        assert_eq!(call(source, "max", vec![Value::Int(3), Value::Int(9)]), Ok(Value::Int(9)));
        assert_eq!(call(source, "max", vec![Value::Int(4), Value::Int(1)]), Ok(Value::Int(4)));
    }

    #[test]
    fn test_local_array_initializer() {
        let source = "int f() { int a[4] = {7, 8}; return a[0] + a[1] + a[2] + a[3]; }";
        assert_eq!(call(source, "f", vec![]), Ok(Value::Int(15)));
    }

    #[test]
    fn test_uninitialized_read() {
        let source = "int f() { int x; return x; }";
        assert!(matches!(
            call(source, "f", vec![]),
            Err(RuntimeError::UninitializedRead { ref var, .. }) if var == "x"
        ));

        let source = "int f() { int a[3]; return a[1]; }";
        assert!(matches!(
            call(source, "f", vec![]),
            Err(RuntimeError::UninitializedRead { ref var, .. }) if var == "a[1]"
        ));
    }

    #[test]
    fn test_block_scoping_and_shadowing() {
        let source = "int f() { int x = 1; { int x = 2; x = x + 1; } return x; }";
        assert_eq!(call(source, "f", vec![]), Ok(Value::Int(1)));

        let source = "int f(int n) { int n = 2; return n; }";
        assert!(matches!(
            call(source, "f", vec![Value::Int(1)]),
            Err(RuntimeError::Redeclaration { .. })
        ));
    }

    #[test]
    fn test_scope_ends_with_block() {
        let source = "int f() { { int y = 2; } return y; }";
        assert!(matches!(
            call(source, "f", vec![]),
            Err(RuntimeError::UndefinedVariable { ref name, .. }) if name == "y"
        ));
    }

    #[test]
    fn test_return_type_checks() {
        assert!(matches!(
            call("void f() { return 1; }", "f", vec![]),
            Err(RuntimeError::VoidReturnValue { .. })
        ));
        assert!(matches!(
            call("int f() { return; }", "f", vec![]),
            Err(RuntimeError::TypeError { .. })
        ));
    }

    #[test]
    fn test_stray_break() {
        assert!(matches!(
            call("void f() { break; }", "f", vec![]),
            Err(RuntimeError::StrayControlFlow { keyword: "break", .. })
        ));
    }

    #[test]
    fn test_oversized_initialized_array_hits_cell_cap() {
        let source = "int f() { int big[2000000000] = {1}; return big[0]; }";
        assert!(matches!(
            call(source, "f", vec![]),
            Err(RuntimeError::OutOfMemory { requested: 2_000_000_000, .. })
        ));
    }

    #[test]
    fn test_local_arrays_freed_with_their_scope() {
        // 100 iterations of 1000 cells only fit under the cap if each is freed
        let source = r#"
            int f() {
                int total = 0;
                for (int i = 0; i < 100; i++) {
                    int tmp[1000];
                    tmp[0] = i;
                    total += tmp[0];
                }
                return total;
            }
        "#;
        let program = parse_source(source).unwrap();
        let limits = Limits {
            max_array_cells: 2000,
            ..Limits::default()
        };
        let mut interp = Interpreter::new(program, limits).unwrap();
        assert_eq!(interp.call_function("f", vec![]), Ok(Value::Int(4950)));
        assert_eq!(interp.heap.cells_in_use(), 0);
    }

    #[test]
    fn test_const_variable() {
        let source = "int f() { const int k = 3; k = 4; return k; }";
        assert!(matches!(
            call(source, "f", vec![]),
            Err(RuntimeError::ConstModification { ref var, .. }) if var == "k"
        ));
    }
}
