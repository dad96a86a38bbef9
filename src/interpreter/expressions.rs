//! Expression evaluation
//!
//! All integer arithmetic is checked: overflow and division by zero are
//! runtime errors rather than wrapping or panicking. Assignments go through
//! [`LValue`] so variables and array elements share one write path.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{ArrayRef, Value};
use crate::parser::ast::{AstNode, BinOp, SourceLocation, Type, UnOp};

/// An assignable place
pub(crate) enum LValue {
    Var(String),
    Element {
        array: ArrayRef,
        index: i64,
        /// Source spelling used in diagnostics, e.g. `arr`
        name: String,
    },
}

impl Interpreter {
    pub(crate) fn evaluate_expr(&mut self, expr: &AstNode) -> Result<Value, RuntimeError> {
        let location = expr.location();
        self.consume_fuel(location)?;
        self.nested(location, |interp| interp.evaluate_node(expr))
    }

    fn evaluate_node(&mut self, expr: &AstNode) -> Result<Value, RuntimeError> {
        match expr {
            AstNode::IntLiteral(n, _) => Ok(Value::Int(*n)),

            AstNode::Variable(name, location) => self.read_var(name, *location),

            AstNode::Assignment { lhs, rhs, location } => {
                let target = self.resolve_lvalue(lhs)?;
                let value = self.evaluate_int(rhs)?;
                self.write_lvalue(&target, value, *location)?;
                Ok(Value::Int(value))
            }

            AstNode::CompoundAssignment {
                lhs,
                op,
                rhs,
                location,
            } => {
                let target = self.resolve_lvalue(lhs)?;
                let current = self.read_lvalue(&target, *location)?;
                let rhs = self.evaluate_int(rhs)?;
                let value = Self::apply_binary(*op, current, rhs, *location)?;
                self.write_lvalue(&target, value, *location)?;
                Ok(Value::Int(value))
            }

            AstNode::BinaryOp {
                op: BinOp::And,
                left,
                right,
                ..
            } => {
                let result = self.evaluate_condition(left)? && self.evaluate_condition(right)?;
                Ok(Value::Int(i32::from(result)))
            }

            AstNode::BinaryOp {
                op: BinOp::Or,
                left,
                right,
                ..
            } => {
                let result = self.evaluate_condition(left)? || self.evaluate_condition(right)?;
                Ok(Value::Int(i32::from(result)))
            }

            AstNode::BinaryOp {
                op,
                left,
                right,
                location,
            } => {
                let l = self.evaluate_int(left)?;
                let r = self.evaluate_int(right)?;
                Ok(Value::Int(Self::apply_binary(*op, l, r, *location)?))
            }

            AstNode::UnaryOp {
                op,
                operand,
                location,
            } => self.evaluate_unary(*op, operand, *location),

            AstNode::TernaryOp {
                condition,
                true_expr,
                false_expr,
                ..
            } => {
                if self.evaluate_condition(condition)? {
                    self.evaluate_expr(true_expr)
                } else {
                    self.evaluate_expr(false_expr)
                }
            }

            AstNode::FunctionCall {
                name,
                args,
                location,
            } => self.evaluate_call(name, args, *location),

            AstNode::ArrayAccess { location, .. } => {
                let target = self.resolve_lvalue(expr)?;
                Ok(Value::Int(self.read_lvalue(&target, *location)?))
            }

            AstNode::StringLiteral(_, location) => Err(RuntimeError::UnsupportedOperation {
                message: "string literals are only allowed as printf arguments".to_string(),
                location: *location,
            }),

            AstNode::InitializerList(_, location) => Err(RuntimeError::UnsupportedOperation {
                message: "initializer list outside of an array declaration".to_string(),
                location: *location,
            }),

            other => Err(RuntimeError::UnsupportedOperation {
                message: "statement used as an expression".to_string(),
                location: other.location(),
            }),
        }
    }

    /// Evaluate an expression that must produce an `int`
    pub(crate) fn evaluate_int(&mut self, expr: &AstNode) -> Result<i32, RuntimeError> {
        match self.evaluate_expr(expr)? {
            Value::Int(n) => Ok(n),
            other => Err(RuntimeError::TypeError {
                expected: "int".to_string(),
                got: other.type_name().to_string(),
                location: expr.location(),
            }),
        }
    }

    pub(crate) fn evaluate_condition(&mut self, expr: &AstNode) -> Result<bool, RuntimeError> {
        Ok(self.evaluate_int(expr)? != 0)
    }

    /// Evaluate an expression that must name an array
    pub(crate) fn evaluate_array(&mut self, expr: &AstNode) -> Result<ArrayRef, RuntimeError> {
        match self.evaluate_expr(expr)? {
            Value::Array(array) => Ok(array),
            other => Err(RuntimeError::TypeError {
                expected: "int[]".to_string(),
                got: other.type_name().to_string(),
                location: expr.location(),
            }),
        }
    }

    fn evaluate_unary(
        &mut self,
        op: UnOp,
        operand: &AstNode,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let result = match op {
            UnOp::Neg => {
                let v = self.evaluate_int(operand)?;
                v.checked_neg()
                    .ok_or_else(|| RuntimeError::IntegerOverflow {
                        operation: format!("-({})", v),
                        location,
                    })?
            }
            UnOp::Not => i32::from(!self.evaluate_condition(operand)?),
            UnOp::BitNot => !self.evaluate_int(operand)?,
            UnOp::PreInc | UnOp::PreDec | UnOp::PostInc | UnOp::PostDec => {
                let target = self.resolve_lvalue(operand)?;
                let old = self.read_lvalue(&target, location)?;
                let delta_op = if matches!(op, UnOp::PreInc | UnOp::PostInc) {
                    BinOp::Add
                } else {
                    BinOp::Sub
                };
                let new = Self::apply_binary(delta_op, old, 1, location)?;
                self.write_lvalue(&target, new, location)?;
                if matches!(op, UnOp::PreInc | UnOp::PreDec) {
                    new
                } else {
                    old
                }
            }
        };
        Ok(Value::Int(result))
    }

    fn evaluate_call(
        &mut self,
        name: &str,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        // User definitions take precedence over built-ins of the same name
        if let Some(func) = self.lookup_function(name) {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(self.evaluate_expr(arg)?);
            }
            let result = self.invoke(func, values, location);
            self.current_location = location;
            return result;
        }

        match name {
            "printf" => self.builtin_printf(args, location),
            "swap" => self.builtin_swap(args, location),
            _ => Err(RuntimeError::UndefinedFunction {
                name: name.to_string(),
                location,
            }),
        }
    }

    pub(crate) fn resolve_lvalue(&mut self, expr: &AstNode) -> Result<LValue, RuntimeError> {
        match expr {
            AstNode::Variable(name, _) => Ok(LValue::Var(name.clone())),
            AstNode::ArrayAccess {
                array,
                index,
                location,
            } => {
                let name = match array.as_ref() {
                    AstNode::Variable(name, _) => name.clone(),
                    _ => "array".to_string(),
                };
                let array = self.evaluate_array(array)?;
                let index = self.evaluate_int(index)?;
                self.consume_fuel(*location)?;
                Ok(LValue::Element {
                    array,
                    index: i64::from(index),
                    name,
                })
            }
            other => Err(RuntimeError::UnsupportedOperation {
                message: "expression is not assignable".to_string(),
                location: other.location(),
            }),
        }
    }

    pub(crate) fn read_lvalue(
        &self,
        target: &LValue,
        location: SourceLocation,
    ) -> Result<i32, RuntimeError> {
        match target {
            LValue::Var(name) => match self.read_var(name, location)? {
                Value::Int(n) => Ok(n),
                other => Err(RuntimeError::TypeError {
                    expected: "int".to_string(),
                    got: other.type_name().to_string(),
                    location,
                }),
            },
            LValue::Element { array, index, name } => self
                .heap
                .read(*array, *index)
                .map_err(|e| RuntimeError::from_heap(e, location))?
                .ok_or_else(|| RuntimeError::UninitializedRead {
                    var: format!("{}[{}]", name, index),
                    location,
                }),
        }
    }

    pub(crate) fn write_lvalue(
        &mut self,
        target: &LValue,
        value: i32,
        location: SourceLocation,
    ) -> Result<(), RuntimeError> {
        match target {
            LValue::Var(name) => {
                let var = self.lookup_var_mut(name, location)?;
                if var.is_const {
                    return Err(RuntimeError::ConstModification {
                        var: name.clone(),
                        location,
                    });
                }
                if var.var_type != Type::Int {
                    return Err(RuntimeError::TypeError {
                        expected: "int".to_string(),
                        got: var.var_type.to_string(),
                        location,
                    });
                }
                var.value = Value::Int(value);
                Ok(())
            }
            LValue::Element { array, index, name } => {
                if self.lookup_var(name, location).is_ok_and(|var| var.is_const) {
                    return Err(RuntimeError::ConstModification {
                        var: name.clone(),
                        location,
                    });
                }
                self.heap
                    .write(*array, *index, value)
                    .map_err(|e| RuntimeError::from_heap(e, location))
            }
        }
    }

    pub(crate) fn apply_binary(
        op: BinOp,
        l: i32,
        r: i32,
        location: SourceLocation,
    ) -> Result<i32, RuntimeError> {
        let overflow = || RuntimeError::IntegerOverflow {
            operation: format!("{} {} {}", l, op.symbol(), r),
            location,
        };
        let div_zero = || RuntimeError::DivisionByZero {
            operation: format!("{} {} {}", l, op.symbol(), r),
            location,
        };

        match op {
            BinOp::Add => l.checked_add(r).ok_or_else(overflow),
            BinOp::Sub => l.checked_sub(r).ok_or_else(overflow),
            BinOp::Mul => l.checked_mul(r).ok_or_else(overflow),
            BinOp::Div if r == 0 => Err(div_zero()),
            BinOp::Div => l.checked_div(r).ok_or_else(overflow),
            BinOp::Mod if r == 0 => Err(div_zero()),
            BinOp::Mod => l.checked_rem(r).ok_or_else(overflow),
            BinOp::Eq => Ok(i32::from(l == r)),
            BinOp::Ne => Ok(i32::from(l != r)),
            BinOp::Lt => Ok(i32::from(l < r)),
            BinOp::Le => Ok(i32::from(l <= r)),
            BinOp::Gt => Ok(i32::from(l > r)),
            BinOp::Ge => Ok(i32::from(l >= r)),
            BinOp::And => Ok(i32::from(l != 0 && r != 0)),
            BinOp::Or => Ok(i32::from(l != 0 || r != 0)),
            BinOp::BitAnd => Ok(l & r),
            BinOp::BitOr => Ok(l | r),
            BinOp::BitXor => Ok(l ^ r),
            BinOp::BitShl => u32::try_from(r)
                .ok()
                .and_then(|shift| l.checked_shl(shift))
                .ok_or_else(overflow),
            BinOp::BitShr => u32::try_from(r)
                .ok()
                .and_then(|shift| l.checked_shr(shift))
                .ok_or_else(overflow),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::engine::Limits;
    use crate::parser::parse::parse_source;

    fn eval(body: &str) -> Result<Value, RuntimeError> {
        let source = format!("int f() {{ {} }}", body);
        let program = parse_source(&source).unwrap();
        let mut interp = Interpreter::new(program, Limits::default()).unwrap();
        interp.call_function("f", vec![])
    }

    #[test]
    fn test_precedence_and_operators() {
        assert_eq!(eval("return 2 + 3 * 4;"), Ok(Value::Int(14)));
        assert_eq!(eval("return (7 / 2) + (7 % 2) * 10;"), Ok(Value::Int(13)));
        assert_eq!(eval("return 1 << 4 | 3 & 1;"), Ok(Value::Int(17)));
        assert_eq!(eval("return -5 < 3 ? 10 : 20;"), Ok(Value::Int(10)));
        assert_eq!(eval("return !0 + ~0;"), Ok(Value::Int(0)));
    }

    #[test]
    fn test_increment_semantics() {
        assert_eq!(eval("int i = 5; int a = i++; return a * 10 + i;"), Ok(Value::Int(56)));
        assert_eq!(eval("int i = 5; int a = --i; return a * 10 + i;"), Ok(Value::Int(44)));
        assert_eq!(eval("int x = 3; x *= 4; x -= 2; return x;"), Ok(Value::Int(10)));
    }

    #[test]
    fn test_short_circuit_skips_division() {
        assert_eq!(eval("int z = 0; return z != 0 && 10 / z > 1;"), Ok(Value::Int(0)));
        assert_eq!(eval("int z = 0; return z == 0 || 10 / z > 1;"), Ok(Value::Int(1)));
    }

    #[test]
    fn test_arithmetic_errors() {
        assert!(matches!(
            eval("int z = 0; return 1 / z;"),
            Err(RuntimeError::DivisionByZero { .. })
        ));
        assert!(matches!(
            eval("int big = 2147483647; return big + 1;"),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            eval("return 1 << 40;"),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_array_element_updates() {
        assert_eq!(
            eval("int a[3] = {1, 2, 3}; a[1] += 10; a[2]++; return a[0] + a[1] + a[2];"),
            Ok(Value::Int(17))
        );
        assert!(matches!(
            eval("int a[2] = {1, 2}; int i = -1; return a[i];"),
            Err(RuntimeError::BufferOverrun { index: -1, size: 2, .. })
        ));
    }

    #[test]
    fn test_type_errors() {
        assert!(matches!(
            eval("int a[2] = {1, 2}; return a + 1;"),
            Err(RuntimeError::TypeError { .. })
        ));
        assert!(matches!(
            eval("int x = 1; return x[0];"),
            Err(RuntimeError::TypeError { .. })
        ));
    }

    #[test]
    fn test_undefined_names() {
        assert!(matches!(
            eval("return y;"),
            Err(RuntimeError::UndefinedVariable { .. })
        ));
        assert!(matches!(
            eval("return nope(1);"),
            Err(RuntimeError::UndefinedFunction { .. })
        ));
    }
}
