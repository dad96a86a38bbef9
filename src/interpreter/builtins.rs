//! Built-in function implementations
//!
//! # Supported Built-ins
//!
//! - `printf(format, ...)`: formatted output to the captured console. The
//!   format must be a string literal; `%d`/`%i` take an `int`, `%s` takes a
//!   string literal and `%%` prints a percent sign.
//! - `swap(arr, i, j)`: exchanges two elements of an array in place.
//!
//! A user function with the same name replaces the built-in.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::Value;
use crate::parser::ast::{AstNode, SourceLocation};

/// An evaluated printf argument
enum PrintfArg {
    Int(i32),
    Str(String),
}

impl Interpreter {
    pub(crate) fn builtin_printf(
        &mut self,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let Some((format_arg, rest)) = args.split_first() else {
            return Err(RuntimeError::InvalidPrintfFormat {
                message: "printf requires at least one argument".to_string(),
                location,
            });
        };

        let AstNode::StringLiteral(format_str, _) = format_arg else {
            return Err(RuntimeError::InvalidPrintfFormat {
                message: "printf format must be a string literal".to_string(),
                location,
            });
        };

        let mut arg_values = Vec::with_capacity(rest.len());
        for arg in rest {
            let value = match arg {
                AstNode::StringLiteral(s, _) => PrintfArg::Str(s.clone()),
                expr => PrintfArg::Int(self.evaluate_int(expr)?),
            };
            arg_values.push(value);
        }

        let output = Self::format_printf(format_str, &arg_values, location)?;
        self.console.print(&output);

        // printf returns the number of characters written
        Ok(Value::Int(
            i32::try_from(output.chars().count()).unwrap_or(i32::MAX),
        ))
    }

    fn format_printf(
        format: &str,
        args: &[PrintfArg],
        location: SourceLocation,
    ) -> Result<String, RuntimeError> {
        let mut output = String::new();
        let mut chars = format.chars();
        let mut args = args.iter();

        let missing = || RuntimeError::InvalidPrintfFormat {
            message: "Not enough arguments for format string".to_string(),
            location,
        };

        while let Some(ch) = chars.next() {
            if ch != '%' {
                output.push(ch);
                continue;
            }
            match chars.next() {
                Some('%') => output.push('%'),
                Some('d') | Some('i') => match args.next().ok_or_else(missing)? {
                    PrintfArg::Int(n) => output.push_str(&n.to_string()),
                    PrintfArg::Str(_) => {
                        return Err(RuntimeError::InvalidPrintfFormat {
                            message: "%d expects an int argument".to_string(),
                            location,
                        });
                    }
                },
                Some('s') => match args.next().ok_or_else(missing)? {
                    PrintfArg::Str(s) => output.push_str(s),
                    PrintfArg::Int(_) => {
                        return Err(RuntimeError::InvalidPrintfFormat {
                            message: "%s expects a string literal".to_string(),
                            location,
                        });
                    }
                },
                Some(other) => {
                    return Err(RuntimeError::InvalidPrintfFormat {
                        message: format!("unsupported format specifier '%{}'", other),
                        location,
                    });
                }
                None => {
                    return Err(RuntimeError::InvalidPrintfFormat {
                        message: "format string ends with '%'".to_string(),
                        location,
                    });
                }
            }
        }

        Ok(output)
    }

    pub(crate) fn builtin_swap(
        &mut self,
        args: &[AstNode],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let [array, i, j] = args else {
            return Err(RuntimeError::ArgumentCountMismatch {
                function: "swap".to_string(),
                expected: 3,
                got: args.len(),
                location,
            });
        };

        if let AstNode::Variable(name, _) = array {
            if self.lookup_var(name, location)?.is_const {
                return Err(RuntimeError::ConstModification {
                    var: name.clone(),
                    location,
                });
            }
        }

        let array = self.evaluate_array(array)?;
        let i = self.evaluate_int(i)?;
        let j = self.evaluate_int(j)?;
        self.heap
            .swap(array, i64::from(i), i64::from(j))
            .map_err(|e| RuntimeError::from_heap(e, location))?;
        Ok(Value::Void)
    }
}
