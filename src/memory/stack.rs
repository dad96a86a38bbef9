//! Call stack implementation
//!
//! - [`Stack`]: The call stack containing frames
//! - [`StackFrame`]: A single function's activation record
//! - [`LocalVar`]: A local variable with its declared type
//!
//! Each frame keeps a stack of block scopes. A declaration lands in the
//! innermost scope and may shadow a name from an outer one; redeclaring a name
//! in the same scope is rejected by the interpreter. A scope also remembers
//! the arrays declared in it, so their heap blocks can be freed when it ends.

use super::value::{ArrayRef, Value};
use crate::parser::ast::Type;
use rustc_hash::FxHashMap;

/// Local variable on the stack
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVar {
    pub value: Value,
    pub var_type: Type,
    pub is_const: bool,
}

impl LocalVar {
    pub fn new(var_type: Type, is_const: bool, value: Value) -> Self {
        LocalVar {
            value,
            var_type,
            is_const,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Scope {
    vars: FxHashMap<String, LocalVar>,
    /// Arrays declared here, not parameters
    arrays: Vec<ArrayRef>,
}

/// Stack frame for a function call
#[derive(Debug, Clone)]
pub struct StackFrame {
    pub function_name: String,
    scopes: Vec<Scope>,
}

impl StackFrame {
    pub fn new(function_name: String) -> Self {
        StackFrame {
            function_name,
            scopes: vec![Scope::default()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope, returning the arrays declared in it
    pub fn exit_scope(&mut self) -> Vec<ArrayRef> {
        // The function-level scope is never popped
        if self.scopes.len() > 1 {
            self.scopes.pop().map(|scope| scope.arrays).unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    /// Declare in the innermost scope; returns false if the name is already
    /// declared there.
    pub fn declare(&mut self, name: &str, var: LocalVar) -> bool {
        let Some(scope) = self.scopes.last_mut() else {
            return false;
        };
        if scope.vars.contains_key(name) {
            return false;
        }
        scope.vars.insert(name.to_string(), var);
        true
    }

    /// Tie `array` to the innermost scope
    pub fn own_array(&mut self, array: ArrayRef) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.arrays.push(array);
        }
    }

    /// Every array declared in any scope of this frame
    pub fn into_owned_arrays(self) -> Vec<ArrayRef> {
        self.scopes.into_iter().flat_map(|scope| scope.arrays).collect()
    }

    pub fn lookup(&self, name: &str) -> Option<&LocalVar> {
        self.scopes.iter().rev().find_map(|scope| scope.vars.get(name))
    }

    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut LocalVar> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.vars.get_mut(name))
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }
}

/// The call stack
#[derive(Debug, Clone, Default)]
pub struct Stack {
    frames: Vec<StackFrame>,
}

impl Stack {
    pub fn new() -> Self {
        Stack::default()
    }

    pub fn push_frame(&mut self, function_name: String) {
        self.frames.push(StackFrame::new(function_name));
    }

    /// Push a frame whose parameters are already declared
    pub fn push_frame_with(&mut self, frame: StackFrame) {
        self.frames.push(frame);
    }

    pub fn pop_frame(&mut self) -> Option<StackFrame> {
        self.frames.pop()
    }

    pub fn current_frame(&self) -> Option<&StackFrame> {
        self.frames.last()
    }

    pub fn current_frame_mut(&mut self) -> Option<&mut StackFrame> {
        self.frames.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowing_and_scope_exit() {
        let mut frame = StackFrame::new("f".to_string());
        assert!(frame.declare("x", LocalVar::new(Type::Int, false, Value::Int(1))));
        assert!(!frame.declare("x", LocalVar::new(Type::Int, false, Value::Int(2))));

        frame.enter_scope();
        assert!(frame.declare("x", LocalVar::new(Type::Int, false, Value::Int(3))));
        assert_eq!(frame.lookup("x").map(|v| v.value.clone()), Some(Value::Int(3)));
        frame.exit_scope();

        assert_eq!(frame.lookup("x").map(|v| v.value.clone()), Some(Value::Int(1)));
        frame.exit_scope();
        assert_eq!(frame.scope_depth(), 1);
    }

    #[test]
    fn test_scope_exit_hands_back_its_arrays() {
        let mut frame = StackFrame::new("f".to_string());
        frame.own_array(ArrayRef(0));
        frame.enter_scope();
        frame.own_array(ArrayRef(1));
        frame.own_array(ArrayRef(2));

        assert_eq!(frame.exit_scope(), vec![ArrayRef(1), ArrayRef(2)]);
        assert_eq!(frame.exit_scope(), Vec::new());
        assert_eq!(frame.into_owned_arrays(), vec![ArrayRef(0)]);
    }

    #[test]
    fn test_frames_pop_innermost_first() {
        let mut stack = Stack::new();
        stack.push_frame("main".to_string());
        stack.push_frame("bubble_sort".to_string());
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop_frame().map(|f| f.function_name), Some("bubble_sort".to_string()));
        assert_eq!(stack.depth(), 1);
    }
}
