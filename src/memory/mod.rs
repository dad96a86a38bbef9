//! Memory model for the sandbox interpreter
//!
//! - [`value`]: Runtime value representation (Int, Array handle, Void)
//! - [`heap`]: Array storage with a global cell budget
//! - [`stack`]: Call stack with frames and block scopes
//!
//! # Arrays
//!
//! Arrays never live inside a variable. A variable holds an [`value::ArrayRef`]
//! into the [`heap::ArrayHeap`], so passing an array to a function passes it by
//! reference exactly like C array parameters decay to pointers:
//!
//! ```text
//! int a[3]  →  Value::Array(ArrayRef(0))  →  heap block 0: [?, ?, ?]
//! ```

pub mod heap;
pub mod stack;
pub mod value;
