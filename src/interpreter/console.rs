//! Captured console output
//!
//! `printf` calls from a submission write here instead of to a real terminal.
//! Output is split into lines; once the line cap is reached further output is
//! dropped and the console is marked truncated.

/// Default cap on captured lines
pub const DEFAULT_MAX_LINES: usize = 200;

#[derive(Debug, Clone)]
pub struct Console {
    lines: Vec<String>,
    /// Whether the last line is still being written (no trailing newline yet)
    line_open: bool,
    max_lines: usize,
    truncated: bool,
}

impl Console {
    pub fn new(max_lines: usize) -> Self {
        Console {
            lines: Vec::new(),
            line_open: false,
            max_lines,
            truncated: false,
        }
    }

    /// Print without an implicit newline
    pub fn print(&mut self, text: &str) {
        for ch in text.chars() {
            if !self.line_open {
                if self.lines.len() >= self.max_lines {
                    self.truncated = true;
                    return;
                }
                self.lines.push(String::new());
                self.line_open = true;
            }
            if ch == '\n' {
                self.line_open = false;
            } else if let Some(line) = self.lines.last_mut() {
                line.push(ch);
            }
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// All captured output joined with newlines
    pub fn output(&self) -> String {
        self.lines.join("\n")
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.line_open = false;
        self.truncated = false;
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_prints_join_one_line() {
        let mut console = Console::default();
        console.print("a = ");
        console.print("5\n");
        console.print("done");
        assert_eq!(console.lines(), &["a = 5", "done"]);
    }

    #[test]
    fn test_blank_lines_kept() {
        let mut console = Console::default();
        console.print("x\n\ny\n");
        assert_eq!(console.lines(), &["x", "", "y"]);
        assert_eq!(console.output(), "x\n\ny");
    }

    #[test]
    fn test_line_cap_truncates() {
        let mut console = Console::new(2);
        for i in 0..5 {
            console.print(&format!("{}\n", i));
        }
        assert_eq!(console.lines(), &["0", "1"]);
        assert!(console.is_truncated());

        console.clear();
        assert!(console.is_empty());
        assert!(!console.is_truncated());
    }
}
