//! Minimal text buffer for the code exercise
//!
//! Lines are stored as `String`s and the cursor column counts characters,
//! not bytes. Enter copies the current line's indentation.

#[derive(Debug, Clone)]
pub struct Editor {
    lines: Vec<String>,
    row: usize,
    col: usize,
    /// First visible line, maintained by the renderer
    pub scroll: usize,
}

impl Editor {
    pub fn new(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Editor {
            lines,
            row: 0,
            col: 0,
            scroll: 0,
        }
    }

    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// (row, column) of the cursor, both 0-based
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn set_text(&mut self, text: &str) {
        *self = Editor::new(text);
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset();
        self.lines[self.row].insert(at, c);
        self.col += 1;
    }

    pub fn insert_newline(&mut self) {
        let at = self.byte_offset();
        let rest = self.lines[self.row].split_off(at);
        let indent: String = self.lines[self.row]
            .chars()
            .take_while(|c| *c == ' ')
            .collect();
        self.col = indent.chars().count();
        self.row += 1;
        self.lines.insert(self.row, indent + rest.trim_start());
    }

    /// Delete the character before the cursor, joining lines at column 0
    pub fn backspace(&mut self) {
        if self.col > 0 {
            self.col -= 1;
            let at = self.byte_offset();
            self.lines[self.row].remove(at);
        } else if self.row > 0 {
            let line = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            self.lines[self.row].push_str(&line);
        }
    }

    /// Delete the character under the cursor, joining lines at line end
    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let at = self.byte_offset();
            self.lines[self.row].remove(at);
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            self.lines[self.row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_home(&mut self) {
        self.col = 0;
    }

    pub fn move_end(&mut self) {
        self.col = self.line_len(self.row);
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_offset(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map_or(line.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_newline_keeps_indent() {
        let mut editor = Editor::new("    x");
        editor.move_end();
        editor.insert_char(';');
        editor.insert_newline();
        editor.insert_char('y');
        assert_eq!(editor.text(), "    x;\n    y\n");
        assert_eq!(editor.cursor(), (1, 5));
    }

    #[test]
    fn test_split_and_join_lines() {
        let mut editor = Editor::new("ab");
        editor.move_right();
        editor.insert_newline();
        assert_eq!(editor.lines(), &["a", "b"]);
        editor.backspace();
        assert_eq!(editor.lines(), &["ab"]);
        assert_eq!(editor.cursor(), (0, 1));
        editor.move_home();
        editor.delete();
        assert_eq!(editor.lines(), &["b"]);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut editor = Editor::new("é");
        editor.move_end();
        editor.insert_char('ü');
        editor.move_left();
        editor.backspace();
        assert_eq!(editor.lines(), &["ü"]);
    }

    #[test]
    fn test_vertical_moves_clamp_column() {
        let mut editor = Editor::new("long line\nab");
        editor.move_end();
        editor.move_down();
        assert_eq!(editor.cursor(), (1, 2));
        editor.move_up();
        assert_eq!(editor.cursor(), (0, 2));
    }
}
