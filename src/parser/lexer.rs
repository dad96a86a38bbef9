//! Lexer (tokenizer) for submitted sort functions
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! `#include` and other preprocessor lines are skipped, so a learner can paste a
//! complete C file.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    IntLiteral(i32, SourceLocation),
    StringLiteral(String, SourceLocation),

    Ident(String, SourceLocation),

    // Keywords
    Int(SourceLocation),
    Void(SourceLocation),
    Const(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    While(SourceLocation),
    Do(SourceLocation),
    For(SourceLocation),
    Break(SourceLocation),
    Continue(SourceLocation),
    Return(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),
    Minus(SourceLocation),
    Star(SourceLocation),
    Slash(SourceLocation),
    Percent(SourceLocation),

    // Comparison
    EqEq(SourceLocation),
    NotEq(SourceLocation),
    Lt(SourceLocation),
    Le(SourceLocation),
    Gt(SourceLocation),
    Ge(SourceLocation),

    // Logical
    AndAnd(SourceLocation),
    OrOr(SourceLocation),
    Bang(SourceLocation),

    // Bitwise
    Amp(SourceLocation),
    Pipe(SourceLocation),
    Caret(SourceLocation),
    Tilde(SourceLocation),
    LtLt(SourceLocation),
    GtGt(SourceLocation),

    // Assignment
    Eq(SourceLocation),
    PlusEq(SourceLocation),
    MinusEq(SourceLocation),
    StarEq(SourceLocation),
    SlashEq(SourceLocation),
    PercentEq(SourceLocation),

    PlusPlus(SourceLocation),
    MinusMinus(SourceLocation),

    // Ternary
    Question(SourceLocation),
    Colon(SourceLocation),

    // Punctuation
    LParen(SourceLocation),
    RParen(SourceLocation),
    LBrace(SourceLocation),
    RBrace(SourceLocation),
    LBracket(SourceLocation),
    RBracket(SourceLocation),
    Semicolon(SourceLocation),
    Comma(SourceLocation),

    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::IntLiteral(_, loc) | Token::StringLiteral(_, loc) | Token::Ident(_, loc) => *loc,
            Token::Int(loc)
            | Token::Void(loc)
            | Token::Const(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::While(loc)
            | Token::Do(loc)
            | Token::For(loc)
            | Token::Break(loc)
            | Token::Continue(loc)
            | Token::Return(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::NotEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::AndAnd(loc)
            | Token::OrOr(loc)
            | Token::Bang(loc)
            | Token::Amp(loc)
            | Token::Pipe(loc)
            | Token::Caret(loc)
            | Token::Tilde(loc)
            | Token::LtLt(loc)
            | Token::GtGt(loc)
            | Token::Eq(loc)
            | Token::PlusEq(loc)
            | Token::MinusEq(loc)
            | Token::StarEq(loc)
            | Token::SlashEq(loc)
            | Token::PercentEq(loc)
            | Token::PlusPlus(loc)
            | Token::MinusMinus(loc)
            | Token::Question(loc)
            | Token::Colon(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::IntLiteral(n, _) => return write!(f, "int literal {}", n),
            Token::StringLiteral(s, _) => return write!(f, "string literal \"{}\"", s),
            Token::Ident(s, _) => return write!(f, "identifier '{}'", s),
            Token::Eof(_) => return write!(f, "end of file"),
            Token::Int(_) => "int",
            Token::Void(_) => "void",
            Token::Const(_) => "const",
            Token::If(_) => "if",
            Token::Else(_) => "else",
            Token::While(_) => "while",
            Token::Do(_) => "do",
            Token::For(_) => "for",
            Token::Break(_) => "break",
            Token::Continue(_) => "continue",
            Token::Return(_) => "return",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Star(_) => "*",
            Token::Slash(_) => "/",
            Token::Percent(_) => "%",
            Token::EqEq(_) => "==",
            Token::NotEq(_) => "!=",
            Token::Lt(_) => "<",
            Token::Le(_) => "<=",
            Token::Gt(_) => ">",
            Token::Ge(_) => ">=",
            Token::AndAnd(_) => "&&",
            Token::OrOr(_) => "||",
            Token::Bang(_) => "!",
            Token::Amp(_) => "&",
            Token::Pipe(_) => "|",
            Token::Caret(_) => "^",
            Token::Tilde(_) => "~",
            Token::LtLt(_) => "<<",
            Token::GtGt(_) => ">>",
            Token::Eq(_) => "=",
            Token::PlusEq(_) => "+=",
            Token::MinusEq(_) => "-=",
            Token::StarEq(_) => "*=",
            Token::SlashEq(_) => "/=",
            Token::PercentEq(_) => "%=",
            Token::PlusPlus(_) => "++",
            Token::MinusMinus(_) => "--",
            Token::Question(_) => "?",
            Token::Colon(_) => ":",
            Token::LParen(_) => "(",
            Token::RParen(_) => ")",
            Token::LBrace(_) => "{",
            Token::RBrace(_) => "}",
            Token::LBracket(_) => "[",
            Token::RBracket(_) => "]",
            Token::Semicolon(_) => ";",
            Token::Comma(_) => ",",
        };
        write!(f, "'{}'", text)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for submitted source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            if self.peek() == Some('#') {
                self.skip_line();
                continue;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        let token = match ch {
            '"' => return self.string_literal(loc),
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, loc)),

            '+' => {
                if self.eat('+') {
                    Token::PlusPlus(loc)
                } else if self.eat('=') {
                    Token::PlusEq(loc)
                } else {
                    Token::Plus(loc)
                }
            }
            '-' => {
                if self.eat('-') {
                    Token::MinusMinus(loc)
                } else if self.eat('=') {
                    Token::MinusEq(loc)
                } else {
                    Token::Minus(loc)
                }
            }
            '*' if self.eat('=') => Token::StarEq(loc),
            '*' => Token::Star(loc),
            '/' if self.eat('=') => Token::SlashEq(loc),
            '/' => Token::Slash(loc),
            '%' if self.eat('=') => Token::PercentEq(loc),
            '%' => Token::Percent(loc),
            '=' if self.eat('=') => Token::EqEq(loc),
            '=' => Token::Eq(loc),
            '!' if self.eat('=') => Token::NotEq(loc),
            '!' => Token::Bang(loc),
            '<' => {
                if self.eat('=') {
                    Token::Le(loc)
                } else if self.eat('<') {
                    Token::LtLt(loc)
                } else {
                    Token::Lt(loc)
                }
            }
            '>' => {
                if self.eat('=') {
                    Token::Ge(loc)
                } else if self.eat('>') {
                    Token::GtGt(loc)
                } else {
                    Token::Gt(loc)
                }
            }
            '&' if self.eat('&') => Token::AndAnd(loc),
            '&' => Token::Amp(loc),
            '|' if self.eat('|') => Token::OrOr(loc),
            '|' => Token::Pipe(loc),
            '^' => Token::Caret(loc),
            '~' => Token::Tilde(loc),
            '?' => Token::Question(loc),
            ':' => Token::Colon(loc),
            '(' => Token::LParen(loc),
            ')' => Token::RParen(loc),
            '{' => Token::LBrace(loc),
            '}' => Token::RBrace(loc),
            '[' => Token::LBracket(loc),
            ']' => Token::RBracket(loc),
            ';' => Token::Semicolon(loc),
            ',' => Token::Comma(loc),

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    location: loc,
                })
            }
        };

        Ok(token)
    }

    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(Token::StringLiteral(string, loc));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    let escaped = self.advance().ok_or_else(|| LexError {
                        message: "Unexpected end of file in string literal".to_string(),
                        location: self.current_location(),
                    })?;
                    string.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        '\\' => '\\',
                        '"' => '"',
                        _ => {
                            return Err(LexError {
                                message: format!("Unknown escape sequence: \\{}", escaped),
                                location: self.current_location(),
                            })
                        }
                    });
                }
                _ => {
                    string.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut digits = String::from(first_digit);
        while let Some(ch) = self.peek().filter(char::is_ascii_digit) {
            digits.push(ch);
            self.advance();
        }

        if self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.') {
            return Err(LexError {
                message: format!("Only decimal integer literals are supported near '{}'", digits),
                location: loc,
            });
        }

        let value = digits.parse::<i32>().map_err(|_| LexError {
            message: format!("Integer literal out of range: {}", digits),
            location: loc,
        })?;

        Ok(Token::IntLiteral(value, loc))
    }

    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::from(first_char);
        while let Some(ch) = self.peek().filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
            ident.push(ch);
            self.advance();
        }

        match ident.as_str() {
            "int" => Token::Int(loc),
            "void" => Token::Void(loc),
            "const" => Token::Const(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "while" => Token::While(loc),
            "do" => Token::Do(loc),
            "for" => Token::For(loc),
            "break" => Token::Break(loc),
            "continue" => Token::Continue(loc),
            "return" => Token::Return(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek(), self.peek_ahead(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.advance();
                }
                (Some('/'), Some('/')) => self.skip_line(),
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance();
        self.advance();

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Consume `expected` if it is next
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
