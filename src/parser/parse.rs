//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the error type and the helper
//! methods shared by the `declarations`, `statements` and `expressions`
//! modules, which extend `Parser` through their own `impl` blocks.

use crate::parser::ast::{Program, SourceLocation};
use crate::parser::lexer::{LexError, Lexer, Token};
use thiserror::Error;

/// Deepest syntactic nesting accepted; every nested expression, operator
/// chain link and statement counts one level
pub const MAX_NESTING: usize = 256;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    /// Current nesting level, bounded by [`MAX_NESTING`]
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse the entire program (a sequence of function definitions)
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            program.nodes.push(self.parse_function_definition()?);
        }

        Ok(program)
    }

    // ===== Helper methods =====

    /// Go one nesting level deeper; fails once [`MAX_NESTING`] is reached
    pub(crate) fn enter_nesting(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!(
                "Code is nested more than {} levels deep",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        Ok(())
    }

    /// Run `parse` one nesting level deeper
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        self.enter_nesting()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn is_type_keyword(&self) -> bool {
        matches!(
            self.peek(),
            Token::Int(_) | Token::Void(_) | Token::Const(_)
        )
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        // The lexer always terminates the stream with Eof and `advance` never
        // moves past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.peek().clone()
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: self.current_location(),
        }
    }

    pub(crate) fn expect_token(&mut self, token: &Token, message: &str) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("{}, found {}", message, self.peek())))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::LParen(self.current_location()), &format!("Expected '(' {ctx}"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::RParen(self.current_location()), &format!("Expected ')' {ctx}"))
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::LBrace(self.current_location()), &format!("Expected '{{' {ctx}"))
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::RBrace(self.current_location()), &format!("Expected '}}' {ctx}"))
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(&Token::Semicolon(self.current_location()), &format!("Expected ';' {ctx}"))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(self.error(format!("Expected identifier, found {}", self.peek())))
        }
    }
}

/// Parse `source` into a [`Program`].
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::{AstNode, Type};

    #[test]
    fn test_parse_bubble_sort() {
        let source = r#"
            void bubble_sort(int arr[], int n) {
                for (int i = 0; i < n - 1; i++) {
                    for (int j = 0; j < n - i - 1; j++) {
                        if (arr[j] > arr[j + 1]) {
                            int temp = arr[j];
                            arr[j] = arr[j + 1];
                            arr[j + 1] = temp;
                        }
                    }
                }
            }
        "#;
        let program = parse_source(source).unwrap();

        assert_eq!(program.nodes.len(), 1);
        match &program.nodes[0] {
            AstNode::FunctionDef {
                name,
                params,
                return_type,
                body,
                ..
            } => {
                assert_eq!(name, "bubble_sort");
                assert_eq!(params.len(), 2);
                assert_eq!(params[0].param_type, Type::IntArray(None));
                assert_eq!(params[1].param_type, Type::Int);
                assert_eq!(*return_type, Type::Void);
                assert_eq!(body.len(), 1);
            }
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_parse_array_declarations() {
        let source = "int main() { int a[3] = {1, 2, 3}; int b[] = {4, 5}; int c[2]; return 0; }";
        let program = parse_source(source).unwrap();

        let AstNode::FunctionDef { body, .. } = &program.nodes[0] else {
            panic!("Expected function definition");
        };
        assert!(matches!(
            &body[0],
            AstNode::VarDecl { var_type: Type::IntArray(Some(3)), init: Some(_), .. }
        ));
        assert!(matches!(
            &body[1],
            AstNode::VarDecl { var_type: Type::IntArray(None), .. }
        ));
        assert!(matches!(
            &body[2],
            AstNode::VarDecl { var_type: Type::IntArray(Some(2)), init: None, .. }
        ));
    }

    #[test]
    fn test_parse_errors_carry_location() {
        let err = parse_source("void f() {\n  int x = ;\n}").unwrap_err();
        assert_eq!(err.location.line, 2);

        let err = parse_source("void f() { x = 1 }").unwrap_err();
        assert!(err.message.contains("Expected ';'"), "{}", err.message);
    }

    #[test]
    fn test_nesting_limit() {
        let blocks = |levels: usize| {
            format!(
                "void f() {{ {} x = 1; {} }}",
                "{".repeat(levels),
                "}".repeat(levels)
            )
        };
        assert!(parse_source(&blocks(100)).is_ok());

        let err = parse_source(&blocks(100_000)).unwrap_err();
        assert!(err.message.contains("nested more than 256"), "{}", err.message);

        let source = format!("void f() {{ x = {}1; }}", "!".repeat(100_000));
        assert!(parse_source(&source).is_err());
    }

    #[test]
    fn test_rejects_top_level_statements() {
        assert!(parse_source("x = 1;").is_err());
        assert!(parse_source("int[] f() {}").is_err());
    }
}
