//! Declaration parsing implementation
//!
//! - Function definitions: `type name(params) { ... }`
//! - Variable declarations: `int x = 1;`, `int a[4] = {1, 2};`
//! - Types: `int`, `void`, optional `const`, array suffixes after the name
//!
//! # Grammar
//!
//! ```text
//! function_def ::= base_type identifier "(" params ")" "{" statements "}"
//! var_decl     ::= base_type identifier array_suffix? ("=" initializer)? ";"
//! array_suffix ::= "[" int_literal? "]"
//! initializer  ::= expression | "{" expression ("," expression)* "}"
//! ```

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse function definition: type name(params) { body }
    pub(crate) fn parse_function_definition(&mut self) -> Result<AstNode, ParseError> {
        let (return_type, _) = self.parse_base_type()?;
        let name = self.expect_identifier()?;
        let loc = self.previous_location();

        self.expect_lparen("after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;

        self.expect_lbrace("before function body")?;
        let body = self.parse_block_statements()?;
        self.expect_rbrace("after function body")?;

        Ok(AstNode::FunctionDef {
            name,
            params,
            return_type,
            body,
            location: loc,
        })
    }

    /// Parse parameter list: (type name, type name[], ...)
    fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(params);
        }

        // (void) means no parameters
        if self.check(&Token::Void(self.current_location()))
            && matches!(self.tokens.get(self.position + 1), Some(Token::RParen(_)))
        {
            self.advance();
            return Ok(params);
        }

        loop {
            let (base, is_const) = self.parse_base_type()?;
            let name = self.expect_identifier()?;
            let param_type = match self.parse_array_suffix()? {
                Some(_) => Type::IntArray(None),
                None => base,
            };
            if param_type == Type::Void {
                return Err(self.error(format!("Parameter '{}' cannot have type void", name)));
            }
            params.push(Param {
                name,
                param_type,
                is_const,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse `[const] (int | void)`
    pub(crate) fn parse_base_type(&mut self) -> Result<(Type, bool), ParseError> {
        let is_const = self.match_token(&Token::Const(self.current_location()));

        let base = if self.match_token(&Token::Int(self.current_location())) {
            Type::Int
        } else if self.match_token(&Token::Void(self.current_location())) {
            Type::Void
        } else {
            return Err(self.error(format!("Expected type, found {}", self.peek())));
        };

        Ok((base, is_const))
    }

    /// Parse an optional `[N]` / `[]` after a declared name.
    ///
    /// Returns `Some(size)` when a suffix was present.
    fn parse_array_suffix(&mut self) -> Result<Option<Option<usize>>, ParseError> {
        if !self.match_token(&Token::LBracket(self.current_location())) {
            return Ok(None);
        }

        let size = match self.peek_token() {
            Token::RBracket(_) => None,
            Token::IntLiteral(n, _) if n > 0 => {
                self.advance();
                Some(n as usize)
            }
            _ => return Err(self.error("Array size must be a positive integer literal")),
        };
        self.expect_token(
            &Token::RBracket(self.current_location()),
            "Expected ']' after array size",
        )?;

        if self.check(&Token::LBracket(self.current_location())) {
            return Err(self.error("Multi-dimensional arrays are not supported"));
        }

        Ok(Some(size))
    }

    /// Parse variable declaration: type name[[size]] [= init];
    pub(crate) fn parse_variable_declaration(&mut self) -> Result<AstNode, ParseError> {
        let (base, is_const) = self.parse_base_type()?;
        let name = self.expect_identifier()?;
        let loc = self.previous_location();

        if base == Type::Void {
            return Err(ParseError {
                message: format!("Variable '{}' cannot have type void", name),
                location: loc,
            });
        }

        let var_type = match self.parse_array_suffix()? {
            Some(size) => Type::IntArray(size),
            None => base,
        };

        let init = if self.match_token(&Token::Eq(self.current_location())) {
            if var_type.is_array() {
                Some(Box::new(self.parse_initializer_list()?))
            } else {
                Some(Box::new(self.parse_expression()?))
            }
        } else {
            None
        };

        if var_type == Type::IntArray(None) && init.is_none() {
            return Err(ParseError {
                message: format!("Array '{}' needs a size or an initializer", name),
                location: loc,
            });
        }

        self.expect_semicolon("after variable declaration")?;

        Ok(AstNode::VarDecl {
            name,
            var_type,
            is_const,
            init,
            location: loc,
        })
    }

    /// Parse `{ expr, expr, ... }`
    fn parse_initializer_list(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();
        self.expect_lbrace("to start an array initializer")?;

        let mut elements = Vec::new();
        while !self.check(&Token::RBrace(self.current_location())) {
            elements.push(self.parse_ternary()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_rbrace("after array initializer")?;
        Ok(AstNode::InitializerList(elements, loc))
    }
}
