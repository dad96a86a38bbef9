//! Expression parsing implementation
//!
//! Recursive descent with one method per C precedence level, from assignment
//! (lowest, right-associative) down to postfix and primary expressions.
//!
//! # Supported Expressions
//!
//! - Literals: integers, strings (only meaningful as `printf` arguments)
//! - Variables, array indexing, function calls
//! - Binary operators: arithmetic, comparison, logical, bitwise
//! - Unary operators: `-`, `+`, `!`, `~`, `++`, `--` (prefix and postfix)
//! - Ternary `? :` and (compound) assignment

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, ParseError> {
        self.nested(Self::parse_assignment)
    }

    /// Parse assignment or ternary (right-associative)
    fn parse_assignment(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_ternary()?;

        let loc = self.current_location();
        let compound_op = match self.peek_token() {
            Token::Eq(_) => {
                self.advance();
                let rhs = Box::new(self.parse_expression()?);
                Self::check_lvalue(&expr)?;
                return Ok(AstNode::Assignment {
                    lhs: Box::new(expr),
                    rhs,
                    location: loc,
                });
            }
            Token::PlusEq(_) => BinOp::Add,
            Token::MinusEq(_) => BinOp::Sub,
            Token::StarEq(_) => BinOp::Mul,
            Token::SlashEq(_) => BinOp::Div,
            Token::PercentEq(_) => BinOp::Mod,
            _ => return Ok(expr),
        };

        self.advance();
        let rhs = Box::new(self.parse_expression()?);
        Self::check_lvalue(&expr)?;
        Ok(AstNode::CompoundAssignment {
            lhs: Box::new(expr),
            op: compound_op,
            rhs,
            location: loc,
        })
    }

    /// Parse ternary: condition ? true_expr : false_expr
    pub(crate) fn parse_ternary(&mut self) -> Result<AstNode, ParseError> {
        let expr = self.parse_logical_or()?;

        if self.match_token(&Token::Question(self.current_location())) {
            let loc = self.previous_location();
            let true_expr = Box::new(self.parse_expression()?);
            self.expect_token(
                &Token::Colon(self.current_location()),
                "Expected ':' in ternary expression",
            )?;
            let false_expr = Box::new(self.nested(Self::parse_ternary)?);

            return Ok(AstNode::TernaryOp {
                condition: Box::new(expr),
                true_expr,
                false_expr,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse one left-associative binary precedence level.
    ///
    /// `ops` maps the tokens of this level to their operator; `next` parses the
    /// next-tighter level.
    fn parse_binary_level(
        &mut self,
        ops: fn(&Token) -> Option<BinOp>,
        next: fn(&mut Self) -> Result<AstNode, ParseError>,
    ) -> Result<AstNode, ParseError> {
        let mut left = next(self)?;
        let base_depth = self.depth;

        while let Some(op) = ops(self.peek()) {
            // Each operator nests the chain so far one level deeper
            self.enter_nesting()?;
            let loc = self.current_location();
            self.advance();
            let right = Box::new(next(self)?);
            left = AstNode::BinaryOp {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.depth = base_depth;
        Ok(left)
    }

    fn parse_logical_or(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::OrOr(_)).then_some(BinOp::Or),
            Self::parse_logical_and,
        )
    }

    fn parse_logical_and(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::AndAnd(_)).then_some(BinOp::And),
            Self::parse_bitwise_or,
        )
    }

    fn parse_bitwise_or(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::Pipe(_)).then_some(BinOp::BitOr),
            Self::parse_bitwise_xor,
        )
    }

    fn parse_bitwise_xor(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::Caret(_)).then_some(BinOp::BitXor),
            Self::parse_bitwise_and,
        )
    }

    fn parse_bitwise_and(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| matches!(t, Token::Amp(_)).then_some(BinOp::BitAnd),
            Self::parse_equality,
        )
    }

    /// Parse equality (== !=)
    fn parse_equality(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::EqEq(_) => Some(BinOp::Eq),
                Token::NotEq(_) => Some(BinOp::Ne),
                _ => None,
            },
            Self::parse_relational,
        )
    }

    /// Parse relational (< <= > >=)
    fn parse_relational(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::Lt(_) => Some(BinOp::Lt),
                Token::Le(_) => Some(BinOp::Le),
                Token::Gt(_) => Some(BinOp::Gt),
                Token::Ge(_) => Some(BinOp::Ge),
                _ => None,
            },
            Self::parse_shift,
        )
    }

    /// Parse bitwise shift (<< >>)
    fn parse_shift(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::LtLt(_) => Some(BinOp::BitShl),
                Token::GtGt(_) => Some(BinOp::BitShr),
                _ => None,
            },
            Self::parse_additive,
        )
    }

    /// Parse additive (+ -)
    fn parse_additive(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::Plus(_) => Some(BinOp::Add),
                Token::Minus(_) => Some(BinOp::Sub),
                _ => None,
            },
            Self::parse_multiplicative,
        )
    }

    /// Parse multiplicative (* / %)
    fn parse_multiplicative(&mut self) -> Result<AstNode, ParseError> {
        self.parse_binary_level(
            |t| match t {
                Token::Star(_) => Some(BinOp::Mul),
                Token::Slash(_) => Some(BinOp::Div),
                Token::Percent(_) => Some(BinOp::Mod),
                _ => None,
            },
            Self::parse_unary,
        )
    }

    /// Parse unary (! ~ - + ++ --)
    fn parse_unary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        let op = match self.peek_token() {
            Token::Bang(_) => UnOp::Not,
            Token::Tilde(_) => UnOp::BitNot,
            Token::Minus(_) => UnOp::Neg,
            Token::PlusPlus(_) => UnOp::PreInc,
            Token::MinusMinus(_) => UnOp::PreDec,
            Token::Plus(_) => {
                self.advance();
                return self.nested(Self::parse_unary);
            }
            _ => return self.parse_postfix(),
        };
        self.advance();

        let operand = self.nested(Self::parse_unary)?;
        if matches!(op, UnOp::PreInc | UnOp::PreDec) {
            Self::check_lvalue(&operand)?;
        }

        Ok(AstNode::UnaryOp {
            op,
            operand: Box::new(operand),
            location: loc,
        })
    }

    /// Parse postfix (++ -- [] ())
    fn parse_postfix(&mut self) -> Result<AstNode, ParseError> {
        let mut expr = self.parse_primary()?;
        let base_depth = self.depth;

        loop {
            let loc = self.current_location();
            if matches!(
                self.peek(),
                Token::PlusPlus(_) | Token::MinusMinus(_) | Token::LBracket(_) | Token::LParen(_)
            ) {
                self.enter_nesting()?;
            }

            if self.match_token(&Token::PlusPlus(loc)) {
                Self::check_lvalue(&expr)?;
                expr = AstNode::UnaryOp {
                    op: UnOp::PostInc,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else if self.match_token(&Token::MinusMinus(loc)) {
                Self::check_lvalue(&expr)?;
                expr = AstNode::UnaryOp {
                    op: UnOp::PostDec,
                    operand: Box::new(expr),
                    location: loc,
                };
            } else if self.match_token(&Token::LBracket(loc)) {
                let index = Box::new(self.parse_expression()?);
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after array index",
                )?;
                expr = AstNode::ArrayAccess {
                    array: Box::new(expr),
                    index,
                    location: loc,
                };
            } else if self.match_token(&Token::LParen(loc)) {
                let name = match expr {
                    AstNode::Variable(name, _) => name,
                    _ => {
                        return Err(ParseError {
                            message: "Function call must be on identifier".to_string(),
                            location: loc,
                        })
                    }
                };
                let args = self.parse_argument_list()?;
                self.expect_rparen("after function arguments")?;

                expr = AstNode::FunctionCall {
                    name,
                    args,
                    location: loc,
                };
            } else {
                break;
            }
        }

        self.depth = base_depth;
        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> Result<Vec<AstNode>, ParseError> {
        let mut args = Vec::new();

        if self.check(&Token::RParen(self.current_location())) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(args)
    }

    /// Parse primary (literals, variables, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<AstNode, ParseError> {
        let loc = self.current_location();

        match self.peek_token() {
            Token::IntLiteral(n, loc) => {
                self.advance();
                Ok(AstNode::IntLiteral(n, loc))
            }
            Token::StringLiteral(s, loc) => {
                self.advance();
                Ok(AstNode::StringLiteral(s, loc))
            }
            Token::Ident(name, loc) => {
                self.advance();
                Ok(AstNode::Variable(name, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            other => Err(ParseError {
                message: format!("Unexpected token: {}", other),
                location: loc,
            }),
        }
    }

    fn check_lvalue(node: &AstNode) -> Result<(), ParseError> {
        match node {
            AstNode::Variable(..) | AstNode::ArrayAccess { .. } => Ok(()),
            other => Err(ParseError {
                message: "Left side of assignment must be a variable or array element".to_string(),
                location: other.location(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_source;

    fn first_expression(source: &str) -> AstNode {
        let program = parse_source(&format!("void f() {{ {} }}", source)).unwrap();
        let AstNode::FunctionDef { mut body, .. } = program.nodes.into_iter().next().unwrap() else {
            panic!("Expected function definition");
        };
        match body.remove(0) {
            AstNode::ExpressionStatement { expr, .. } => *expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let expr = first_expression("1 + 2 * 3;");
        let AstNode::BinaryOp { op, right, .. } = expr else {
            panic!("Expected binary op");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(*right, AstNode::BinaryOp { op: BinOp::Mul, .. }));
    }

    #[test]
    fn test_comparison_binds_tighter_than_logical() {
        let expr = first_expression("a[j] > a[j + 1] && j < n;");
        assert!(matches!(expr, AstNode::BinaryOp { op: BinOp::And, .. }));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let expr = first_expression("a = b = 3;");
        let AstNode::Assignment { rhs, .. } = expr else {
            panic!("Expected assignment");
        };
        assert!(matches!(*rhs, AstNode::Assignment { .. }));
    }

    #[test]
    fn test_compound_assignment_and_postfix() {
        assert!(matches!(
            first_expression("x += 2;"),
            AstNode::CompoundAssignment { op: BinOp::Add, .. }
        ));
        assert!(matches!(
            first_expression("arr[i]++;"),
            AstNode::UnaryOp { op: UnOp::PostInc, .. }
        ));
    }

    #[test]
    fn test_long_operator_chains_are_bounded() {
        let chain = |terms: usize| format!("void f() {{ x = {}1; }}", "1 + ".repeat(terms));
        assert!(parse_source(&chain(200)).is_ok());
        assert!(parse_source(&chain(100_000)).is_err());

        let indexing = format!("void f() {{ x = a{}; }}", "[0]".repeat(100_000));
        assert!(parse_source(&indexing).is_err());
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert!(parse_source("void f() { 3 = x; }").is_err());
        assert!(parse_source("void f() { (a + b)++; }").is_err());
    }
}
