//! Expression grammar rules and literal cooking.

use std::str::FromStr as _;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, ToBigInt as _};
use rill_ir::{
    BinaryExpr, BinaryOp, CallExpr, Expr, GroupExpr, Literal, LiteralExpr, MethodCallExpr, Name,
    ObjectExpr, PropertyExpr, Span, TokenKind, VariableExpr,
};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn expr(&mut self) -> Result<Expr, ParseError> {
        self.logical()
    }

    fn logical(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.comparison()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::And => BinaryOp::And,
                TokenKind::Or => BinaryOp::Or,
                _ => break,
            };
            self.cursor.advance();
            let right = self.comparison()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.additive()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.cursor.advance();
            let right = self.additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.cursor.advance();
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.secondary()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.cursor.advance();
            let right = self.secondary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// Property and method chains: `primary ('.' name args?)*`.
    fn secondary(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;
        while self.cursor.eat(TokenKind::Dot) {
            let (name, _) = self.cursor.expect_ident("a member name")?;
            if self.cursor.eat(TokenKind::LParen) {
                let args = self.call_args()?;
                let span = expr.span().merge(self.cursor.previous_span());
                expr = Expr::MethodCall(MethodCallExpr {
                    receiver: Box::new(expr),
                    name,
                    args,
                    span,
                });
            } else {
                let span = expr.span().merge(self.cursor.previous_span());
                expr = Expr::Property(PropertyExpr {
                    receiver: Box::new(expr),
                    name,
                    span,
                });
            }
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Nil => {
                self.cursor.advance();
                Ok(literal(Literal::Nil, span))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(literal(Literal::Bool(true), span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(literal(Literal::Bool(false), span))
            }
            TokenKind::Integer(text) => {
                self.cursor.advance();
                let text = self.cursor.interner().resolve(text);
                Ok(literal(Literal::Integer(cook_integer(&text, span)?), span))
            }
            TokenKind::Decimal(text) => {
                self.cursor.advance();
                let text = self.cursor.interner().resolve(text);
                Ok(literal(Literal::Decimal(cook_decimal(&text, span)?), span))
            }
            TokenKind::Character(c) => {
                self.cursor.advance();
                Ok(literal(Literal::Character(c), span))
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                Ok(literal(Literal::String(name), span))
            }
            TokenKind::LParen => self.group(),
            TokenKind::Object => self.object_literal(),
            TokenKind::Ident(name) => self.variable_or_call(name),
            found => Err(ParseError::unexpected("an expression", found, span)),
        }
    }

    fn group(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenKind::LParen)?;
        let inner = self.expr()?;
        self.cursor.expect(TokenKind::RParen)?;
        Ok(Expr::Group(GroupExpr {
            inner: Box::new(inner),
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// `OBJECT name? DO let* def* END`
    fn object_literal(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenKind::Object)?;
        let name = match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Some(name)
            }
            _ => None,
        };
        self.cursor.expect(TokenKind::Do)?;

        let mut fields = Vec::new();
        while self.cursor.check(TokenKind::Let) {
            fields.push(self.let_stmt()?);
        }
        let mut methods = Vec::new();
        while self.cursor.check(TokenKind::Def) {
            methods.push(self.def_stmt()?);
        }
        self.cursor.expect(TokenKind::End)?;

        Ok(Expr::ObjectLiteral(ObjectExpr {
            name,
            fields,
            methods,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    fn variable_or_call(&mut self, name: Name) -> Result<Expr, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.advance();
        if self.cursor.eat(TokenKind::LParen) {
            let args = self.call_args()?;
            Ok(Expr::Call(CallExpr {
                name,
                args,
                span: start.merge(self.cursor.previous_span()),
            }))
        } else {
            Ok(Expr::Variable(VariableExpr { name, span: start }))
        }
    }

    /// Comma-separated arguments up to and including the closing `)`.
    fn call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            loop {
                args.push(self.expr()?);
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(args)
    }
}

fn literal(value: Literal, span: Span) -> Expr {
    Expr::Literal(LiteralExpr { value, span })
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span().merge(right.span());
    Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    })
}

/// Convert integer literal text to an exact `BigInt`.
///
/// Exponent forms are evaluated exactly: `1e3` is 1000, `10e-1` is 1, and
/// `1e-1` is rejected because it has no integer value.
fn cook_integer(text: &str, span: Span) -> Result<BigInt, ParseError> {
    if text.contains(['e', 'E']) {
        let value = BigDecimal::from_str(text)
            .map_err(|_| ParseError::new(format!("invalid integer literal `{text}`"), span))?
            .normalized();
        if value.fractional_digit_count() > 0 {
            return Err(ParseError::new(
                format!("integer literal `{text}` has a fractional value"),
                span,
            ));
        }
        return value.to_bigint().ok_or_else(|| {
            ParseError::new(format!("invalid integer literal `{text}`"), span)
        });
    }
    BigInt::from_str(text)
        .map_err(|_| ParseError::new(format!("invalid integer literal `{text}`"), span))
}

/// Convert decimal literal text, preserving the written scale.
fn cook_decimal(text: &str, span: Span) -> Result<BigDecimal, ParseError> {
    BigDecimal::from_str(text)
        .map_err(|_| ParseError::new(format!("invalid decimal literal `{text}`"), span))
}
