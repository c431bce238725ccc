//! Recursive-descent parser for Rill.
//!
//! Each grammar rule is a method; precedence is encoded by the rule ladder
//! (logical -> comparison -> additive -> multiplicative -> secondary ->
//! primary). Entry points require the whole token stream to be consumed.

mod cursor;
mod error;
mod expr;
mod stmt;

use cursor::Cursor;
pub use error::ParseError;
use rill_ir::{Expr, Source, Span, Stmt, StringInterner, Token, TokenKind};

pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], interner: &'a StringInterner) -> Self {
        Parser {
            cursor: Cursor::new(tokens, interner),
        }
    }

    /// Parse a whole source unit.
    pub fn parse_source(mut self) -> Result<Source, ParseError> {
        let mut statements = Vec::new();
        while !self.cursor.is_at_end() {
            statements.push(self.stmt()?);
        }
        let span = Span::new(0, self.cursor.previous_span().end);
        Ok(Source { statements, span })
    }

    /// Parse exactly one statement (the whole input must be that statement).
    pub fn parse_stmt(mut self) -> Result<Stmt, ParseError> {
        let stmt = self.stmt()?;
        self.expect_end()?;
        Ok(stmt)
    }

    /// Parse exactly one expression (the whole input must be that expression).
    pub fn parse_expr(mut self) -> Result<Expr, ParseError> {
        let expr = self.expr()?;
        self.expect_end()?;
        Ok(expr)
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.cursor.is_at_end() {
            Ok(())
        } else {
            Err(ParseError::unexpected(
                TokenKind::Eof.describe(),
                self.cursor.current_kind(),
                self.cursor.current_span(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_ir::{BinaryOp, Literal, NodeKind};

    fn with_source<R>(source: &str, f: impl FnOnce(Source, &StringInterner) -> R) -> R {
        let interner = StringInterner::new();
        let tokens = rill_lexer::lex(source, &interner).unwrap();
        let parsed = Parser::new(&tokens, &interner).parse_source().unwrap();
        f(parsed, &interner)
    }

    fn parse_err(source: &str) -> ParseError {
        let interner = StringInterner::new();
        let tokens = rill_lexer::lex(source, &interner).unwrap();
        Parser::new(&tokens, &interner).parse_source().unwrap_err()
    }

    fn only_expr(source: &Source) -> &Expr {
        match &source.statements[..] {
            [Stmt::Expression(stmt)] => &stmt.expression,
            other => panic!("expected one expression statement, got {other:?}"),
        }
    }

    #[test]
    fn let_with_annotation_and_value() {
        with_source("LET x: Integer = 1;", |source, interner| {
            let Stmt::Let(stmt) = &source.statements[0] else {
                panic!("expected LET");
            };
            assert_eq!(interner.resolve(stmt.name).as_ref(), "x");
            assert_eq!(stmt.ty, Some(interner.intern("Integer")));
            assert!(stmt.value.is_some());
        });
    }

    #[test]
    fn let_without_value() {
        with_source("LET x;", |source, _| {
            let Stmt::Let(stmt) = &source.statements[0] else {
                panic!("expected LET");
            };
            assert_eq!(stmt.ty, None);
            assert_eq!(stmt.value, None);
        });
    }

    #[test]
    fn def_with_annotated_params_and_return() {
        with_source("DEF f(a: Integer, b): String DO RETURN \"s\"; END", |source, interner| {
            let Stmt::Def(def) = &source.statements[0] else {
                panic!("expected DEF");
            };
            assert_eq!(interner.resolve(def.name).as_ref(), "f");
            assert_eq!(def.params.len(), 2);
            assert_eq!(def.params[0].ty, Some(interner.intern("Integer")));
            assert_eq!(def.params[1].ty, None);
            assert_eq!(def.return_ty, Some(interner.intern("String")));
            assert_eq!(def.body.len(), 1);
        });
    }

    #[test]
    fn if_with_else() {
        with_source("IF TRUE DO 1; ELSE 2; END", |source, _| {
            let Stmt::If(stmt) = &source.statements[0] else {
                panic!("expected IF");
            };
            assert_eq!(stmt.then_body.len(), 1);
            assert_eq!(stmt.else_body.len(), 1);
        });
    }

    #[test]
    fn for_loop() {
        with_source("FOR i IN range(1, 5) DO log(i); END", |source, interner| {
            let Stmt::For(stmt) = &source.statements[0] else {
                panic!("expected FOR");
            };
            assert_eq!(interner.resolve(stmt.name).as_ref(), "i");
            assert_eq!(stmt.body.len(), 1);
        });
    }

    #[test]
    fn return_if_desugars_to_conditional_return() {
        with_source("RETURN 1 IF TRUE;", |source, _| {
            let Stmt::If(stmt) = &source.statements[0] else {
                panic!("expected desugared IF, got {:?}", source.statements[0]);
            };
            assert_eq!(stmt.then_body.len(), 1);
            assert!(matches!(stmt.then_body[0], Stmt::Return(_)));
            assert!(stmt.else_body.is_empty());
        });
    }

    #[test]
    fn bare_return() {
        with_source("RETURN;", |source, _| {
            let Stmt::Return(stmt) = &source.statements[0] else {
                panic!("expected RETURN");
            };
            assert_eq!(stmt.value, None);
        });
    }

    #[test]
    fn assignment_vs_expression_statement() {
        with_source("x = 1; f();", |source, _| {
            assert!(matches!(source.statements[0], Stmt::Assignment(_)));
            assert!(matches!(source.statements[1], Stmt::Expression(_)));
        });
    }

    #[test]
    fn precedence_multiplicative_binds_tighter() {
        with_source("1 + 2 * 3;", |source, _| {
            let Expr::Binary(add) = only_expr(&source) else {
                panic!("expected binary");
            };
            assert_eq!(add.op, BinaryOp::Add);
            let Expr::Binary(mul) = add.right.as_ref() else {
                panic!("expected nested binary");
            };
            assert_eq!(mul.op, BinaryOp::Mul);
        });
    }

    #[test]
    fn logical_binds_loosest() {
        with_source("1 < 2 AND TRUE;", |source, _| {
            let Expr::Binary(and) = only_expr(&source) else {
                panic!("expected binary");
            };
            assert_eq!(and.op, BinaryOp::And);
            let Expr::Binary(cmp) = and.left.as_ref() else {
                panic!("expected nested comparison");
            };
            assert_eq!(cmp.op, BinaryOp::Lt);
        });
    }

    #[test]
    fn property_and_method_chains() {
        with_source("obj.prototype.method(1).other;", |source, _| {
            let Expr::Property(outer) = only_expr(&source) else {
                panic!("expected property");
            };
            assert!(matches!(outer.receiver.as_ref(), Expr::MethodCall(_)));
        });
    }

    #[test]
    fn object_literal_with_fields_and_methods() {
        with_source(
            "OBJECT Point DO LET x = 1; LET y = 2; DEF sum() DO RETURN this.x + this.y; END END;",
            |source, interner| {
                let Expr::ObjectLiteral(obj) = only_expr(&source) else {
                    panic!("expected object literal");
                };
                assert_eq!(obj.name, Some(interner.intern("Point")));
                assert_eq!(obj.fields.len(), 2);
                assert_eq!(obj.methods.len(), 1);
            },
        );
    }

    #[test]
    fn anonymous_object_literal() {
        with_source("OBJECT DO END;", |source, _| {
            let Expr::ObjectLiteral(obj) = only_expr(&source) else {
                panic!("expected object literal");
            };
            assert_eq!(obj.name, None);
        });
    }

    #[test]
    fn integer_exponent_is_evaluated_exactly() {
        with_source("1e3;", |source, _| {
            let Expr::Literal(lit) = only_expr(&source) else {
                panic!("expected literal");
            };
            assert_eq!(lit.value, Literal::Integer(1000.into()));
        });
    }

    #[test]
    fn integer_negative_exponent_exact_or_error() {
        with_source("10e-1;", |source, _| {
            let Expr::Literal(lit) = only_expr(&source) else {
                panic!("expected literal");
            };
            assert_eq!(lit.value, Literal::Integer(1.into()));
        });
        let err = parse_err("1e-1;");
        assert!(err.message.contains("integer"), "{}", err.message);
    }

    #[test]
    fn decimal_preserves_written_scale() {
        use bigdecimal::BigDecimal;
        use std::str::FromStr as _;
        with_source("2.50;", |source, _| {
            let Expr::Literal(lit) = only_expr(&source) else {
                panic!("expected literal");
            };
            let Literal::Decimal(value) = &lit.value else {
                panic!("expected decimal");
            };
            assert_eq!(value, &BigDecimal::from_str("2.50").unwrap());
        });
    }

    #[test]
    fn keyword_literals() {
        with_source("NIL;", |source, _| {
            let Expr::Literal(lit) = only_expr(&source) else {
                panic!("expected literal");
            };
            assert_eq!(lit.value, Literal::Nil);
        });
    }

    #[test]
    fn trailing_input_is_rejected_by_entry_points() {
        let interner = StringInterner::new();
        let tokens = rill_lexer::lex("1 2", &interner).unwrap();
        let err = Parser::new(&tokens, &interner).parse_expr().unwrap_err();
        assert!(err.message.contains("end of input"));
    }

    #[test]
    fn missing_semicolon_is_an_error() {
        let err = parse_err("LET x = 1");
        assert!(err.message.contains("`;`"));
    }

    #[test]
    fn spans_cover_statements() {
        with_source("LET x = 1;", |source, _| {
            let node = source.statements[0].node_ref();
            assert_eq!(node.kind, NodeKind::Let);
            assert_eq!(node.span.to_range(), 0..10);
        });
    }
}
