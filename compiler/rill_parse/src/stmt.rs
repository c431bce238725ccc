//! Statement grammar rules.

use std::rc::Rc;

use rill_ir::{
    AssignStmt, DefStmt, ExprStmt, ForStmt, IfStmt, LetStmt, Name, Param, ReturnStmt, Stmt,
    TokenKind,
};

use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn stmt(&mut self) -> Result<Stmt, ParseError> {
        tracing::trace!(token = %self.cursor.current_kind(), "parse statement");
        match self.cursor.current_kind() {
            TokenKind::Let => Ok(Stmt::Let(self.let_stmt()?)),
            TokenKind::Def => Ok(Stmt::Def(self.def_stmt()?)),
            TokenKind::If => self.if_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Return => self.return_stmt(),
            _ => self.expr_or_assign_stmt(),
        }
    }

    /// `LET name (: Type)? (= value)? ;`
    pub(crate) fn let_stmt(&mut self) -> Result<LetStmt, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenKind::Let)?;
        let (name, _) = self.cursor.expect_ident("a variable name")?;
        let ty = self.type_annotation()?;
        let value = if self.cursor.eat(TokenKind::Assign) {
            Some(self.expr()?)
        } else {
            None
        };
        self.cursor.expect(TokenKind::Semi)?;
        Ok(LetStmt {
            name,
            ty,
            value,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `DEF name(params) (: Type)? DO body END`
    pub(crate) fn def_stmt(&mut self) -> Result<Rc<DefStmt>, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenKind::Def)?;
        let (name, _) = self.cursor.expect_ident("a function name")?;
        self.cursor.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.cursor.check(TokenKind::RParen) {
            loop {
                let (pname, pspan) = self.cursor.expect_ident("a parameter name")?;
                let ty = self.type_annotation()?;
                params.push(Param {
                    name: pname,
                    ty,
                    span: pspan.merge(self.cursor.previous_span()),
                });
                if !self.cursor.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        let return_ty = self.type_annotation()?;
        self.cursor.expect(TokenKind::Do)?;
        let body = self.body_until(&[TokenKind::End])?;
        self.cursor.expect(TokenKind::End)?;

        Ok(Rc::new(DefStmt {
            name,
            params,
            return_ty,
            body,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// `IF condition DO then (ELSE else)? END`
    fn if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenKind::If)?;
        let condition = self.expr()?;
        self.cursor.expect(TokenKind::Do)?;
        let then_body = self.body_until(&[TokenKind::Else, TokenKind::End])?;
        let else_body = if self.cursor.eat(TokenKind::Else) {
            self.body_until(&[TokenKind::End])?
        } else {
            Vec::new()
        };
        self.cursor.expect(TokenKind::End)?;
        Ok(Stmt::If(IfStmt {
            condition,
            then_body,
            else_body,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// `FOR name IN iterable DO body END`
    fn for_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenKind::For)?;
        let (name, _) = self.cursor.expect_ident("a loop variable name")?;
        self.cursor.expect(TokenKind::In)?;
        let iterable = self.expr()?;
        self.cursor.expect(TokenKind::Do)?;
        let body = self.body_until(&[TokenKind::End])?;
        self.cursor.expect(TokenKind::End)?;
        Ok(Stmt::For(ForStmt {
            name,
            iterable,
            body,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// `RETURN value? ;` — or `RETURN value? IF condition ;`, sugar for an
    /// `IF` wrapping the return.
    fn return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        self.cursor.expect(TokenKind::Return)?;
        let value = if self.cursor.check(TokenKind::If) || self.cursor.check(TokenKind::Semi) {
            None
        } else {
            Some(self.expr()?)
        };
        if self.cursor.eat(TokenKind::If) {
            let condition = self.expr()?;
            self.cursor.expect(TokenKind::Semi)?;
            let span = start.merge(self.cursor.previous_span());
            return Ok(Stmt::If(IfStmt {
                condition,
                then_body: vec![Stmt::Return(ReturnStmt { value, span })],
                else_body: Vec::new(),
                span,
            }));
        }
        self.cursor.expect(TokenKind::Semi)?;
        Ok(Stmt::Return(ReturnStmt {
            value,
            span: start.merge(self.cursor.previous_span()),
        }))
    }

    /// `expr ;` or `target = value ;`
    fn expr_or_assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        let expression = self.expr()?;
        let stmt = if self.cursor.eat(TokenKind::Assign) {
            let value = self.expr()?;
            Stmt::Assignment(AssignStmt {
                target: expression,
                value,
                span: start.merge(self.cursor.current_span()),
            })
        } else {
            Stmt::Expression(ExprStmt {
                expression,
                span: start.merge(self.cursor.current_span()),
            })
        };
        self.cursor.expect(TokenKind::Semi)?;
        Ok(stmt)
    }

    /// `(: Type)?`
    fn type_annotation(&mut self) -> Result<Option<Name>, ParseError> {
        if self.cursor.eat(TokenKind::Colon) {
            let (name, _) = self.cursor.expect_ident("a type name")?;
            Ok(Some(name))
        } else {
            Ok(None)
        }
    }

    /// Statements up to (not consuming) one of `terminators` or EOF.
    fn body_until(&mut self, terminators: &[TokenKind]) -> Result<Vec<Stmt>, ParseError> {
        let mut body = Vec::new();
        while !self.cursor.is_at_end() && !terminators.iter().any(|t| self.cursor.check(*t)) {
            body.push(self.stmt()?);
        }
        Ok(body)
    }
}
