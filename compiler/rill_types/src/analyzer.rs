//! The static analyzer: checks an AST against the type lattice and produces
//! the typed IR.

use rill_ir::{
    AssignStmt, BinaryExpr, BinaryOp, CallExpr, DefStmt, Expr, ForStmt, IfStmt, LetStmt, Literal,
    MethodCallExpr, Name, NodeKind, NodeRef, ObjectExpr, PropertyExpr, SharedInterner, Source,
    Stmt, VariableExpr,
};

use crate::error::{AnalysisError, AnalysisErrorKind};
use crate::ir::{
    TypedDef, TypedExpr, TypedExprKind, TypedLet, TypedParam, TypedSource, TypedStmt,
};
use crate::prelude::{prelude_scope, TypeRegistry};
use crate::ty::{ObjectType, Type, TypeScope, WellKnown};

pub struct Analyzer {
    interner: SharedInterner,
    registry: TypeRegistry,
    names: WellKnown,
    scope: TypeScope,
    /// Return type of the function whose body is being analyzed, if any.
    return_type: Option<Type>,
}

impl Analyzer {
    pub fn new(interner: SharedInterner) -> Self {
        let scope = TypeScope::child_of(&prelude_scope(&interner));
        Analyzer::from_scope(interner, scope)
    }

    /// Analyzer over an existing scope, for incremental (REPL) use.
    pub fn from_scope(interner: SharedInterner, scope: TypeScope) -> Self {
        let registry = TypeRegistry::new(&interner);
        let names = WellKnown::new(&interner);
        Analyzer {
            interner,
            registry,
            names,
            scope,
            return_type: None,
        }
    }

    pub fn scope(&self) -> TypeScope {
        self.scope.clone()
    }

    pub fn analyze(&mut self, source: &Source) -> Result<TypedSource, AnalysisError> {
        tracing::debug!(statements = source.statements.len(), "analyze source");
        let statements = self.body(&source.statements)?;
        Ok(TypedSource { statements })
    }

    pub fn analyze_stmt(&mut self, stmt: &Stmt) -> Result<TypedStmt, AnalysisError> {
        self.stmt(stmt)
    }

    pub fn analyze_expr(&mut self, expr: &Expr) -> Result<TypedExpr, AnalysisError> {
        self.expr(expr)
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<TypedStmt, AnalysisError> {
        match stmt {
            Stmt::Let(ast) => {
                let scope = self.scope.clone();
                Ok(TypedStmt::Let(self.let_stmt(ast, &scope)?))
            }
            Stmt::Def(ast) => {
                let scope = self.scope.clone();
                Ok(TypedStmt::Def(self.def_stmt(ast, &scope, None)?))
            }
            Stmt::If(ast) => self.if_stmt(ast),
            Stmt::For(ast) => self.for_stmt(ast),
            Stmt::Return(ast) => {
                let node = stmt.node_ref();
                let Some(expected) = self.return_type.clone() else {
                    return Err(AnalysisError::new(
                        AnalysisErrorKind::ReturnOutsideFunction,
                        node,
                    ));
                };
                let value = ast.value.as_ref().map(|v| self.expr(v)).transpose()?;
                let found = value.as_ref().map_or(Type::NIL, |v| v.ty.clone());
                self.require_subtype(&found, &expected, node)?;
                Ok(TypedStmt::Return { value })
            }
            Stmt::Expression(ast) => Ok(TypedStmt::Expression(self.expr(&ast.expression)?)),
            Stmt::Assignment(ast) => self.assign_stmt(ast),
        }
    }

    /// `LET` analysis, shared with object fields: the initializer is checked
    /// against the current scope, the binding lands in `define_into`.
    fn let_stmt(
        &mut self,
        ast: &LetStmt,
        define_into: &TypeScope,
    ) -> Result<TypedLet, AnalysisError> {
        let node = NodeRef::new(NodeKind::Let, ast.span);
        let value = ast.value.as_ref().map(|v| self.expr(v)).transpose()?;
        let ty = match ast.ty {
            Some(name) => self.resolve_type(name, node)?,
            None => value.as_ref().map_or(Type::DYNAMIC, |v| v.ty.clone()),
        };
        if let Some(value) = &value {
            self.require_subtype(&value.ty, &ty, node)?;
        }
        define_into
            .define(ast.name, ty.clone())
            .map_err(|_| self.duplicate(ast.name, node))?;
        Ok(TypedLet {
            name: ast.name,
            ty,
            value,
        })
    }

    /// `DEF` analysis, shared with object methods. The function's type is
    /// bound in `define_into` before the body is analyzed, so the body can
    /// recurse. Methods additionally get `this` bound to the object type.
    fn def_stmt(
        &mut self,
        ast: &DefStmt,
        define_into: &TypeScope,
        this: Option<Type>,
    ) -> Result<TypedDef, AnalysisError> {
        let node = NodeRef::new(NodeKind::Def, ast.span);

        let mut params = Vec::with_capacity(ast.params.len());
        for param in &ast.params {
            let ty = match param.ty {
                Some(name) => self.resolve_type(name, NodeRef::new(NodeKind::Def, param.span))?,
                None => Type::DYNAMIC,
            };
            params.push(TypedParam {
                name: param.name,
                ty,
            });
        }
        let returns = match ast.return_ty {
            Some(name) => self.resolve_type(name, node)?,
            None => Type::DYNAMIC,
        };

        let fn_ty = Type::function(params.iter().map(|p| p.ty.clone()).collect(), returns.clone());
        define_into
            .define(ast.name, fn_ty)
            .map_err(|_| self.duplicate(ast.name, node))?;

        let body_scope = TypeScope::child_of(&self.scope);
        if let Some(this_ty) = this {
            let _ = body_scope.define(self.names.this, this_ty);
        }
        for param in &params {
            body_scope
                .define(param.name, param.ty.clone())
                .map_err(|_| self.duplicate(param.name, node))?;
        }

        let saved = std::mem::replace(&mut self.return_type, Some(returns.clone()));
        let body = self.with_scope(body_scope, |analyzer| analyzer.body(&ast.body));
        self.return_type = saved;

        Ok(TypedDef {
            name: ast.name,
            params,
            returns,
            body: body?,
        })
    }

    fn if_stmt(&mut self, ast: &IfStmt) -> Result<TypedStmt, AnalysisError> {
        let node = NodeRef::new(NodeKind::If, ast.span);
        let condition = self.expr(&ast.condition)?;
        self.require_subtype(&condition.ty, &Type::BOOLEAN, node)?;
        let then_body = self.with_child_scope(|analyzer| analyzer.body(&ast.then_body))?;
        let else_body = self.with_child_scope(|analyzer| analyzer.body(&ast.else_body))?;
        Ok(TypedStmt::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn for_stmt(&mut self, ast: &ForStmt) -> Result<TypedStmt, AnalysisError> {
        let node = NodeRef::new(NodeKind::For, ast.span);
        let iterable = self.expr(&ast.iterable)?;
        self.require_subtype(&iterable.ty, &Type::ITERABLE, node)?;

        let body_scope = TypeScope::child_of(&self.scope);
        let _ = body_scope.define(ast.name, Type::INTEGER);
        let body = self.with_scope(body_scope, |analyzer| analyzer.body(&ast.body))?;
        Ok(TypedStmt::For {
            name: ast.name,
            iterable,
            body,
        })
    }

    /// The value is analyzed before the target is inspected.
    fn assign_stmt(&mut self, ast: &AssignStmt) -> Result<TypedStmt, AnalysisError> {
        let node = NodeRef::new(NodeKind::Assignment, ast.span);
        let value = self.expr(&ast.value)?;
        match &ast.target {
            Expr::Variable(variable) => {
                let ty = self
                    .scope
                    .resolve(variable.name, false)
                    .ok_or_else(|| self.unbound(variable.name, node))?;
                self.require_subtype(&value.ty, &ty, node)?;
                Ok(TypedStmt::AssignVariable {
                    name: variable.name,
                    ty,
                    value,
                })
            }
            Expr::Property(_) => {
                let target = self.expr(&ast.target)?;
                self.require_subtype(&value.ty, &target.ty, node)?;
                Ok(TypedStmt::AssignProperty { target, value })
            }
            other => Err(AnalysisError::new(
                AnalysisErrorKind::InvalidAssignmentTarget,
                other.node_ref(),
            )),
        }
    }

    fn expr(&mut self, expr: &Expr) -> Result<TypedExpr, AnalysisError> {
        match expr {
            Expr::Literal(ast) => {
                let ty = match &ast.value {
                    Literal::Nil => Type::NIL,
                    Literal::Bool(_) => Type::BOOLEAN,
                    Literal::Integer(_) => Type::INTEGER,
                    Literal::Decimal(_) => Type::DECIMAL,
                    Literal::Character(_) => Type::CHARACTER,
                    Literal::String(_) => Type::STRING,
                };
                Ok(TypedExpr {
                    ty,
                    kind: TypedExprKind::Literal(ast.value.clone()),
                    span: ast.span,
                })
            }
            Expr::Group(ast) => {
                let inner = self.expr(&ast.inner)?;
                Ok(TypedExpr {
                    ty: inner.ty.clone(),
                    kind: TypedExprKind::Group(Box::new(inner)),
                    span: ast.span,
                })
            }
            Expr::Binary(ast) => self.binary(ast),
            Expr::Variable(ast) => self.variable(ast),
            Expr::Property(ast) => self.property(ast),
            Expr::Call(ast) => self.call(ast),
            Expr::MethodCall(ast) => self.method_call(ast),
            Expr::ObjectLiteral(ast) => self.object_literal(ast),
        }
    }

    fn binary(&mut self, ast: &BinaryExpr) -> Result<TypedExpr, AnalysisError> {
        let node = NodeRef::new(NodeKind::Binary, ast.span);
        let left = self.expr(&ast.left)?;
        let right = self.expr(&ast.right)?;
        let ty = match ast.op {
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => {
                self.arithmetic(ast.op, &left.ty, &right.ty, node)?
            }
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let comparable = left.ty.is_subtype_of(&Type::COMPARABLE, &self.names)
                    && right.ty.is_subtype_of(&Type::COMPARABLE, &self.names);
                if comparable && self.related(&left.ty, &right.ty) {
                    Type::BOOLEAN
                } else {
                    return Err(self.invalid_operands(ast.op, &left.ty, &right.ty, node));
                }
            }
            BinaryOp::Eq | BinaryOp::Ne => {
                if self.related(&left.ty, &right.ty) {
                    Type::BOOLEAN
                } else {
                    return Err(self.invalid_operands(ast.op, &left.ty, &right.ty, node));
                }
            }
            BinaryOp::And | BinaryOp::Or => {
                let boolean = left.ty.is_subtype_of(&Type::BOOLEAN, &self.names)
                    && right.ty.is_subtype_of(&Type::BOOLEAN, &self.names);
                if boolean {
                    Type::BOOLEAN
                } else {
                    return Err(self.invalid_operands(ast.op, &left.ty, &right.ty, node));
                }
            }
        };
        Ok(TypedExpr {
            ty,
            kind: TypedExprKind::Binary {
                op: ast.op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span: ast.span,
        })
    }

    /// `+ - * /`. With two `Dynamic` operands the result is `Dynamic`; with
    /// one, the result takes the concrete side's type; with none, `+` allows
    /// string concatenation and both arithmetic operands must agree on
    /// `Integer` or `Decimal`.
    fn arithmetic(
        &self,
        op: BinaryOp,
        left: &Type,
        right: &Type,
        node: NodeRef,
    ) -> Result<Type, AnalysisError> {
        if left.is_dynamic() && right.is_dynamic() {
            return Ok(Type::DYNAMIC);
        }
        if !left.is_dynamic() && !right.is_dynamic() {
            if op == BinaryOp::Add && (*left == Type::STRING || *right == Type::STRING) {
                return Ok(Type::STRING);
            }
            if *left == Type::INTEGER && *right == Type::INTEGER {
                return Ok(Type::INTEGER);
            }
            if *left == Type::DECIMAL && *right == Type::DECIMAL {
                return Ok(Type::DECIMAL);
            }
            return Err(self.invalid_operands(op, left, right, node));
        }
        let concrete = if left.is_dynamic() { right } else { left };
        let allowed = if op == BinaryOp::Add {
            *concrete == Type::STRING || *concrete == Type::INTEGER || *concrete == Type::DECIMAL
        } else {
            *concrete == Type::INTEGER || *concrete == Type::DECIMAL
        };
        if allowed {
            Ok(concrete.clone())
        } else {
            Err(self.invalid_operands(op, left, right, node))
        }
    }

    fn variable(&mut self, ast: &VariableExpr) -> Result<TypedExpr, AnalysisError> {
        let node = NodeRef::new(NodeKind::Variable, ast.span);
        let ty = self
            .scope
            .resolve(ast.name, false)
            .ok_or_else(|| self.unbound(ast.name, node))?;
        Ok(TypedExpr {
            ty,
            kind: TypedExprKind::Variable(ast.name),
            span: ast.span,
        })
    }

    fn property(&mut self, ast: &PropertyExpr) -> Result<TypedExpr, AnalysisError> {
        let node = NodeRef::new(NodeKind::Property, ast.span);
        let receiver = self.expr(&ast.receiver)?;
        let ty = if receiver.ty.is_dynamic() {
            Type::DYNAMIC
        } else {
            self.lookup_member(&receiver.ty, ast.name).ok_or_else(|| {
                AnalysisError::new(
                    AnalysisErrorKind::UnknownProperty(self.text(ast.name)),
                    node,
                )
            })?
        };
        Ok(TypedExpr {
            ty,
            kind: TypedExprKind::Property {
                receiver: Box::new(receiver),
                name: ast.name,
            },
            span: ast.span,
        })
    }

    fn call(&mut self, ast: &CallExpr) -> Result<TypedExpr, AnalysisError> {
        let node = NodeRef::new(NodeKind::Call, ast.span);
        let callee = self
            .scope
            .resolve(ast.name, false)
            .ok_or_else(|| self.unbound(ast.name, node))?;
        let Type::Function(fn_ty) = &callee else {
            return Err(AnalysisError::new(
                AnalysisErrorKind::NotCallable(self.text(ast.name)),
                node,
            ));
        };
        let args = self.args(&ast.args)?;
        self.check_call(&args, &fn_ty.params, node)?;
        Ok(TypedExpr {
            ty: fn_ty.returns.clone(),
            kind: TypedExprKind::Call {
                name: ast.name,
                args,
            },
            span: ast.span,
        })
    }

    fn method_call(&mut self, ast: &MethodCallExpr) -> Result<TypedExpr, AnalysisError> {
        let node = NodeRef::new(NodeKind::MethodCall, ast.span);
        let receiver = self.expr(&ast.receiver)?;
        let args = self.args(&ast.args)?;
        let ty = if receiver.ty.is_dynamic() {
            Type::DYNAMIC
        } else {
            let member = self.lookup_member(&receiver.ty, ast.name).ok_or_else(|| {
                AnalysisError::new(AnalysisErrorKind::UnknownMethod(self.text(ast.name)), node)
            })?;
            let Type::Function(fn_ty) = &member else {
                return Err(AnalysisError::new(
                    AnalysisErrorKind::NotCallable(self.text(ast.name)),
                    node,
                ));
            };
            self.check_call(&args, &fn_ty.params, node)?;
            fn_ty.returns.clone()
        };
        Ok(TypedExpr {
            ty,
            kind: TypedExprKind::MethodCall {
                receiver: Box::new(receiver),
                name: ast.name,
                args,
            },
            span: ast.span,
        })
    }

    /// Fields are initialized against the enclosing scope but bound in the
    /// object's own member scope. Methods see the enclosing lexical scope
    /// plus `this`.
    fn object_literal(&mut self, ast: &ObjectExpr) -> Result<TypedExpr, AnalysisError> {
        let members = TypeScope::root();
        let object_ty = Type::Object(ObjectType {
            name: ast.name,
            members: members.clone(),
        });

        let mut fields = Vec::with_capacity(ast.fields.len());
        for field in &ast.fields {
            fields.push(self.let_stmt(field, &members)?);
        }
        let mut methods = Vec::with_capacity(ast.methods.len());
        for method in &ast.methods {
            methods.push(self.def_stmt(method, &members, Some(object_ty.clone()))?);
        }

        Ok(TypedExpr {
            ty: object_ty,
            kind: TypedExprKind::ObjectLiteral {
                name: ast.name,
                fields,
                methods,
            },
            span: ast.span,
        })
    }

    /// Walk the receiver's local member maps, following `prototype` links.
    fn lookup_member(&self, receiver: &Type, name: Name) -> Option<Type> {
        let mut current = receiver.clone();
        while let Type::Object(object) = &current {
            if let Some(found) = object.members.resolve(name, true) {
                return Some(found);
            }
            match object.members.resolve(self.names.prototype, true) {
                Some(prototype) => current = prototype,
                None => break,
            }
        }
        None
    }

    fn body(&mut self, statements: &[Stmt]) -> Result<Vec<TypedStmt>, AnalysisError> {
        statements.iter().map(|stmt| self.stmt(stmt)).collect()
    }

    fn args(&mut self, args: &[Expr]) -> Result<Vec<TypedExpr>, AnalysisError> {
        args.iter().map(|arg| self.expr(arg)).collect()
    }

    fn check_call(
        &self,
        args: &[TypedExpr],
        params: &[Type],
        node: NodeRef,
    ) -> Result<(), AnalysisError> {
        if args.len() != params.len() {
            return Err(AnalysisError::new(
                AnalysisErrorKind::ArityMismatch {
                    expected: params.len(),
                    found: args.len(),
                },
                node,
            ));
        }
        for (arg, param) in args.iter().zip(params) {
            self.require_subtype(&arg.ty, param, node)?;
        }
        Ok(())
    }

    /// Annotation names must name a registered type.
    fn resolve_type(&self, name: Name, node: NodeRef) -> Result<Type, AnalysisError> {
        self.registry.lookup(name).cloned().ok_or_else(|| {
            AnalysisError::new(AnalysisErrorKind::UnknownType(self.text(name)), node)
        })
    }

    fn with_scope<R>(&mut self, scope: TypeScope, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = saved;
        result
    }

    fn with_child_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let child = TypeScope::child_of(&self.scope);
        self.with_scope(child, f)
    }

    fn require_subtype(
        &self,
        found: &Type,
        expected: &Type,
        node: NodeRef,
    ) -> Result<(), AnalysisError> {
        if found.is_subtype_of(expected, &self.names) {
            Ok(())
        } else {
            Err(AnalysisError::new(
                AnalysisErrorKind::TypeMismatch {
                    expected: expected.display(&self.interner),
                    found: found.display(&self.interner),
                },
                node,
            ))
        }
    }

    fn related(&self, left: &Type, right: &Type) -> bool {
        left.is_subtype_of(right, &self.names) || right.is_subtype_of(left, &self.names)
    }

    fn invalid_operands(
        &self,
        op: BinaryOp,
        left: &Type,
        right: &Type,
        node: NodeRef,
    ) -> AnalysisError {
        AnalysisError::new(
            AnalysisErrorKind::InvalidOperandTypes {
                op,
                left: left.display(&self.interner),
                right: right.display(&self.interner),
            },
            node,
        )
    }

    fn duplicate(&self, name: Name, node: NodeRef) -> AnalysisError {
        AnalysisError::new(AnalysisErrorKind::DuplicateBinding(self.text(name)), node)
    }

    fn unbound(&self, name: Name, node: NodeRef) -> AnalysisError {
        AnalysisError::new(AnalysisErrorKind::UnboundName(self.text(name)), node)
    }

    fn text(&self, name: Name) -> String {
        self.interner.resolve(name).to_string()
    }
}
