//! The tree-walking evaluator.

use std::rc::Rc;

use rill_ir::{
    AssignStmt, DefStmt, Expr, LetStmt, Literal, Name, NodeKind, NodeRef, ObjectExpr,
    SharedInterner, Source, Stmt,
};
use rill_ir::BinaryOp;

use crate::error::{EvalError, EvalErrorKind};
use crate::operators;
use crate::prelude::prelude_scope;
use crate::print_handler::SharedPrintHandler;
use crate::value::{FunctionKind, FunctionValue, ObjectValue, Value, ValueScope};

/// Names with fixed runtime meaning, interned once up front.
struct Names {
    prototype: Name,
    this: Name,
    /// Debug names of the prelude objects whose methods get the receiver
    /// prepended to their arguments.
    object_debug: Name,
    prototype_debug: Name,
}

pub struct Evaluator {
    interner: SharedInterner,
    names: Names,
    scope: ValueScope,
}

impl Evaluator {
    pub fn new(interner: SharedInterner, handler: SharedPrintHandler) -> Self {
        let scope = ValueScope::child_of(&prelude_scope(&interner, &handler));
        Evaluator::from_scope(interner, scope)
    }

    /// Evaluator over an existing scope, for incremental (REPL) use.
    pub fn from_scope(interner: SharedInterner, scope: ValueScope) -> Self {
        let names = Names {
            prototype: interner.intern("prototype"),
            this: interner.intern("this"),
            object_debug: interner.intern("Object"),
            prototype_debug: interner.intern("Prototype"),
        };
        Evaluator {
            interner,
            names,
            scope,
        }
    }

    pub fn scope(&self) -> ValueScope {
        self.scope.clone()
    }

    /// Evaluate a whole source unit; yields the last statement's value.
    pub fn evaluate(&mut self, source: &Source) -> Result<Value, EvalError> {
        tracing::debug!(statements = source.statements.len(), "evaluate source");
        let mut result = Value::Nil;
        for stmt in &source.statements {
            result = self
                .stmt(stmt)
                .map_err(|err| err.escaped(source.node_ref()))?;
        }
        Ok(result)
    }

    pub fn evaluate_stmt(&mut self, stmt: &Stmt) -> Result<Value, EvalError> {
        self.stmt(stmt)
            .map_err(|err| err.escaped(stmt.node_ref()))
    }

    /// Each statement yields a value: `LET` the bound value, `DEF` the
    /// function, `IF` the chosen branch's last value, assignment the
    /// assigned value.
    fn stmt(&mut self, stmt: &Stmt) -> Result<Value, EvalError> {
        match stmt {
            Stmt::Let(ast) => self.let_stmt(ast),
            Stmt::Def(ast) => self.define_function(ast, None),
            Stmt::If(ast) => {
                let node = stmt.node_ref();
                let condition = self.expr(&ast.condition)?;
                let Value::Bool(flag) = &condition else {
                    return Err(self.type_error(
                        format!("IF condition must be a Boolean, found {}", condition.kind_name()),
                        node,
                    ));
                };
                let body = if *flag { &ast.then_body } else { &ast.else_body };
                self.with_child_scope(|evaluator| evaluator.body(body))
            }
            Stmt::For(ast) => {
                let node = stmt.node_ref();
                let iterable = self.expr(&ast.iterable)?;
                let Value::List(items) = &iterable else {
                    return Err(self.type_error(
                        format!("FOR expects a list, found {}", iterable.kind_name()),
                        node,
                    ));
                };
                for item in items.iter() {
                    let loop_scope = ValueScope::child_of(&self.scope);
                    let _ = loop_scope.define(ast.name, item.clone());
                    let body_scope = ValueScope::child_of(&loop_scope);
                    self.with_scope(body_scope, |evaluator| evaluator.body(&ast.body))?;
                }
                Ok(Value::Nil)
            }
            Stmt::Return(ast) => {
                let value = match &ast.value {
                    Some(expr) => self.expr(expr)?,
                    None => Value::Nil,
                };
                Err(EvalError::returning(value))
            }
            Stmt::Expression(ast) => self.expr(&ast.expression),
            Stmt::Assignment(ast) => self.assign_stmt(ast),
        }
    }

    fn let_stmt(&mut self, ast: &LetStmt) -> Result<Value, EvalError> {
        let node = NodeRef::new(NodeKind::Let, ast.span);
        let value = match &ast.value {
            Some(expr) => self.expr(expr)?,
            None => Value::Nil,
        };
        self.scope
            .define(ast.name, value.clone())
            .map_err(|_| self.duplicate(ast.name, node))?;
        Ok(value)
    }

    /// Bind a function closing over the current scope. Object methods carry
    /// the object for `this`.
    fn define_function(
        &mut self,
        ast: &Rc<DefStmt>,
        this: Option<Value>,
    ) -> Result<Value, EvalError> {
        let node = NodeRef::new(NodeKind::Def, ast.span);
        let function = Value::Function(FunctionValue {
            name: ast.name,
            kind: FunctionKind::Declared {
                def: ast.clone(),
                captured: self.scope.clone(),
                this: this.map(Box::new),
            },
        });
        self.scope
            .define(ast.name, function.clone())
            .map_err(|_| self.duplicate(ast.name, node))?;
        Ok(function)
    }

    /// The target is resolved (variables) or visibility-checked (properties)
    /// before the value is evaluated.
    fn assign_stmt(&mut self, ast: &AssignStmt) -> Result<Value, EvalError> {
        let node = NodeRef::new(NodeKind::Assignment, ast.span);
        match &ast.target {
            Expr::Variable(variable) => {
                if self.scope.resolve(variable.name, false).is_none() {
                    return Err(self.unbound(variable.name, node));
                }
                let value = self.expr(&ast.value)?;
                self.scope
                    .assign(variable.name, value.clone())
                    .map_err(|_| self.unbound(variable.name, node))?;
                Ok(value)
            }
            Expr::Property(property) => {
                let receiver = self.expr(&property.receiver)?;
                let Value::Object(object) = &receiver else {
                    return Err(self.type_error(
                        format!("property assignment on {}", receiver.kind_name()),
                        node,
                    ));
                };
                let object = object.clone();
                if self.lookup_member(&object, property.name).is_none() {
                    return Err(EvalError::new(
                        EvalErrorKind::UnknownProperty(self.text(property.name)),
                        node,
                    ));
                }
                let value = self.expr(&ast.value)?;
                // Inherited members are shadowed on the receiver, never
                // written through to the prototype.
                if object.scope.is_defined_local(property.name) {
                    object
                        .scope
                        .assign(property.name, value.clone())
                        .map_err(|_| self.unbound(property.name, node))?;
                } else {
                    object
                        .scope
                        .define(property.name, value.clone())
                        .map_err(|_| self.duplicate(property.name, node))?;
                }
                Ok(value)
            }
            other => Err(EvalError::new(
                EvalErrorKind::InvalidAssignmentTarget,
                other.node_ref(),
            )),
        }
    }

    fn expr(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(ast) => Ok(match &ast.value {
                Literal::Nil => Value::Nil,
                Literal::Bool(value) => Value::Bool(*value),
                Literal::Integer(value) => Value::Int(value.clone()),
                Literal::Decimal(value) => Value::Decimal(value.clone()),
                Literal::Character(value) => Value::Char(*value),
                Literal::String(name) => Value::Str(self.interner.resolve(*name)),
            }),
            Expr::Group(ast) => self.expr(&ast.inner),
            Expr::Binary(ast) => {
                let node = NodeRef::new(NodeKind::Binary, ast.span);
                match ast.op {
                    BinaryOp::And => self.short_circuit(&ast.left, &ast.right, false, node),
                    BinaryOp::Or => self.short_circuit(&ast.left, &ast.right, true, node),
                    op => {
                        let left = self.expr(&ast.left)?;
                        // `- * /` reject a non-numeric left operand before
                        // the right operand runs.
                        if matches!(op, BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div)
                            && !matches!(left, Value::Int(_) | Value::Decimal(_))
                        {
                            return Err(self.type_error(
                                format!(
                                    "invalid left operand for `{op}`: {}",
                                    left.kind_name()
                                ),
                                node,
                            ));
                        }
                        let right = self.expr(&ast.right)?;
                        operators::apply(op, left, right, &self.interner, node)
                    }
                }
            }
            Expr::Variable(ast) => {
                let node = NodeRef::new(NodeKind::Variable, ast.span);
                self.scope
                    .resolve(ast.name, false)
                    .ok_or_else(|| self.unbound(ast.name, node))
            }
            Expr::Property(ast) => {
                let node = NodeRef::new(NodeKind::Property, ast.span);
                let receiver = self.expr(&ast.receiver)?;
                let Value::Object(object) = &receiver else {
                    return Err(self.type_error(
                        format!("property access on {}", receiver.kind_name()),
                        node,
                    ));
                };
                match self.lookup_member(object, ast.name) {
                    Some((_, value)) => Ok(value),
                    None => Err(EvalError::new(
                        EvalErrorKind::UnknownProperty(self.text(ast.name)),
                        node,
                    )),
                }
            }
            Expr::Call(ast) => {
                let node = NodeRef::new(NodeKind::Call, ast.span);
                let callee = self
                    .scope
                    .resolve(ast.name, false)
                    .ok_or_else(|| self.unbound(ast.name, node))?;
                let Value::Function(function) = callee else {
                    return Err(self.type_error(
                        format!("`{}` is not a function", self.text(ast.name)),
                        node,
                    ));
                };
                let args = self.args(&ast.args)?;
                self.invoke(&function, args, node)
            }
            Expr::MethodCall(ast) => {
                let node = NodeRef::new(NodeKind::MethodCall, ast.span);
                let receiver = self.expr(&ast.receiver)?;
                let Value::Object(object) = &receiver else {
                    return Err(self.type_error(
                        format!("method call on {}", receiver.kind_name()),
                        node,
                    ));
                };
                // The member is resolved before the arguments run.
                let Some((owner, member)) = self.lookup_member(object, ast.name) else {
                    return Err(EvalError::new(
                        EvalErrorKind::UnknownMethod(self.text(ast.name)),
                        node,
                    ));
                };
                let Value::Function(function) = member else {
                    return Err(self.type_error(
                        format!("`{}` is not a method", self.text(ast.name)),
                        node,
                    ));
                };
                let mut args = self.args(&ast.args)?;
                if owner.name == Some(self.names.object_debug)
                    || owner.name == Some(self.names.prototype_debug)
                {
                    args.insert(0, receiver.clone());
                }
                self.invoke(&function, args, node)
            }
            Expr::ObjectLiteral(ast) => self.object_literal(ast),
        }
    }

    fn short_circuit(
        &mut self,
        left: &Expr,
        right: &Expr,
        stop_on: bool,
        node: NodeRef,
    ) -> Result<Value, EvalError> {
        let left = self.expr(left)?;
        let Value::Bool(flag) = &left else {
            return Err(self.type_error(
                format!("logical operand must be a Boolean, found {}", left.kind_name()),
                node,
            ));
        };
        if *flag == stop_on {
            return Ok(Value::Bool(*flag));
        }
        let right = self.expr(right)?;
        let Value::Bool(flag) = &right else {
            return Err(self.type_error(
                format!("logical operand must be a Boolean, found {}", right.kind_name()),
                node,
            ));
        };
        Ok(Value::Bool(*flag))
    }

    /// Fields and methods are evaluated with the object's own parentless
    /// scope as the current scope; method closures capture it.
    fn object_literal(&mut self, ast: &ObjectExpr) -> Result<Value, EvalError> {
        let object = ObjectValue {
            name: ast.name,
            scope: ValueScope::root(),
        };
        let this = Value::Object(object.clone());
        self.with_scope(object.scope.clone(), |evaluator| {
            for field in &ast.fields {
                evaluator.let_stmt(field)?;
            }
            for method in &ast.methods {
                evaluator.define_function(method, Some(this.clone()))?;
            }
            Ok(())
        })?;
        Ok(this)
    }

    fn invoke(
        &mut self,
        function: &FunctionValue,
        args: Vec<Value>,
        node: NodeRef,
    ) -> Result<Value, EvalError> {
        tracing::trace!(name = %self.interner.resolve(function.name), "invoke");
        match &function.kind {
            FunctionKind::Builtin(builtin) => {
                builtin(args).map_err(|err| match err.node {
                    Some(_) => err,
                    None => EvalError::new(err.kind, node),
                })
            }
            FunctionKind::Declared {
                def,
                captured,
                this,
            } => {
                if args.len() != def.params.len() {
                    return Err(EvalError::new(
                        EvalErrorKind::ArityMismatch {
                            expected: def.params.len(),
                            found: args.len(),
                        },
                        node,
                    ));
                }
                let param_scope = ValueScope::child_of(captured);
                if let Some(this_value) = this {
                    let _ = param_scope.define(self.names.this, (**this_value).clone());
                }
                for (param, arg) in def.params.iter().zip(args) {
                    let _ = param_scope.define(param.name, arg);
                }
                let body_scope = ValueScope::child_of(&param_scope);
                let def = def.clone();
                let result = self.with_scope(body_scope, |evaluator| evaluator.body(&def.body));
                match result {
                    Ok(_) => Ok(Value::Nil),
                    Err(err) => err.take_return(),
                }
            }
        }
    }

    /// Walk the receiver's own members, following `prototype` links; yields
    /// the owning object and the value.
    fn lookup_member(&self, receiver: &ObjectValue, name: Name) -> Option<(ObjectValue, Value)> {
        let mut current = receiver.clone();
        loop {
            if let Some(value) = current.scope.resolve(name, true) {
                return Some((current, value));
            }
            match current.scope.resolve(self.names.prototype, true) {
                Some(Value::Object(next)) => current = next,
                _ => return None,
            }
        }
    }

    fn body(&mut self, statements: &[Stmt]) -> Result<Value, EvalError> {
        let mut result = Value::Nil;
        for stmt in statements {
            result = self.stmt(stmt)?;
        }
        Ok(result)
    }

    fn args(&mut self, args: &[Expr]) -> Result<Vec<Value>, EvalError> {
        args.iter().map(|arg| self.expr(arg)).collect()
    }

    fn with_scope<R>(&mut self, scope: ValueScope, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = saved;
        result
    }

    fn with_child_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let child = ValueScope::child_of(&self.scope);
        self.with_scope(child, f)
    }

    fn type_error(&self, message: String, node: NodeRef) -> EvalError {
        EvalError::new(EvalErrorKind::TypeError(message), node)
    }

    fn duplicate(&self, name: Name, node: NodeRef) -> EvalError {
        EvalError::new(EvalErrorKind::DuplicateBinding(self.text(name)), node)
    }

    fn unbound(&self, name: Name, node: NodeRef) -> EvalError {
        EvalError::new(EvalErrorKind::UnboundName(self.text(name)), node)
    }

    fn text(&self, name: Name) -> String {
        self.interner.resolve(name).to_string()
    }
}
