//! Typed IR: the analyzer's output, mirroring the AST with a resolved type
//! on every binding and expression.

use rill_ir::{BinaryOp, Literal, Name, Span};

use crate::ty::Type;

#[derive(Debug, Clone, PartialEq)]
pub struct TypedSource {
    pub statements: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    Let(TypedLet),
    Def(TypedDef),
    If {
        condition: TypedExpr,
        then_body: Vec<TypedStmt>,
        else_body: Vec<TypedStmt>,
    },
    For {
        name: Name,
        iterable: TypedExpr,
        body: Vec<TypedStmt>,
    },
    Return {
        value: Option<TypedExpr>,
    },
    Expression(TypedExpr),
    AssignVariable {
        name: Name,
        ty: Type,
        value: TypedExpr,
    },
    AssignProperty {
        target: TypedExpr,
        value: TypedExpr,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedLet {
    pub name: Name,
    pub ty: Type,
    pub value: Option<TypedExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedDef {
    pub name: Name,
    pub params: Vec<TypedParam>,
    pub returns: Type,
    pub body: Vec<TypedStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedParam {
    pub name: Name,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub ty: Type,
    pub kind: TypedExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    Literal(Literal),
    Group(Box<TypedExpr>),
    Binary {
        op: BinaryOp,
        left: Box<TypedExpr>,
        right: Box<TypedExpr>,
    },
    Variable(Name),
    Property {
        receiver: Box<TypedExpr>,
        name: Name,
    },
    Call {
        name: Name,
        args: Vec<TypedExpr>,
    },
    MethodCall {
        receiver: Box<TypedExpr>,
        name: Name,
        args: Vec<TypedExpr>,
    },
    ObjectLiteral {
        name: Option<Name>,
        fields: Vec<TypedLet>,
        methods: Vec<TypedDef>,
    },
}
