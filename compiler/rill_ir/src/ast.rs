//! The immutable AST shared by the analyzer and the evaluator.
//!
//! Statement nodes optionally carry type-annotation names; only the analyzer
//! reads them. `Def` bodies are `Rc`-shared because function values capture
//! their definition node for later invocation.

use std::fmt;
use std::rc::Rc;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{Name, Span};

/// A whole source unit: an ordered list of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(LetStmt),
    Def(Rc<DefStmt>),
    If(IfStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Expression(ExprStmt),
    Assignment(AssignStmt),
}

/// `LET name (: Type)? (= value)? ;`
#[derive(Debug, Clone, PartialEq)]
pub struct LetStmt {
    pub name: Name,
    pub ty: Option<Name>,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `DEF name(params) (: Type)? DO body END`
#[derive(Debug, Clone, PartialEq)]
pub struct DefStmt {
    pub name: Name,
    pub params: Vec<Param>,
    pub return_ty: Option<Name>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Name,
    pub ty: Option<Name>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Vec<Stmt>,
    pub else_body: Vec<Stmt>,
    pub span: Span,
}

/// `FOR name IN iterable DO body END`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub name: Name,
    pub iterable: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expression: Expr,
    pub span: Span,
}

/// `target = value ;` — target validity is checked by the engines.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(LiteralExpr),
    Group(GroupExpr),
    Binary(BinaryExpr),
    Variable(VariableExpr),
    Property(PropertyExpr),
    Call(CallExpr),
    MethodCall(MethodCallExpr),
    ObjectLiteral(ObjectExpr),
}

/// Literal values, already cooked by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(Name),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupExpr {
    pub inner: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    /// Source-level spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpr {
    pub name: Name,
    pub span: Span,
}

/// `receiver.name`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyExpr {
    pub receiver: Box<Expr>,
    pub name: Name,
    pub span: Span,
}

/// `name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `receiver.name(args)`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpr {
    pub receiver: Box<Expr>,
    pub name: Name,
    pub args: Vec<Expr>,
    pub span: Span,
}

/// `OBJECT name? DO fields methods END`
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    pub name: Option<Name>,
    pub fields: Vec<LetStmt>,
    pub methods: Vec<Rc<DefStmt>>,
    pub span: Span,
}

/// Which syntactic construct an error is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Source,
    Let,
    Def,
    If,
    For,
    Return,
    Expression,
    Assignment,
    Literal,
    Group,
    Binary,
    Variable,
    Property,
    Call,
    MethodCall,
    ObjectLiteral,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            NodeKind::Source => "source",
            NodeKind::Let => "LET statement",
            NodeKind::Def => "DEF statement",
            NodeKind::If => "IF statement",
            NodeKind::For => "FOR statement",
            NodeKind::Return => "RETURN statement",
            NodeKind::Expression => "expression statement",
            NodeKind::Assignment => "assignment",
            NodeKind::Literal => "literal",
            NodeKind::Group => "group expression",
            NodeKind::Binary => "binary expression",
            NodeKind::Variable => "variable",
            NodeKind::Property => "property access",
            NodeKind::Call => "function call",
            NodeKind::MethodCall => "method call",
            NodeKind::ObjectLiteral => "object literal",
        };
        f.write_str(text)
    }
}

/// Lightweight reference to an AST node for error provenance: which kind of
/// construct, and where in the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeRef {
    pub kind: NodeKind,
    pub span: Span,
}

impl NodeRef {
    #[inline]
    pub const fn new(kind: NodeKind, span: Span) -> Self {
        NodeRef { kind, span }
    }
}

impl Source {
    pub fn node_ref(&self) -> NodeRef {
        NodeRef::new(NodeKind::Source, self.span)
    }
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let(s) => s.span,
            Stmt::Def(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Expression(s) => s.span,
            Stmt::Assignment(s) => s.span,
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        let kind = match self {
            Stmt::Let(_) => NodeKind::Let,
            Stmt::Def(_) => NodeKind::Def,
            Stmt::If(_) => NodeKind::If,
            Stmt::For(_) => NodeKind::For,
            Stmt::Return(_) => NodeKind::Return,
            Stmt::Expression(_) => NodeKind::Expression,
            Stmt::Assignment(_) => NodeKind::Assignment,
        };
        NodeRef::new(kind, self.span())
    }
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Literal(e) => e.span,
            Expr::Group(e) => e.span,
            Expr::Binary(e) => e.span,
            Expr::Variable(e) => e.span,
            Expr::Property(e) => e.span,
            Expr::Call(e) => e.span,
            Expr::MethodCall(e) => e.span,
            Expr::ObjectLiteral(e) => e.span,
        }
    }

    pub fn node_ref(&self) -> NodeRef {
        let kind = match self {
            Expr::Literal(_) => NodeKind::Literal,
            Expr::Group(_) => NodeKind::Group,
            Expr::Binary(_) => NodeKind::Binary,
            Expr::Variable(_) => NodeKind::Variable,
            Expr::Property(_) => NodeKind::Property,
            Expr::Call(_) => NodeKind::Call,
            Expr::MethodCall(_) => NodeKind::MethodCall,
            Expr::ObjectLiteral(_) => NodeKind::ObjectLiteral,
        };
        NodeRef::new(kind, self.span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stmt_node_ref_kind() {
        let stmt = Stmt::Return(ReturnStmt {
            value: None,
            span: Span::new(0, 7),
        });
        let node = stmt.node_ref();
        assert_eq!(node.kind, NodeKind::Return);
        assert_eq!(node.span, Span::new(0, 7));
    }

    #[test]
    fn expr_node_ref_kind() {
        let expr = Expr::Variable(VariableExpr {
            name: Name::EMPTY,
            span: Span::new(2, 3),
        });
        assert_eq!(expr.node_ref().kind, NodeKind::Variable);
    }

    #[test]
    fn binary_op_spelling() {
        assert_eq!(BinaryOp::And.as_str(), "AND");
        assert_eq!(BinaryOp::Ne.to_string(), "!=");
    }
}
