//! Emits canonical source from the typed IR: one statement per line, four
//! spaces of indentation per level, and explicit annotations wherever the
//! analyzer resolved a nameable (primitive) type.
//!
//! Output is designed to re-parse and re-analyze to the same IR.

use rill_ir::{Literal, StringInterner};
use rill_types::{
    Type, TypedDef, TypedExpr, TypedExprKind, TypedLet, TypedSource, TypedStmt,
};

pub fn generate(source: &TypedSource, interner: &StringInterner) -> String {
    let mut generator = Generator::new(interner);
    for stmt in &source.statements {
        generator.stmt(stmt);
    }
    generator.out
}

struct Generator<'a> {
    interner: &'a StringInterner,
    out: String,
    indent: usize,
}

impl<'a> Generator<'a> {
    fn new(interner: &'a StringInterner) -> Self {
        Generator {
            interner,
            out: String::new(),
            indent: 0,
        }
    }

    fn stmt(&mut self, stmt: &TypedStmt) {
        self.start_line();
        match stmt {
            TypedStmt::Let(stmt) => self.let_stmt(stmt),
            TypedStmt::Def(def) => self.def_stmt(def),
            TypedStmt::If {
                condition,
                then_body,
                else_body,
            } => {
                self.push("IF ");
                self.expr(condition);
                self.push(" DO");
                self.block(then_body);
                if !else_body.is_empty() {
                    self.start_line();
                    self.push("ELSE");
                    self.block(else_body);
                }
                self.start_line();
                self.push("END");
            }
            TypedStmt::For {
                name,
                iterable,
                body,
            } => {
                self.push("FOR ");
                self.name(*name);
                self.push(" IN ");
                self.expr(iterable);
                self.push(" DO");
                self.block(body);
                self.start_line();
                self.push("END");
            }
            TypedStmt::Return { value } => {
                self.push("RETURN");
                if let Some(value) = value {
                    self.push(" ");
                    self.expr(value);
                }
                self.push(";");
            }
            TypedStmt::Expression(expr) => {
                self.expr(expr);
                self.push(";");
            }
            TypedStmt::AssignVariable { name, value, .. } => {
                self.name(*name);
                self.push(" = ");
                self.expr(value);
                self.push(";");
            }
            TypedStmt::AssignProperty { target, value } => {
                self.expr(target);
                self.push(" = ");
                self.expr(value);
                self.push(";");
            }
        }
        self.out.push('\n');
    }

    fn let_stmt(&mut self, stmt: &TypedLet) {
        self.push("LET ");
        self.name(stmt.name);
        self.annotation(&stmt.ty);
        if let Some(value) = &stmt.value {
            self.push(" = ");
            self.expr(value);
        }
        self.push(";");
    }

    fn def_stmt(&mut self, def: &TypedDef) {
        self.push("DEF ");
        self.name(def.name);
        self.push("(");
        for (index, param) in def.params.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.name(param.name);
            self.annotation(&param.ty);
        }
        self.push(")");
        self.annotation(&def.returns);
        self.push(" DO");
        self.block(&def.body);
        self.start_line();
        self.push("END");
    }

    fn expr(&mut self, expr: &TypedExpr) {
        match &expr.kind {
            TypedExprKind::Literal(literal) => self.literal(literal),
            TypedExprKind::Group(inner) => {
                self.push("(");
                self.expr(inner);
                self.push(")");
            }
            TypedExprKind::Binary { op, left, right } => {
                self.expr(left);
                self.push(&format!(" {} ", op.as_str()));
                self.expr(right);
            }
            TypedExprKind::Variable(name) => self.name(*name),
            TypedExprKind::Property { receiver, name } => {
                self.expr(receiver);
                self.push(".");
                self.name(*name);
            }
            TypedExprKind::Call { name, args } => {
                self.name(*name);
                self.args(args);
            }
            TypedExprKind::MethodCall {
                receiver,
                name,
                args,
            } => {
                self.expr(receiver);
                self.push(".");
                self.name(*name);
                self.args(args);
            }
            TypedExprKind::ObjectLiteral {
                name,
                fields,
                methods,
            } => {
                self.push("OBJECT ");
                if let Some(name) = name {
                    self.name(*name);
                    self.push(" ");
                }
                self.push("DO");
                self.out.push('\n');
                self.indent += 1;
                for field in fields {
                    self.start_line();
                    self.let_stmt(field);
                    self.out.push('\n');
                }
                for method in methods {
                    self.start_line();
                    self.def_stmt(method);
                    self.out.push('\n');
                }
                self.indent -= 1;
                self.start_line();
                self.push("END");
            }
        }
    }

    fn literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Nil => self.push("NIL"),
            Literal::Bool(true) => self.push("TRUE"),
            Literal::Bool(false) => self.push("FALSE"),
            Literal::Integer(value) => self.push(&value.to_string()),
            Literal::Decimal(value) => self.push(&value.to_string()),
            Literal::Character(value) => {
                self.push("'");
                self.push(&escape(*value, '\''));
                self.push("'");
            }
            Literal::String(name) => {
                self.push("\"");
                let text = self.interner.resolve(*name);
                let escaped: String = text.chars().map(|c| escape(c, '"')).collect();
                self.push(&escaped);
                self.push("\"");
            }
        }
    }

    fn args(&mut self, args: &[TypedExpr]) {
        self.push("(");
        for (index, arg) in args.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.expr(arg);
        }
        self.push(")");
    }

    /// `: Type` for nameable types; function and object types have no
    /// written form and are left inferred.
    fn annotation(&mut self, ty: &Type) {
        if let Type::Primitive(primitive) = ty {
            self.push(": ");
            self.push(primitive.name());
        }
    }

    fn block(&mut self, body: &[TypedStmt]) {
        self.out.push('\n');
        self.indent += 1;
        for stmt in body {
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    fn start_line(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
    }

    fn name(&mut self, name: rill_ir::Name) {
        let text = self.interner.resolve(name);
        self.push(&text);
    }

    fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }
}

/// Escape one character for a quoted literal delimited by `quote`.
fn escape(c: char, quote: char) -> String {
    match c {
        '\x08' => "\\b".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\\' => "\\\\".to_string(),
        c if c == quote => format!("\\{quote}"),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rill_ir::SharedInterner;
    use rill_parse::Parser;
    use rill_types::Analyzer;
    use std::sync::Arc;

    fn emit(source: &str) -> String {
        let interner: SharedInterner = Arc::new(StringInterner::new());
        let tokens = rill_lexer::lex(source, &interner).unwrap();
        let parsed = Parser::new(&tokens, &interner).parse_source().unwrap();
        let typed = Analyzer::new(interner.clone()).analyze(&parsed).unwrap();
        generate(&typed, &interner)
    }

    #[test]
    fn lets_gain_inferred_annotations() {
        assert_eq!(emit("LET x = 1;"), "LET x: Integer = 1;\n");
        assert_eq!(emit("LET s = \"a\";"), "LET s: String = \"a\";\n");
        assert_eq!(emit("LET d;"), "LET d: Dynamic;\n");
    }

    #[test]
    fn defs_annotate_params_and_return() {
        assert_eq!(
            emit("DEF f(a: Integer): Integer DO RETURN a; END"),
            "DEF f(a: Integer): Integer DO\n    RETURN a;\nEND\n"
        );
        assert_eq!(
            emit("DEF f(a) DO END"),
            "DEF f(a: Dynamic): Dynamic DO\nEND\n"
        );
    }

    #[test]
    fn control_flow_layout() {
        assert_eq!(
            emit("IF TRUE DO log(1); ELSE log(2); END"),
            "IF TRUE DO\n    log(1);\nELSE\n    log(2);\nEND\n"
        );
        assert_eq!(
            emit("FOR i IN range(1, 5) DO log(i); END"),
            "FOR i IN range(1, 5) DO\n    log(i);\nEND\n"
        );
    }

    #[test]
    fn groups_and_operators_round_trip() {
        assert_eq!(emit("(1 + 2) * 3;"), "(1 + 2) * 3;\n");
        assert_eq!(emit("TRUE AND FALSE OR TRUE;"), "TRUE AND FALSE OR TRUE;\n");
    }

    #[test]
    fn string_escapes_are_re_emitted() {
        assert_eq!(emit("log(\"a\\nb\");"), "log(\"a\\nb\");\n");
        assert_eq!(emit("LET c = 'x';"), "LET c: Character = 'x';\n");
    }

    #[test]
    fn object_literals_emit_nested_blocks() {
        let expected = "LET p = OBJECT Point DO\n    LET x: Integer = 1;\n    \
                        DEF getX(): Integer DO\n        RETURN this.x;\n    END\nEND;\n";
        assert_eq!(
            emit("LET p = OBJECT Point DO LET x = 1; DEF getX(): Integer DO RETURN this.x; END END;"),
            expected
        );
        assert_eq!(emit("LET o = OBJECT DO END;"), "LET o = OBJECT DO\nEND;\n");
    }

    #[test]
    fn emitted_source_is_a_fixed_point() {
        let source = "DEF main() DO \
            FOR i IN range(1, 5) DO log(i * 2); END \
        END \
        main();";
        let first = emit(source);
        let second = emit(&first);
        assert_eq!(first, second);
    }
}
