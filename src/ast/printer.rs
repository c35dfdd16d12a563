use crate::{core::Loc, lexer::Token};

use super::{DeclKind, Expr, ExprVisitor, Literal, Signature, Spec, Stmt, StmtVisitor};

/// Renders the syntax tree as s-expressions, which keeps the parser's tests
/// readable and backs the CLI's debug output.
pub struct AstPrinter {}

impl AstPrinter {
    fn print_names(&mut self, names: &[Token]) -> String {
        format!("({})", names.iter().map(|n| n.lexeme().to_string()).collect::<Vec<_>>().join(" "))
    }

    fn print_signature(&mut self, sig: &Signature) -> String {
        format!(
            "({}) ({})",
            sig.params.iter().map(|p| p.name.lexeme().to_string()).collect::<Vec<_>>().join(" "),
            sig.results.iter().map(|r| r.lexeme().to_string()).collect::<Vec<_>>().join(" "),
        )
    }

    fn print_func(&mut self, head: String, sig: &Signature, body: &[Stmt]) -> String {
        let mut out = head;
        out.push(' ');
        out.push_str(&self.print_signature(sig));
        for stmt in body {
            out.push(' ');
            out.push_str(&self.visit_stmt(stmt));
        }
        out.push(')');
        out
    }

    fn print_spec(&mut self, spec: &Spec) -> String {
        if spec.values.is_empty() {
            self.print_names(&spec.names)
        } else {
            format!(
                "(= {} {})",
                self.print_names(&spec.names),
                spec.values.iter().map(|v| self.visit_expr(v)).collect::<Vec<_>>().join(" "),
            )
        }
    }
}

impl ExprVisitor<String> for AstPrinter {
    fn visit_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> String {
        format!("({} {} {})", op.lexeme(), self.visit_expr(left), self.visit_expr(right))
    }

    fn visit_call(&mut self, callee: &Expr, args: &[Expr], _close: &Token) -> String {
        let mut out = format!("(call {}", self.visit_expr(callee));
        for arg in args {
            out.push(' ');
            out.push_str(&self.visit_expr(arg));
        }
        out.push(')');
        out
    }

    fn visit_composite(&mut self, ty: &Token) -> String {
        format!("(composite {})", ty.lexeme())
    }

    fn visit_func_expr(&mut self, _loc: &Loc, sig: &Signature, body: &[Stmt]) -> String {
        self.print_func("(func".to_string(), sig, body)
    }

    fn visit_grouping(&mut self, expr: &Expr) -> String {
        format!("(group {})", self.visit_expr(expr))
    }

    fn visit_literal(&mut self, _loc: &Loc, value: &Literal) -> String {
        format!("{}", value)
    }

    fn visit_selector(&mut self, obj: &Expr, field: &Token) -> String {
        format!("(. {} {})", self.visit_expr(obj), field.lexeme())
    }

    fn visit_unary(&mut self, op: &Token, expr: &Expr) -> String {
        format!("({} {})", op.lexeme(), self.visit_expr(expr))
    }

    fn visit_var_ref(&mut self, name: &Token) -> String {
        name.lexeme().to_string()
    }
}

impl StmtVisitor<String> for AstPrinter {
    fn visit_assign(&mut self, targets: &[Expr], op: &Token, values: &[Expr]) -> String {
        format!(
            "({} ({}) {})",
            op.lexeme(),
            targets.iter().map(|t| self.visit_expr(t)).collect::<Vec<_>>().join(" "),
            values.iter().map(|v| self.visit_expr(v)).collect::<Vec<_>>().join(" "),
        )
    }

    fn visit_decl(&mut self, kind: DeclKind, _loc: &Loc, specs: &[Spec]) -> String {
        let keyword = match kind {
            DeclKind::Var => "var",
            DeclKind::Const => "const",
        };

        format!(
            "({} {})",
            keyword,
            specs.iter().map(|s| self.print_spec(s)).collect::<Vec<_>>().join(" "),
        )
    }

    fn visit_stmt_expr(&mut self, expr: &Expr) -> String {
        format!("({})", self.visit_expr(expr))
    }

    fn visit_func_def(&mut self, receiver: Option<&Token>, name: &Token, sig: &Signature, body: &[Stmt]) -> String {
        let head = match receiver {
            Some(recv) => format!("(method {} {}", recv.lexeme(), name.lexeme()),
            None => format!("(func {}", name.lexeme()),
        };

        self.print_func(head, sig, body)
    }

    fn visit_return(&mut self, _loc: &Loc, values: &[Expr]) -> String {
        let mut out = "(return".to_string();
        for value in values {
            out.push(' ');
            out.push_str(&self.visit_expr(value));
        }
        out.push(')');
        out
    }
}
