use crate::{core::Loc, lexer::Token};

use super::{Expr, ExprVisitor};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Var,
    Const,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Token,
    pub ty: Option<Token>,
}

/// The declared parameter and result lists of a function-like entity. Result
/// types are plain type names; only their count matters to the analyses.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Token>,
}

/// One `name, name = value, value` entry of a `var`/`const` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    pub names: Vec<Token>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(Vec<Expr>, Token, Vec<Expr>),
    Decl(DeclKind, Loc, Vec<Spec>),
    Expression(Expr),
    Func(Option<Token>, Token, Signature, Vec<Stmt>),
    Return(Loc, Vec<Expr>),
}

pub trait StmtVisitor<T>: ExprVisitor<T> {
    fn visit_stmt(&mut self, stmt: &Stmt) -> T {
        match stmt {
            Stmt::Assign(targets, op, values) => self.visit_assign(targets, op, values),
            Stmt::Decl(kind, loc, specs) => self.visit_decl(*kind, loc, specs),
            Stmt::Expression(expr) => self.visit_stmt_expr(expr),
            Stmt::Func(receiver, name, sig, body) => self.visit_func_def(receiver.as_ref(), name, sig, body),
            Stmt::Return(loc, values) => self.visit_return(loc, values),
        }
    }

    fn visit_assign(&mut self, targets: &[Expr], op: &Token, values: &[Expr]) -> T;

    fn visit_decl(&mut self, kind: DeclKind, loc: &Loc, specs: &[Spec]) -> T;

    fn visit_stmt_expr(&mut self, expr: &Expr) -> T;

    fn visit_func_def(&mut self, receiver: Option<&Token>, name: &Token, sig: &Signature, body: &[Stmt]) -> T;

    fn visit_return(&mut self, loc: &Loc, values: &[Expr]) -> T;
}
