use crate::{core::Loc, lexer::Token};

use super::{Literal, Signature, Stmt};

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Binary(Box<Expr>, Token, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>, Token),
    Composite(Token),
    Func(Loc, Signature, Vec<Stmt>),
    Grouping(Box<Expr>),
    Literal(Loc, Literal),
    Selector(Box<Expr>, Token),
    Unary(Token, Box<Expr>),
    Var(Token),
}

pub trait ExprVisitor<T> {
    fn visit_expr(&mut self, expr: &Expr) -> T {
        match expr {
            Expr::Binary(left, op, right) => {
                self.visit_binary(left, op, right)
            },
            Expr::Call(callee, args, close) => {
                self.visit_call(callee, args, close)
            },
            Expr::Composite(ty) => {
                self.visit_composite(ty)
            },
            Expr::Func(loc, sig, body) => {
                self.visit_func_expr(loc, sig, body)
            },
            Expr::Grouping(expr) => {
                self.visit_grouping(expr)
            },
            Expr::Literal(loc, value) => {
                self.visit_literal(loc, value)
            },
            Expr::Selector(obj, field) => {
                self.visit_selector(obj, field)
            },
            Expr::Unary(op, expr) => {
                self.visit_unary(op, expr)
            },
            Expr::Var(name) => {
                self.visit_var_ref(name)
            }
        }
    }

    fn visit_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> T;

    fn visit_call(&mut self, callee: &Expr, args: &[Expr], close: &Token) -> T;

    fn visit_composite(&mut self, ty: &Token) -> T;

    fn visit_func_expr(&mut self, loc: &Loc, sig: &Signature, body: &[Stmt]) -> T;

    fn visit_grouping(&mut self, expr: &Expr) -> T;

    fn visit_literal(&mut self, loc: &Loc, value: &Literal) -> T;

    fn visit_selector(&mut self, obj: &Expr, field: &Token) -> T;

    fn visit_unary(&mut self, op: &Token, expr: &Expr) -> T;

    fn visit_var_ref(&mut self, name: &Token) -> T;
}
