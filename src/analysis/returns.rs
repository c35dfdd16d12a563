use fnv::FnvHashMap;

use crate::{
    ast::{DeclKind, Expr, ExprVisitor, Literal, Signature, Spec, Stmt, StmtVisitor},
    core::Loc,
    lexer::Token,
};

use super::{Analyzer, Diagnostic};

/// Flags functions which are called at least once but have a return position
/// which is never bound to anything other than the '_' placeholder at any call
/// site. Works in two ordered passes over the tree: the first collects every
/// function-like declaration with a non-empty result list, the second inspects
/// every call site and records which return positions are ever captured.
///
/// The table is keyed by bare name: same-named methods on different receivers
/// are conflated and a later declaration overwrites an earlier one.
#[derive(Debug, Default)]
pub(super) struct ReturnUseAnalyzer {}

impl Analyzer for ReturnUseAnalyzer {
    fn analyze(&mut self, stmts: &[Stmt]) -> Vec<Diagnostic> {
        let mut collector = DeclCollector::default();
        for stmt in stmts {
            collector.visit_stmt(stmt);
        }

        let mut scanner = CallScanner { funcs: &mut collector.funcs };
        for stmt in stmts {
            scanner.visit_stmt(stmt);
        }

        report(&collector.funcs)
    }
}

#[derive(Debug)]
struct FuncInfo {
    loc: Loc,
    called: bool,
    captured: Vec<bool>,
}

impl FuncInfo {
    fn new(loc: Loc, ret_len: usize) -> Self {
        Self {
            loc,
            called: false,
            captured: vec![false; ret_len],
        }
    }
}

#[derive(Debug, Default)]
struct DeclCollector {
    funcs: FnvHashMap<String, FuncInfo>,
}

impl DeclCollector {
    fn collect(&mut self, name: &Token, sig: &Signature) {
        if !sig.results.is_empty() {
            self.funcs.insert(
                name.lexeme().to_string(),
                FuncInfo::new(name.location(), sig.results.len()),
            );
        }
    }
}

impl ExprVisitor<()> for DeclCollector {
    fn visit_binary(&mut self, left: &Expr, _op: &Token, right: &Expr) {
        self.visit_expr(left);
        self.visit_expr(right);
    }

    fn visit_call(&mut self, callee: &Expr, args: &[Expr], _close: &Token) {
        self.visit_expr(callee);
        for arg in args {
            self.visit_expr(arg);
        }
    }

    fn visit_composite(&mut self, _ty: &Token) {}

    fn visit_func_expr(&mut self, _loc: &Loc, _sig: &Signature, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_grouping(&mut self, expr: &Expr) {
        self.visit_expr(expr);
    }

    fn visit_literal(&mut self, _loc: &Loc, _value: &Literal) {}

    fn visit_selector(&mut self, obj: &Expr, _field: &Token) {
        self.visit_expr(obj);
    }

    fn visit_unary(&mut self, _op: &Token, expr: &Expr) {
        self.visit_expr(expr);
    }

    fn visit_var_ref(&mut self, _name: &Token) {}
}

impl StmtVisitor<()> for DeclCollector {
    fn visit_assign(&mut self, targets: &[Expr], _op: &Token, values: &[Expr]) {
        // A function literal assigned to a plain identifier becomes callable
        // under that identifier's name.
        for (i, value) in values.iter().enumerate() {
            if let Expr::Func(_, sig, _) = value {
                if let Some(Expr::Var(name)) = targets.get(i) {
                    self.collect(name, sig);
                }
            }
            self.visit_expr(value);
        }
    }

    fn visit_decl(&mut self, _kind: DeclKind, _loc: &Loc, specs: &[Spec]) {
        for spec in specs {
            for (i, value) in spec.values.iter().enumerate() {
                if let Expr::Func(_, sig, _) = value {
                    if let Some(name) = spec.names.get(i) {
                        self.collect(name, sig);
                    }
                }
                self.visit_expr(value);
            }
        }
    }

    fn visit_stmt_expr(&mut self, expr: &Expr) {
        self.visit_expr(expr);
    }

    fn visit_func_def(&mut self, _receiver: Option<&Token>, name: &Token, sig: &Signature, body: &[Stmt]) {
        self.collect(name, sig);
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_return(&mut self, _loc: &Loc, values: &[Expr]) {
        for value in values {
            self.visit_expr(value);
        }
    }
}

struct CallScanner<'t> {
    funcs: &'t mut FnvHashMap<String, FuncInfo>,
}

impl CallScanner<'_> {
    fn resolve(&mut self, callee: &Expr) -> Option<&mut FuncInfo> {
        self.funcs.get_mut(callee_name(callee)?)
    }
}

impl ExprVisitor<()> for CallScanner<'_> {
    fn visit_binary(&mut self, left: &Expr, _op: &Token, right: &Expr) {
        self.visit_expr(left);
        self.visit_expr(right);
    }

    fn visit_call(&mut self, callee: &Expr, args: &[Expr], _close: &Token) {
        // Any call marks its target as called, even when every result is
        // discarded; capture tracking happens at the enclosing binding.
        if let Some(info) = self.resolve(callee) {
            info.called = true;
        }

        self.visit_expr(callee);
        for arg in args {
            self.visit_expr(arg);
        }
    }

    fn visit_composite(&mut self, _ty: &Token) {}

    fn visit_func_expr(&mut self, _loc: &Loc, _sig: &Signature, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_grouping(&mut self, expr: &Expr) {
        self.visit_expr(expr);
    }

    fn visit_literal(&mut self, _loc: &Loc, _value: &Literal) {}

    fn visit_selector(&mut self, obj: &Expr, _field: &Token) {
        self.visit_expr(obj);
    }

    fn visit_unary(&mut self, _op: &Token, expr: &Expr) {
        self.visit_expr(expr);
    }

    fn visit_var_ref(&mut self, _name: &Token) {}
}

impl StmtVisitor<()> for CallScanner<'_> {
    fn visit_assign(&mut self, targets: &[Expr], _op: &Token, values: &[Expr]) {
        // Only a lone call on the right-hand side spreads its results across
        // the targets; a tuple of values pairs one-to-one and contributes no
        // captures here.
        if let [Expr::Call(callee, _, _)] = values {
            if let Some(info) = self.resolve(callee) {
                info.called = true;

                for (i, target) in targets.iter().enumerate() {
                    if i < info.captured.len() && is_not_ignored(target) {
                        info.captured[i] = true;
                    }
                }
            }
        }

        for target in targets {
            self.visit_expr(target);
        }
        for value in values {
            self.visit_expr(value);
        }
    }

    fn visit_decl(&mut self, _kind: DeclKind, _loc: &Loc, specs: &[Spec]) {
        for spec in specs {
            if let [Expr::Call(callee, _, _)] = spec.values.as_slice() {
                if let Some(info) = self.resolve(callee) {
                    info.called = true;

                    for (i, name) in spec.names.iter().enumerate() {
                        if i < info.captured.len() && name.lexeme() != "_" {
                            info.captured[i] = true;
                        }
                    }
                }
            }

            for value in &spec.values {
                self.visit_expr(value);
            }
        }
    }

    fn visit_stmt_expr(&mut self, expr: &Expr) {
        self.visit_expr(expr);
    }

    fn visit_func_def(&mut self, _receiver: Option<&Token>, _name: &Token, _sig: &Signature, body: &[Stmt]) {
        for stmt in body {
            self.visit_stmt(stmt);
        }
    }

    fn visit_return(&mut self, _loc: &Loc, values: &[Expr]) {
        for value in values {
            self.visit_expr(value);
        }
    }
}

/// Resolves the name a call is made under: the identifier itself for a bare
/// call, the selected member's name for a method call (the receiver is not
/// part of the name), and nothing for computed callees.
fn callee_name(callee: &Expr) -> Option<&str> {
    match callee {
        Expr::Var(name) => Some(name.lexeme()),
        Expr::Selector(_, field) => Some(field.lexeme()),
        _ => None,
    }
}

fn is_not_ignored(target: &Expr) -> bool {
    if let Expr::Var(name) = target {
        name.lexeme() != "_"
    } else {
        true
    }
}

fn report(funcs: &FnvHashMap<String, FuncInfo>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    for (name, info) in funcs {
        if !info.called {
            continue;
        }

        for (nth, captured) in info.captured.iter().enumerate() {
            if !captured {
                diags.push(Diagnostic::new(info.loc, message(name, nth, info.captured.len() == 1)));
                break;
            }
        }
    }

    diags
}

fn message(name: &str, nth: usize, single_ret: bool) -> String {
    if single_ret {
        format!("{}: returned value is always ignored.", name)
    } else {
        format!("{}: {} returned value is always ignored.", name, nth_string(nth))
    }
}

// Return positions are reported 0-based: the first is the "0th".
fn nth_string(nth: usize) -> String {
    let suffix = match (nth % 10, nth % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };

    format!("{}{}", nth, suffix)
}

#[cfg(test)]
mod tests {
    use crate::{analysis::analyze, ast::Parser, core::Loc, lexer::Scanner};

    use super::nth_string;

    fn diagnostics(source: &str) -> Vec<crate::analysis::Diagnostic> {
        let (tree, errs) = Parser::parse(&mut Scanner::new(source).filter_map(|t| t.ok()));
        assert!(errs.is_empty(), "no parsing errors, got {:?}", errs);
        analyze(&tree)
    }

    #[test]
    fn single_return_always_ignored() {
        let diags = diagnostics(r#"
func ex1() int { return 0; }
func call() { _ = ex1(); }
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex1: returned value is always ignored.");
        assert_eq!(diags[0].location(), Loc::new(2, 6));
    }

    #[test]
    fn all_positions_captured() {
        let diags = diagnostics(r#"
func ex3() (int, int, int) { return 0, 0, 0; }
func call() { a, b, c := ex3(); _, _, _ = a, b, c; }
"#);

        assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
    }

    #[test]
    fn first_position_never_captured() {
        let diags = diagnostics(r#"
func ex2() (int, int) { return 0, 0; }
func call() {
    _, a := ex2();
    _, _ = ex2();
    _ = a;
}
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex2: 0th returned value is always ignored.");
    }

    #[test]
    fn uncalled_function_is_not_reported() {
        let diags = diagnostics(r#"
func lonely() (int, int) { return 0, 0; }
"#);

        assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
    }

    #[test]
    fn func_literal_bound_to_variable() {
        let diags = diagnostics(r#"
func call() int {
    f := func() (int, int) { return 0, 1; };
    e, _ := f();
    return e;
}
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "f: 1st returned value is always ignored.");
        assert_eq!(diags[0].location(), Loc::new(3, 5));
    }

    #[test]
    fn bare_call_statement_marks_called() {
        let diags = diagnostics(r#"
func ex1() int { return 0; }
func call() { ex1(); }
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex1: returned value is always ignored.");
    }

    #[test]
    fn capture_in_top_level_declaration() {
        let diags = diagnostics(r#"
func ex4() (int, int, int, int) { return 0, 0, 0, 0; }
var _, b, c, d = ex4();
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex4: 0th returned value is always ignored.");
    }

    #[test]
    fn call_in_declaration_marks_called() {
        let diags = diagnostics(r#"
func ex2() (int, int) { return 0, 0; }
var _, _ = ex2();
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex2: 0th returned value is always ignored.");
    }

    #[test]
    fn method_calls_resolve_by_member_name() {
        let diags = diagnostics(r#"
func (t) ex7() (int, int, int) { return 0, 0, 0; }
func call() {
    x := t{};
    a, _, _ := x.ex7();
    _ = a;
}
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex7: 1st returned value is always ignored.");
    }

    #[test]
    fn later_declaration_overwrites_earlier() {
        let diags = diagnostics(r#"
func ex1() int { return 0; }
func ex1() (int, int) { return 0, 0; }
func call() {
    _, a := ex1();
    _ = a;
}
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex1: 0th returned value is always ignored.");
        assert_eq!(diags[0].location(), Loc::new(3, 6), "the later declaration is the reported one");
    }

    #[test]
    fn more_targets_than_results_is_not_fatal() {
        let diags = diagnostics(r#"
func ex2() (int, int) { return 0, 0; }
func call() { a, b, c := ex2(); _, _, _ = a, b, c; }
"#);

        assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
    }

    #[test]
    fn unknown_callees_are_skipped() {
        let diags = diagnostics(r#"
func call() { println(1); x := compute(); _ = x; }
"#);

        assert!(diags.is_empty(), "expected no diagnostics, got {:?}", diags);
    }

    #[test]
    fn tuple_assignment_is_not_a_result_spread() {
        let diags = diagnostics(r#"
func ex1() int { return 0; }
func call() { a, b := ex1(), 2; _, _ = a, b; }
"#);

        // The call is still marked, but pairing one call against one target
        // out of a tuple is not a result spread, so nothing is captured.
        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex1: returned value is always ignored.");
    }

    #[test]
    fn nested_calls_mark_called() {
        let diags = diagnostics(r#"
func ex1() int { return 0; }
func call() { use(ex1()); }
"#);

        assert_eq!(diags.len(), 1, "expected 1 diagnostic");
        assert_eq!(diags[0].message(), "ex1: returned value is always ignored.");
    }

    #[test]
    fn repeated_runs_are_identical() {
        let (tree, errs) = Parser::parse(&mut Scanner::new(r#"
func ex2() (int, int) { return 0, 0; }
func call() { _, a := ex2(); _ = a; }
"#).filter_map(|t| t.ok()));
        assert!(errs.is_empty(), "no parsing errors");

        assert_eq!(analyze(&tree), analyze(&tree), "analysis runs must not accumulate state");
    }

    #[test]
    fn diagnostics_ordered_by_position() {
        let diags = diagnostics(r#"
func zed() int { return 0; }
func abc() int { return 0; }
func call() { zed(); abc(); }
"#);

        assert_eq!(diags.len(), 2, "expected 2 diagnostics");
        assert_eq!(diags[0].message(), "zed: returned value is always ignored.");
        assert_eq!(diags[1].message(), "abc: returned value is always ignored.");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(nth_string(0), "0th");
        assert_eq!(nth_string(1), "1st");
        assert_eq!(nth_string(2), "2nd");
        assert_eq!(nth_string(3), "3rd");
        assert_eq!(nth_string(4), "4th");
        assert_eq!(nth_string(11), "11th");
        assert_eq!(nth_string(12), "12th");
        assert_eq!(nth_string(13), "13th");
        assert_eq!(nth_string(21), "21st");
    }
}
