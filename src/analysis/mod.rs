use crate::{ast::Stmt, core::Loc};

mod returns;

/// A finding produced by one of the analyses: a source position and a
/// human-readable message describing what was found there.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    loc: Loc,
    message: String,
}

impl Diagnostic {
    pub fn new<M: Into<String>>(loc: Loc, message: M) -> Self {
        Self { loc, message: message.into() }
    }

    pub fn location(&self) -> Loc {
        self.loc
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.loc, self.message)
    }
}

pub trait Analyzer {
    fn analyze(&mut self, stmts: &[Stmt]) -> Vec<Diagnostic>;
}

pub fn analyze(stmts: &[Stmt]) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    let mut analyzers = vec![
        // Static analysis which flags functions whose return values are discarded at every call site.
        returns::ReturnUseAnalyzer::default()
    ];

    for analyzer in analyzers.iter_mut() {
        diags.append(&mut analyzer.analyze(stmts));
    }

    diags.sort_by_key(|d| (d.location().line(), d.location().col()));
    diags
}
