use retcheck::ast::StmtVisitor;
use retcheck::cmdline::CommandLineOptions;
use retcheck::{errors, RetcheckError};

fn main() {
    let opts = CommandLineOptions::parse();

    if opts.files.is_empty() {
        eprintln!("Usage: retcheck [-d|--debug] <file>...");
        std::process::exit(2);
    }

    let mut failed = false;
    for file in &opts.files {
        if let Err(e) = run_file(file, opts.debug) {
            eprintln!("{}", e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn run_file(filename: &str, debug: bool) -> Result<(), RetcheckError> {
    let content = std::fs::read(filename)?;
    let content = std::str::from_utf8(&content).map_err(|e| errors::user_with_internal(
        "The file you provided is not a valid UTF-8 file.",
        "Make sure that the file is a valid UTF-8 file.",
        e,
    ))?;

    run(filename, content, debug)
}

fn run(filename: &str, source: &str, debug: bool) -> Result<(), RetcheckError> {
    let lexer = retcheck::lexer::Scanner::new(source);
    let mut had_error = false;

    let (stmts, errs) = retcheck::ast::Parser::parse(&mut lexer.inspect(|t| if let Err(e) = t {
        eprintln!("{}", e);
        had_error = true;
    }).filter_map(|t| t.ok()));

    for err in errs {
        eprintln!("{}", err);
        had_error = true;
    }

    if had_error {
        return Err(errors::user(
            "Errors were found in the provided source code, it will not be analyzed.",
            "Fix the reported syntax errors and run the checker again.",
        ));
    }

    if debug {
        let mut printer = retcheck::ast::printer::AstPrinter {};
        for stmt in &stmts {
            eprintln!("{}", printer.visit_stmt(stmt));
        }
    }

    let diags = retcheck::analysis::analyze(&stmts);
    for diag in &diags {
        println!("{}: {}", filename, diag);
    }

    if !diags.is_empty() {
        return Err(errors::user(
            &format!("Problems were found in {}.", filename),
            "Review the reported findings; return values which are never used usually indicate dead API surface or a forgotten assignment.",
        ));
    }

    Ok(())
}
