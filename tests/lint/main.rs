use retcheck::{errors, RetcheckError};

// Each corpus file annotates the lines where a diagnostic is expected with a
// `// want "<message>"` comment; the analysis must produce exactly those
// diagnostics, anchored at those lines, and nothing else.
fn run_file(path: &str) -> Result<(), RetcheckError> {
    let content = std::fs::read(path)?;
    let content = std::str::from_utf8(&content).map_err(|_e| errors::system(
        "The file you provided is not a valid UTF-8 file.",
        "Make sure that the file is a valid UTF-8 file.",
    ))?;

    let want_re = regex::Regex::new(r#"//\s*want "([^"]*)""#)
        .expect("regex should compile correctly");

    let mut expected: Vec<(usize, String)> = content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| want_re.captures(line).map(|c| (i + 1, c[1].to_string())))
        .collect();

    let mut lex_errs = Vec::new();
    let lexer = retcheck::lexer::Scanner::new(content);
    let (stmts, errs) = retcheck::ast::Parser::parse(&mut lexer.inspect(|t| if let Err(e) = t {
        lex_errs.push(format!("{}", e));
    }).filter_map(|t| t.ok()));

    assert!(lex_errs.is_empty(), "{}: no lexing errors expected, got {:?}", path, lex_errs);
    assert!(errs.is_empty(), "{}: no parsing errors expected, got {:?}", path, errs);

    for diag in retcheck::analysis::analyze(&stmts) {
        let line = diag.location().line();
        match expected.iter().position(|(l, m)| *l == line && m == diag.message()) {
            Some(idx) => {
                expected.remove(idx);
            },
            None => panic!("{}: unexpected diagnostic at line {}: {}", path, line, diag.message()),
        }
    }

    assert!(expected.is_empty(), "{}: expected diagnostics were not produced: {:?}", path, expected);

    Ok(())
}

include!(concat!(env!("OUT_DIR"), "/tests/lint.rs"));
