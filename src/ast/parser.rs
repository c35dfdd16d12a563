use std::iter::Peekable;

use crate::{errors, lexer::Token, RetcheckError};

use super::{DeclKind, Expr, Literal, Param, Signature, Spec, Stmt};

pub struct Parser;

// Macros which make it easier to implement certain common parts of the parser.
macro_rules! rd_term {
    ($name:ident := $left:ident ( $($token:ident)|+ $right:ident )* => binary) => {
        rd_term!($name := tokens => Expr : {
            let left = Self::$left(tokens)?;

            if !matches!(tokens.peek(), Some($(Token::$token(..))|+)) {
                return Ok(left)
            }

            let op = tokens.next().unwrap();
            let right = Self::$right(tokens)?;
            Ok(Expr::Binary(
                Box::new(left),
                op,
                Box::new(right),
            ))
        });
    };

    ($name:ident := ($($token:ident)|+ $right:ident) | $fallback:ident => unary) => {
        rd_term!($name := tokens => Expr : {
            if !matches!(tokens.peek(), Some($(Token::$token(_))|+)) {
                return Self::$fallback(tokens);
            };

            let op = tokens.next().unwrap();
            let right = Self::$right(tokens)?;
            Ok(Expr::Unary(op, Box::new(right)))
        });
    };

    ($name:ident := $token_id:ident => $ret:ty : $body:expr) => {
        fn $name<T: Iterator<Item = Token>>(
            $token_id: &mut Peekable<T>,
        ) -> Result<$ret, RetcheckError> {
            $body
        }
    };
}

macro_rules! rd_matches {
    ($tokens:ident, $($token:ident)|+) => {
        if matches!($tokens.peek(), Some($(Token::$token(..))|+)) {
            Some($tokens.next().unwrap())
        } else {
            None
        }
    };
}

macro_rules! rd_consume {
    ($tokens:ident, $($id:ident@$token:ident)|+ => $ok:expr, $msg:expr, $advice:expr) => {
        match $tokens.next() {
            Some($($id@Token::$token(..))|+) => $ok,
            Some(unexpected) => return Err(errors::user(
                &format!("{}, but got {} instead.", $msg, unexpected),
                $advice
            )),
            None => return Err(errors::user(
                &format!("{}, but reached the end of the file instead.", $msg),
                $advice
            )),
        }
    };

    ($tokens:ident, $($token:ident)|+ => $ok:expr, $msg:expr, $advice:expr) => {
        match $tokens.next() {
            Some($(Token::$token(..))|+) => $ok,
            Some(unexpected) => return Err(errors::user(
                &format!("{}, but got {} instead.", $msg, unexpected),
                $advice
            )),
            None => return Err(errors::user(
                &format!("{}, but reached the end of the file instead.", $msg),
                $advice
            )),
        }
    };

    ($tokens:ident, $($token:ident)|+, $msg:expr, $advice:expr) => {
        rd_consume!($tokens, $($token)|+ => {}, $msg, $advice)
    };
}

impl Parser {
    pub fn parse<T: Iterator<Item = Token>>(
        tokens: &mut T,
    ) -> (Vec<Stmt>, Vec<RetcheckError>) {
        let mut tokens = tokens.peekable();
        let mut stmts = Vec::new();
        let mut errs = Vec::new();

        while tokens.peek().is_some() {
            match Self::declaration(&mut tokens) {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    Self::synchronize(&mut tokens);
                    errs.push(err);
                },
            }
        }

        (stmts, errs)
    }

    pub fn parse_expr<T: Iterator<Item = Token>>(
        tokens: &mut T,
    ) -> Result<Expr, RetcheckError> {
        let mut tokens = tokens.peekable();
        Self::expression(&mut tokens)
    }

    rd_term!(declaration := tokens => Stmt : {
        match tokens.peek() {
            Some(Token::Func(_)) => {
                tokens.next();
                Self::func_declaration(tokens)
            },
            Some(Token::Var(_) | Token::Const(_)) => Self::value_declaration(tokens),
            _ => Self::statement(tokens),
        }
    });

    rd_term!(func_declaration := tokens => Stmt : {
        // An optional parenthesized method receiver sits between 'func' and the name.
        let receiver = if rd_matches!(tokens, LeftParen).is_some() {
            let first = rd_consume!(tokens, first@Identifier => first,
                "Expected a receiver to be provided after 'func ('",
                "Provide the receiver type (optionally preceded by a receiver name) between the parentheses.");

            let ty = if matches!(tokens.peek(), Some(Token::Identifier(..))) {
                tokens.next().unwrap()
            } else {
                first
            };

            rd_consume!(tokens, RightParen,
                "Expected a closing parenthesis `)` after the method receiver",
                "Make sure you have a closing parenthesis `)` after the receiver.");

            Some(ty)
        } else {
            None
        };

        let name = rd_consume!(tokens, name@Identifier => name,
            "Expected a function name to be provided after 'func'",
            "Provide a function name after the `func` keyword.");

        let sig = Self::signature(tokens)?;

        rd_consume!(tokens, LeftBrace,
            "Expected an opening brace `{` before the function body",
            "Make sure you have an opening brace `{` after the function's signature.");

        let body = Self::block(tokens)?;

        Ok(Stmt::Func(receiver, name, sig, body))
    });

    rd_term!(signature := tokens => Signature : {
        rd_consume!(tokens, LeftParen,
            "Expected an opening parenthesis `(` to start the parameter list",
            "Make sure you have an opening parenthesis `(` after the function name.");

        let mut params = Vec::new();
        if !matches!(tokens.peek(), Some(Token::RightParen(_))) {
            loop {
                let name = rd_consume!(tokens, name@Identifier => name,
                    "Expected a parameter name in the parameter list",
                    "Provide a parameter name, optionally followed by its type.");

                let ty = if matches!(tokens.peek(), Some(Token::Identifier(..))) {
                    tokens.next()
                } else {
                    None
                };

                params.push(Param { name, ty });

                if rd_matches!(tokens, Comma).is_none() {
                    break;
                }
            }
        }

        rd_consume!(tokens, RightParen,
            "Expected a closing parenthesis `)` after the parameter list",
            "Make sure you have a closing parenthesis `)` after the parameters.");

        // Results are either absent, a single bare type name, or a parenthesized list.
        let mut results = Vec::new();
        match tokens.peek() {
            Some(Token::Identifier(..)) => {
                results.push(tokens.next().unwrap());
            },
            Some(Token::LeftParen(_)) => {
                tokens.next();
                loop {
                    let ty = rd_consume!(tokens, ty@Identifier => ty,
                        "Expected a result type name in the result list",
                        "Provide a type name for each result of the function.");
                    results.push(ty);

                    if rd_matches!(tokens, Comma).is_none() {
                        break;
                    }
                }
                rd_consume!(tokens, RightParen,
                    "Expected a closing parenthesis `)` after the result list",
                    "Make sure you have a closing parenthesis `)` after the result types.");
            },
            _ => {},
        }

        Ok(Signature { params, results })
    });

    rd_term!(value_declaration := tokens => Stmt : {
        let keyword = rd_consume!(tokens, kw@Var | kw@Const => kw,
            "Expected 'var' or 'const' to start a value declaration",
            "Start the declaration with the `var` or `const` keyword.");
        let loc = keyword.location();
        let kind = if matches!(keyword, Token::Var(_)) { DeclKind::Var } else { DeclKind::Const };

        let mut specs = Vec::new();
        if rd_matches!(tokens, LeftParen).is_some() {
            while !matches!(tokens.peek(), Some(Token::RightParen(_)) | None) {
                specs.push(Self::value_spec(tokens)?);
            }

            rd_consume!(tokens, RightParen,
                "Expected a closing parenthesis `)` after the declaration group",
                "Make sure you have a closing parenthesis `)` after the grouped declarations.");
        } else {
            specs.push(Self::value_spec(tokens)?);
        }

        Ok(Stmt::Decl(kind, loc, specs))
    });

    rd_term!(value_spec := tokens => Spec : {
        let mut names = Vec::new();
        loop {
            let name = rd_consume!(tokens, name@Identifier => name,
                "Expected a name to be declared",
                "Provide the name (or a '_' placeholder) being declared here.");
            names.push(name);

            if rd_matches!(tokens, Comma).is_none() {
                break;
            }
        }

        // Optional type annotation between the names and the initializer.
        if matches!(tokens.peek(), Some(Token::Identifier(..))) {
            tokens.next();
        }

        let values = if rd_matches!(tokens, Equal).is_some() {
            Self::expression_list(tokens)?
        } else {
            Vec::new()
        };

        rd_consume!(tokens,
            Semicolon => Ok(Spec { names, values }),
            "Expected ';' after the declaration",
            "Make sure that you have a semicolon after the declaration.")
    });

    rd_term!(statement := tokens => Stmt : {
        if matches!(tokens.peek(), Some(Token::Return(_))) {
            let loc = tokens.next().unwrap().location();

            let values = if matches!(tokens.peek(), Some(Token::Semicolon(_))) {
                Vec::new()
            } else {
                Self::expression_list(tokens)?
            };

            return rd_consume!(tokens,
                Semicolon => Ok(Stmt::Return(loc, values)),
                "Expected ';' after the return statement",
                "Make sure that you have a semicolon at the end of the return statement.");
        }

        let mut exprs = Self::expression_list(tokens)?;

        if let Some(op) = rd_matches!(tokens, Equal | ColonEqual) {
            for target in exprs.iter() {
                Self::check_assign_target(target, &op)?;
            }

            let values = Self::expression_list(tokens)?;

            return rd_consume!(tokens,
                Semicolon => Ok(Stmt::Assign(exprs, op, values)),
                "Expected ';' after the assignment",
                "Make sure that you have a semicolon at the end of the assignment.");
        }

        if exprs.len() != 1 {
            return Err(errors::user(
                "Expected a single expression in an expression statement, but got a comma separated list instead.",
                "Assign the listed expressions to names, or split them into separate statements.",
            ));
        }

        let expr = exprs.remove(0);
        rd_consume!(tokens,
            Semicolon => Ok(Stmt::Expression(expr)),
            "Expected ';' after expression",
            "Make sure that you have a semicolon at the end of your previous expression.")
    });

    fn check_assign_target(target: &Expr, op: &Token) -> Result<(), RetcheckError> {
        match target {
            Expr::Var(_) => Ok(()),
            Expr::Selector(..) if matches!(op, Token::Equal(_)) => Ok(()),
            _ => Err(errors::language(
                op.location(),
                format!("Expected a name to assign to on the left of '{}'", op.lexeme()),
                "Make sure each assignment target is an identifier, or '_' if you intend to discard the value.",
            )),
        }
    }

    rd_term!(block := tokens => Vec<Stmt> : {
        let mut stmts = Vec::new();

        while !matches!(tokens.peek(), Some(Token::RightBrace(_)) | None) {
            match Self::declaration(tokens) {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => {
                    Self::synchronize(tokens);
                    return Err(err)
                },
            }
        }

        rd_consume!(tokens,
            RightBrace => Ok(stmts),
            "Expected a closing brace `}` after the block",
            "Make sure you have a closing brace `}` after the block.")
    });

    rd_term!(expression_list := tokens => Vec<Expr> : {
        let mut exprs = vec![Self::expression(tokens)?];

        while rd_matches!(tokens, Comma).is_some() {
            exprs.push(Self::expression(tokens)?);
        }

        Ok(exprs)
    });

    rd_term!(expression := tokens => Expr : Self::equality(tokens));

    rd_term!(equality := comparison (BangEqual|EqualEqual comparison)* => binary);

    rd_term!(comparison := term (Greater | GreaterEqual | Less | LessEqual term)* => binary);

    rd_term!(term := factor (Minus | Plus term)* => binary);

    rd_term!(factor := unary (Star | Slash factor)* => binary);

    rd_term!(unary := (Bang|Minus unary) | postfix => unary);

    rd_term!(postfix := tokens => Expr : {
        let mut expr = Self::primary(tokens)?;

        loop {
            match tokens.peek() {
                Some(Token::LeftParen(_)) => {
                    tokens.next();

                    let args = if matches!(tokens.peek(), Some(Token::RightParen(_))) {
                        Vec::new()
                    } else {
                        Self::expression_list(tokens)?
                    };

                    let close = rd_consume!(tokens, close@RightParen => close,
                        "Expected a closing parenthesis `)` after the call arguments",
                        "Make sure you have a closing parenthesis `)` after the arguments of the call.");

                    expr = Expr::Call(Box::new(expr), args, close);
                },
                Some(Token::Dot(_)) => {
                    tokens.next();

                    let field = rd_consume!(tokens, field@Identifier => field,
                        "Expected a field or method name after '.'",
                        "Provide the name of the field or method being selected.");

                    expr = Expr::Selector(Box::new(expr), field);
                },
                _ => break,
            }
        }

        Ok(expr)
    });

    rd_term!(primary := tokens => Expr : {
        match tokens.next() {
            Some(Token::False(loc)) => Ok(Expr::Literal(loc, Literal::Bool(false))),
            Some(Token::True(loc)) => Ok(Expr::Literal(loc, Literal::Bool(true))),

            Some(Token::Number(loc, lexeme)) => {
                let value = lexeme.parse().map_err(|e| errors::user_with_internal(
                    &format!("Unable to parse number '{}'.", lexeme),
                    "Make sure you have provided a valid number within the bounds of a 64-bit floating point number.",
                    e
                ))?;
                Ok(Expr::Literal(loc, Literal::Number(value)))
            },
            Some(Token::String(loc, lexeme)) => {
                let value = lexeme[1..lexeme.len() - 1].to_string();
                Ok(Expr::Literal(loc, Literal::String(value)))
            },

            Some(Token::Func(loc)) => {
                let sig = Self::signature(tokens)?;

                rd_consume!(tokens, LeftBrace,
                    "Expected an opening brace `{` before the function body",
                    "Make sure you have an opening brace `{` after the function literal's signature.");

                let body = Self::block(tokens)?;
                Ok(Expr::Func(loc, sig, body))
            },

            Some(Token::LeftParen(_)) => {
                let expr = Self::expression(tokens)?;
                rd_consume!(tokens,
                    RightParen => Ok(Expr::Grouping(Box::new(expr))),
                    "Expected a closing parenthesis `)` after the expression",
                    "Make sure you have a closing parenthesis `)` after the expression.")
            },

            Some(var @ Token::Identifier(..)) => {
                if matches!(tokens.peek(), Some(Token::LeftBrace(_))) {
                    tokens.next();
                    rd_consume!(tokens,
                        RightBrace => Ok(Expr::Composite(var)),
                        "Expected a closing brace `}` after the composite literal",
                        "Make sure you have a closing brace `}` after the composite literal.")
                } else {
                    Ok(Expr::Var(var))
                }
            },

            Some(t) => {
                Self::synchronize(tokens);

                Err(errors::user(
                    &format!("Encountered an unexpected {} token while waiting for one of ['true', 'false', number, string, identifier, 'func', '('].", t),
                    "Make sure that you are providing a primary value at this location.",
                ))
            },
            None => Err(errors::user(
                "Reached the end of the input while waiting for one of ['true', 'false', number, string, identifier, 'func', '('].",
                "Make sure that you have provided a valid expression."))
        }
    });

    fn synchronize<T: Iterator<Item = Token>>(tokens: &mut Peekable<T>) {
        while let Some(token) = tokens.next() {
            match (token, tokens.peek()) {
                // If we reach a semicolon, we can stop because the next token will be the start of a new statement
                (Token::Semicolon(_), _) => break,
                // If the next token is the start of a new statement, we can stop
                (
                    _,
                    Some(
                        Token::Func(_)
                        | Token::Var(_)
                        | Token::Const(_)
                        | Token::Return(_),
                    ),
                ) => break,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ast::{printer::AstPrinter, ExprVisitor, StmtVisitor},
        lexer::Scanner,
    };

    use super::Parser;

    fn test_parse_expr(source: &str, expected: &str) {
        let lexer = Scanner::new(source);
        let expr = Parser::parse_expr(&mut lexer.filter_map(|x| x.ok())).expect("no errors");
        assert_eq!(
            AstPrinter {}.visit_expr(&expr),
            expected,
            "the expression should be parsed correctly"
        );
    }

    fn test_parse(source: &str, expected: &str) {
        let lexer = Scanner::new(source);
        let (tree, errs) = Parser::parse(&mut lexer.filter_map(|x| x.ok()));
        assert!(errs.is_empty(), "no errors should be returned, got {:?}", errs);

        assert_eq!(
            AstPrinter {}.visit_stmt(tree.first().unwrap()),
            expected,
            "the statement should be parsed correctly"
        );
    }

    #[test]
    fn parse_basic_expression() {
        test_parse_expr("1 + 2", "(+ 1 2)");
        test_parse_expr("10 - 5 / (2 * 3)", "(- 10 (/ 5 (group (* 2 3))))");
    }

    #[test]
    fn parse_calls() {
        test_parse_expr("f()", "(call f)");
        test_parse_expr("f(1, g(2))", "(call f 1 (call g 2))");
        test_parse_expr("t.ex7()", "(call (. t ex7))");
        test_parse_expr("t{}.m(1)", "(call (. (composite t) m) 1)");
    }

    #[test]
    fn parse_func_declaration() {
        test_parse(
            "func ex2(a, b int) (int, int) { return a, b; }",
            "(func ex2 (a b) (int int) (return a b))",
        );
    }

    #[test]
    fn parse_method_declaration() {
        test_parse(
            "func (t) ex7() (int, int, int) { return 0, 0, 0; }",
            "(method t ex7 () (int int int) (return 0 0 0))",
        );
    }

    #[test]
    fn parse_assignment() {
        test_parse("a, b := ex2();", "(:= (a b) (call ex2))");
        test_parse("_, a = ex2();", "(= (_ a) (call ex2))");
    }

    #[test]
    fn parse_value_declaration() {
        test_parse("var a = 10;", "(var (= (a) 10))");
        test_parse(
            "var ( _, b = ex2(); c int; )",
            "(var (= (_ b) (call ex2)) (c))",
        );
        test_parse(
            "const answer = 42;",
            "(const (= (answer) 42))",
        );
    }

    #[test]
    fn parse_func_literal() {
        test_parse(
            "f := func() (int, int) { return 0, 1; };",
            "(:= (f) (func () (int int) (return 0 1)))",
        );
    }

    #[test]
    fn parse_bare_call_statement() {
        test_parse("ex1();", "((call ex1))");
    }

    #[test]
    fn parse_invalid_assign_target() {
        let lexer = Scanner::new("1 = 2;");
        let (_, errs) = Parser::parse(&mut lexer.filter_map(|x| x.ok()));
        assert_eq!(errs.len(), 1, "expected 1 error");
    }
}
