use crate::{errors, core::Loc, RetcheckError};

use super::Token;

#[derive(Debug)]
pub struct Scanner<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
    last_newline: usize,
}

#[allow(clippy::while_let_on_iterator)]
impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            last_newline: 0,
        }
    }

    // Columns count chars, not bytes, so they stay accurate past multibyte
    // characters.
    fn location(&self, loc: usize) -> Loc {
        if self.line == 1 {
            Loc::new(1, self.source[..loc].chars().count() + 1)
        } else {
            Loc::new(self.line, self.source[self.last_newline..loc].chars().count())
        }
    }

    fn char_end(&self, start: usize) -> usize {
        start + self.source[start..].chars().next().map_or(1, char::len_utf8)
    }

    fn match_char(&mut self, next: char) -> bool {
        if let Some((_, c)) = self.chars.peek() {
            if *c == next {
                self.chars.next();
                return true
            }
        }

        false
    }

    // Consumes chars while the predicate holds, returning the byte index one
    // past the last consumed char (or `end` unchanged when nothing matched).
    fn advance_while_fn<F: Fn(usize, char) -> bool>(&mut self, mut end: usize, f: F) -> usize {
        while let Some((loc, c)) = self.chars.peek() {
            if !f(*loc, *c) {
                break;
            }

            if *c == '\n' {
                self.line += 1;
                self.last_newline = *loc;
            }

            end = *loc + c.len_utf8();
            self.chars.next();
        }

        end
    }

    fn read_token(&mut self) -> Option<Result<Token, RetcheckError>> {
        while let Some((loc, char)) = self.chars.next() {
            let location = self.location(loc);

            match char {
                ' ' => continue,
                '\r' => continue,
                '\t' => continue,
                '\n' => {
                    self.line += 1;
                    self.last_newline = loc;
                },
                '(' => return Some(Ok(Token::LeftParen(location))),
                ')' => return Some(Ok(Token::RightParen(location))),
                '{' => return Some(Ok(Token::LeftBrace(location))),
                '}' => return Some(Ok(Token::RightBrace(location))),
                ',' => return Some(Ok(Token::Comma(location))),
                '.' => return Some(Ok(Token::Dot(location))),
                '-' => return Some(Ok(Token::Minus(location))),
                '+' => return Some(Ok(Token::Plus(location))),
                ';' => return Some(Ok(Token::Semicolon(location))),
                '*' => return Some(Ok(Token::Star(location))),

                '!' if self.match_char('=') => return Some(Ok(Token::BangEqual(location))),
                '!' => return Some(Ok(Token::Bang(location))),
                '=' if self.match_char('=') => return Some(Ok(Token::EqualEqual(location))),
                '=' => return Some(Ok(Token::Equal(location))),
                '>' if self.match_char('=') => return Some(Ok(Token::GreaterEqual(location))),
                '>' => return Some(Ok(Token::Greater(location))),
                '<' if self.match_char('=') => return Some(Ok(Token::LessEqual(location))),
                '<' => return Some(Ok(Token::Less(location))),
                ':' if self.match_char('=') => return Some(Ok(Token::ColonEqual(location))),

                '/' if self.match_char('/') => {
                    while let Some((loc, c)) = self.chars.peek() {
                        if *c == '\n' {
                            self.line += 1;
                            self.last_newline = *loc;
                            self.chars.next();
                            break;
                        } else {
                            self.chars.next();
                        }
                    }
                },
                '/' if self.match_char('*') => {
                    let mut depth = 1;
                    while let Some((loc, c)) = self.chars.next() {
                        match c {
                            '\n' => {
                                self.line += 1;
                                self.last_newline = loc;
                            },
                            '/' if self.match_char('*') => {
                                depth += 1;
                            },
                            '*' if self.match_char('/') => {
                                depth -= 1;
                                if depth == 0 {
                                    break;
                                }
                            },
                            _ => {}
                        }
                    }
                },
                '/' => return Some(Ok(Token::Slash(location))),

                '"' => return Some(self.read_string(loc)),

                c if c.is_numeric() => return Some(self.read_number(loc)),
                c if c.is_alphabetic() || c == '_' => return Some(self.read_identifier(loc)),

                c => return Some(Err(errors::language(
                    location,
                    format!("We found an unexpected character '{}' where we were expecting one of: [whitespace, parenthesis, brace, operator, identifier, number, string, comment]", c),
                    "Make sure you have entered valid source code and have not accidentally closed a string.",
                )))
            }
        }

        None
    }

    fn read_string(&mut self, start: usize) -> Result<Token, RetcheckError> {
        let location = self.location(start);

        while let Some((loc, c)) = self.chars.next() {
            match c {
                '\n' => {
                    self.line += 1;
                    self.last_newline = loc;
                },
                '"' => {
                    return Ok(Token::String(location, self.source[start..loc+1].to_string()));
                },
                _ => {}
            }
        }

        Err(errors::language(
            location,
            "Reached the end of the file without finding the closing quote for a string",
            "Make sure that you have terminated your string with a '\"' character.",
        ))
    }

    fn read_number(&mut self, start: usize) -> Result<Token, RetcheckError> {
        let location = self.location(start);

        let mut end = self.advance_while_fn(self.char_end(start), |_, c| c.is_numeric());
        if let Some((loc, c)) = self.chars.peek() {
            if *c == '.' && self.source[loc + 1..].chars().next().map(|c2| c2.is_numeric()).unwrap_or_default() {
                self.chars.next();
                end = self.advance_while_fn(end + 1, |_, c| c.is_numeric());
            }
        }

        Ok(Token::Number(location, self.source[start..end].to_string()))
    }

    fn read_identifier(&mut self, start: usize) -> Result<Token, RetcheckError> {
        let location = self.location(start);

        let end = self.advance_while_fn(self.char_end(start), |_, c| c.is_alphanumeric() || c == '_');
        let lexeme = &self.source[start..end];

        match lexeme {
            "const" => Ok(Token::Const(location)),
            "false" => Ok(Token::False(location)),
            "func" => Ok(Token::Func(location)),
            "return" => Ok(Token::Return(location)),
            "true" => Ok(Token::True(location)),
            "var" => Ok(Token::Var(location)),
            lexeme => Ok(Token::Identifier(location, lexeme.to_string())),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, RetcheckError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_token()
    }
}
