use crate::core::Loc;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen(Loc),
    RightParen(Loc),
    LeftBrace(Loc),
    RightBrace(Loc),
    Comma(Loc),
    Dot(Loc),
    Semicolon(Loc),

    Plus(Loc),
    Minus(Loc),
    Star(Loc),
    Slash(Loc),

    Bang(Loc),
    BangEqual(Loc),
    Equal(Loc),
    EqualEqual(Loc),
    ColonEqual(Loc),
    Greater(Loc),
    GreaterEqual(Loc),
    Less(Loc),
    LessEqual(Loc),

    Identifier(Loc, String),
    Number(Loc, String),
    String(Loc, String),

    Const(Loc),
    False(Loc),
    Func(Loc),
    Return(Loc),
    True(Loc),
    Var(Loc),
}

impl Token {
    pub fn location(&self) -> Loc {
        match self {
            Token::LeftParen(loc)
            | Token::RightParen(loc)
            | Token::LeftBrace(loc)
            | Token::RightBrace(loc)
            | Token::Comma(loc)
            | Token::Dot(loc)
            | Token::Semicolon(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Bang(loc)
            | Token::BangEqual(loc)
            | Token::Equal(loc)
            | Token::EqualEqual(loc)
            | Token::ColonEqual(loc)
            | Token::Greater(loc)
            | Token::GreaterEqual(loc)
            | Token::Less(loc)
            | Token::LessEqual(loc)
            | Token::Identifier(loc, _)
            | Token::Number(loc, _)
            | Token::String(loc, _)
            | Token::Const(loc)
            | Token::False(loc)
            | Token::Func(loc)
            | Token::Return(loc)
            | Token::True(loc)
            | Token::Var(loc) => *loc,
        }
    }

    pub fn lexeme(&self) -> &str {
        match self {
            Token::LeftParen(_) => "(",
            Token::RightParen(_) => ")",
            Token::LeftBrace(_) => "{",
            Token::RightBrace(_) => "}",
            Token::Comma(_) => ",",
            Token::Dot(_) => ".",
            Token::Semicolon(_) => ";",
            Token::Plus(_) => "+",
            Token::Minus(_) => "-",
            Token::Star(_) => "*",
            Token::Slash(_) => "/",
            Token::Bang(_) => "!",
            Token::BangEqual(_) => "!=",
            Token::Equal(_) => "=",
            Token::EqualEqual(_) => "==",
            Token::ColonEqual(_) => ":=",
            Token::Greater(_) => ">",
            Token::GreaterEqual(_) => ">=",
            Token::Less(_) => "<",
            Token::LessEqual(_) => "<=",
            Token::Identifier(_, lexeme) => lexeme,
            Token::Number(_, lexeme) => lexeme,
            Token::String(_, lexeme) => lexeme,
            Token::Const(_) => "const",
            Token::False(_) => "false",
            Token::Func(_) => "func",
            Token::Return(_) => "return",
            Token::True(_) => "true",
            Token::Var(_) => "var",
        }
    }
}

impl std::error::Error for Token {}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "'{}' ({})", self.lexeme(), self.location())
    }
}
