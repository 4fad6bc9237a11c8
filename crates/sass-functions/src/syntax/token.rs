#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64, String), // magnitude, unit text ("" when unitless)
    Ident(String),
    StringLit(String),
    HexColor(String), // digits only: "ff0000"

    // Parameters
    Variable(String), // `$name`, stored without the `$`

    // Punctuation
    Colon,    // :
    Comma,    // ,
    Ellipsis, // ...

    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(v, u)   => format!("number `{v}{u}`"),
            TokenKind::Ident(s)       => format!("identifier `{s}`"),
            TokenKind::StringLit(s)   => format!("string \"{s}\""),
            TokenKind::HexColor(s)    => format!("color `#{s}`"),
            TokenKind::Variable(s)    => format!("variable `${s}`"),
            TokenKind::Colon          => "`:`".into(),
            TokenKind::Comma          => "`,`".into(),
            TokenKind::Ellipsis       => "`...`".into(),
            TokenKind::Eof            => "end of signature".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, column: usize) -> Self {
        Self { kind, column }
    }
}
