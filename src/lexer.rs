use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Delimiters
    LParen,   // (
    RParen,   // )
    LBrace,   // {
    RBrace,   // }
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Dot,      // .
    Colon,    // :
    Question, // ?
    // Arithmetic operators
    Plus,     // +
    Minus,    // -
    Asterisk, // *
    Slash,    // /
    // Comparison operators
    Lt,    // <
    Gt,    // >
    Eq,    // ==
    NotEq, // !=
    // Logical operators
    Bang, // !
    And,  // &&
    Or,   // ||
    // Assignment
    Assign, // =
    // Structure
    Eol,
    Eof,
    // Literals
    NumInt,
    NumFloat,
    True,
    False,
    // Names
    Ident,
    TypeName,
    // Keywords
    Function,
    Return,
    If,
    Else,
    IfEmpty,
    Switch,
    Case,
    Default,
    Struct,
    Enum,
}

/// A lexed token. `offset` is the absolute position of the token's first
/// character, kept so the parser can hand the token back to [`Lexer::back_to`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub col: usize,
    pub offset: usize,
}

#[derive(Debug, Error)]
pub enum LexerError {
    #[error("{msg}\nline:{line}, pos {col}")]
    Error {
        msg: String,
        line: usize,
        col: usize,
    },
}

/// Resolve an identifier through the reserved-word table. The bare type
/// words `int`, `float` and `void` become `TypeName`; struct and enum names
/// stay `Ident` until the evaluator resolves them.
pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "int" | "float" | "void" => TokenKind::TypeName,
        "fn" => TokenKind::Function,
        "return" => TokenKind::Return,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "ifempty" => TokenKind::IfEmpty,
        "switch" => TokenKind::Switch,
        "case" => TokenKind::Case,
        "default" => TokenKind::Default,
        "struct" => TokenKind::Struct,
        "enum" => TokenKind::Enum,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        _ => TokenKind::Ident,
    }
}

/// Streaming lexer with a two-character lookahead window (`curr`, `next`).
/// One token per [`Lexer::next_token`] call; [`Lexer::back_to`] rewinds the
/// stream to a previously returned token.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    curr: Option<char>,
    next: Option<char>,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut lexer = Lexer {
            chars: source.chars().collect(),
            pos: 0,
            curr: None,
            next: None,
            line: 1,
            col: 1,
        };
        lexer.fetch(1, 1);
        lexer
    }

    /// Re-prime the lookahead window at the current `pos`.
    fn fetch(&mut self, line: usize, col: usize) {
        self.curr = self.chars.get(self.pos).copied();
        self.next = self.chars.get(self.pos + 1).copied();
        self.line = line;
        self.col = col;
    }

    fn read(&mut self) {
        if self.curr == Some('\n') {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        self.pos += 1;
        self.curr = self.next;
        self.next = self.chars.get(self.pos + 1).copied();
    }

    /// Rewind the stream so the next [`Lexer::next_token`] call re-reads
    /// `token`. The parser relies on a single-token rewind only.
    pub fn back_to(&mut self, token: &Token) {
        self.pos = token.offset;
        self.fetch(token.line, token.col);
    }

    fn error(&self, msg: impl Into<String>) -> LexerError {
        LexerError::Error {
            msg: msg.into(),
            line: self.line,
            col: self.col,
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_spaces();

        let line = self.line;
        let col = self.col;
        let offset = self.pos;
        let token = |kind: TokenKind, lexeme: &str| Token {
            kind,
            lexeme: lexeme.to_string(),
            line,
            col,
            offset,
        };

        let ch = match self.curr {
            Some(c) => c,
            None => return Ok(token(TokenKind::Eof, "")),
        };

        if let Some(kind) = simple_token_kind(ch) {
            self.read();
            let mut buf = [0u8; 4];
            return Ok(token(kind, ch.encode_utf8(&mut buf)));
        }

        match ch {
            '\n' => {
                self.read();
                Ok(token(TokenKind::Eol, ""))
            }
            '=' => {
                self.read();
                if self.curr == Some('=') {
                    self.read();
                    Ok(token(TokenKind::Eq, "=="))
                } else {
                    Ok(token(TokenKind::Assign, "="))
                }
            }
            '!' => {
                self.read();
                if self.curr == Some('=') {
                    self.read();
                    Ok(token(TokenKind::NotEq, "!="))
                } else {
                    Ok(token(TokenKind::Bang, "!"))
                }
            }
            '&' => {
                if self.next == Some('&') {
                    self.read();
                    self.read();
                    Ok(token(TokenKind::And, "&&"))
                } else {
                    Err(self.error("Unexpected one '&', expected '&&'"))
                }
            }
            '|' => {
                if self.next == Some('|') {
                    self.read();
                    self.read();
                    Ok(token(TokenKind::Or, "||"))
                } else {
                    Err(self.error("Unexpected one '|', expected '||'"))
                }
            }
            '/' => {
                if self.next == Some('/') {
                    self.consume_comment();
                    self.next_token()
                } else {
                    self.read();
                    Ok(token(TokenKind::Slash, "/"))
                }
            }
            c if c.is_ascii_digit() => {
                let (lexeme, is_int) = self.read_number();
                let kind = if is_int {
                    TokenKind::NumInt
                } else {
                    TokenKind::NumFloat
                };
                Ok(token(kind, &lexeme))
            }
            c if c.is_alphabetic() => {
                let lexeme = self.read_identifier();
                Ok(token(lookup_ident(&lexeme), &lexeme))
            }
            other => Err(self.error(format!("Unexpected symbol: '{}'", other))),
        }
    }

    fn skip_spaces(&mut self) {
        while self.curr == Some(' ') {
            self.read();
        }
    }

    fn consume_comment(&mut self) {
        while self.curr.is_some() && self.curr != Some('\n') {
            self.read();
        }
    }

    /// An integer is `[0-9]+`; a float is `[0-9]+ '.' [0-9]*` (the
    /// fractional digits may be absent, so `5.` is a valid float).
    fn read_number(&mut self) -> (String, bool) {
        let mut lexeme = String::new();
        let mut is_int = true;

        while let Some(c) = self.curr {
            if !c.is_ascii_digit() {
                break;
            }
            lexeme.push(c);
            self.read();
        }
        if self.curr == Some('.') {
            is_int = false;
            lexeme.push('.');
            self.read();
            while let Some(c) = self.curr {
                if !c.is_ascii_digit() {
                    break;
                }
                lexeme.push(c);
                self.read();
            }
        }

        (lexeme, is_int)
    }

    fn read_identifier(&mut self) -> String {
        let mut lexeme = String::new();
        while let Some(c) = self.curr {
            if !c.is_alphanumeric() {
                break;
            }
            lexeme.push(c);
            self.read();
        }
        lexeme
    }
}

fn simple_token_kind(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        '(' => TokenKind::LParen,
        ')' => TokenKind::RParen,
        '{' => TokenKind::LBrace,
        '}' => TokenKind::RBrace,
        '[' => TokenKind::LBracket,
        ']' => TokenKind::RBracket,
        ',' => TokenKind::Comma,
        '.' => TokenKind::Dot,
        ':' => TokenKind::Colon,
        '?' => TokenKind::Question,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Asterisk,
        '<' => TokenKind::Lt,
        '>' => TokenKind::Gt,
        _ => return None,
    };
    Some(kind)
}
