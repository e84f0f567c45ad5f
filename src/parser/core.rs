use super::*;

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, LexerError> {
        let curr = lexer.next_token()?;
        let next = lexer.next_token()?;
        Ok(Parser { lexer, curr, next })
    }

    pub(super) fn error(&self, msg: impl Into<String>) -> ParseError {
        ParseError::Error {
            msg: msg.into(),
            line: self.curr.line,
            col: self.curr.col,
        }
    }

    /// Advance the cursor by one token.
    pub(super) fn read(&mut self) -> Result<(), ParseError> {
        let next = self.lexer.next_token()?;
        self.curr = std::mem::replace(&mut self.next, next);
        Ok(())
    }

    /// Rewind the stream so that `token` becomes the current token again.
    pub(super) fn back_to(&mut self, token: &Token) -> Result<(), ParseError> {
        self.lexer.back_to(token);
        self.curr = self.lexer.next_token()?;
        self.next = self.lexer.next_token()?;
        Ok(())
    }

    pub(super) fn curr_is(&self, kind: TokenKind) -> bool {
        self.curr.kind == kind
    }

    pub(super) fn next_is(&self, kind: TokenKind) -> bool {
        self.next.kind == kind
    }

    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.curr.kind == kind {
            Ok(self.curr.clone())
        } else {
            Err(self.error(format!(
                "expected token to be {:?}, got {:?} instead",
                kind, self.curr.kind
            )))
        }
    }

    /// A type position accepts a primitive type word or a struct/enum name.
    pub(super) fn expect_type_or_ident(&mut self) -> Result<Token, ParseError> {
        match self.curr.kind {
            TokenKind::TypeName | TokenKind::Ident => Ok(self.curr.clone()),
            _ => Err(self.error(format!(
                "expected type name, got {:?} instead",
                self.curr.kind
            ))),
        }
    }

    /// Statements end at a physical newline (or the end of input).
    pub(super) fn expect_statement_end(&mut self) -> Result<(), ParseError> {
        self.read()?;
        if self.curr_is(TokenKind::Eol) || self.curr_is(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected end of line, got {:?} instead",
                self.curr.kind
            )))
        }
    }

    pub fn parse(&mut self) -> Result<StatementsBlock, ParseError> {
        self.parse_statements_block(&[TokenKind::Eof])
    }

    /// Parse statements until one of `terminators` is the current token,
    /// which is left unconsumed.
    pub(super) fn parse_statements_block(
        &mut self,
        terminators: &[TokenKind],
    ) -> Result<StatementsBlock, ParseError> {
        let mut statements = Vec::new();
        while !terminators.contains(&self.curr.kind) {
            if self.curr_is(TokenKind::Eof) {
                return Err(self.error("Unexpected end of file inside a block"));
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
            self.read()?;
        }
        Ok(StatementsBlock { statements })
    }

    fn parse_statement(&mut self) -> Result<Option<Statement>, ParseError> {
        match self.curr.kind {
            TokenKind::Ident if self.next_is(TokenKind::LParen) => {
                self.parse_call_statement().map(Some)
            }
            TokenKind::Ident if self.next_is(TokenKind::Dot) => {
                self.parse_field_assignment().map(Some)
            }
            TokenKind::Ident => self.parse_assignment_statement().map(Some),
            TokenKind::Return => self.parse_return().map(Some),
            TokenKind::If => self.parse_if().map(Some),
            TokenKind::IfEmpty => self.parse_ifempty().map(Some),
            TokenKind::Switch => self.parse_switch().map(Some),
            TokenKind::Struct => self.parse_struct_definition().map(Some),
            TokenKind::Enum => self.parse_enum_definition().map(Some),
            TokenKind::Eol => Ok(None),
            _ => Err(self.error(format!(
                "Unexpected token for start of statement: {:?}",
                self.curr.kind
            ))),
        }
    }
}
