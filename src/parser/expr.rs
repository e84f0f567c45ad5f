use super::*;

/// The precedence ladder, lowest binding power first. `(` binds at `Call`;
/// `[`, `{`, `.` and `:` bind at `Index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Assign,
    Or,
    And,
    Equals,
    Comparison,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Assign => Precedence::Assign,
        TokenKind::Or => Precedence::Or,
        TokenKind::And => Precedence::And,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt => Precedence::Comparison,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        TokenKind::LBracket | TokenKind::LBrace | TokenKind::Dot | TokenKind::Colon => {
            Precedence::Index
        }
        _ => Precedence::Lowest,
    }
}

pub(super) fn binary_op_of(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Asterisk => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Pratt loop. Every call receives the set of tokens that may
    /// legitimately end the expression; parsing stops when the upcoming
    /// token is one of them or binds no tighter than `precedence`. On
    /// return the cursor sits on the expression's last token.
    pub(super) fn parse_expression(
        &mut self,
        precedence: Precedence,
        terminators: &[TokenKind],
    ) -> Result<Expression, ParseError> {
        let mut left = self.parse_prefix(terminators)?;

        while !terminators.contains(&self.next.kind) && precedence < precedence_of(self.next.kind)
        {
            self.read()?;
            left = self.parse_infix(left, terminators)?;
        }

        Ok(left)
    }

    fn parse_prefix(&mut self, terminators: &[TokenKind]) -> Result<Expression, ParseError> {
        match self.curr.kind {
            TokenKind::NumInt => self.parse_integer(),
            TokenKind::NumFloat => self.parse_float(),
            TokenKind::True | TokenKind::False => Ok(Expression::BoolLiteral {
                token: self.curr.clone(),
                value: self.curr_is(TokenKind::True),
            }),
            TokenKind::Ident => self.parse_identifier(),
            TokenKind::TypeName => self.parse_legacy_array_literal(),
            TokenKind::Minus | TokenKind::Bang => self.parse_unary(terminators),
            TokenKind::LParen => self.parse_grouped(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::Question => self.parse_empty_marker(),
            _ => Err(self.error(format!(
                "no prefix parse function for {:?} found",
                self.curr.kind
            ))),
        }
    }

    fn parse_infix(
        &mut self,
        left: Expression,
        terminators: &[TokenKind],
    ) -> Result<Expression, ParseError> {
        match self.curr.kind {
            TokenKind::LParen => self.parse_call(left),
            TokenKind::LBracket => self.parse_index(left),
            TokenKind::LBrace => self.parse_struct_literal(left),
            TokenKind::Dot => self.parse_field_access(left),
            TokenKind::Colon => self.parse_enum_access(left),
            kind => match binary_op_of(kind) {
                Some(op) => self.parse_binary(op, left, terminators),
                None => Err(self.error(format!("Unexpected token {:?}", kind))),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Prefix handlers
    // -----------------------------------------------------------------------

    fn parse_integer(&mut self) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        let value = token
            .lexeme
            .parse::<i64>()
            .map_err(|_| self.error(format!("could not parse '{}' as integer", token.lexeme)))?;
        Ok(Expression::IntLiteral { token, value })
    }

    fn parse_float(&mut self) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        let value = token
            .lexeme
            .parse::<f64>()
            .map_err(|_| self.error(format!("could not parse '{}' as float", token.lexeme)))?;
        Ok(Expression::FloatLiteral { token, value })
    }

    /// An identifier, unless it opens the legacy `name[]{…}` array form.
    /// The `[` is read speculatively: when no `]` follows immediately, the
    /// stream is rewound and the identifier is returned as-is so the index
    /// machinery can take over.
    fn parse_identifier(&mut self) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        if self.next_is(TokenKind::LBracket) {
            self.read()?;
            self.read()?;
            if self.curr_is(TokenKind::RBracket) {
                self.read()?;
                return self.parse_array_elements(token);
            }
            self.back_to(&token)?;
        }
        Ok(Expression::Identifier {
            name: token.lexeme.clone(),
            token,
        })
    }

    /// Legacy array literal opened by a primitive type word: `int[]{…}`.
    fn parse_legacy_array_literal(&mut self) -> Result<Expression, ParseError> {
        let type_token = self.curr.clone();
        self.read()?;
        self.expect(TokenKind::LBracket)?;
        self.read()?;
        self.expect(TokenKind::RBracket)?;
        self.read()?;
        self.parse_array_elements(type_token)
    }

    fn parse_unary(&mut self, terminators: &[TokenKind]) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        let op = if token.kind == TokenKind::Minus {
            UnaryOp::Minus
        } else {
            UnaryOp::Not
        };
        self.read()?;
        let right = self.parse_expression(Precedence::Prefix, terminators)?;
        Ok(Expression::Unary {
            token,
            op,
            right: Box::new(right),
        })
    }

    /// Grouped expression; transparent, no node of its own.
    fn parse_grouped(&mut self) -> Result<Expression, ParseError> {
        self.read()?;
        let expression = self.parse_expression(Precedence::Lowest, &[TokenKind::RParen])?;
        self.read()?;
        self.expect(TokenKind::RParen)?;
        Ok(expression)
    }

    /// `fn ( [TYPE name, …] ) TYPE { EOL statements }`
    fn parse_function_literal(&mut self) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        self.expect(TokenKind::LParen)?;
        self.read()?;

        let mut params = Vec::new();
        while !self.curr_is(TokenKind::RParen) {
            let type_token = self.expect_type_or_ident()?;
            self.read()?;
            let name_token = self.expect(TokenKind::Ident)?;
            self.read()?;
            params.push((type_token.lexeme, name_token.lexeme));
            if self.curr_is(TokenKind::Comma) {
                self.read()?;
            } else if !self.curr_is(TokenKind::RParen) {
                return Err(self.error(format!(
                    "expected ',' or ')' in parameter list, got {:?} instead",
                    self.curr.kind
                )));
            }
        }
        self.read()?;

        let return_type = self.expect_type_or_ident()?.lexeme;
        self.read()?;
        self.expect(TokenKind::LBrace)?;
        self.read()?;
        self.expect(TokenKind::Eol)?;
        self.read()?;
        let body = self.parse_statements_block(&[TokenKind::RBrace])?;

        Ok(Expression::FunctionLiteral {
            token,
            params,
            return_type,
            body,
        })
    }

    /// Canonical array literal: `[]T{…}`.
    fn parse_array_literal(&mut self) -> Result<Expression, ParseError> {
        self.read()?;
        self.expect(TokenKind::RBracket)?;
        self.read()?;
        let type_token = self.expect_type_or_ident()?;
        self.read()?;
        self.parse_array_elements(type_token)
    }

    /// The brace-delimited element list shared by both array spellings.
    /// Expects the cursor on `{`.
    fn parse_array_elements(&mut self, type_token: Token) -> Result<Expression, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let elements = self.parse_expression_list(TokenKind::RBrace)?;
        Ok(Expression::ArrayLiteral {
            element_type: type_token.lexeme.clone(),
            token: type_token,
            elements,
        })
    }

    /// `?T` or `?T[]`.
    fn parse_empty_marker(&mut self) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        let type_name = self.expect_type_or_ident()?.lexeme;
        let mut is_array = false;
        if self.next_is(TokenKind::LBracket) {
            self.read()?;
            self.read()?;
            self.expect(TokenKind::RBracket)?;
            is_array = true;
        }
        Ok(Expression::EmptyMarker {
            token,
            type_name,
            is_array,
        })
    }

    // -----------------------------------------------------------------------
    // Infix handlers
    // -----------------------------------------------------------------------

    fn parse_binary(
        &mut self,
        op: BinaryOp,
        left: Expression,
        terminators: &[TokenKind],
    ) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        let precedence = precedence_of(token.kind);
        self.read()?;
        let right = self.parse_expression(precedence, terminators)?;
        Ok(Expression::Binary {
            token,
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_call(&mut self, function: Expression) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Ok(Expression::Call {
            token,
            function: Box::new(function),
            arguments,
        })
    }

    fn parse_index(&mut self, left: Expression) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        let index = self.parse_expression(Precedence::Lowest, &[TokenKind::RBracket])?;
        self.read()?;
        self.expect(TokenKind::RBracket)?;
        Ok(Expression::Index {
            token,
            left: Box::new(left),
            index: Box::new(index),
        })
    }

    /// `name{field = expr, …}`; only an identifier can open a struct
    /// literal.
    fn parse_struct_literal(&mut self, left: Expression) -> Result<Expression, ParseError> {
        let Expression::Identifier { token, name } = left else {
            return Err(self.error("Struct literal fields require a struct type name"));
        };

        let mut fields = Vec::new();
        self.read()?;
        while !self.curr_is(TokenKind::RBrace) {
            let field = self.parse_assignment(&[TokenKind::Comma, TokenKind::RBrace])?;
            fields.push(field);
            self.read()?;
            if self.curr_is(TokenKind::Comma) {
                self.read()?;
            } else if !self.curr_is(TokenKind::RBrace) {
                return Err(self.error(format!(
                    "expected ',' or '}}' in struct literal, got {:?} instead",
                    self.curr.kind
                )));
            }
        }

        Ok(Expression::StructLiteral {
            token,
            name,
            fields,
        })
    }

    fn parse_field_access(&mut self, left: Expression) -> Result<Expression, ParseError> {
        self.read()?;
        let token = self.expect(TokenKind::Ident)?;
        Ok(Expression::FieldAccess {
            field: token.lexeme.clone(),
            token,
            left: Box::new(left),
        })
    }

    fn parse_enum_access(&mut self, left: Expression) -> Result<Expression, ParseError> {
        self.read()?;
        let token = self.expect(TokenKind::Ident)?;
        Ok(Expression::EnumAccess {
            member: token.lexeme.clone(),
            token,
            left: Box::new(left),
        })
    }

    // -----------------------------------------------------------------------
    // Shared pieces
    // -----------------------------------------------------------------------

    /// A comma-separated expression list; expects the cursor on the opening
    /// delimiter and leaves it on `closer`.
    pub(super) fn parse_expression_list(
        &mut self,
        closer: TokenKind,
    ) -> Result<Vec<Expression>, ParseError> {
        let mut expressions = Vec::new();
        self.read()?;
        if self.curr.kind == closer {
            return Ok(expressions);
        }

        loop {
            expressions.push(self.parse_expression(Precedence::Lowest, &[TokenKind::Comma, closer])?);
            self.read()?;
            if self.curr.kind == closer {
                return Ok(expressions);
            }
            self.expect(TokenKind::Comma)?;
            self.read()?;
        }
    }

    /// `name = expression`; leaves the cursor on the expression's last token.
    pub(super) fn parse_assignment(
        &mut self,
        terminators: &[TokenKind],
    ) -> Result<Assignment, ParseError> {
        let token = self.expect(TokenKind::Ident)?;
        self.read()?;
        self.expect(TokenKind::Assign)?;
        self.read()?;
        let value = self.parse_expression(Precedence::Lowest, terminators)?;
        Ok(Assignment {
            name: token.lexeme.clone(),
            token,
            value,
        })
    }
}
