use super::*;

use super::expr::{binary_op_of, Precedence};

impl Parser {
    pub(super) fn parse_assignment_statement(&mut self) -> Result<Statement, ParseError> {
        let assignment = self.parse_assignment(&[TokenKind::Eol, TokenKind::Eof])?;
        self.expect_statement_end()?;
        Ok(Statement::Assignment(assignment))
    }

    /// A function call in statement position: `name(args)` to end of line.
    pub(super) fn parse_call_statement(&mut self) -> Result<Statement, ParseError> {
        let token = self.curr.clone();
        let call = self.parse_expression(Precedence::Lowest, &[TokenKind::Eol, TokenKind::Eof])?;
        if !matches!(call, Expression::Call { .. }) {
            return Err(self.error("Expected a function call statement"));
        }
        self.expect_statement_end()?;
        Ok(Statement::Call { token, call })
    }

    /// `name.field(.inner)* = expression`
    pub(super) fn parse_field_assignment(&mut self) -> Result<Statement, ParseError> {
        let token = self.expect(TokenKind::Ident)?;
        let mut target = Expression::Identifier {
            name: token.lexeme.clone(),
            token: token.clone(),
        };

        while self.next_is(TokenKind::Dot) {
            self.read()?;
            self.read()?;
            let field_token = self.expect(TokenKind::Ident)?;
            target = Expression::FieldAccess {
                field: field_token.lexeme.clone(),
                token: field_token,
                left: Box::new(target),
            };
        }

        self.read()?;
        self.expect(TokenKind::Assign)?;
        self.read()?;
        let value = self.parse_expression(Precedence::Lowest, &[TokenKind::Eol, TokenKind::Eof])?;
        self.expect_statement_end()?;

        Ok(Statement::FieldAssignment {
            token,
            target,
            value,
        })
    }

    pub(super) fn parse_return(&mut self) -> Result<Statement, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        let value = self.parse_expression(Precedence::Lowest, &[TokenKind::Eol, TokenKind::Eof])?;
        self.expect_statement_end()?;
        Ok(Statement::Return { token, value })
    }

    /// `if cond { EOL … } (else { EOL … })?`
    pub(super) fn parse_if(&mut self) -> Result<Statement, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        let condition = self.parse_expression(Precedence::Lowest, &[TokenKind::LBrace])?;
        self.read()?;
        let consequence = self.parse_braced_block()?;

        let mut alternative = None;
        if self.next_is(TokenKind::Else) {
            self.read()?;
            self.read()?;
            alternative = Some(self.parse_braced_block()?);
        }

        Ok(Statement::If {
            token,
            condition,
            consequence,
            alternative,
        })
    }

    /// `ifempty name = value { EOL … }`: the block runs when the freshly
    /// bound value carries the empty flag.
    pub(super) fn parse_ifempty(&mut self) -> Result<Statement, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        let assignment = self.parse_assignment(&[TokenKind::LBrace])?;
        self.read()?;
        let body = self.parse_braced_block()?;
        Ok(Statement::IfEmpty {
            token,
            assignment,
            body,
        })
    }

    /// Free form: `switch { case <bool-expr>: … }`. Subject-bound form:
    /// `switch subject { case <op> <rhs>: … }`, where each case condition
    /// reuses the already-parsed subject as its left operand.
    pub(super) fn parse_switch(&mut self) -> Result<Statement, ParseError> {
        let token = self.curr.clone();
        self.read()?;

        let subject = if self.curr_is(TokenKind::LBrace) {
            None
        } else {
            let subject = self.parse_expression(Precedence::Lowest, &[TokenKind::LBrace])?;
            self.read()?;
            Some(subject)
        };

        self.expect(TokenKind::LBrace)?;
        self.read()?;
        self.expect(TokenKind::Eol)?;
        self.read()?;

        let mut cases = Vec::new();
        loop {
            if self.curr_is(TokenKind::Eol) {
                self.read()?;
                continue;
            }
            if !self.curr_is(TokenKind::Case) {
                break;
            }
            let case_token = self.curr.clone();
            self.read()?;

            let condition = match &subject {
                Some(subject) => self.parse_case_condition(subject)?,
                None => self.parse_expression(Precedence::Lowest, &[TokenKind::Colon])?,
            };
            self.read()?;
            self.expect(TokenKind::Colon)?;
            self.read()?;
            self.expect(TokenKind::Eol)?;
            self.read()?;

            let body = self.parse_statements_block(&[
                TokenKind::Case,
                TokenKind::Default,
                TokenKind::RBrace,
            ])?;
            cases.push(SwitchCase {
                token: case_token,
                condition,
                body,
            });
        }

        let mut default = None;
        if self.curr_is(TokenKind::Default) {
            self.read()?;
            self.expect(TokenKind::Colon)?;
            self.read()?;
            self.expect(TokenKind::Eol)?;
            self.read()?;
            default = Some(self.parse_statements_block(&[TokenKind::RBrace])?);
        }

        self.expect(TokenKind::RBrace)?;
        Ok(Statement::Switch {
            token,
            subject,
            cases,
            default,
        })
    }

    /// A subject-bound case supplies only an operator and a right-hand side;
    /// the subject becomes the left operand.
    fn parse_case_condition(&mut self, subject: &Expression) -> Result<Expression, ParseError> {
        let token = self.curr.clone();
        let op = match binary_op_of(token.kind) {
            Some(op @ (BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Eq | BinaryOp::NotEq)) => op,
            _ => {
                return Err(self.error(format!(
                    "expected comparison operator in case condition, got {:?}",
                    token.kind
                )))
            }
        };
        self.read()?;
        let right = self.parse_expression(Precedence::Comparison, &[TokenKind::Colon])?;
        Ok(Expression::Binary {
            token,
            op,
            left: Box::new(subject.clone()),
            right: Box::new(right),
        })
    }

    /// `struct Name { (TYPE field)+ }` with newline-separated field lines;
    /// a one-line definition is accepted as well.
    pub(super) fn parse_struct_definition(&mut self) -> Result<Statement, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        let name = self.expect(TokenKind::Ident)?.lexeme;
        self.read()?;
        self.expect(TokenKind::LBrace)?;
        self.read()?;

        let mut fields: Vec<(String, String)> = Vec::new();
        loop {
            if self.curr_is(TokenKind::Eol) {
                self.read()?;
                continue;
            }
            if self.curr_is(TokenKind::RBrace) {
                break;
            }
            let type_name = self.expect_type_or_ident()?.lexeme;
            self.read()?;
            let field_name = self.expect(TokenKind::Ident)?.lexeme;
            self.read()?;
            if fields.iter().any(|(name, _)| *name == field_name) {
                return Err(self.error(format!(
                    "duplicate field '{}' in struct '{}'",
                    field_name, name
                )));
            }
            fields.push((field_name, type_name));
        }
        if fields.is_empty() {
            return Err(self.error(format!("struct '{}' must declare at least one field", name)));
        }

        Ok(Statement::StructDefinition {
            token,
            name,
            fields,
        })
    }

    /// `enum Name { member (, member | EOL)* }`
    pub(super) fn parse_enum_definition(&mut self) -> Result<Statement, ParseError> {
        let token = self.curr.clone();
        self.read()?;
        let name = self.expect(TokenKind::Ident)?.lexeme;
        self.read()?;
        self.expect(TokenKind::LBrace)?;
        self.read()?;

        let mut members: Vec<String> = Vec::new();
        loop {
            if self.curr_is(TokenKind::Eol) || self.curr_is(TokenKind::Comma) {
                self.read()?;
                continue;
            }
            if self.curr_is(TokenKind::RBrace) {
                break;
            }
            let member = self.expect(TokenKind::Ident)?.lexeme;
            self.read()?;
            if members.contains(&member) {
                return Err(self.error(format!("duplicate member '{}' in enum '{}'", member, name)));
            }
            members.push(member);
        }
        if members.is_empty() {
            return Err(self.error(format!("enum '{}' must declare at least one member", name)));
        }

        Ok(Statement::EnumDefinition {
            token,
            name,
            members,
        })
    }

    /// `{ EOL statements }`; leaves the cursor on the closing brace.
    fn parse_braced_block(&mut self) -> Result<StatementsBlock, ParseError> {
        self.expect(TokenKind::LBrace)?;
        self.read()?;
        self.expect(TokenKind::Eol)?;
        self.read()?;
        self.parse_statements_block(&[TokenKind::RBrace])
    }
}
