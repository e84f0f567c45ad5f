use crate::lexer::Token;

/// An ordered sequence of statements executed within one environment frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementsBlock {
    pub statements: Vec<Statement>,
}

/// `name = value`. Also reused for the field list of a struct literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub token: Token,
    pub name: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub token: Token,
    pub condition: Expression,
    pub body: StatementsBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assignment(Assignment),
    /// `name.field.inner = value`: the target is a field-access chain whose
    /// terminal link receives the value.
    FieldAssignment {
        token: Token,
        target: Expression,
        value: Expression,
    },
    Return {
        token: Token,
        value: Expression,
    },
    If {
        token: Token,
        condition: Expression,
        consequence: StatementsBlock,
        alternative: Option<StatementsBlock>,
    },
    /// `ifempty name = value { body }`: body runs when the bound value
    /// carries the empty flag.
    IfEmpty {
        token: Token,
        assignment: Assignment,
        body: StatementsBlock,
    },
    Switch {
        token: Token,
        subject: Option<Expression>,
        cases: Vec<SwitchCase>,
        default: Option<StatementsBlock>,
    },
    /// Field declarations in source order as `(name, type_name)` pairs.
    StructDefinition {
        token: Token,
        name: String,
        fields: Vec<(String, String)>,
    },
    EnumDefinition {
        token: Token,
        name: String,
        members: Vec<String>,
    },
    /// A function call in statement position; its result is discarded.
    Call {
        token: Token,
        call: Expression,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Gt,
    Eq,
    NotEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntLiteral {
        token: Token,
        value: i64,
    },
    FloatLiteral {
        token: Token,
        value: f64,
    },
    BoolLiteral {
        token: Token,
        value: bool,
    },
    Identifier {
        token: Token,
        name: String,
    },
    Unary {
        token: Token,
        op: UnaryOp,
        right: Box<Expression>,
    },
    Binary {
        token: Token,
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Parameters in source order as `(type_name, name)` pairs.
    FunctionLiteral {
        token: Token,
        params: Vec<(String, String)>,
        return_type: String,
        body: StatementsBlock,
    },
    Call {
        token: Token,
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    ArrayLiteral {
        token: Token,
        element_type: String,
        elements: Vec<Expression>,
    },
    Index {
        token: Token,
        left: Box<Expression>,
        index: Box<Expression>,
    },
    StructLiteral {
        token: Token,
        name: String,
        fields: Vec<Assignment>,
    },
    FieldAccess {
        token: Token,
        left: Box<Expression>,
        field: String,
    },
    EnumAccess {
        token: Token,
        left: Box<Expression>,
        member: String,
    },
    /// `?T` or `?T[]`: a value of type `T` whose empty flag is set.
    EmptyMarker {
        token: Token,
        type_name: String,
        is_array: bool,
    },
}

impl Expression {
    /// The originating token, used for runtime error locations.
    pub fn token(&self) -> &Token {
        match self {
            Expression::IntLiteral { token, .. }
            | Expression::FloatLiteral { token, .. }
            | Expression::BoolLiteral { token, .. }
            | Expression::Identifier { token, .. }
            | Expression::Unary { token, .. }
            | Expression::Binary { token, .. }
            | Expression::FunctionLiteral { token, .. }
            | Expression::Call { token, .. }
            | Expression::ArrayLiteral { token, .. }
            | Expression::Index { token, .. }
            | Expression::StructLiteral { token, .. }
            | Expression::FieldAccess { token, .. }
            | Expression::EnumAccess { token, .. }
            | Expression::EmptyMarker { token, .. } => token,
        }
    }
}
