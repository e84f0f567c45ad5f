use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::StatementsBlock;
use crate::environment::Env;
use crate::lexer::Token;
use crate::value::{BuiltinFunction, RuntimeError};

mod builtins;
mod eval;
mod exec;
mod ops;

/// Operation categories reported through the observation callback, one per
/// executed operation. Purely diagnostic; the callback cannot influence
/// semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Assignment,
    FieldAssignment,
    Return,
    If,
    IfEmpty,
    Switch,
    StructDefinition,
    EnumDefinition,
    Unary,
    Binary,
    FunctionLiteral,
    FunctionCall,
    Builtin(String),
    ArrayLiteral,
    Index,
    StructLiteral,
    FieldAccess,
    EnumAccess,
    EmptyMarker,
}

pub type OpCallback = Box<dyn FnMut(&Operation)>;

/// Recursive AST walker. Owns the builtin registry and the optional
/// observation callback; all state that survives a run lives in the
/// environment handed to [`Interpreter::exec_ast`].
pub struct Interpreter {
    builtins: HashMap<String, Rc<BuiltinFunction>>,
    op_callback: Option<OpCallback>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            builtins: builtins::baseline(),
            op_callback: None,
        }
    }

    /// Merge host-supplied builtins into the registry. Later entries win,
    /// so a host may replace a baseline builtin wholesale.
    pub fn add_builtins(&mut self, extra: HashMap<String, Rc<BuiltinFunction>>) {
        self.builtins.extend(extra);
    }

    pub fn set_op_callback(&mut self, callback: OpCallback) {
        self.op_callback = Some(callback);
    }

    /// Execute a parsed program against `env`. A `ReturnValue` escaping the
    /// top-level block is discarded.
    pub fn exec_ast(&mut self, block: &StatementsBlock, env: &Env) -> Result<(), RuntimeError> {
        self.exec_statements_block(block, env)?;
        Ok(())
    }

    fn observe(&mut self, operation: Operation) {
        if let Some(callback) = &mut self.op_callback {
            callback(&operation);
        }
    }

    fn resolve_error(token: &Token, msg: impl Into<String>) -> RuntimeError {
        RuntimeError::Resolve {
            msg: msg.into(),
            line: token.line,
            col: token.col,
        }
    }

    fn type_error(token: &Token, msg: impl Into<String>) -> RuntimeError {
        RuntimeError::Type {
            msg: msg.into(),
            line: token.line,
            col: token.col,
        }
    }

    fn bounds_error(token: &Token, msg: impl Into<String>) -> RuntimeError {
        RuntimeError::Bounds {
            msg: msg.into(),
            line: token.line,
            col: token.col,
        }
    }

    fn semantics_error(token: &Token, msg: impl Into<String>) -> RuntimeError {
        RuntimeError::Semantics {
            msg: msg.into(),
            line: token.line,
            col: token.col,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
