/// Runtime values and runtime errors.
///
/// Lives in its own module so the environment and the interpreter can both
/// import it without circular dependencies.
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::ast::StatementsBlock;
use crate::environment::Env;

// ---------------------------------------------------------------------------
// RuntimeError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Unknown identifier, undefined struct/enum, duplicate definition.
    #[error("{msg}\nline:{line}, pos {col}")]
    Resolve {
        msg: String,
        line: usize,
        col: usize,
    },
    /// Operand/operator/assignment/arity/return type violations.
    #[error("{msg}\nline:{line}, pos {col}")]
    Type {
        msg: String,
        line: usize,
        col: usize,
    },
    /// Array index outside `[0, len)`.
    #[error("{msg}\nline:{line}, pos {col}")]
    Bounds {
        msg: String,
        line: usize,
        col: usize,
    },
    /// Assignment to a builtin, `?`/`empty` on an unsupported type,
    /// builtin preconditions.
    #[error("{msg}\nline:{line}, pos {col}")]
    Semantics {
        msg: String,
        line: usize,
        col: usize,
    },
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// A registered struct type: a named, ordered field map.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

impl StructDefinition {
    pub fn field_type(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, type_name)| type_name.as_str())
    }
}

/// A registered enum type: a named, ordered member list. Ordinals follow
/// source order starting at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    pub name: String,
    pub members: Vec<String>,
}

// ---------------------------------------------------------------------------
// Value payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub element_type: String,
    pub elements: Vec<Value>,
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub definition: Rc<StructDefinition>,
    pub fields: HashMap<String, Value>,
    pub empty: bool,
}

/// A user function: parameters, body, and the environment captured at the
/// function literal's evaluation site (lexical scope).
pub struct FunctionValue {
    pub params: Vec<(String, String)>,
    pub return_type: String,
    pub body: StatementsBlock,
    pub env: Env,
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The captured env is skipped: it may transitively contain this
        // function again.
        f.debug_struct("FunctionValue")
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

pub type BuiltinHandler = fn(&Env, &[Value]) -> Result<Value, String>;

/// A builtin: declared argument types (literal type strings plus the
/// wildcards `"any"` and `"array"`), a declared return type, and a handler.
/// The evaluator checks arity, argument types and the return type; handlers
/// see pre-validated values.
#[derive(Debug, Clone)]
pub struct BuiltinFunction {
    pub name: String,
    pub arg_types: Vec<String>,
    pub return_type: String,
    pub handler: BuiltinHandler,
}

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A runtime value. Struct and Array values are shared-mutable: cloning the
/// value clones the handle, so rebinding aliases and mutation through one
/// name is visible through every other. Scalars copy.
#[derive(Debug, Clone)]
pub enum Value {
    Integer { value: i64, empty: bool },
    Float { value: f64, empty: bool },
    Boolean(bool),
    Array(Rc<RefCell<ArrayValue>>),
    Struct(Rc<RefCell<StructValue>>),
    Enum { definition: Rc<EnumDefinition>, ordinal: i8 },
    Function(Rc<FunctionValue>),
    Builtin(Rc<BuiltinFunction>),
    Void,
}

impl Value {
    pub fn integer(value: i64) -> Value {
        Value::Integer { value, empty: false }
    }

    pub fn float(value: f64) -> Value {
        Value::Float { value, empty: false }
    }

    pub fn array(element_type: impl Into<String>, elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(ArrayValue {
            element_type: element_type.into(),
            elements,
            empty: false,
        })))
    }

    /// The canonical type string: `"int"`, `"float"`, `"bool"`, `"void"`,
    /// `"[]T"`, a struct/enum name, `"function_obj"` or `"builtin_fn_obj"`.
    pub fn type_name(&self) -> String {
        match self {
            Value::Integer { .. } => "int".to_string(),
            Value::Float { .. } => "float".to_string(),
            Value::Boolean(_) => "bool".to_string(),
            Value::Array(array) => format!("[]{}", array.borrow().element_type),
            Value::Struct(st) => st.borrow().definition.name.clone(),
            Value::Enum { definition, .. } => definition.name.clone(),
            Value::Function(_) => "function_obj".to_string(),
            Value::Builtin(_) => "builtin_fn_obj".to_string(),
            Value::Void => "void".to_string(),
        }
    }

    /// The empty flag for types that carry one, `None` otherwise.
    pub fn empty_flag(&self) -> Option<bool> {
        match self {
            Value::Integer { empty, .. } | Value::Float { empty, .. } => Some(*empty),
            Value::Array(array) => Some(array.borrow().empty),
            Value::Struct(st) => Some(st.borrow().empty),
            _ => None,
        }
    }

    /// Human-readable representation, used by `print` and the environment
    /// dump.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer { value, .. } => value.to_string(),
            Value::Float { value, .. } => value.to_string(),
            Value::Boolean(value) => value.to_string(),
            Value::Array(array) => {
                let array = array.borrow();
                let elements: Vec<String> = array.elements.iter().map(Value::inspect).collect();
                format!("[]{}{{{}}}", array.element_type, elements.join(", "))
            }
            Value::Struct(st) => {
                let st = st.borrow();
                // Definition order keeps the output deterministic.
                let fields: Vec<String> = st
                    .definition
                    .fields
                    .iter()
                    .filter_map(|(name, _)| {
                        st.fields
                            .get(name)
                            .map(|value| format!("{}: {}", name, value.inspect()))
                    })
                    .collect();
                format!("{}{{{}}}", st.definition.name, fields.join(", "))
            }
            Value::Enum { definition, ordinal } => {
                match definition.members.get(usize::try_from(*ordinal).unwrap_or(usize::MAX)) {
                    Some(member) => format!("{}:{}", definition.name, member),
                    None => definition.name.clone(),
                }
            }
            Value::Function(_) => "function".to_string(),
            Value::Builtin(_) => "builtin function".to_string(),
            Value::Void => "void".to_string(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (
                Value::Integer { value: a, empty: ae },
                Value::Integer { value: b, empty: be },
            ) => a == b && ae == be,
            (Value::Float { value: a, empty: ae }, Value::Float { value: b, empty: be }) => {
                a == b && ae == be
            }
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || a == b,
            (Value::Struct(a), Value::Struct(b)) => Rc::ptr_eq(a, b) || a == b,
            (
                Value::Enum { definition: a, ordinal: ao },
                Value::Enum { definition: b, ordinal: bo },
            ) => a.name == b.name && ao == bo,
            // Functions capture their environment; pointer identity is the
            // only comparison that terminates.
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}
