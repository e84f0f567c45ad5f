use super::*;
use crate::ast::{BinaryOp, UnaryOp};
use crate::value::Value;

impl Interpreter {
    pub(super) fn eval_unary(
        token: &Token,
        op: UnaryOp,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        match op {
            UnaryOp::Minus => match right {
                Value::Integer { value, .. } => Ok(Value::integer(-value)),
                Value::Float { value, .. } => Ok(Value::float(-value)),
                other => Err(Self::type_error(
                    token,
                    format!("unknown operator: -{}", other.type_name()),
                )),
            },
            UnaryOp::Not => match right {
                Value::Boolean(value) => Ok(Value::Boolean(!value)),
                other => Err(Self::type_error(
                    token,
                    format!("unknown operator: !{}", other.type_name()),
                )),
            },
        }
    }

    /// Operand types must agree exactly; dispatch then goes by the common
    /// type. Fresh scalar results never carry the empty flag.
    pub(super) fn eval_binary(
        token: &Token,
        op: BinaryOp,
        left: Value,
        right: Value,
    ) -> Result<Value, RuntimeError> {
        if left.type_name() != right.type_name() {
            return Err(Self::type_error(
                token,
                format!(
                    "forbidden operation on different types: {} and {}",
                    left.type_name(),
                    right.type_name()
                ),
            ));
        }

        match (&left, &right) {
            (Value::Integer { value: a, .. }, Value::Integer { value: b, .. }) => {
                Self::integer_binary(token, op, *a, *b)
            }
            (Value::Float { value: a, .. }, Value::Float { value: b, .. }) => {
                Self::float_binary(token, op, *a, *b)
            }
            (Value::Boolean(a), Value::Boolean(b)) => Self::boolean_binary(token, op, *a, *b),
            (Value::Enum { ordinal: a, .. }, Value::Enum { ordinal: b, .. }) => {
                Self::enum_binary(token, op, &left, *a, *b)
            }
            _ => Err(Self::unknown_operator(token, op, &left)),
        }
    }

    fn integer_binary(token: &Token, op: BinaryOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
        let value = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::Div => {
                if b == 0 {
                    return Err(Self::semantics_error(token, "division by zero"));
                }
                // Truncates toward zero.
                a / b
            }
            BinaryOp::Lt => return Ok(Value::Boolean(a < b)),
            BinaryOp::Gt => return Ok(Value::Boolean(a > b)),
            BinaryOp::Eq => return Ok(Value::Boolean(a == b)),
            BinaryOp::NotEq => return Ok(Value::Boolean(a != b)),
            BinaryOp::And | BinaryOp::Or => {
                return Err(Self::unknown_operator(token, op, &Value::integer(a)))
            }
        };
        Ok(Value::integer(value))
    }

    fn float_binary(token: &Token, op: BinaryOp, a: f64, b: f64) -> Result<Value, RuntimeError> {
        let value = match op {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            // IEEE-754 division; no zero check.
            BinaryOp::Div => a / b,
            BinaryOp::Lt => return Ok(Value::Boolean(a < b)),
            BinaryOp::Gt => return Ok(Value::Boolean(a > b)),
            BinaryOp::Eq => return Ok(Value::Boolean(a == b)),
            BinaryOp::NotEq => return Ok(Value::Boolean(a != b)),
            BinaryOp::And | BinaryOp::Or => {
                return Err(Self::unknown_operator(token, op, &Value::float(a)))
            }
        };
        Ok(Value::float(value))
    }

    fn boolean_binary(token: &Token, op: BinaryOp, a: bool, b: bool) -> Result<Value, RuntimeError> {
        let value = match op {
            BinaryOp::Eq => a == b,
            BinaryOp::NotEq => a != b,
            BinaryOp::And => a && b,
            BinaryOp::Or => a || b,
            _ => return Err(Self::unknown_operator(token, op, &Value::Boolean(a))),
        };
        Ok(Value::Boolean(value))
    }

    /// Enums compare by ordinal. The equal-type-string gate above already
    /// rejected operands from different enum definitions.
    fn enum_binary(
        token: &Token,
        op: BinaryOp,
        left: &Value,
        a: i8,
        b: i8,
    ) -> Result<Value, RuntimeError> {
        match op {
            BinaryOp::Eq => Ok(Value::Boolean(a == b)),
            BinaryOp::NotEq => Ok(Value::Boolean(a != b)),
            _ => Err(Self::unknown_operator(token, op, left)),
        }
    }

    fn unknown_operator(token: &Token, op: BinaryOp, operand: &Value) -> RuntimeError {
        Self::type_error(
            token,
            format!(
                "unknown operator: {} {} {}",
                operand.type_name(),
                op.symbol(),
                operand.type_name()
            ),
        )
    }
}
