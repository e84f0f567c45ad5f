use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::*;
use crate::ast::{Assignment, Expression};
use crate::environment::Environment;
use crate::value::{ArrayValue, FunctionValue, StructValue, Value};

impl Interpreter {
    pub(super) fn eval_expression(
        &mut self,
        expression: &Expression,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        match expression {
            Expression::IntLiteral { value, .. } => Ok(Value::integer(*value)),
            Expression::FloatLiteral { value, .. } => Ok(Value::float(*value)),
            Expression::BoolLiteral { value, .. } => Ok(Value::Boolean(*value)),
            Expression::Identifier { token, name } => self.eval_identifier(token, name, env),
            Expression::Unary { token, op, right } => {
                self.observe(Operation::Unary);
                let right = self.eval_expression(right, env)?;
                Self::eval_unary(token, *op, right)
            }
            Expression::Binary {
                token,
                op,
                left,
                right,
            } => {
                self.observe(Operation::Binary);
                // Both operands evaluate, left then right; no short-circuit.
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                Self::eval_binary(token, *op, left, right)
            }
            Expression::FunctionLiteral {
                params,
                return_type,
                body,
                ..
            } => {
                self.observe(Operation::FunctionLiteral);
                Ok(Value::Function(Rc::new(FunctionValue {
                    params: params.clone(),
                    return_type: return_type.clone(),
                    body: body.clone(),
                    env: Rc::clone(env),
                })))
            }
            Expression::Call {
                token,
                function,
                arguments,
            } => self.eval_call(token, function, arguments, env),
            Expression::ArrayLiteral {
                token: _,
                element_type,
                elements,
            } => self.eval_array_literal(element_type, elements, env),
            Expression::Index { token, left, index } => self.eval_index(token, left, index, env),
            Expression::StructLiteral {
                token,
                name,
                fields,
            } => self.eval_struct_literal(token, name, fields, env),
            Expression::FieldAccess { token, left, field } => {
                self.eval_field_access(token, left, field, env)
            }
            Expression::EnumAccess {
                token,
                left,
                member,
            } => self.eval_enum_access(token, left, member, env),
            Expression::EmptyMarker {
                token,
                type_name,
                is_array,
            } => self.eval_empty_marker(token, type_name, *is_array, env),
        }
    }

    /// Resolution order: builtin table, enum definitions, then the scope
    /// chain innermost-first. A bare enum name yields an enum value with
    /// ordinal -1 until a `:member` access pins it.
    fn eval_identifier(
        &mut self,
        token: &Token,
        name: &str,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        if let Some(builtin) = self.builtins.get(name) {
            return Ok(Value::Builtin(Rc::clone(builtin)));
        }
        if let Some(definition) = env.borrow().get_enum_definition(name) {
            return Ok(Value::Enum {
                definition,
                ordinal: -1,
            });
        }
        if let Some(value) = env.borrow().get(name) {
            return Ok(value);
        }
        Err(Self::resolve_error(
            token,
            format!("identifier not found: {}", name),
        ))
    }

    /// Callee first, then arguments left to right, then invocation.
    fn eval_call(
        &mut self,
        token: &Token,
        function: &Expression,
        arguments: &[Expression],
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::FunctionCall);
        let callee = self.eval_expression(function, env)?;
        let mut args = Vec::with_capacity(arguments.len());
        for argument in arguments {
            args.push(self.eval_expression(argument, env)?);
        }

        match callee {
            Value::Function(func) => self.call_function(token, &func, args),
            Value::Builtin(builtin) => self.call_builtin(token, &builtin, args, env),
            other => Err(Self::type_error(
                token,
                format!("not a function: {}", other.type_name()),
            )),
        }
    }

    /// User function call: arity and per-argument type checks, a fresh
    /// frame enclosed in the captured environment, then the return-type
    /// check against whatever the body produced.
    fn call_function(
        &mut self,
        token: &Token,
        func: &FunctionValue,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        if func.params.len() != args.len() {
            return Err(Self::type_error(
                token,
                format!(
                    "Function call arguments count mismatch: declared {}, but called {}",
                    func.params.len(),
                    args.len()
                ),
            ));
        }
        for (i, ((declared, _), arg)) in func.params.iter().zip(&args).enumerate() {
            if arg.type_name() != *declared {
                return Err(Self::type_error(
                    token,
                    format!(
                        "argument #{} type mismatch: expected '{}' by function declaration but called '{}'",
                        i + 1,
                        declared,
                        arg.type_name()
                    ),
                ));
            }
        }

        let call_env = Environment::new_enclosed(&func.env);
        for ((_, name), arg) in func.params.iter().zip(args) {
            call_env.borrow_mut().set(name.clone(), arg);
        }

        let result = self.exec_statements_block(&func.body, &call_env)?;
        Self::check_return_type(token, result, &func.return_type)
    }

    fn call_builtin(
        &mut self,
        token: &Token,
        builtin: &crate::value::BuiltinFunction,
        args: Vec<Value>,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::Builtin(builtin.name.clone()));
        if builtin.arg_types.len() != args.len() {
            return Err(Self::type_error(
                token,
                format!(
                    "wrong number of arguments to '{}': got {}, want {}",
                    builtin.name,
                    args.len(),
                    builtin.arg_types.len()
                ),
            ));
        }
        for (i, (declared, arg)) in builtin.arg_types.iter().zip(&args).enumerate() {
            let matches = match declared.as_str() {
                "any" => true,
                "array" => matches!(arg, Value::Array(_)),
                concrete => arg.type_name() == concrete,
            };
            if !matches {
                return Err(Self::type_error(
                    token,
                    format!(
                        "wrong type of argument #{} to '{}': want {}, got {}",
                        i + 1,
                        builtin.name,
                        declared,
                        arg.type_name()
                    ),
                ));
            }
        }

        let result =
            (builtin.handler)(env, &args).map_err(|msg| Self::semantics_error(token, msg))?;
        Self::check_return_type(token, Some(result), &builtin.return_type)
    }

    /// Declared `void` demands a `Void` result (or none at all); any other
    /// declared type demands a result with exactly that type string.
    fn check_return_type(
        token: &Token,
        result: Option<Value>,
        declared: &str,
    ) -> Result<Value, RuntimeError> {
        match result {
            None => {
                if declared == "void" {
                    Ok(Value::Void)
                } else {
                    Err(Self::type_error(
                        token,
                        format!(
                            "Return type mismatch: function declared to return '{}' but in fact has no return",
                            declared
                        ),
                    ))
                }
            }
            Some(value) => {
                if value.type_name() == declared {
                    Ok(value)
                } else {
                    Err(Self::type_error(
                        token,
                        format!(
                            "Return type mismatch: function declared to return '{}' but in fact return '{}'",
                            declared,
                            value.type_name()
                        ),
                    ))
                }
            }
        }
    }

    fn eval_array_literal(
        &mut self,
        element_type: &str,
        elements: &[Expression],
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::ArrayLiteral);
        let mut values = Vec::with_capacity(elements.len());
        for (i, element) in elements.iter().enumerate() {
            let value = self.eval_expression(element, env)?;
            if value.type_name() != element_type {
                return Err(Self::type_error(
                    element.token(),
                    format!(
                        "array element #{} type mismatch: expected '{}', got '{}'",
                        i + 1,
                        element_type,
                        value.type_name()
                    ),
                ));
            }
            values.push(value);
        }
        Ok(Value::array(element_type, values))
    }

    /// Elements come back by shared handle: mutating a struct observed
    /// through an index is visible through the array.
    fn eval_index(
        &mut self,
        token: &Token,
        left: &Expression,
        index: &Expression,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::Index);
        let left_value = self.eval_expression(left, env)?;
        let index_value = self.eval_expression(index, env)?;

        let left_type = left_value.type_name();
        let Value::Array(array) = left_value else {
            return Err(Self::type_error(
                token,
                format!("Array access can be only on arrays but '{}' given", left_type),
            ));
        };
        let Value::Integer { value: i, .. } = index_value else {
            return Err(Self::type_error(
                index.token(),
                format!(
                    "Array access can be only by 'int' type but '{}' given",
                    index_value.type_name()
                ),
            ));
        };

        let array = array.borrow();
        if i < 0 || i as usize >= array.elements.len() {
            return Err(Self::bounds_error(
                index.token(),
                format!("Array access out of bounds: '{}'", i),
            ));
        }
        Ok(array.elements[i as usize].clone())
    }

    /// Every provided field must be declared with a matching type, and the
    /// literal must cover every declared field.
    fn eval_struct_literal(
        &mut self,
        token: &Token,
        name: &str,
        fields: &[Assignment],
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::StructLiteral);
        let definition = env
            .borrow()
            .get_struct_definition(name)
            .ok_or_else(|| Self::resolve_error(token, format!("Struct '{}' is not defined", name)))?;

        let mut values: HashMap<String, Value> = HashMap::new();
        for field in fields {
            let value = self.eval_expression(&field.value, env)?;
            let Some(declared) = definition.field_type(&field.name) else {
                return Err(Self::resolve_error(
                    &field.token,
                    format!("Struct '{}' doesn't have field '{}'", name, field.name),
                ));
            };
            if value.type_name() != declared {
                return Err(Self::type_error(
                    field.value.token(),
                    format!(
                        "field '{}' of struct '{}' should be '{}' but '{}' given",
                        field.name,
                        name,
                        declared,
                        value.type_name()
                    ),
                ));
            }
            values.insert(field.name.clone(), value);
        }

        if values.len() != definition.fields.len() {
            return Err(Self::type_error(
                token,
                format!(
                    "Var of struct '{}' should have {} fields filled but in fact only {}",
                    name,
                    definition.fields.len(),
                    values.len()
                ),
            ));
        }

        Ok(Value::Struct(Rc::new(RefCell::new(StructValue {
            definition,
            fields: values,
            empty: false,
        }))))
    }

    fn eval_field_access(
        &mut self,
        token: &Token,
        left: &Expression,
        field: &str,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::FieldAccess);
        let left_value = self.eval_expression(left, env)?;
        let left_type = left_value.type_name();
        let Value::Struct(st) = left_value else {
            return Err(Self::type_error(
                token,
                format!("Field access can be only on struct but '{}' given", left_type),
            ));
        };

        let st = st.borrow();
        st.fields.get(field).cloned().ok_or_else(|| {
            Self::resolve_error(
                token,
                format!(
                    "Struct '{}' doesn't have field '{}'",
                    st.definition.name, field
                ),
            )
        })
    }

    /// `Name:MEMBER`: the left side must resolve to an enum; the result
    /// carries the member's source-order ordinal.
    fn eval_enum_access(
        &mut self,
        token: &Token,
        left: &Expression,
        member: &str,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::EnumAccess);
        let left_value = self.eval_expression(left, env)?;
        let left_type = left_value.type_name();
        let Value::Enum { definition, .. } = left_value else {
            return Err(Self::type_error(
                token,
                format!("Enum member access can be only on enum but '{}' given", left_type),
            ));
        };

        let Some(ordinal) = definition.members.iter().position(|m| m == member) else {
            return Err(Self::resolve_error(
                token,
                format!(
                    "Enum '{}' doesn't have member '{}'",
                    definition.name, member
                ),
            ));
        };
        Ok(Value::Enum {
            definition,
            ordinal: ordinal as i8,
        })
    }

    /// `?T` / `?T[]`: a value of the declared type with the empty flag set.
    fn eval_empty_marker(
        &mut self,
        token: &Token,
        type_name: &str,
        is_array: bool,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::EmptyMarker);
        if is_array {
            return Ok(Value::Array(Rc::new(RefCell::new(ArrayValue {
                element_type: type_name.to_string(),
                elements: Vec::new(),
                empty: true,
            }))));
        }
        match type_name {
            "int" => Ok(Value::Integer {
                value: 0,
                empty: true,
            }),
            "float" => Ok(Value::Float {
                value: 0.,
                empty: true,
            }),
            name => {
                let Some(definition) = env.borrow().get_struct_definition(name) else {
                    return Err(Self::semantics_error(
                        token,
                        format!("'?' is not supported on type '{}'", name),
                    ));
                };
                Ok(Value::Struct(Rc::new(RefCell::new(StructValue {
                    definition,
                    fields: HashMap::new(),
                    empty: true,
                }))))
            }
        }
    }
}
