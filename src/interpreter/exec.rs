use std::rc::Rc;

use super::*;
use crate::ast::{Assignment, Expression, Statement, SwitchCase};
use crate::value::{EnumDefinition, StructDefinition, Value};

impl Interpreter {
    /// Execute statements in order. A `Some` result is a `return` in
    /// transit: it short-circuits the block and propagates upward until the
    /// function-call handler unwraps it.
    pub(super) fn exec_statements_block(
        &mut self,
        block: &StatementsBlock,
        env: &Env,
    ) -> Result<Option<Value>, RuntimeError> {
        for statement in &block.statements {
            if let Some(returned) = self.exec_statement(statement, env)? {
                return Ok(Some(returned));
            }
        }
        Ok(None)
    }

    fn exec_statement(
        &mut self,
        statement: &Statement,
        env: &Env,
    ) -> Result<Option<Value>, RuntimeError> {
        match statement {
            Statement::Assignment(assignment) => {
                self.exec_assignment(assignment, env)?;
                Ok(None)
            }
            Statement::FieldAssignment {
                target, value, ..
            } => {
                self.exec_field_assignment(target, value, env)?;
                Ok(None)
            }
            Statement::Return { value, .. } => {
                self.observe(Operation::Return);
                let value = self.eval_expression(value, env)?;
                Ok(Some(value))
            }
            Statement::If {
                condition,
                consequence,
                alternative,
                ..
            } => self.exec_if(condition, consequence, alternative.as_ref(), env),
            Statement::IfEmpty {
                assignment, body, ..
            } => self.exec_ifempty(assignment, body, env),
            Statement::Switch {
                subject: _,
                cases,
                default,
                ..
            } => self.exec_switch(cases, default.as_ref(), env),
            Statement::StructDefinition {
                token,
                name,
                fields,
            } => {
                self.observe(Operation::StructDefinition);
                let definition = Rc::new(StructDefinition {
                    name: name.clone(),
                    fields: fields.clone(),
                });
                env.borrow_mut()
                    .register_struct_definition(definition)
                    .map_err(|msg| Self::resolve_error(token, msg))?;
                Ok(None)
            }
            Statement::EnumDefinition {
                token,
                name,
                members,
            } => {
                self.observe(Operation::EnumDefinition);
                let definition = Rc::new(EnumDefinition {
                    name: name.clone(),
                    members: members.clone(),
                });
                env.borrow_mut()
                    .register_enum_definition(definition)
                    .map_err(|msg| Self::resolve_error(token, msg))?;
                Ok(None)
            }
            Statement::Call { call, .. } => {
                // Expression statement: the produced value is discarded.
                self.eval_expression(call, env)?;
                Ok(None)
            }
        }
    }

    /// Bind `assignment.name` in the innermost frame. Rebinding demands the
    /// same type string, looked up through the whole scope chain; builtin
    /// names can never be bound. Returns the bound value for `ifempty`.
    pub(super) fn exec_assignment(
        &mut self,
        assignment: &Assignment,
        env: &Env,
    ) -> Result<Value, RuntimeError> {
        self.observe(Operation::Assignment);
        let value = self.eval_expression(&assignment.value, env)?;

        if self.builtins.contains_key(&assignment.name) {
            return Err(Self::semantics_error(
                &assignment.token,
                format!("Builtins are immutable: cannot assign to '{}'", assignment.name),
            ));
        }
        if let Some(existing) = env.borrow().get(&assignment.name) {
            if existing.type_name() != value.type_name() {
                return Err(Self::type_error(
                    assignment.value.token(),
                    format!(
                        "type mismatch on assignment: var type is {} and value type is {}",
                        existing.type_name(),
                        value.type_name()
                    ),
                ));
            }
        }

        env.borrow_mut().set(assignment.name.clone(), value.clone());
        Ok(value)
    }

    /// Replace the terminal field of an existing struct. The host struct is
    /// reached by evaluating the access chain; new fields cannot be created
    /// and the declared field type is enforced.
    fn exec_field_assignment(
        &mut self,
        target: &Expression,
        value: &Expression,
        env: &Env,
    ) -> Result<(), RuntimeError> {
        self.observe(Operation::FieldAssignment);
        let new_value = self.eval_expression(value, env)?;

        let Expression::FieldAccess { token, left, field } = target else {
            // The parser only builds field-access chains here.
            return Err(Self::type_error(
                target.token(),
                "field assignment target must be a struct field",
            ));
        };

        let host = self.eval_expression(left, env)?;
        let host_type = host.type_name();
        let Value::Struct(cell) = host else {
            return Err(Self::type_error(
                token,
                format!("Field access can be only on struct but '{}' given", host_type),
            ));
        };

        let mut host = cell.borrow_mut();
        if !host.fields.contains_key(field) {
            return Err(Self::resolve_error(
                token,
                format!(
                    "Struct '{}' doesn't have field '{}'",
                    host.definition.name, field
                ),
            ));
        }
        let declared = host
            .definition
            .field_type(field)
            .unwrap_or_default()
            .to_string();
        if new_value.type_name() != declared {
            return Err(Self::type_error(
                value.token(),
                format!(
                    "field '{}' of struct '{}' is {} and value type is {}",
                    field,
                    host.definition.name,
                    declared,
                    new_value.type_name()
                ),
            ));
        }
        host.fields.insert(field.clone(), new_value);
        Ok(())
    }

    fn exec_if(
        &mut self,
        condition: &Expression,
        consequence: &StatementsBlock,
        alternative: Option<&StatementsBlock>,
        env: &Env,
    ) -> Result<Option<Value>, RuntimeError> {
        self.observe(Operation::If);
        let value = self.eval_expression(condition, env)?;
        let Value::Boolean(truthy) = value else {
            return Err(Self::type_error(
                condition.token(),
                format!(
                    "Condition should be 'bool' type but '{}' in fact",
                    value.type_name()
                ),
            ));
        };

        if truthy {
            self.exec_statements_block(consequence, env)
        } else if let Some(alternative) = alternative {
            self.exec_statements_block(alternative, env)
        } else {
            Ok(None)
        }
    }

    /// Run the inner assignment, then enter the block when the bound value
    /// carries the empty flag. The binding persists either way.
    fn exec_ifempty(
        &mut self,
        assignment: &Assignment,
        body: &StatementsBlock,
        env: &Env,
    ) -> Result<Option<Value>, RuntimeError> {
        self.observe(Operation::IfEmpty);
        let bound = self.exec_assignment(assignment, env)?;
        match bound.empty_flag() {
            Some(true) => self.exec_statements_block(body, env),
            Some(false) => Ok(None),
            None => Err(Self::semantics_error(
                assignment.value.token(),
                format!(
                    "'ifempty' is not supported on type '{}'",
                    bound.type_name()
                ),
            )),
        }
    }

    /// First case whose condition is true wins; its block's return value
    /// propagates. Without a match the default block runs, if present.
    fn exec_switch(
        &mut self,
        cases: &[SwitchCase],
        default: Option<&StatementsBlock>,
        env: &Env,
    ) -> Result<Option<Value>, RuntimeError> {
        self.observe(Operation::Switch);
        for case in cases {
            let condition = self.eval_expression(&case.condition, env)?;
            let Value::Boolean(truthy) = condition else {
                return Err(Self::type_error(
                    case.condition.token(),
                    format!(
                        "Result of case condition should be 'bool' but '{}' given",
                        condition.type_name()
                    ),
                ));
            };
            if truthy {
                return self.exec_statements_block(&case.body, env);
            }
        }
        if let Some(default) = default {
            return self.exec_statements_block(default, env);
        }
        Ok(None)
    }
}
