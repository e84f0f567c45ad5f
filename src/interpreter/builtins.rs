// Baseline builtin registry. Arity and argument types are declared here and
// enforced by the call handler, so the bodies see pre-validated values; the
// remaining failure modes return plain messages the caller wraps with the
// call-site position.

use std::collections::HashMap;
use std::rc::Rc;

use crate::environment::Env;
use crate::value::{BuiltinFunction, BuiltinHandler, Value};

pub(super) fn baseline() -> HashMap<String, Rc<BuiltinFunction>> {
    let mut builtins = HashMap::new();
    register(&mut builtins, "print", &["any"], "void", print);
    register(&mut builtins, "empty", &["any"], "bool", empty);
    register(&mut builtins, "length", &["array"], "int", length);
    register(&mut builtins, "absInt", &["int"], "int", abs_int);
    register(&mut builtins, "absFloat", &["float"], "float", abs_float);
    register(&mut builtins, "sqrt", &["float"], "float", sqrt);
    register(
        &mut builtins,
        "distance",
        &["float", "float", "float", "float"],
        "float",
        distance,
    );
    register(
        &mut builtins,
        "angle",
        &["float", "float", "float", "float"],
        "float",
        angle,
    );
    builtins
}

fn register(
    builtins: &mut HashMap<String, Rc<BuiltinFunction>>,
    name: &str,
    arg_types: &[&str],
    return_type: &str,
    handler: BuiltinHandler,
) {
    builtins.insert(
        name.to_string(),
        Rc::new(BuiltinFunction {
            name: name.to_string(),
            arg_types: arg_types.iter().map(|t| t.to_string()).collect(),
            return_type: return_type.to_string(),
            handler,
        }),
    );
}

fn print(_env: &Env, args: &[Value]) -> Result<Value, String> {
    println!("{}", args[0].inspect());
    Ok(Value::Void)
}

fn empty(_env: &Env, args: &[Value]) -> Result<Value, String> {
    args[0]
        .empty_flag()
        .map(Value::Boolean)
        .ok_or_else(|| format!("'empty' is not supported on type '{}'", args[0].type_name()))
}

fn length(_env: &Env, args: &[Value]) -> Result<Value, String> {
    match &args[0] {
        Value::Array(array) => Ok(Value::integer(array.borrow().elements.len() as i64)),
        other => Err(format!(
            "'length' is not supported on type '{}'",
            other.type_name()
        )),
    }
}

fn abs_int(_env: &Env, args: &[Value]) -> Result<Value, String> {
    match args[0] {
        Value::Integer { value, .. } => Ok(Value::integer(value.abs())),
        _ => unreachable!("argument types are checked by the call handler"),
    }
}

fn abs_float(_env: &Env, args: &[Value]) -> Result<Value, String> {
    match args[0] {
        Value::Float { value, .. } => Ok(Value::float(value.abs())),
        _ => unreachable!("argument types are checked by the call handler"),
    }
}

fn sqrt(_env: &Env, args: &[Value]) -> Result<Value, String> {
    match args[0] {
        Value::Float { value, .. } => Ok(Value::float(value.sqrt())),
        _ => unreachable!("argument types are checked by the call handler"),
    }
}

fn float_args(args: &[Value]) -> Vec<f64> {
    args.iter()
        .map(|arg| match arg {
            Value::Float { value, .. } => *value,
            _ => unreachable!("argument types are checked by the call handler"),
        })
        .collect()
}

/// Euclidean distance between `(x1, y1)` and `(x2, y2)`.
fn distance(_env: &Env, args: &[Value]) -> Result<Value, String> {
    let args = float_args(args);
    let (dx, dy) = (args[0] - args[2], args[1] - args[3]);
    Ok(Value::float((dx * dx + dy * dy).sqrt()))
}

/// Angle of the vector from `(x1, y1)` to `(x2, y2)`, measured from the
/// positive x-axis. The zero vector yields `0.`.
fn angle(_env: &Env, args: &[Value]) -> Result<Value, String> {
    let args = float_args(args);
    let (dx, dy) = (args[2] - args[0], args[3] - args[1]);
    let atan = (dy / dx).atan();
    if atan.is_nan() {
        return Ok(Value::float(0.));
    }
    let value = match (dx, dy) {
        (x, _) if x < 0. => std::f64::consts::PI + atan,
        (x, y) if x > 0. && y < 0. => 2. * std::f64::consts::PI + atan,
        _ => atan,
    };
    Ok(Value::float(value))
}
