/// Spec tests for the Rove evaluator.
///
/// Programs run through the full lexer → parser → interpreter pipeline
/// against a fresh environment; tests then inspect the final bindings.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rove::ast::StatementsBlock;
use rove::environment::{Env, Environment};
use rove::interpreter::{Interpreter, Operation};
use rove::lexer::Lexer;
use rove::parser::Parser;
use rove::value::{BuiltinFunction, RuntimeError, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse(src: &str) -> StatementsBlock {
    let mut parser = Parser::new(Lexer::new(src)).expect("lex failed");
    parser.parse().expect("parse failed")
}

fn run(src: &str) -> Env {
    let program = parse(src);
    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    interpreter.exec_ast(&program, &env).expect("exec failed");
    env
}

fn run_err(src: &str) -> RuntimeError {
    let program = parse(src);
    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    match interpreter.exec_ast(&program, &env) {
        Ok(()) => panic!("expected a runtime error"),
        Err(e) => e,
    }
}

fn get(env: &Env, name: &str) -> Value {
    env.borrow()
        .get(name)
        .unwrap_or_else(|| panic!("variable '{}' not found", name))
}

fn get_float(env: &Env, name: &str) -> f64 {
    match get(env, name) {
        Value::Float { value, .. } => value,
        other => panic!("expected '{}' to be a float, got: {:?}", name, other),
    }
}

const POINT: &str = "struct point {\n float x\n float y\n}\n";
const COLOR: &str = "enum color {\n RED\n GREEN\n BLUE\n}\n";

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[test]
fn parenthesised_arithmetic() {
    let env = run("a = (1 + 2) * 3\n");
    assert_eq!(get(&env, "a"), Value::integer(9));
}

#[test]
fn product_before_sum() {
    let env = run("a = 2 + 3 * 4\n");
    assert_eq!(get(&env, "a"), Value::integer(14));
}

#[test]
fn integer_division_truncates_toward_zero() {
    let env = run("a = 7 / 2\nb = -7 / 2\n");
    assert_eq!(get(&env, "a"), Value::integer(3));
    assert_eq!(get(&env, "b"), Value::integer(-3));
}

#[test]
fn integer_division_by_zero_is_an_error() {
    let err = run_err("a = 1 / 0\n");
    assert!(matches!(err, RuntimeError::Semantics { .. }), "got: {:?}", err);
}

#[test]
fn float_arithmetic() {
    let env = run("a = 1.5 + 2.25\nb = 10. / 4.\n");
    assert_eq!(get(&env, "a"), Value::float(3.75));
    assert_eq!(get(&env, "b"), Value::float(2.5));
}

#[test]
fn float_division_by_zero_follows_ieee() {
    let env = run("a = 1. / 0.\n");
    match get(&env, "a") {
        Value::Float { value, .. } => assert!(value.is_infinite()),
        other => panic!("expected a float, got: {:?}", other),
    }
}

#[test]
fn float_literal_with_trailing_dot() {
    let env = run("a = 5.\n");
    assert_eq!(get(&env, "a"), Value::float(5.0));
}

#[test]
fn mixed_operand_types_are_an_error() {
    let err = run_err("a = 1 + 2.5\n");
    assert!(err.to_string().contains("forbidden operation on different types"));
}

#[test]
fn unary_minus() {
    let env = run("a = -5\nb = -a\nc = -1.5\n");
    assert_eq!(get(&env, "a"), Value::integer(-5));
    assert_eq!(get(&env, "b"), Value::integer(5));
    assert_eq!(get(&env, "c"), Value::float(-1.5));
}

#[test]
fn unary_minus_on_bool_is_an_error() {
    let err = run_err("a = -true\n");
    assert!(err.to_string().contains("unknown operator: -bool"));
}

// ---------------------------------------------------------------------------
// Booleans and comparisons
// ---------------------------------------------------------------------------

#[test]
fn comparisons() {
    let env = run("a = 1 < 2\nb = 1 > 2\nc = 2 == 2\nd = 2 != 2\n");
    assert_eq!(get(&env, "a"), Value::Boolean(true));
    assert_eq!(get(&env, "b"), Value::Boolean(false));
    assert_eq!(get(&env, "c"), Value::Boolean(true));
    assert_eq!(get(&env, "d"), Value::Boolean(false));
}

#[test]
fn logical_operators() {
    let env = run("a = true && false\nb = true || false\nc = !false\n");
    assert_eq!(get(&env, "a"), Value::Boolean(false));
    assert_eq!(get(&env, "b"), Value::Boolean(true));
    assert_eq!(get(&env, "c"), Value::Boolean(true));
}

#[test]
fn logical_operators_do_not_short_circuit() {
    // With short-circuit evaluation the right side would never be seen;
    // here it is evaluated and the type gate rejects the pair.
    let err = run_err("a = true || 5\n");
    assert!(err.to_string().contains("forbidden operation on different types"));
    let err = run_err("a = false && 5\n");
    assert!(err.to_string().contains("forbidden operation on different types"));
}

#[test]
fn not_on_int_is_an_error() {
    let err = run_err("a = !1\n");
    assert!(err.to_string().contains("unknown operator: !int"));
}

#[test]
fn bool_arithmetic_is_an_error() {
    let err = run_err("a = true + false\n");
    assert!(err.to_string().contains("unknown operator: bool + bool"));
}

// ---------------------------------------------------------------------------
// Assignment rules
// ---------------------------------------------------------------------------

#[test]
fn reassignment_with_same_type() {
    let env = run("a = 1\na = 2\n");
    assert_eq!(get(&env, "a"), Value::integer(2));
}

#[test]
fn reassignment_with_different_type_is_an_error() {
    let err = run_err("a = 1\na = 2.0\n");
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("type mismatch on assignment"));
}

#[test]
fn type_rule_reaches_through_enclosing_scopes() {
    let src = "a = 1\nf = fn() void {\n a = 2.5\n}\nf()\n";
    let err = run_err(src);
    assert!(err.to_string().contains("type mismatch on assignment"));
}

#[test]
fn assignment_to_builtin_is_an_error() {
    let err = run_err("print = 10\n");
    assert!(matches!(err, RuntimeError::Semantics { .. }), "got: {:?}", err);
    assert!(err.to_string().contains("Builtins are immutable"));
}

#[test]
fn identifier_not_found() {
    let err = run_err("a = b\n");
    assert!(matches!(err, RuntimeError::Resolve { .. }));
    assert!(err.to_string().contains("identifier not found: b"));
}

#[test]
fn errors_carry_line_and_pos() {
    let err = run_err("a = 1\nb = c\n");
    assert!(err.to_string().contains("line:2"), "got: {}", err);
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

#[test]
fn function_call_with_two_args() {
    let src = "a = fn(int x, int y) int {\n return x + y\n}\nc = a(2, 5)\n";
    let env = run(src);
    assert_eq!(get(&env, "c"), Value::integer(7));
}

#[test]
fn function_captures_defining_environment() {
    let src = "x = 10\nf = fn() int {\n return x\n}\ny = f()\n";
    let env = run(src);
    assert_eq!(get(&env, "y"), Value::integer(10));
}

#[test]
fn lexical_scope_not_call_site_scope() {
    // g's frame binds its own x; f still reads the root binding.
    let src = "x = 1\nf = fn() int {\n return x\n}\ng = fn() int {\n x = 99\n return f()\n}\nz = g()\n";
    let env = run(src);
    assert_eq!(get(&env, "z"), Value::integer(1));
    assert_eq!(get(&env, "x"), Value::integer(1));
}

#[test]
fn call_frame_bindings_do_not_leak() {
    let src = "f = fn() void {\n local = 1\n}\nf()\n";
    let env = run(src);
    assert!(env.borrow().get("local").is_none());
    assert_eq!(env.borrow().keys(), vec!["f".to_string()]);
}

#[test]
fn return_propagates_through_if() {
    let src = "f = fn(int n) int {\n if n > 10 {\n  return 1\n }\n return 0\n}\na = f(11)\nb = f(5)\n";
    let env = run(src);
    assert_eq!(get(&env, "a"), Value::integer(1));
    assert_eq!(get(&env, "b"), Value::integer(0));
}

#[test]
fn return_propagates_through_switch() {
    let src = "f = fn(int n) int {\n switch {\n case n > 5:\n  return 1\n default:\n  return 2\n }\n}\na = f(6)\nb = f(1)\n";
    let env = run(src);
    assert_eq!(get(&env, "a"), Value::integer(1));
    assert_eq!(get(&env, "b"), Value::integer(2));
}

#[test]
fn void_function_with_empty_body() {
    let src = "f = fn() void {\n}\nf()\n";
    run(src);
}

#[test]
fn declared_int_without_return_is_an_error() {
    let src = "f = fn() int {\n}\na = f()\n";
    let err = run_err(src);
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("Return type mismatch"));
}

#[test]
fn void_function_returning_value_is_an_error() {
    let src = "f = fn() void {\n return 5\n}\nf()\n";
    let err = run_err(src);
    assert!(err.to_string().contains("Return type mismatch"));
}

#[test]
fn wrong_return_type_is_an_error() {
    let src = "f = fn() int {\n return 1.5\n}\na = f()\n";
    let err = run_err(src);
    assert!(err.to_string().contains("Return type mismatch"));
}

#[test]
fn argument_count_mismatch_is_an_error() {
    let src = "f = fn(int x) int {\n return x\n}\na = f(1, 2)\n";
    let err = run_err(src);
    assert!(err.to_string().contains("arguments count mismatch"));
}

#[test]
fn argument_type_mismatch_is_an_error() {
    let src = "f = fn(int x) int {\n return x\n}\na = f(1.5)\n";
    let err = run_err(src);
    assert!(err.to_string().contains("argument #1 type mismatch"));
}

#[test]
fn calling_a_non_function_is_an_error() {
    let err = run_err("a = 5\nb = a(1)\n");
    assert!(err.to_string().contains("not a function: int"));
}

#[test]
fn function_with_struct_argument_and_return() {
    let src = concat!(
        "struct point {\n float x\n float y\n}\n",
        "scale = fn(point p) point {\n return point{x = p.x * 2., y = p.y * 2.}\n}\n",
        "q = scale(point{x = 1.5, y = 2.5})\n",
        "qx = q.x\n",
    );
    let env = run(src);
    assert_eq!(get_float(&env, "qx"), 3.0);
}

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

#[test]
fn struct_literal_field_access_and_mutation() {
    let src = concat!(
        "struct point {\n float x\n float y\n}\n",
        "p = point{x = 1., y = 2.}\n",
        "px = p.x\n",
        "p.y = 3.\n",
        "py = p.y\n",
    );
    let env = run(src);
    assert_eq!(get_float(&env, "px"), 1.0);
    assert_eq!(get_float(&env, "py"), 3.0);
}

#[test]
fn struct_rebinding_aliases_the_value() {
    let src = concat!(
        "struct point {\n float x\n float y\n}\n",
        "p = point{x = 1., y = 2.}\n",
        "q = p\n",
        "p.x = 5.\n",
        "qx = q.x\n",
    );
    let env = run(src);
    assert_eq!(get_float(&env, "qx"), 5.0);
}

#[test]
fn nested_struct_field_assignment() {
    let src = concat!(
        "struct point {\n float x\n float y\n}\n",
        "struct line {\n point a\n point b\n}\n",
        "l = line{a = point{x = 1., y = 1.}, b = point{x = 2., y = 2.}}\n",
        "l.a.x = 9.\n",
        "ax = l.a.x\n",
    );
    let env = run(src);
    assert_eq!(get_float(&env, "ax"), 9.0);
}

#[test]
fn struct_literal_with_missing_field_is_an_error() {
    let err = run_err(&format!("{}p = point{{x = 1.}}\n", POINT));
    assert!(err.to_string().contains("should have 2 fields filled but in fact only 1"));
}

#[test]
fn struct_literal_with_unknown_field_is_an_error() {
    let err = run_err(&format!("{}p = point{{x = 1., z = 2.}}\n", POINT));
    assert!(err.to_string().contains("doesn't have field 'z'"));
}

#[test]
fn struct_literal_with_wrong_field_type_is_an_error() {
    let err = run_err(&format!("{}p = point{{x = 1, y = 2.}}\n", POINT));
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("field 'x'"));
}

#[test]
fn undefined_struct_literal_is_an_error() {
    let err = run_err("p = point{x = 1.}\n");
    assert!(matches!(err, RuntimeError::Resolve { .. }));
    assert!(err.to_string().contains("Struct 'point' is not defined"));
}

#[test]
fn duplicate_struct_definition_is_an_error() {
    let err = run_err(&format!("{}{}", POINT, POINT));
    assert!(err.to_string().contains("already defined"));
}

#[test]
fn field_access_on_non_struct_is_an_error() {
    let err = run_err("a = 5\nb = a.x\n");
    assert!(err.to_string().contains("Field access can be only on struct"));
}

#[test]
fn unknown_field_access_is_an_error() {
    let err = run_err(&format!("{}p = point{{x = 1., y = 2.}}\nb = p.z\n", POINT));
    assert!(err.to_string().contains("doesn't have field 'z'"));
}

#[test]
fn field_assignment_with_wrong_type_is_an_error() {
    let err = run_err(&format!("{}p = point{{x = 1., y = 2.}}\np.x = 5\n", POINT));
    assert!(matches!(err, RuntimeError::Type { .. }));
}

#[test]
fn field_assignment_to_unknown_field_is_an_error() {
    let err = run_err(&format!("{}p = point{{x = 1., y = 2.}}\np.z = 5.\n", POINT));
    assert!(err.to_string().contains("doesn't have field 'z'"));
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn array_literal_and_index() {
    let env = run("a = int[]{1, 2, 3}\nb = a[1]\n");
    assert_eq!(get(&env, "b"), Value::integer(2));
}

#[test]
fn canonical_array_spelling() {
    let env = run("a = []int{1, 2, 3}\nn = length(a)\n");
    assert_eq!(get(&env, "n"), Value::integer(3));
}

#[test]
fn array_type_string_carries_element_type() {
    let env = run("a = []int{1}\n");
    assert_eq!(get(&env, "a").type_name(), "[]int");
}

#[test]
fn heterogeneous_array_literal_is_an_error() {
    let err = run_err("a = int[]{1, 2.1, 3}\n");
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("element #2"), "got: {}", err);
}

#[test]
fn index_bounds() {
    let env = run("a = []int{1, 2, 3}\nb = a[2]\n");
    assert_eq!(get(&env, "b"), Value::integer(3));

    let err = run_err("a = []int{1, 2, 3}\nb = a[3]\n");
    assert!(matches!(err, RuntimeError::Bounds { .. }), "got: {:?}", err);
    assert!(err.to_string().contains("out of bounds: '3'"));

    let err = run_err("a = []int{1, 2, 3}\nb = a[-1]\n");
    assert!(matches!(err, RuntimeError::Bounds { .. }), "got: {:?}", err);
}

#[test]
fn index_on_non_array_is_an_error() {
    let err = run_err("a = 5\nb = a[0]\n");
    assert!(err.to_string().contains("can be only on arrays"));
}

#[test]
fn index_by_non_int_is_an_error() {
    let err = run_err("a = []int{1}\nb = a[0.5]\n");
    assert!(err.to_string().contains("can be only by 'int' type"));
}

#[test]
fn struct_element_mutation_is_visible_through_the_array() {
    let src = concat!(
        "struct point {\n float x\n float y\n}\n",
        "p = point{x = 1., y = 2.}\n",
        "arr = []point{p}\n",
        "e = arr[0]\n",
        "p.x = 9.\n",
        "ex = e.x\n",
    );
    let env = run(src);
    assert_eq!(get_float(&env, "ex"), 9.0);
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[test]
fn enum_member_ordinals_follow_source_order() {
    let env = run(&format!("{}c = color:GREEN\n", COLOR));
    match get(&env, "c") {
        Value::Enum { definition, ordinal } => {
            assert_eq!(definition.name, "color");
            assert_eq!(ordinal, 1);
        }
        other => panic!("expected an enum value, got: {:?}", other),
    }
}

#[test]
fn enum_equality_and_inequality() {
    let src = format!(
        "{}c = color:GREEN\neq = c == color:GREEN\nneq = c != color:RED\nsame = c != color:GREEN\n",
        COLOR
    );
    let env = run(&src);
    assert_eq!(get(&env, "eq"), Value::Boolean(true));
    assert_eq!(get(&env, "neq"), Value::Boolean(true));
    assert_eq!(get(&env, "same"), Value::Boolean(false));
}

#[test]
fn enums_of_different_definitions_do_not_compare() {
    let src = "enum one {\n A\n}\nenum two {\n B\n}\nc = one:A == two:B\n";
    let err = run_err(src);
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("forbidden operation on different types"));
}

#[test]
fn enum_ordering_is_an_error() {
    let err = run_err(&format!("{}c = color:RED < color:GREEN\n", COLOR));
    assert!(err.to_string().contains("unknown operator"));
}

#[test]
fn unknown_enum_member_is_an_error() {
    let err = run_err(&format!("{}c = color:MAGENTA\n", COLOR));
    assert!(matches!(err, RuntimeError::Resolve { .. }));
    assert!(err.to_string().contains("doesn't have member 'MAGENTA'"));
}

#[test]
fn duplicate_enum_definition_is_an_error() {
    let err = run_err(&format!("{}{}", COLOR, COLOR));
    assert!(err.to_string().contains("already defined"));
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

#[test]
fn if_takes_the_positive_branch() {
    let env = run("if 4 > 3 {\n a = 10\n} else {\n b = 20\n}\n");
    assert_eq!(get(&env, "a"), Value::integer(10));
    assert!(env.borrow().get("b").is_none());
}

#[test]
fn if_skips_without_else() {
    let env = run("if 4 == 3 {\n a = 10\n}\n");
    assert!(env.borrow().get("a").is_none());
}

#[test]
fn if_condition_must_be_bool() {
    let err = run_err("if 5 {\n a = 1\n}\n");
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("Condition should be 'bool'"));
}

#[test]
fn switch_falls_to_default() {
    let src = "a = 10\nswitch {\ncase a > 20:\n r = 1\ncase a > 10:\n r = 2\ndefault:\n r = 5\n}\n";
    let env = run(src);
    assert_eq!(get(&env, "r"), Value::integer(5));
}

#[test]
fn switch_first_true_case_wins() {
    let src = "a = 30\nswitch {\ncase a > 20:\n r = 1\ncase a > 10:\n r = 2\n}\n";
    let env = run(src);
    assert_eq!(get(&env, "r"), Value::integer(1));
}

#[test]
fn switch_subject_bound_form() {
    let src = "a = 10\nswitch a {\ncase > 20:\n r = 1\ncase == 10:\n r = 2\ndefault:\n r = 5\n}\n";
    let env = run(src);
    assert_eq!(get(&env, "r"), Value::integer(2));
}

#[test]
fn switch_without_match_or_default_binds_nothing() {
    let env = run("a = 1\nswitch {\ncase a > 5:\n r = 1\n}\n");
    assert!(env.borrow().get("r").is_none());
}

#[test]
fn switch_case_condition_must_be_bool() {
    let err = run_err("switch {\ncase 5:\n r = 1\n}\n");
    assert!(err.to_string().contains("case condition should be 'bool'"));
}

// ---------------------------------------------------------------------------
// Empty markers and ifempty
// ---------------------------------------------------------------------------

#[test]
fn ifempty_enters_block_and_binding_persists() {
    let env = run("ifempty a = ?int {\n b = 5\n}\n");
    match get(&env, "a") {
        Value::Integer { value, empty } => {
            assert_eq!(value, 0);
            assert!(empty);
        }
        other => panic!("expected an int, got: {:?}", other),
    }
    assert_eq!(get(&env, "b"), Value::integer(5));
}

#[test]
fn ifempty_skips_block_for_nonempty_value() {
    let env = run("ifempty a = 5 {\n b = 1\n}\n");
    assert_eq!(get(&env, "a"), Value::integer(5));
    assert!(env.borrow().get("b").is_none());
}

#[test]
fn ifempty_on_bool_is_an_error() {
    let err = run_err("ifempty a = true {\n b = 1\n}\n");
    assert!(matches!(err, RuntimeError::Semantics { .. }), "got: {:?}", err);
}

#[test]
fn empty_marker_float() {
    let env = run("a = ?float\n");
    match get(&env, "a") {
        Value::Float { value, empty } => {
            assert_eq!(value, 0.0);
            assert!(empty);
        }
        other => panic!("expected a float, got: {:?}", other),
    }
}

#[test]
fn empty_marker_struct() {
    let env = run(&format!("{}a = ?point\nb = empty(a)\n", POINT));
    assert_eq!(get(&env, "b"), Value::Boolean(true));
    match get(&env, "a") {
        Value::Struct(st) => assert!(st.borrow().fields.is_empty()),
        other => panic!("expected a struct, got: {:?}", other),
    }
}

#[test]
fn empty_marker_array() {
    let env = run("a = ?int[]\nn = length(a)\ne = empty(a)\n");
    assert_eq!(get(&env, "a").type_name(), "[]int");
    assert_eq!(get(&env, "n"), Value::integer(0));
    assert_eq!(get(&env, "e"), Value::Boolean(true));
}

#[test]
fn empty_marker_on_unsupported_type_is_an_error() {
    let err = run_err("a = ?bool\n");
    assert!(matches!(err, RuntimeError::Semantics { .. }), "got: {:?}", err);
}

#[test]
fn empty_flag_does_not_survive_arithmetic() {
    let env = run("a = ?int\nb = a + 1\nc = empty(b)\n");
    assert_eq!(get(&env, "c"), Value::Boolean(false));
}

// ---------------------------------------------------------------------------
// Builtins
// ---------------------------------------------------------------------------

#[test]
fn builtin_empty_on_scalars() {
    let env = run("a = empty(5)\nb = empty(?int)\n");
    assert_eq!(get(&env, "a"), Value::Boolean(false));
    assert_eq!(get(&env, "b"), Value::Boolean(true));
}

#[test]
fn builtin_empty_on_bool_is_an_error() {
    let err = run_err("a = empty(true)\n");
    assert!(matches!(err, RuntimeError::Semantics { .. }), "got: {:?}", err);
}

#[test]
fn builtin_length() {
    let env = run("n = length([]float{1., 2.})\n");
    assert_eq!(get(&env, "n"), Value::integer(2));
}

#[test]
fn builtin_length_requires_an_array() {
    let err = run_err("n = length(5)\n");
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("want array"));
}

#[test]
fn builtin_abs() {
    let env = run("a = absInt(-5)\nb = absFloat(-2.5)\n");
    assert_eq!(get(&env, "a"), Value::integer(5));
    assert_eq!(get(&env, "b"), Value::float(2.5));
}

#[test]
fn builtin_sqrt() {
    let env = run("a = sqrt(9.)\n");
    assert_eq!(get(&env, "a"), Value::float(3.0));
}

#[test]
fn builtin_distance() {
    let env = run("d = distance(0., 0., 3., 4.)\n");
    assert_eq!(get(&env, "d"), Value::float(5.0));
}

#[test]
fn builtin_angle() {
    let env = run("a = angle(0., 0., 1., 1.)\n");
    let value = get_float(&env, "a");
    assert!((value - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
}

#[test]
fn builtin_angle_of_zero_vector() {
    let env = run("a = angle(1., 1., 1., 1.)\n");
    assert_eq!(get_float(&env, "a"), 0.0);
}

#[test]
fn builtin_arity_is_checked() {
    let err = run_err("print(1, 2)\n");
    assert!(matches!(err, RuntimeError::Type { .. }));
    assert!(err.to_string().contains("wrong number of arguments"));
}

#[test]
fn builtin_argument_types_are_checked() {
    let err = run_err("a = absInt(1.5)\n");
    assert!(err.to_string().contains("want int, got float"));
}

#[test]
fn host_builtins_merge_into_the_registry() {
    fn double(_env: &Env, args: &[Value]) -> Result<Value, String> {
        match args[0] {
            Value::Integer { value, .. } => Ok(Value::integer(value * 2)),
            _ => unreachable!("argument types are checked by the call handler"),
        }
    }

    let mut extra = HashMap::new();
    extra.insert(
        "double".to_string(),
        Rc::new(BuiltinFunction {
            name: "double".to_string(),
            arg_types: vec!["int".to_string()],
            return_type: "int".to_string(),
            handler: double,
        }),
    );

    let program = parse("a = double(21)\n");
    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    interpreter.add_builtins(extra);
    interpreter.exec_ast(&program, &env).expect("exec failed");
    assert_eq!(get(&env, "a"), Value::integer(42));

    // Host builtins are as immutable as the baseline ones.
    let program = parse("double = 1\n");
    assert!(interpreter.exec_ast(&program, &env).is_err());
}

// ---------------------------------------------------------------------------
// Observation hook
// ---------------------------------------------------------------------------

#[test]
fn op_callback_sees_operation_categories() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);

    let program = parse("a = 1 + 2\nb = absInt(a)\n");
    let env = Environment::new();
    let mut interpreter = Interpreter::new();
    interpreter.set_op_callback(Box::new(move |op| sink.borrow_mut().push(op.clone())));
    interpreter.exec_ast(&program, &env).expect("exec failed");

    let seen = seen.borrow();
    assert!(seen.contains(&Operation::Assignment));
    assert!(seen.contains(&Operation::Binary));
    assert!(seen.contains(&Operation::FunctionCall));
    assert!(seen.contains(&Operation::Builtin("absInt".to_string())));
    assert_eq!(
        seen.iter().filter(|op| **op == Operation::Assignment).count(),
        2
    );
}

// ---------------------------------------------------------------------------
// Environment diagnostics
// ---------------------------------------------------------------------------

#[test]
fn env_to_strings_is_sorted() {
    let env = run("b = 2.5\na = 1\n");
    assert_eq!(
        env.borrow().to_strings(),
        vec!["a: 1".to_string(), "b: 2.5".to_string()]
    );
}

#[test]
fn env_json_export() {
    let env = run("a = 1\n");
    assert_eq!(env.borrow().to_json(), r#"{"a":"1"}"#);
}

#[test]
fn json_export_is_deterministic_across_runs() {
    let src = format!(
        "{}p = point{{x = 1., y = 2.}}\nns = []int{{1, 2}}\nflag = true\n",
        POINT
    );
    assert_eq!(run(&src).borrow().to_json(), run(&src).borrow().to_json());
}

#[test]
fn inspect_formats() {
    let env = run(&format!(
        "{}{}p = point{{x = 1.5, y = 2.}}\narr = []int{{1, 2}}\nc = color:RED\n",
        POINT, COLOR
    ));
    assert_eq!(get(&env, "p").inspect(), "point{x: 1.5, y: 2}");
    assert_eq!(get(&env, "arr").inspect(), "[]int{1, 2}");
    assert_eq!(get(&env, "c").inspect(), "color:RED");
}
