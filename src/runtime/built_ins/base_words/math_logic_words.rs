use crate::{
    add_primitive,
    runtime::{
        data_structures::value::{ToValue, Value},
        error::{self, ErrorKind, script_error},
        interpreter::{Interpreter, Returned, arguments},
    },
};
use std::cmp::Ordering;

/// Raise a type error for operands that aren't numbers.
fn not_numeric<T>(interpreter: &dyn Interpreter, a: &Value, b: &Value) -> error::Result<T> {
    let found = if a.is_numeric() { b } else { a };

    script_error(
        interpreter,
        ErrorKind::TypeMismatch {
            expected: "number",
            found: found.describe(),
        },
    )
}

/// Raise the error for an integer result that doesn't fit.
fn overflow<T>(interpreter: &dyn Interpreter, a: &Value, b: &Value) -> error::Result<T> {
    script_error(
        interpreter,
        ErrorKind::Message(format!("Integer overflow in {} and {}.", a, b)),
    )
}

/// Helper function to handle math operations.  Handlers for int or floating point operations are
/// passed in as arguments, the int handler returns None on overflow.  Value conversions are
/// handled here.
fn math_op(
    interpreter: &mut dyn Interpreter,
    values: Vec<Value>,
    fop: fn(f64, f64) -> f64,
    iop: fn(i64, i64) -> Option<i64>,
) -> error::Result<Returned> {
    let [a, b] = arguments::<2>(interpreter, values)?;

    if !Value::both_are_numeric(&a, &b) {
        return not_numeric(interpreter, &a, &b);
    }

    if Value::either_is_float(&a, &b) {
        Ok(fop(a.get_float_val(), b.get_float_val()).to_value().into())
    } else {
        match iop(a.get_int_val(), b.get_int_val()) {
            Some(result) => Ok(result.to_value().into()),
            None => overflow(interpreter, &a, &b),
        }
    }
}

/// Helper function to handle comparisons.  Numbers compare with numbers and strings with strings,
/// anything else is a type error.
fn compare_op(
    interpreter: &mut dyn Interpreter,
    values: Vec<Value>,
    test: fn(Ordering) -> bool,
) -> error::Result<Returned> {
    let [a, b] = arguments::<2>(interpreter, values)?;

    match a.partial_cmp(&b) {
        Some(ordering) => Ok(test(ordering).to_value().into()),

        // NaN doesn't order against anything.
        None if Value::both_are_numeric(&a, &b) => Ok(false.to_value().into()),

        None => script_error(
            interpreter,
            ErrorKind::TypeMismatch {
                expected: "two numbers or two strings",
                found: format!("{} and {}", a.describe(), b.describe()),
            },
        ),
    }
}

/// Helper function to handle logic operations on the truthiness of two values.
fn logic_op(
    interpreter: &mut dyn Interpreter,
    values: Vec<Value>,
    bop: fn(bool, bool) -> bool,
) -> error::Result<Returned> {
    let [a, b] = arguments::<2>(interpreter, values)?;

    Ok(bop(a.get_bool_val(), b.get_bool_val()).to_value().into())
}

/// Add 2 numbers, or join 2 values as strings if either one is a string.
///
/// Signature: `a b -- result`
fn word_add(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    if values.iter().any(|value| value.is_string()) {
        let [a, b] = arguments::<2>(interpreter, values)?;

        return Ok((a.get_string_val() + &b.get_string_val()).to_value().into());
    }

    math_op(interpreter, values, |a, b| a + b, |a, b| a.checked_add(b))
}

/// Signature: `a b -- result`
fn word_subtract(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    math_op(interpreter, values, |a, b| a - b, |a, b| a.checked_sub(b))
}

/// Signature: `a b -- result`
fn word_multiply(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    math_op(interpreter, values, |a, b| a * b, |a, b| a.checked_mul(b))
}

/// Divide a by b.  Dividing two integers gives an integer when the division is exact and a float
/// otherwise.  Integer division by zero is an error, float division follows IEEE.
///
/// Signature: `a b -- result`
fn word_divide(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [a, b] = arguments::<2>(interpreter, values)?;

    if !Value::both_are_numeric(&a, &b) {
        return not_numeric(interpreter, &a, &b);
    }

    if Value::either_is_float(&a, &b) {
        return Ok((a.get_float_val() / b.get_float_val()).to_value().into());
    }

    let (x, y) = (a.get_int_val(), b.get_int_val());

    if y == 0 {
        return script_error(interpreter, ErrorKind::DivisionByZero);
    }

    match (x.checked_rem(y), x.checked_div(y)) {
        (Some(0), Some(quotient)) => Ok(quotient.to_value().into()),
        (Some(_), Some(_)) => Ok((x as f64 / y as f64).to_value().into()),
        _ => overflow(interpreter, &a, &b),
    }
}

/// Remainder of a divided by b.
///
/// Signature: `a b -- remainder`
fn word_mod(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    if let [a, b] = values.as_slice()
        && !Value::either_is_float(a, b)
        && Value::both_are_numeric(a, b)
        && b.get_int_val() == 0
    {
        return script_error(interpreter, ErrorKind::DivisionByZero);
    }

    math_op(interpreter, values, |a, b| a % b, |a, b| a.checked_rem(b))
}

/// Signature: `a b -- bool`
fn word_equal(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [a, b] = arguments::<2>(interpreter, values)?;

    Ok((a == b).to_value().into())
}

/// Signature: `a b -- bool`
fn word_less(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    compare_op(interpreter, values, |ordering| ordering == Ordering::Less)
}

/// Signature: `a b -- bool`
fn word_greater(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    compare_op(interpreter, values, |ordering| ordering == Ordering::Greater)
}

/// Signature: `a b -- bool`
fn word_less_equal(
    interpreter: &mut dyn Interpreter,
    values: Vec<Value>,
) -> error::Result<Returned> {
    compare_op(interpreter, values, |ordering| ordering != Ordering::Greater)
}

/// Signature: `a b -- bool`
fn word_greater_equal(
    interpreter: &mut dyn Interpreter,
    values: Vec<Value>,
) -> error::Result<Returned> {
    compare_op(interpreter, values, |ordering| ordering != Ordering::Less)
}

/// Signature: `value -- bool`
fn word_not(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [value] = arguments::<1>(interpreter, values)?;

    Ok((!value.get_bool_val()).to_value().into())
}

fn word_and(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    logic_op(interpreter, values, |a, b| a && b)
}

fn word_or(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    logic_op(interpreter, values, |a, b| a || b)
}

fn word_xor(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    logic_op(interpreter, values, |a, b| a != b)
}

pub fn register_math_logic_words(interpreter: &mut dyn Interpreter) {
    add_primitive!(
        interpreter,
        "+",
        2,
        word_add,
        "Add two numbers or join two strings.",
        "a b -- result"
    );

    add_primitive!(
        interpreter,
        "-",
        2,
        word_subtract,
        "Subtract b from a.",
        "a b -- result"
    );

    add_primitive!(
        interpreter,
        "*",
        2,
        word_multiply,
        "Multiply two numbers.",
        "a b -- result"
    );

    add_primitive!(
        interpreter,
        "/",
        2,
        word_divide,
        "Divide a by b.",
        "a b -- result"
    );

    add_primitive!(
        interpreter,
        "mod",
        2,
        word_mod,
        "Remainder of a divided by b.",
        "a b -- remainder"
    );

    add_primitive!(
        interpreter,
        "=",
        2,
        word_equal,
        "Are the two values equal?",
        "a b -- bool"
    );

    add_primitive!(
        interpreter,
        "<",
        2,
        word_less,
        "Is a less than b?",
        "a b -- bool"
    );

    add_primitive!(
        interpreter,
        ">",
        2,
        word_greater,
        "Is a greater than b?",
        "a b -- bool"
    );

    add_primitive!(
        interpreter,
        "<=",
        2,
        word_less_equal,
        "Is a less than or equal to b?",
        "a b -- bool"
    );

    add_primitive!(
        interpreter,
        ">=",
        2,
        word_greater_equal,
        "Is a greater than or equal to b?",
        "a b -- bool"
    );

    add_primitive!(
        interpreter,
        "not",
        1,
        word_not,
        "Logically invert a value.",
        "value -- bool"
    );

    add_primitive!(
        interpreter,
        "and",
        2,
        word_and,
        "Are both values true?",
        "a b -- bool"
    );

    add_primitive!(
        interpreter,
        "or",
        2,
        word_or,
        "Is either value true?",
        "a b -- bool"
    );

    add_primitive!(
        interpreter,
        "xor",
        2,
        word_xor,
        "Is exactly one of the values true?",
        "a b -- bool"
    );
}
