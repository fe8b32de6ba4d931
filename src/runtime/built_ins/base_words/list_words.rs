use crate::{
    add_primitive,
    lang::code::{Element, Instruction, Quotation, QuotationPtr},
    runtime::{
        data_structures::value::{ToValue, Value},
        error::{self, ErrorKind, script_error},
        interpreter::{CodeManagement, Interpreter, InterpreterStack, Returned, arguments},
    },
};
use std::rc::Rc;

/// The data value held by a list instruction.  Lists holding code can be executed but not used as
/// data.
fn element_value(interpreter: &dyn Interpreter, instruction: &Instruction) -> error::Result<Value> {
    match instruction.element.as_value() {
        Some(value) => Ok(value),
        None => script_error(
            interpreter,
            ErrorKind::TypeMismatch {
                expected: "list of values",
                found: format!("word {}", instruction.element),
            },
        ),
    }
}

fn new_list(code: Quotation) -> Value {
    Value::List(Rc::new(code))
}

/// Signature: `list-or-string -- count`
fn word_length(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [value] = arguments::<1>(interpreter, values)?;

    let count = match &value {
        Value::List(list) => list.len(),
        Value::String(text) => text.chars().count(),
        _ => {
            return script_error(
                interpreter,
                ErrorKind::TypeMismatch {
                    expected: "list or string",
                    found: value.describe(),
                },
            );
        }
    };

    Ok(count.to_value().into())
}

/// Add a value to the front of a list.
///
/// Signature: `value list -- list`
fn word_cons(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [value, list] = arguments::<2>(interpreter, values)?;
    let list = list.as_list(interpreter)?;

    let mut code = Quotation::with_capacity(list.len() + 1);

    code.push(Instruction::new(None, Element::from_value(value)));
    code.extend(list.iter().cloned());

    Ok(new_list(code).into())
}

/// Split a list into its first value and the rest of the list.
///
/// Signature: `list -- head tail`
fn word_snoc(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [list] = arguments::<1>(interpreter, values)?;
    let list = list.as_list(interpreter)?.clone();

    let Some((head, tail)) = list.split_first() else {
        return script_error(
            interpreter,
            ErrorKind::TypeMismatch {
                expected: "non-empty list",
                found: "empty list".to_string(),
            },
        );
    };

    let head = element_value(interpreter, head)?;

    Ok(vec![head, new_list(tail.to_vec())].into())
}

/// Build the list of integers from low up to and including high.  An empty list if high is less
/// than low.
///
/// Signature: `high low -- list`
fn word_range(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [high, low] = arguments::<2>(interpreter, values)?;
    let high = *high.as_int(interpreter)?;
    let low = *low.as_int(interpreter)?;

    let code = (low..=high)
        .map(|index| Instruction::new(None, Element::from_value(index.to_value())))
        .collect();

    Ok(new_list(code).into())
}

/// Run a quotation with a value on the stack and take its result off again.
fn apply_to(
    interpreter: &mut dyn Interpreter,
    quotation: &QuotationPtr,
    arguments: Vec<Value>,
) -> error::Result<Value> {
    for argument in arguments {
        interpreter.push(argument);
    }

    interpreter.execute_code(quotation)?;
    interpreter.pop()
}

/// Signature: `list quotation -- list`
fn word_map(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [list, quotation] = arguments::<2>(interpreter, values)?;
    let list = list.as_list(interpreter)?.clone();
    let quotation = quotation.as_list(interpreter)?.clone();

    let mut code = Quotation::with_capacity(list.len());

    for instruction in list.iter() {
        let value = element_value(interpreter, instruction)?;
        let result = apply_to(interpreter, &quotation, vec![value])?;

        code.push(Instruction::new(None, Element::from_value(result)));
    }

    Ok(new_list(code).into())
}

/// Keep the values of the list the quotation finds true.  Kept items are copied as they were.
///
/// Signature: `list quotation -- list`
fn word_filter(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [list, quotation] = arguments::<2>(interpreter, values)?;
    let list = list.as_list(interpreter)?.clone();
    let quotation = quotation.as_list(interpreter)?.clone();

    let mut code = Quotation::new();

    for instruction in list.iter() {
        let value = element_value(interpreter, instruction)?;

        if apply_to(interpreter, &quotation, vec![value])?.get_bool_val() {
            code.push(instruction.clone());
        }
    }

    Ok(new_list(code).into())
}

/// Combine the values of a list into an accumulator, first to last.  The quotation sees the item
/// under the accumulator.
///
/// Signature: `list initial quotation -- result`
fn word_fold(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [list, initial, quotation] = arguments::<3>(interpreter, values)?;
    let list = list.as_list(interpreter)?.clone();
    let quotation = quotation.as_list(interpreter)?.clone();

    let mut accumulator = initial;

    for instruction in list.iter() {
        let value = element_value(interpreter, instruction)?;

        accumulator = apply_to(interpreter, &quotation, vec![value, accumulator])?;
    }

    Ok(accumulator.into())
}

pub fn register_list_words(interpreter: &mut dyn Interpreter) {
    add_primitive!(
        interpreter,
        "length",
        1,
        word_length,
        "The number of items in a list or characters in a string.",
        "list-or-string -- count"
    );

    add_primitive!(
        interpreter,
        "cons",
        2,
        word_cons,
        "Add a value to the front of a list.",
        "value list -- list"
    );

    add_primitive!(
        interpreter,
        "snoc",
        1,
        word_snoc,
        "Split a list into its first value and the rest.",
        "list -- head tail"
    );

    add_primitive!(
        interpreter,
        "range",
        2,
        word_range,
        "The integers from low up to high, inclusive.",
        "high low -- list"
    );

    add_primitive!(
        interpreter,
        "map",
        2,
        word_map,
        "Transform each value of a list with a quotation.",
        "list quotation -- list"
    );

    add_primitive!(
        interpreter,
        "filter",
        2,
        word_filter,
        "Keep the values of a list a quotation finds true.",
        "list quotation -- list"
    );

    add_primitive!(
        interpreter,
        "fold",
        3,
        word_fold,
        "Combine the values of a list into an accumulator.",
        "list initial quotation -- result"
    );
}
