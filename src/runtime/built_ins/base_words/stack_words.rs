use crate::{
    add_primitive,
    runtime::{
        data_structures::value::Value,
        error,
        interpreter::{Interpreter, Returned, arguments},
    },
};

/// Duplicate the top value on the data stack.
///
/// Signature: `value -- value value`
fn word_dup(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [value] = arguments::<1>(interpreter, values)?;

    Ok(vec![value.clone(), value].into())
}

/// Drop the top value on the data stack.  The interpreter has already popped it.
///
/// Signature: `value -- `
fn word_drop(_interpreter: &mut dyn Interpreter, _values: Vec<Value>) -> error::Result<Returned> {
    Ok(Returned::Nothing)
}

/// Register the native stack words.  Everything else that shuffles the stack is built on these
/// and `dip` in the prelude.
pub fn register_stack_words(interpreter: &mut dyn Interpreter) {
    add_primitive!(
        interpreter,
        "dup",
        1,
        word_dup,
        "Duplicate the top value on the data stack.",
        "value -- value value"
    );

    add_primitive!(
        interpreter,
        "drop",
        1,
        word_drop,
        "Discard the top value on the data stack.",
        "value -- "
    );
}
