use crate::{
    add_primitive,
    runtime::{
        data_structures::value::Value,
        error,
        interpreter::{CodeManagement, Interpreter, Returned, arguments},
    },
};

/// Run a quotation with the value under it set aside, then put the value back on top.  This is
/// the one native combinator, the rest of the vocabulary is derived from it in the prelude.
///
/// Signature: `x quotation -- ... x`
fn word_dip(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [x, quotation] = arguments::<2>(interpreter, values)?;
    let quotation = quotation.as_list(interpreter)?.clone();

    interpreter.execute_code(&quotation)?;

    Ok(x.into())
}

/// Select one of two values by the truthiness of a condition.  Nothing is executed, `if` pairs
/// this with `apply` to choose between quotations.
///
/// Signature: `condition when-true when-false -- chosen`
fn word_choose(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [condition, when_true, when_false] = arguments::<3>(interpreter, values)?;

    Ok(if condition.get_bool_val() {
        when_true
    } else {
        when_false
    }
    .into())
}

pub fn register_combinator_words(interpreter: &mut dyn Interpreter) {
    add_primitive!(
        interpreter,
        "dip",
        2,
        word_dip,
        "Run a quotation with the value under it set aside, then restore the value.",
        "x quotation -- ... x"
    );

    add_primitive!(
        interpreter,
        "?",
        3,
        word_choose,
        "Choose between two values by a condition.",
        "condition when-true when-false -- chosen"
    );
}
