use crate::{
    add_primitive,
    runtime::{
        data_structures::value::Value,
        error::{self, ErrorKind, script_error},
        interpreter::{CodeManagement, Interpreter, Returned, arguments},
    },
};

/// Show a value to the user through the host.
///
/// Signature: `value -- `
fn word_alert(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [message] = arguments::<1>(interpreter, values)?;

    interpreter.host().alert(&message.to_string());

    Ok(Returned::Nothing)
}

/// Fetch named code from the host and run it against the current stack and dictionary.
///
/// Signature: `name -- ...`
fn word_use(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [name] = arguments::<1>(interpreter, values)?;
    let name = name.get_string_val();

    let Some(source) = interpreter.host().fetch(&name) else {
        return script_error(interpreter, ErrorKind::UnknownCode(name));
    };

    tracing::debug!(%name, "using code");

    interpreter.process_source(&name, &source)?;

    Ok(Returned::Nothing)
}

pub fn register_host_words(interpreter: &mut dyn Interpreter) {
    add_primitive!(
        interpreter,
        "alert",
        1,
        word_alert,
        "Show a value to the user.",
        "value -- "
    );

    add_primitive!(
        interpreter,
        "use",
        1,
        word_use,
        "Load and run named code supplied by the host.",
        "name -- ..."
    );
}
