/// The core words of the language.
pub mod base_words;

/// Words that call out to the host.
pub mod host_words;

/// The combinator library, written in Brief.
pub mod prelude;

use crate::runtime::{
    built_ins::{
        base_words::register_base_words, host_words::register_host_words, prelude::load_prelude,
    },
    config::Config,
    error,
    host::Host,
    interpreter::{Interpreter, brief_interpreter::BriefInterpreter},
};
use std::rc::Rc;

/// Bring an interpreter to its bootstrap state: the native words are registered, the prelude is
/// run and the result is marked as a context so `reset` returns to it.
pub fn bootstrap(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    register_base_words(interpreter);
    register_host_words(interpreter);

    load_prelude(interpreter)?;

    interpreter.clear_stack();
    interpreter.mark_context();

    Ok(())
}

/// Create a bootstrapped interpreter.
pub fn new_interpreter(config: Config, host: Rc<dyn Host>) -> error::Result<BriefInterpreter> {
    let mut interpreter = BriefInterpreter::new(config, host);

    bootstrap(&mut interpreter)?;

    Ok(interpreter)
}
