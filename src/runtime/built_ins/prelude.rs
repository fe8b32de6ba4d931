use crate::runtime::{error, interpreter::Interpreter};

/// The combinator library.  Every word here is written in Brief on top of `dip` and the other
/// native words.
pub const PRELUDE_SOURCE: &str = include_str!("prelude.brief");

/// Run the prelude, one definition per line so each body can refer to the words defined above it.
/// A prelude that doesn't lex or parse cleanly is an error.
pub fn load_prelude(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    for line in PRELUDE_SOURCE.lines().filter(|line| !line.trim().is_empty()) {
        interpreter.process_source("<prelude>", line)?;

        if let Some(diagnostic) = interpreter.take_diagnostics().into_iter().next() {
            return Err(diagnostic);
        }
    }

    tracing::debug!(words = interpreter.word_names().len(), "prelude loaded");

    Ok(())
}
