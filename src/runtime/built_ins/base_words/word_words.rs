use crate::{
    add_primitive,
    lang::{
        code::{Element, Instruction, Quotation},
        tokenizing::is_whitespace,
    },
    runtime::{
        data_structures::value::Value,
        error::{self, ErrorKind, script_error},
        interpreter::{CodeManagement, Interpreter, Returned, WordManagement, arguments},
    },
};
use std::rc::Rc;

/// Check that a name can be used for a word, that is that it will lex back as a single word
/// token.  On failure the reason is returned.
pub fn validate_word_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("the name is empty");
    }

    if name.starts_with('"') {
        return Err("the name would read as a string");
    }

    if name.chars().any(|next| is_whitespace(next) || next == '[' || next == ']') {
        return Err("the name contains whitespace or brackets");
    }

    Ok(())
}

/// Get a list of all the defined words, sorted by name.
///
/// Signature: ` -- list`
fn word_words(interpreter: &mut dyn Interpreter, _values: Vec<Value>) -> error::Result<Returned> {
    let code: Quotation = interpreter
        .word_names()
        .iter()
        .filter_map(|name| interpreter.bind_word(name))
        .map(|word| Instruction::new(None, Element::Word(word)))
        .collect();

    Ok(Value::List(Rc::new(code)).into())
}

/// Install a quotation as a new word.  An existing word of the same name is replaced.
///
/// Signature: `quotation name -- `
fn word_define(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [quotation, name] = arguments::<2>(interpreter, values)?;
    let body = quotation.as_list(interpreter)?.clone();
    let name = name.as_string(interpreter)?.clone();

    if let Err(reason) = validate_word_name(&name) {
        return script_error(interpreter, ErrorKind::InvalidName { name, reason });
    }

    interpreter.define_word(&name, body);

    Ok(Returned::Nothing)
}

/// Run source text, or a list, as code.
///
/// Signature: `source -- ...`
fn word_eval(interpreter: &mut dyn Interpreter, values: Vec<Value>) -> error::Result<Returned> {
    let [code] = arguments::<1>(interpreter, values)?;

    match code {
        Value::String(source) => interpreter.process_source("<eval>", &source)?,
        Value::List(quotation) => interpreter.execute_code(&quotation)?,

        other => {
            return script_error(
                interpreter,
                ErrorKind::TypeMismatch {
                    expected: "string or list",
                    found: other.describe(),
                },
            );
        }
    }

    Ok(Returned::Nothing)
}

pub fn register_word_words(interpreter: &mut dyn Interpreter) {
    add_primitive!(
        interpreter,
        "words",
        0,
        word_words,
        "Get a list of all the defined words.",
        " -- list"
    );

    add_primitive!(
        interpreter,
        "define",
        2,
        word_define,
        "Install a quotation as a word with the given name.",
        "quotation name -- "
    );

    add_primitive!(
        interpreter,
        "eval",
        1,
        word_eval,
        "Run source text or a list as code.",
        "source -- ..."
    );
}

#[cfg(test)]
mod tests {
    use super::validate_word_name;

    #[test]
    fn names_must_lex_as_one_word() {
        assert!(validate_word_name("square").is_ok());
        assert!(validate_word_name("2bi*").is_ok());

        assert!(validate_word_name("").is_err());
        assert!(validate_word_name("\"quoted").is_err());
        assert!(validate_word_name("two words").is_err());
        assert!(validate_word_name("a[b").is_err());
    }
}
