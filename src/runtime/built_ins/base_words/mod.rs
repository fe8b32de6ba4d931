/// Words that manipulate the data stack.
mod stack_words;

/// The native combinator and value selection.
mod combinator_words;

/// Words that work with math, logic and Value comparison.
mod math_logic_words;

/// Words that work with lists.
mod list_words;

/// Words that work with words and code.
pub mod word_words;

use crate::runtime::{
    built_ins::base_words::{
        combinator_words::register_combinator_words, list_words::register_list_words,
        math_logic_words::register_math_logic_words, stack_words::register_stack_words,
        word_words::register_word_words,
    },
    interpreter::Interpreter,
};

/// Called to register all of the core words of the language.
pub fn register_base_words(interpreter: &mut dyn Interpreter) {
    register_stack_words(interpreter);
    register_combinator_words(interpreter);
    register_math_logic_words(interpreter);
    register_list_words(interpreter);
    register_word_words(interpreter);
}
