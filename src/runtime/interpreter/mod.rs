use crate::{
    lang::{
        code::{Quotation, QuotationPtr},
        compilation::{Classify, Resolve},
        source_buffer::SourceLocation,
    },
    runtime::{
        config::Config,
        data_structures::{
            contextual_data::ContextualData,
            dictionary::{Dictionary, WordType},
            value::Value,
        },
        error::{self, Diagnostics, ErrorKind, ScriptError, script_error},
        host::Host,
    },
};
use std::{
    fmt::{self, Display, Formatter},
    rc::Rc,
    thread,
};

pub mod brief_interpreter;

/// A call stack item is a record of the executing word's name and the location within the original
/// source code from which it was called.  These items are read-only and the fields are accessed by
/// member functions.
#[derive(Clone, Debug)]
pub struct CallItem {
    location: SourceLocation,
    word: String,
}

impl CallItem {
    pub fn new(word: String, location: SourceLocation) -> CallItem {
        CallItem { location, word }
    }

    /// Where in the source code was the execution of this word found?
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The name of the word being executed.
    pub fn word(&self) -> &String {
        &self.word
    }
}

impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.word)
    }
}

/// The words currently being executed, innermost last.  Copied into errors so the user can see how
/// execution got to the failure.
pub type CallStack = Vec<CallItem>;

/// The shared data stack.  The end of the vector is the top of the stack.
pub type ValueStack = Vec<Value>;

/// Trait for managing the interpreter's data stack.
pub trait InterpreterStack {
    /// The whole stack, bottom first.
    fn stack(&self) -> &ValueStack;

    /// The whole stack, top first.  This is the order the stack is shown in.
    fn stack_top_first(&self) -> Vec<Value> {
        self.stack().iter().rev().cloned().collect()
    }

    fn push(&mut self, value: Value);

    /// Pop the top value.  An empty stack is a stack underflow error.
    fn pop(&mut self) -> error::Result<Value>;

    fn clear_stack(&mut self);
}

/// Trait for turning source into code and running it.
pub trait CodeManagement {
    /// Lex, parse and execute source text against the current dictionary and stack.  Lexing and
    /// parsing problems don't stop execution, they're collected for take_diagnostics.
    ///
    /// The name is used to identify the source in locations, for example "\<editor\>".
    fn process_source(&mut self, name: &str, source: &str) -> error::Result<()>;

    /// Execute a list of code from left to right.
    fn execute_code(&mut self, code: &Quotation) -> error::Result<()>;

    /// Hand over and clear the diagnostics gathered since the last call.
    fn take_diagnostics(&mut self) -> Diagnostics;
}

/// What a primitive hands back to be pushed onto the stack.
#[derive(Clone, Debug, PartialEq)]
pub enum Returned {
    Nothing,
    Value(Value),

    /// Several values, pushed in order so the last one ends up on top.
    Values(Vec<Value>),
}

impl From<()> for Returned {
    fn from(_: ()) -> Returned {
        Returned::Nothing
    }
}

impl From<Value> for Returned {
    fn from(value: Value) -> Returned {
        Returned::Value(value)
    }
}

impl From<Vec<Value>> for Returned {
    fn from(values: Vec<Value>) -> Returned {
        Returned::Values(values)
    }
}

/// The native function behind a primitive.  The interpreter pops exactly the word's arity of
/// values and passes them in call order, deepest first.
pub type PrimitiveHandler = dyn Fn(&mut dyn Interpreter, Vec<Value>) -> error::Result<Returned>;

/// The executable side of a dictionary entry.
#[derive(Clone)]
pub enum WordHandler {
    Primitive {
        arity: usize,
        handler: Rc<PrimitiveHandler>,
    },

    /// A word defined in Brief.  The body runs on the shared stack with no frame of its own.
    Secondary(QuotationPtr),
}

impl WordHandler {
    pub fn word_type(&self) -> WordType {
        match self {
            WordHandler::Primitive { .. } => WordType::Primitive,
            WordHandler::Secondary(_) => WordType::Secondary,
        }
    }
}

/// A word's name together with its handler.  This is what parsed code holds on to, so once created
/// it's fields are read-only and accessed by member methods.
#[derive(Clone)]
pub struct WordHandlerInfo {
    name: String,
    handler: WordHandler,
}

impl WordHandlerInfo {
    pub fn new(name: String, handler: WordHandler) -> WordHandlerInfo {
        WordHandlerInfo { name, handler }
    }

    pub fn name(&self) -> &String {
        &self.name
    }

    pub fn handler(&self) -> &WordHandler {
        &self.handler
    }
}

/// Take the arguments of a primitive as a fixed size array, for destructuring in the handler.
pub fn arguments<const N: usize>(
    interpreter: &dyn Interpreter,
    values: Vec<Value>,
) -> error::Result<[Value; N]> {
    let found = values.len();

    values.try_into().or_else(|_| {
        let word = interpreter
            .call_stack()
            .last()
            .map(|item| item.word().clone())
            .unwrap_or_default();

        script_error(
            interpreter,
            ErrorKind::StackUnderflow {
                word,
                needed: N,
                found,
            },
        )
    })
}

/// Simplify registering a primitive with the interpreter.
///
/// Required parameters are the interpreter instance to register with, the name of the word, its
/// arity, the handler, a simple description of the word and the word's stack signature.
#[macro_export]
macro_rules! add_primitive {
    (
        $interpreter:expr ,
        $name:expr ,
        $arity:expr ,
        $function:expr ,
        $description:expr ,
        $signature:expr
    ) => {{
        use std::rc::Rc;
        use $crate::runtime::interpreter::WordHandler;

        // Record where in the Rust source the word was registered from.
        $interpreter.add_word(
            $crate::location_here!(),
            $name.to_string(),
            WordHandler::Primitive {
                arity: $arity,
                handler: Rc::new($function),
            },
            $description.to_string(),
            $signature.to_string(),
        );
    }};
}

/// Trait for managing and executing words known to the interpreter.
pub trait WordManagement {
    /// If currently set, the location in the source text execution has reached.
    fn current_location(&self) -> &Option<SourceLocation>;

    /// Add a word to the dictionary's newest context, replacing any word of the same name.
    fn add_word(
        &mut self,
        location: SourceLocation,
        name: String,
        handler: WordHandler,
        description: String,
        signature: String,
    );

    /// Install a secondary word whose body is the given quotation.
    fn define_word(&mut self, name: &str, body: QuotationPtr) {
        let location = self.current_location().clone().unwrap_or_default();

        self.add_word(
            location,
            name.to_string(),
            WordHandler::Secondary(body),
            String::new(),
            String::new(),
        );
    }

    fn word_handler_info(&self, index: usize) -> Option<&WordHandlerInfo>;

    /// Execute a bound word.  The location is where the word was called from, use
    /// `location_here!()` when calling from native code.
    fn execute_word(
        &mut self,
        location: &SourceLocation,
        word: &WordHandlerInfo,
    ) -> error::Result<()>;

    fn call_stack(&self) -> &CallStack;
}

/// Core interpreter trait.
///
/// Brings together context marking, the data stack, code execution and word management.  Native
/// words see the interpreter only through this trait.
pub trait Interpreter:
    ContextualData + InterpreterStack + CodeManagement + WordManagement + Classify + Resolve
{
    fn config(&self) -> &Config;

    /// The host that side-effecting words talk to.
    fn host(&self) -> Rc<dyn Host>;

    fn dictionary(&self) -> &Dictionary;

    /// Every defined word name, sorted.
    fn word_names(&self) -> Vec<String> {
        self.dictionary().names()
    }

    /// Return to the last marked state: words defined since the mark are forgotten and the stack
    /// is cleared.  A new context is marked so the interpreter can be reset again.
    fn reset(&mut self);
}

/// Run a body of work on its own thread with a stack of `stack_size` bytes, and wait for it.
///
/// Execution recurses natively for every nested word, so deeply recursive Brief code needs a much
/// bigger stack than a default thread gets.  Interpreters aren't `Send`, build them inside the
/// body.
pub fn with_evaluation_stack<T, F>(stack_size: usize, body: F) -> error::Result<T>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    thread::scope(|scope| {
        let handle = thread::Builder::new()
            .name("brief-evaluation".to_string())
            .stack_size(stack_size)
            .spawn_scoped(scope, body)?;

        handle.join().map_err(|_| {
            ScriptError::new(
                None,
                ErrorKind::Message("The evaluation thread panicked.".to_string()),
                None,
            )
        })
    })
}
