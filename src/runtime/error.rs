use std::{ error::Error,
           process::Termination,
           fmt::{ self, Debug, Display, Formatter }, process::ExitCode };
use crate::{ runtime::interpreter::CallStack,
             lang::source_buffer::SourceLocation };

use super::interpreter::Interpreter;



pub type Result<T> = std::result::Result<T, ScriptError>;

/// Non-fatal problems found while lexing or parsing.  They are reported alongside the result
/// instead of stopping the evaluation.
pub type Diagnostics = Vec<ScriptError>;



/// The kinds of failure the lexer, parser and engine can report.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ErrorKind
{
    /// A word was called with fewer values on the stack than its arity.
    #[error("Stack underflow, {word} needs {needed} value(s) but found {found}.")]
    StackUnderflow { word: String, needed: usize, found: usize },

    #[error("Expected {expected}, found {found}.")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("Division by zero.")]
    DivisionByZero,

    /// The lexer hit the end of the text inside a string token.  The partial token is dropped.
    #[error("Incomplete string token: '{0}'.")]
    UnterminatedString(String),

    /// A ']' with no list left to close.
    #[error("Unbalanced ']' ignored.")]
    UnbalancedClose,

    #[error("Call depth exceeded the limit of {0}.")]
    CallDepthExceeded(usize),

    /// The host could not supply code for a `use`.
    #[error("No code named '{0}' could be found.")]
    UnknownCode(String),

    #[error("Invalid word name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    Message(String)
}



/// Any error that occurs while lexing, parsing or running Brief code.
#[derive(Clone)]
pub struct ScriptError
{
    /// The location in the source text the error occurred, if available.
    location: Option<SourceLocation>,

    kind: ErrorKind,

    /// The interpreter's call stack at the time of the error, if available.
    call_stack: Option<CallStack>
}


impl Error for ScriptError
{
    fn source(&self) -> Option<&(dyn Error + 'static)>
    {
        Some(&self.kind)
    }
}


/// When returned from main, report the error and exit with FAILURE.
impl Termination for ScriptError
{
    fn report(self) -> ExitCode
    {
        eprintln!("Error: {}", self);
        ExitCode::FAILURE
    }
}


impl Display for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        match &self.location
        {
            Some(location) => write!(f, "{}: {}", location, self.kind)?,
            None => write!(f, "{}", self.kind)?
        }

        if let Some(call_stack) = &self.call_stack
            && !call_stack.is_empty()
        {
            write!(f, "\n\nCall stack\n")?;

            for item in call_stack.iter().rev()
            {
                writeln!(f, "  {}", item)?;
            }
        }

        Ok(())
    }
}


impl Debug for ScriptError
{
    fn fmt(&self, f: &mut Formatter) -> fmt::Result
    {
        write!(f, "{}", self)
    }
}


impl ScriptError
{
    pub fn new(location: Option<SourceLocation>,
               kind: ErrorKind,
               call_stack: Option<CallStack>) -> ScriptError
    {
        ScriptError
            {
                location,
                kind,
                call_stack
            }
    }

    /// Create a new ScriptError and wrap it in a Result::Err.
    pub fn new_as_result<T>(location: Option<SourceLocation>,
                            kind: ErrorKind,
                            call_stack: Option<CallStack>) -> Result<T>
    {
        Err(ScriptError::new(location, kind, call_stack))
    }

    pub fn location(&self) -> &Option<SourceLocation>
    {
        &self.location
    }

    pub fn kind(&self) -> &ErrorKind
    {
        &self.kind
    }

    pub fn call_stack(&self) -> &Option<CallStack>
    {
        &self.call_stack
    }
}


impl From<std::io::Error> for ScriptError
{
    fn from(error: std::io::Error) -> ScriptError
    {
        ScriptError::new(None, ErrorKind::Io(error.to_string()), None)
    }
}



/// Create a ScriptError of the given kind wrapped in a Result::Err, using the interpreter's
/// current location and call stack.
pub fn script_error<T>(interpreter: &dyn Interpreter, kind: ErrorKind) -> Result<T>
{
    let location = interpreter.current_location().clone();
    let call_stack = interpreter.call_stack().clone();

    ScriptError::new_as_result(location, kind, Some(call_stack))
}

