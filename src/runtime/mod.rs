/// All of the core data structures used by the Brief interpreter.
pub mod data_structures;

/// Module for defining the built-in native words and the prelude that builds on them.
pub mod built_ins;

/// Module for defining the error reporting of the Brief interpreter.
pub mod error;

/// Settings for the interpreter, read from the environment.
pub mod config;

/// The side effects the language needs from the application embedding it.
pub mod host;

/// Module for defining the core functionality of the Brief interpreter.  This includes tools for
/// managing and examining the interpreter's state.
pub mod interpreter;
