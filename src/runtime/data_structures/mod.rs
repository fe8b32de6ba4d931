/// Module contains the Value enumeration and it's implementation.  The value is one of the core
/// data structures of the interpreter.  It is used to represent all data types that Brief code can
/// understand and manage.
pub mod value;

/// Hold the ContextualData trait, used for managing contexts in the interpreter.
pub mod contextual_data;

/// A list that can be used in a contextual manner.  The interpreter keeps its word handlers in one
/// so that words defined after a mark are released along with the dictionary entries.
pub mod contextual_list;

/// The dictionary module provides the core interpreter word dictionary used by the Brief
/// interpreter.
pub mod dictionary;
