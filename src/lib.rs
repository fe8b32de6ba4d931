//! Brief is a small concatenative language that is edited as a tree rather than as text.  The
//! editor moves a cursor over the code tree and every edit runs the code up to the cursor again,
//! so the stack is always current.

/// Module for managing source code, turning it into tokens and then into lists of code.
#[macro_use]
pub mod lang;

/// Module for the runtime and the data structures used by the interpreter.  As well as the
/// interpreter itself.
#[macro_use]
pub mod runtime;

/// The structural editor: the code tree, the cursor and selection, and serialization.
pub mod editor;

/// The live loop tying the editor to the interpreter.
pub mod session;
