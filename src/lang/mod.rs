/// Module for managing the original source code.
pub mod source_buffer;

/// Module for managing the turning of the source code into a list of tokens for further processing.
pub mod tokenizing;

/// Module for defining the resolved code elements that lists are made of.
pub mod code;

/// Module for resolving tokens against the dictionary and parsing them into nested lists.  The
/// same resolution order is used by the editor to classify the words it shows.
pub mod compilation;
