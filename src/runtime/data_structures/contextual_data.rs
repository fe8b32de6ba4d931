/// Marks and releases contexts on the interpreter's contextual stores.  Releasing a context drops
/// everything added to the store since the matching mark.
///
/// Contexts nest like a stack, and while they are alive all of them together read as one
/// contiguous store.  The interpreter marks a context after bootstrapping so that a reset can drop
/// every word a program defined and get back to the bootstrap dictionary.
pub trait ContextualData {
    /// Start a new context.  Anything added after this point goes into it.
    fn mark_context(&mut self);

    /// Drop the newest context and everything in it.
    fn release_context(&mut self);
}
