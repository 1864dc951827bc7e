pub mod core;
pub mod loader;
pub mod parser;
pub mod substitute;

use thiserror::Error;

/// Errors raised while turning a transformation body and its tasks into
/// requests. `MalformedBody` and `NoTasks` are fatal to the whole batch
/// call; the other kinds are fatal only to the task that raised them.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("transformation body matches no supported grammar: {0}")]
    MalformedBody(String),

    #[error("task field `{0}` is not available for substitution")]
    UnresolvedSubstitution(String),

    #[error("task has no input data")]
    EmptyInputData,

    #[error("no tasks given")]
    NoTasks,
}
