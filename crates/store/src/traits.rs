//! Backend capability trait
//!
//! One interface, two execution modes:
//!
//! - `run` executes a single command immediately (the plain client).
//! - `run_atomic` executes a queued batch as one atomic pipelined round
//!   trip with `MULTI`/`EXEC` semantics: replies come back in submission
//!   order, no command observes a sibling's effects mid-batch, and a
//!   failed batch applies nothing.
//!
//! Implementations must be `Send + Sync`; a single in-flight batch owns its
//! session, so callers needing concurrent batches use independent
//! executors.

use crate::command::Command;
use crate::reply::Reply;
use redmap_core::Result;

/// Raw store capability
pub trait Backend: Send + Sync {
    /// Execute one command immediately
    fn run(&self, command: Command) -> Result<Reply>;

    /// Execute a batch atomically; replies match submission order
    fn run_atomic(&self, commands: Vec<Command>) -> Result<Vec<Reply>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn Backend) {}
    }
}
