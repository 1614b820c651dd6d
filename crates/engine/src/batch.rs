//! Deferred operation queue with atomic batch execution
//!
//! Callers enqueue `Operation`s (a raw command plus an optional result
//! label), then `execute()` submits the whole queue as one atomic pipelined
//! round trip and demultiplexes the ordered replies:
//!
//! - result order always equals submission order
//! - when labels are supplied, replies are remapped to a label → reply
//!   mapping; labels must then cover every operation and be unique, or the
//!   count invariant fails with a usage error
//! - when no operation carries a label, replies stay positional
//!
//! The queue drains on every `execute()`; write and read paths each build
//! their batch from scratch, so no operations leak across independent
//! calls.

use redmap_core::{Error, Result};
use redmap_store::{Backend, Command, Reply};
use std::collections::HashMap;
use tracing::debug;

/// One deferred store operation
#[derive(Debug, Clone)]
pub struct Operation {
    /// Raw command to feed into the pipelined session
    pub command: Command,
    /// Name under which the reply is returned, if any
    pub label: Option<String>,
}

impl Operation {
    /// Operation whose reply is discarded (or read positionally)
    pub fn new(command: Command) -> Self {
        Self {
            command,
            label: None,
        }
    }

    /// Operation whose reply is returned under `label`
    pub fn labeled(command: Command, label: impl Into<String>) -> Self {
        Self {
            command,
            label: Some(label.into()),
        }
    }
}

/// Demultiplexed batch replies
#[derive(Debug, Default)]
pub struct BatchResults {
    by_label: HashMap<String, Reply>,
    positional: Vec<Reply>,
}

impl BatchResults {
    /// Take the reply for a label, leaving the slot empty
    pub fn take(&mut self, label: &str) -> Option<Reply> {
        self.by_label.remove(label)
    }

    /// Replies of a fully unlabeled batch, in submission order
    pub fn positional(self) -> Vec<Reply> {
        self.positional
    }

    /// True when the batch produced no replies at all
    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty() && self.positional.is_empty()
    }
}

/// Ordered queue of deferred operations bound to one backend session
pub struct BatchExecutor<'a> {
    backend: &'a dyn Backend,
    operations: Vec<Operation>,
}

impl<'a> BatchExecutor<'a> {
    /// New executor with an empty queue
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self {
            backend,
            operations: Vec::new(),
        }
    }

    /// Append an operation; execution order equals enqueue order
    pub fn enqueue(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Drop all queued operations without executing them
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Submit the queue as one atomic round trip and demultiplex replies
    ///
    /// The queue is drained whether or not the round trip succeeds; a
    /// failed batch applies nothing at the store.
    pub fn execute(&mut self) -> Result<BatchResults> {
        let operations = std::mem::take(&mut self.operations);
        if operations.is_empty() {
            return Ok(BatchResults::default());
        }

        debug!(
            target: "redmap::batch",
            operations = operations.len(),
            "submitting atomic batch"
        );

        let commands: Vec<Command> = operations.iter().map(|op| op.command.clone()).collect();
        let replies = self.backend.run_atomic(commands)?;
        if replies.len() != operations.len() {
            return Err(Error::Usage(format!(
                "batch returned {} replies for {} operations",
                replies.len(),
                operations.len()
            )));
        }

        let labeled = operations.iter().filter(|op| op.label.is_some()).count();
        if labeled == 0 {
            return Ok(BatchResults {
                by_label: HashMap::new(),
                positional: replies,
            });
        }
        if labeled != operations.len() {
            return Err(Error::Usage(format!(
                "{labeled} of {} operations are labeled; label a batch fully or not at all",
                operations.len()
            )));
        }

        let mut by_label = HashMap::with_capacity(replies.len());
        for (operation, reply) in operations.into_iter().zip(replies) {
            let label = operation.label.expect("checked: every operation is labeled");
            if by_label.insert(label.clone(), reply).is_some() {
                return Err(Error::Usage(format!(
                    "duplicate batch label {label:?}"
                )));
            }
        }
        Ok(BatchResults {
            by_label,
            positional: Vec::new(),
        })
    }
}
