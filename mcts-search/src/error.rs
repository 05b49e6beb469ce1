use thiserror::Error;

/// The error kinds that can surface from a [`crate::Search`].
///
/// Public functions return [`SearchResult<T>`], exactly mirroring
/// `patchwork_core::PlayerResult<T> = anyhow::Result<T>`: an evaluator's own
/// error is propagated via `anyhow`'s `?` with added context rather than
/// being downcast back into this enum, so the original error chain survives
/// for debugging.
#[derive(Debug, Error)]
pub enum MctsError {
    #[error("failed to allocate a node: {reason}")]
    AllocationFailure { reason: &'static str },
    #[error("evaluator returned {got} results for a batch of {expected}")]
    EvaluatorFailure { expected: usize, got: usize },
    #[error("{operation} called on a search in an invalid state: {reason}")]
    ContractViolation { operation: &'static str, reason: &'static str },
}

/// The result type returned by every fallible operation on a [`crate::Search`].
pub type SearchResult<T> = anyhow::Result<T>;

pub(crate) fn contract_violation(operation: &'static str, reason: &'static str) -> anyhow::Error {
    anyhow::Error::new(MctsError::ContractViolation { operation, reason })
}
