use mcts_search::SearchResult;

/// A policy/value evaluator, called once per cycle with the batch of leaf
/// states collected across every search still in progress.
///
/// A trait rather than a raw closure type, grounded on `patchwork_core`'s
/// `Evaluator`/`tree-policy`'s `TreePolicy` shape, so a training harness can
/// carry state (a loaded network, a batch counter) across calls without a
/// closure capturing `&mut`.
pub trait Evaluator<S, M> {
    /// Evaluates `states` in one batch, returning one `(value, expansion)`
    /// pair per input state, in the same order.
    fn evaluate(&mut self, states: &[S]) -> SearchResult<Vec<(f64, Vec<(M, S, f32)>)>>;
}

impl<S, M, F> Evaluator<S, M> for F
where
    F: FnMut(&[S]) -> SearchResult<Vec<(f64, Vec<(M, S, f32)>)>>,
{
    fn evaluate(&mut self, states: &[S]) -> SearchResult<Vec<(f64, Vec<(M, S, f32)>)>> {
        self(states)
    }
}
