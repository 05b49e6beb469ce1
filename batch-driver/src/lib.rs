//! Drives many [`mcts_search::Search`] trees in lock-step against a single
//! batched policy/value evaluator.
//!
//! A [`BatchDriver`] is the self-play half of the engine: `mcts-search`
//! never calls an evaluator itself, so this crate collects the leaves due
//! for evaluation across every game still in progress, hands them to the
//! evaluator as one batch per cycle, and dispatches the results back.

mod driver;
mod evaluator;
mod options;

pub use driver::BatchDriver;
pub use evaluator::Evaluator;
pub use mcts_search::{Logging, SearchOptions};
pub use options::BatchDriverOptions;
