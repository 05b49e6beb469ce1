//! A batched PUCT/Monte-Carlo tree search engine.
//!
//! A [`Search`] owns exactly one game tree. It never calls an evaluator
//! itself; instead it exposes a five-phase API — [`Search::select_leaf`],
//! [`Search::expand_leaf`], [`Search::add_dirichlet_noise`],
//! [`Search::move_greedy`]/[`Search::move_proportional`], and
//! [`Search::collect_result`] — so that a driver can batch the evaluator
//! call across many concurrently-running searches. See `batch-driver` for
//! such a driver.

mod error;
mod history;
mod logging;
mod node;
mod options;
mod search;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{MctsError, SearchResult};
pub use history::HistoryEntry;
pub use logging::Logging;
pub use options::SearchOptions;
pub use search::{LeafHandle, Search};
