use mcts_search::{Logging, SearchOptions};

/// Tunables for a [`crate::BatchDriver`] run.
///
/// `n_games`/`n_evaluations` follow the `TrainingArgs`-style self-play
/// configuration; `search` is forwarded, cloned, into every
/// [`mcts_search::Search`] the driver owns, so all of a run's games search
/// with identical PUCT/noise constants unless the caller builds per-game
/// options itself.
///
/// Not `Clone`: `logging`'s `Box<dyn Write>` targets aren't, the same
/// reason [`mcts_search::Logging`] itself isn't.
#[derive(Debug)]
pub struct BatchDriverOptions {
    /// The number of games played concurrently by this driver.
    pub n_games: usize,
    /// The number of simulations run at each root before a move is
    /// committed.
    pub n_evaluations: usize,
    /// The PUCT/dirichlet tunables forwarded to every owned
    /// [`mcts_search::Search`].
    pub search: SearchOptions,
    /// Logging configuration for this driver.
    pub logging: Logging,
}

impl Default for BatchDriverOptions {
    fn default() -> Self {
        Self {
            n_games: 1,
            n_evaluations: 800,
            search: SearchOptions::default(),
            logging: Logging::default(),
        }
    }
}
