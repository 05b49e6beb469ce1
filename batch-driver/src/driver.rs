use std::io::Write as _;

use mcts_search::{HistoryEntry, Logging, MctsError, Search, SearchResult};

use crate::evaluator::Evaluator;
use crate::options::BatchDriverOptions;

/// Drives `n_games` [`Search`] trees in lock-step against a single batched
/// `Evaluator`: every [`Self::run_cycle`] collects the (at most `n_games`)
/// leaves due for evaluation across every game still in progress, hands
/// them to the evaluator as one batch, and dispatches the results back.
/// When a game's root turns terminal it is finalized and dropped from the
/// active set; [`Self::run`] loops until every game has been finalized.
///
/// A game not yet selected for in the current cycle (already finalized) is
/// represented as `None` in `searches`, so the active set shrinks in place
/// without disturbing the other games' indices.
pub struct BatchDriver<S, M, E> {
    searches: Vec<Option<Search<S, M>>>,
    noise_applied: Vec<bool>,
    results: Vec<Option<(f64, Vec<HistoryEntry<S, M>>)>>,
    evaluator: E,
    options: BatchDriverOptions,
    cycle: usize,
}

impl<S, M, E> BatchDriver<S, M, E>
where
    S: Clone,
    M: Clone,
    E: Evaluator<S, M>,
{
    /// Creates a driver owning `options.n_games` fresh searches, all seeded
    /// from `initial_state`/`phony_move`.
    pub fn new(options: BatchDriverOptions, initial_state: S, phony_move: M, evaluator: E) -> Self {
        let searches = (0..options.n_games)
            .map(|_| Some(Search::new(options.search.clone(), initial_state.clone(), phony_move.clone())))
            .collect();
        let noise_applied = vec![false; options.n_games];
        let results = (0..options.n_games).map(|_| None).collect();

        Self {
            searches,
            noise_applied,
            results,
            evaluator,
            options,
            cycle: 0,
        }
    }

    /// Runs cycles until every game has been finalized, returning one
    /// `(score, history)` pair per game, in the order the games were
    /// created.
    pub fn run(&mut self) -> SearchResult<Vec<(f64, Vec<HistoryEntry<S, M>>)>> {
        while self.searches.iter().any(Option::is_some) {
            self.run_cycle()?;
        }

        Ok(self
            .results
            .iter_mut()
            .map(|result| result.take().expect("every game was finalized by the loop above"))
            .collect())
    }

    /// Runs a single evaluation cycle: finalizes games whose root just
    /// became terminal, commits moves for games that reached their
    /// per-turn simulation budget, mixes in root Dirichlet noise for games
    /// starting a new turn, collects the batch of due leaves, and invokes
    /// the evaluator exactly once, even if the batch is empty.
    pub fn run_cycle(&mut self) -> SearchResult<()> {
        self.finalize_completed_games()?;
        self.commit_matured_turns()?;
        self.inject_root_noise()?;

        let mut leaf_indices = Vec::new();
        let mut leaf_handles = Vec::new();
        let mut leaf_states = Vec::new();

        for (index, slot) in self.searches.iter_mut().enumerate() {
            let Some(search) = slot else { continue };

            match search.select_leaf()? {
                None => {}
                Some(leaf) => {
                    leaf_states.push(search.leaf_game_state(leaf)?.clone());
                    leaf_handles.push(leaf);
                    leaf_indices.push(index);
                }
            }
            search.note_simulation();
        }

        let expansions = self.evaluator.evaluate(&leaf_states)?;
        if expansions.len() != leaf_states.len() {
            return Err(anyhow::Error::new(MctsError::EvaluatorFailure {
                expected: leaf_states.len(),
                got: expansions.len(),
            }));
        }

        for ((index, leaf), (value, expansion)) in leaf_indices.into_iter().zip(leaf_handles).zip(expansions) {
            let search = self.searches[index].as_mut().expect("index was collected from an active game");
            search.expand_leaf(leaf, value, expansion)?;
        }

        self.log_cycle_progress();
        self.cycle += 1;
        Ok(())
    }

    fn finalize_completed_games(&mut self) -> SearchResult<()> {
        for index in 0..self.searches.len() {
            let is_complete = self.searches[index].as_ref().is_some_and(Search::complete);
            if !is_complete {
                continue;
            }
            let search = self.searches[index].as_mut().expect("checked above");
            let (score, history) = search.collect_result()?;
            self.results[index] = Some((score, history));
            self.searches[index] = None;
        }
        Ok(())
    }

    fn commit_matured_turns(&mut self) -> SearchResult<()> {
        for index in 0..self.searches.len() {
            let Some(search) = self.searches[index].as_mut() else {
                continue;
            };
            if search.expanded() && search.searches_this_turn() >= self.options.n_evaluations {
                search.move_proportional()?;
                self.noise_applied[index] = false;
            }
        }
        Ok(())
    }

    /// Mixes Dirichlet noise into every active game's root exactly once per
    /// turn, as soon as the root is expanded. A root that starts a turn
    /// already expanded (carried over from tree reuse) may run one
    /// simulation before this fires; accepted as a pragmatic approximation
    /// rather than special-casing reused roots.
    fn inject_root_noise(&mut self) -> SearchResult<()> {
        for index in 0..self.searches.len() {
            let Some(search) = self.searches[index].as_mut() else {
                continue;
            };
            if search.expanded() && !self.noise_applied[index] {
                search.add_dirichlet_noise(self.options.search.dirichlet_alpha, self.options.search.dirichlet_fraction)?;
                self.noise_applied[index] = true;
            }
        }
        Ok(())
    }

    fn log_cycle_progress(&mut self) {
        let active = self.searches.iter().filter(|s| s.is_some()).count();
        let completed = self.searches.len() - active;

        match &mut self.options.logging {
            Logging::Disabled => {}
            Logging::Enabled { progress_writer } | Logging::Verbose { progress_writer, .. } => {
                let _ = writeln!(progress_writer, "cycle {}: {active} active, {completed} completed", self.cycle);
            }
            Logging::VerboseOnly { .. } => {}
        }

        if self.options.logging.is_verbose() {
            if let Some(first_active) = self.searches.iter().flatten().next() {
                if let Logging::Verbose { debug_writer, .. } | Logging::VerboseOnly { debug_writer } = &mut self.options.logging {
                    let _ = first_active.write_tree(debug_writer);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use mcts_search::test_support::{FakeEvaluator, FakeGame};
    use mcts_search::SearchOptions;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Adapts the single-state `FakeEvaluator` to the batched `Evaluator`
    /// trait expected by a [`BatchDriver`].
    struct BatchFakeEvaluator {
        inner: FakeEvaluator,
        calls: Vec<usize>,
    }

    impl Evaluator<FakeGame, bool> for BatchFakeEvaluator {
        fn evaluate(&mut self, states: &[FakeGame]) -> SearchResult<Vec<(f64, Vec<(bool, FakeGame, f32)>)>> {
            self.calls.push(states.len());
            Ok(states.iter().map(|state| self.inner.evaluate(state)).collect())
        }
    }

    fn options(n_games: usize, n_evaluations: usize) -> BatchDriverOptions {
        BatchDriverOptions {
            n_games,
            n_evaluations,
            search: SearchOptions { c_init: 1.25, c_base: 19_652.0, ..SearchOptions::default() },
            logging: Logging::Disabled,
        }
    }

    #[test]
    fn run_plays_every_game_to_completion() {
        let evaluator = BatchFakeEvaluator {
            inner: FakeEvaluator,
            calls: Vec::new(),
        };
        let mut driver = BatchDriver::new(options(3, 10), FakeGame::new(3), false, evaluator);

        let results = driver.run().unwrap();

        assert_eq!(results.len(), 3);
        for (_, history) in &results {
            assert!(!history.is_empty());
        }
    }

    #[test]
    fn evaluator_is_invoked_even_with_an_empty_batch() {
        let evaluator = BatchFakeEvaluator {
            inner: FakeEvaluator,
            calls: Vec::new(),
        };
        let mut driver = BatchDriver::new(options(1, 1), FakeGame::new(0), false, evaluator);

        let results = driver.run().unwrap();

        assert_eq!(results.len(), 1);
        // The cycle that finalizes the now-terminal game collects no
        // leaves at all; the evaluator must still be called on that
        // empty batch rather than being skipped.
        assert!(driver.evaluator.calls.contains(&0));
    }

    #[test]
    fn evaluator_shape_mismatch_surfaces_as_an_error() {
        struct BrokenEvaluator;
        impl Evaluator<FakeGame, bool> for BrokenEvaluator {
            fn evaluate(&mut self, _states: &[FakeGame]) -> SearchResult<Vec<(f64, Vec<(bool, FakeGame, f32)>)>> {
                Ok(Vec::new())
            }
        }

        let mut driver = BatchDriver::new(options(2, 5), FakeGame::new(3), false, BrokenEvaluator);
        let err = driver.run_cycle().unwrap_err();
        assert!(err.to_string().contains("returned"));
    }

    #[test]
    fn batch_excludes_games_already_terminal_at_cycle_start() {
        let evaluator = BatchFakeEvaluator {
            inner: FakeEvaluator,
            calls: Vec::new(),
        };
        let mut driver = BatchDriver::new(options(4, 50), FakeGame::new(3), false, evaluator);

        driver.searches[0] = None;
        driver.results[0] = Some((0.0, Vec::new()));
        driver.searches[2] = None;
        driver.results[2] = Some((0.0, Vec::new()));

        driver.run_cycle().unwrap();

        assert_eq!(driver.evaluator.calls.last().copied(), Some(2));
    }
}
