use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand_distr::{Dirichlet, Distribution};

use crate::error::contract_violation;
use crate::history::HistoryEntry;
use crate::node::{Node, NodeId, NodePool};
use crate::{MctsError, SearchOptions, SearchResult};

/// A non-owning reference to an unexpanded node inside one [`Search`]'s
/// pool, returned by [`Search::select_leaf`]. Tagged with the search's
/// generation at the moment it was issued: any later mutating call on the
/// search (`expand_leaf`, `move_greedy`, `move_proportional`,
/// `collect_result`, `reset`) invalidates every handle issued before it, and
/// using a stale handle returns [`MctsError::ContractViolation`] rather than
/// the undefined behavior the specification allows, turning a lifetime
/// foot-gun into a checked error. `LeafHandle` carries no borrow, so it is
/// `Copy`.
#[derive(Debug, Clone, Copy)]
pub struct LeafHandle {
    id: NodeId,
    generation: u32,
}

/// One game tree, owned exclusively: the root, the node pool and its
/// freelist, the per-game history buffer, and a PRNG. See the crate-level
/// documentation for the five-phase API.
pub struct Search<S, M> {
    pool: NodePool<S, M>,
    root: Option<NodeId>,
    history: Vec<HistoryEntry<S, M>>,
    c_init: f64,
    c_base: f64,
    rng: StdRng,
    searches_this_turn: usize,
    generation: u32,
}

impl<S: Clone, M: Clone> Search<S, M> {
    /// Creates a new search with an unexpanded root holding `initial_state`,
    /// seeded from platform entropy.
    pub fn new(options: SearchOptions, initial_state: S, phony_move: M) -> Self {
        Self::with_rng(options, initial_state, phony_move, StdRng::from_entropy())
    }

    /// Creates a new search seeded deterministically, for reproducible tests.
    pub fn seeded(options: SearchOptions, initial_state: S, phony_move: M, seed: u64) -> Self {
        Self::with_rng(options, initial_state, phony_move, StdRng::seed_from_u64(seed))
    }

    fn with_rng(options: SearchOptions, initial_state: S, phony_move: M, rng: StdRng) -> Self {
        let mut pool = NodePool::new();
        let root = pool.alloc(Node {
            move_in: phony_move,
            game_state: initial_state,
            prior_probability: 0.0,
            parent: None,
            first_child: None,
            next_sibling: None,
            n_visits: 0,
            total_av: 0.0,
        });

        Self {
            pool,
            root: Some(root),
            history: Vec::new(),
            c_init: options.c_init,
            c_base: options.c_base,
            rng,
            searches_this_turn: 0,
            generation: 0,
        }
    }

    /// Drops the root and history and reinstalls an unexpanded root holding
    /// `initial_state`. Returns to the Fresh state from any state.
    pub fn reset(&mut self, initial_state: S, phony_move: M) -> SearchResult<()> {
        if let Some(old_root) = self.root.take() {
            self.pool.free_subtree(old_root);
        }
        self.history.clear();
        self.pool.reserve(1)?;
        let root = self.pool.alloc(Node {
            move_in: phony_move,
            game_state: initial_state,
            prior_probability: 0.0,
            parent: None,
            first_child: None,
            next_sibling: None,
            n_visits: 0,
            total_av: 0.0,
        });
        self.root = Some(root);
        self.searches_this_turn = 0;
        self.bump_generation();
        Ok(())
    }

    // --- observers --------------------------------------------------

    /// The game state stored at the current root.
    ///
    /// # Panics
    ///
    /// Panics if the search has already been collected.
    pub fn game_state(&self) -> &S {
        &self.pool.get(self.live_root()).game_state
    }

    /// Whether the root has been expanded (has received at least one visit).
    pub fn expanded(&self) -> bool {
        self.root.is_some_and(|id| self.pool.get(id).expanded())
    }

    /// Whether the root is terminal, i.e. the game is over at this point.
    pub fn complete(&self) -> bool {
        self.root.is_some_and(|id| self.pool.get(id).terminal())
    }

    /// Whether the root has been dropped by [`Self::collect_result`].
    pub fn collected(&self) -> bool {
        self.root.is_none()
    }

    /// The number of moves played so far, including the one in progress.
    pub fn turns(&self) -> usize {
        self.history.len() + 1
    }

    /// The number of live nodes currently held by this search's pool.
    pub fn nodes_in_tree(&self) -> usize {
        self.pool.live_count()
    }

    /// The current root's visit count.
    pub fn root_visits(&self) -> usize {
        self.root.map_or(0, |id| self.pool.get(id).n_visits as usize)
    }

    /// The line obtained by repeatedly descending into the most-visited
    /// child. For debug logging only: move selection always goes through
    /// [`Self::move_greedy`]/[`Self::move_proportional`].
    pub fn principal_variation(&self) -> Vec<M> {
        let mut line = Vec::new();
        let Some(mut current) = self.root else {
            return line;
        };

        loop {
            let Some(next) = self.most_visited_child(current) else {
                break;
            };
            line.push(self.pool.get(next).move_in.clone());
            current = next;
        }

        line
    }

    /// A recursive, indented dump of the current tree (visit count, Q,
    /// prior per node), for `Logging::Verbose`/`VerboseOnly`.
    pub fn write_tree(&self, writer: &mut dyn std::io::Write) -> std::io::Result<()> {
        let Some(root_id) = self.root else {
            return writeln!(writer, "<collected>");
        };
        writeln!(writer, "{}", self.tree_lines(root_id).join("\n"))
    }

    fn tree_lines(&self, id: NodeId) -> Vec<String> {
        let node = self.pool.get(id);
        let q = if node.n_visits > 0 {
            node.total_av / f64::from(node.n_visits)
        } else {
            0.0
        };

        let mut lines = vec![format!(
            "visits={} q={:.3} prior={:.3}",
            node.n_visits, q, node.prior_probability
        )];

        let mut children = Vec::new();
        let mut next = node.first_child;
        while let Some(child_id) = next {
            children.push(child_id);
            next = self.pool.get(child_id).next_sibling;
        }
        children.sort_by_key(|id| std::cmp::Reverse(self.pool.get(*id).n_visits));

        let last_index = children.len().saturating_sub(1);
        for (index, child_id) in children.into_iter().enumerate() {
            let is_last = index == last_index;
            let branch = if is_last { "└── " } else { "├── " };
            let pad = if is_last { "    " } else { "│   " };
            for (line_index, line) in self.tree_lines(child_id).into_iter().enumerate() {
                let prefix = if line_index == 0 { branch } else { pad };
                lines.push(format!("{prefix}{line}"));
            }
        }

        lines
    }

    fn most_visited_child(&self, parent: NodeId) -> Option<NodeId> {
        let mut best = None;
        let mut best_visits = 0u32;
        let mut next = self.pool.get(parent).first_child;
        while let Some(child_id) = next {
            let child = self.pool.get(child_id);
            if best.is_none() || child.n_visits > best_visits {
                best = Some(child_id);
                best_visits = child.n_visits;
            }
            next = child.next_sibling;
        }
        best
    }

    fn live_root(&self) -> NodeId {
        self.root.expect("operation requires a non-collected search")
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    // --- dirichlet noise ---------------------------------------------

    /// Mixes `Dirichlet(alpha)` noise into the root's child priors:
    /// `prior' = fraction * noise + (1 - fraction) * prior`. Invoked by the
    /// driver at the root of each turn before the bulk of the search budget
    /// is spent; the evaluator is free not to call it.
    pub fn add_dirichlet_noise(&mut self, alpha: f64, fraction: f64) -> SearchResult<()> {
        let root_id = self.require_playing("add_dirichlet_noise")?;

        let mut children = Vec::new();
        let mut next = self.pool.get(root_id).first_child;
        while let Some(child_id) = next {
            children.push(child_id);
            next = self.pool.get(child_id).next_sibling;
        }
        if children.is_empty() {
            return Ok(());
        }

        let dirichlet = Dirichlet::new_with_size(alpha, children.len()).map_err(|_| {
            anyhow::Error::new(MctsError::AllocationFailure {
                reason: "failed to construct the dirichlet distribution",
            })
        })?;
        let noise: Vec<f64> = dirichlet.sample(&mut self.rng);

        for (child_id, eta) in children.into_iter().zip(noise) {
            let child = self.pool.get_mut(child_id);
            let prior = f64::from(child.prior_probability);
            child.prior_probability = (fraction * eta + (1.0 - fraction) * prior) as f32;
        }

        Ok(())
    }

    // --- selection / expansion / backpropagation ----------------------

    /// Descends from the root via PUCT while the current node is expanded
    /// and non-terminal. If the descent reaches a terminal node, bumps its
    /// visit count and backpropagates `-terminal.total_av` from its parent
    /// (terminal nodes must still soak up visits so that PUCT keeps
    /// exploring their siblings), and returns `None`. Otherwise returns the
    /// unexpanded node reached as a [`LeafHandle`].
    pub fn select_leaf(&mut self) -> SearchResult<Option<LeafHandle>> {
        let mut current = self.live_root();
        debug_assert!(
            !self.pool.get(current).terminal(),
            "select_leaf called on an already-terminal root; the caller should have called collect_result instead"
        );

        loop {
            let node = self.pool.get(current);
            if !node.expanded() || node.terminal() {
                break;
            }
            current = self.select_best_child(current);
        }

        let node = self.pool.get(current);
        if node.terminal() {
            let parent = node.parent;
            let v = -node.total_av;
            self.pool.get_mut(current).n_visits += 1;
            self.backpropagate(parent, v);
            return Ok(None);
        }

        Ok(Some(LeafHandle {
            id: current,
            generation: self.generation,
        }))
    }

    fn select_best_child(&self, parent: NodeId) -> NodeId {
        let parent_node = self.pool.get(parent);
        let n_parent = f64::from(parent_node.n_visits);
        let log_term = if self.c_base == 0.0 {
            self.c_init
        } else {
            (1.0 + n_parent + self.c_base).ln() - self.c_base.ln() + self.c_init
        };

        let mut best = None;
        let mut best_score = 0.0_f64;
        let mut index = 0usize;
        let mut next = parent_node.first_child;
        while let Some(child_id) = next {
            let child = self.pool.get(child_id);
            let q = if child.n_visits > 0 {
                child.total_av / f64::from(child.n_visits)
            } else {
                0.0
            };
            let u = log_term * f64::from(child.prior_probability) * n_parent.sqrt() / (1.0 + f64::from(child.n_visits));
            let score = q + u;

            if index == 0 || score > best_score {
                best = Some(child_id);
                best_score = score;
            }

            next = child.next_sibling;
            index += 1;
        }

        best.expect("an expanded, non-terminal node has at least one child")
    }

    /// Walks upward from `node` (inclusive) while it is present: bumps its
    /// visit count, adds `v` to its total action-value, negates `v`, and
    /// moves to its parent.
    fn backpropagate(&mut self, mut node: Option<NodeId>, mut v: f64) {
        while let Some(id) = node {
            let n = self.pool.get_mut(id);
            n.n_visits += 1;
            n.total_av += v;
            v = -v;
            node = n.parent;
        }
    }

    /// The game state stored at `leaf`, for handing to the evaluator.
    pub fn leaf_game_state(&self, leaf: LeafHandle) -> SearchResult<&S> {
        self.check_leaf(leaf)?;
        Ok(&self.pool.get(leaf.id).game_state)
    }

    fn check_leaf(&self, leaf: LeafHandle) -> SearchResult<()> {
        if leaf.generation != self.generation {
            return Err(contract_violation("expand_leaf", "leaf handle is stale"));
        }
        Ok(())
    }

    /// Installs `expansion` as `leaf`'s children, sets its visit count to 1
    /// and its total action-value to `value`, then backpropagates `value`
    /// with sign alternation up to (and including) the root's absent
    /// parent. Passing an empty `expansion` is legal and produces a
    /// terminal leaf.
    ///
    /// All children are built and the pool capacity for them reserved
    /// before any is linked in, so a failure here never leaves the leaf
    /// partially expanded.
    pub fn expand_leaf(&mut self, leaf: LeafHandle, value: f64, expansion: Vec<(M, S, f32)>) -> SearchResult<()> {
        self.check_leaf(leaf)?;
        let leaf_id = leaf.id;

        if self.pool.get(leaf_id).n_visits != 0 {
            return Err(contract_violation("expand_leaf", "leaf is already expanded"));
        }

        self.pool.reserve(expansion.len())?;

        let mut first_child = None;
        let mut prev: Option<NodeId> = None;
        for (mv, state, prior) in expansion {
            let child_id = self.pool.alloc(Node {
                move_in: mv,
                game_state: state,
                prior_probability: prior,
                parent: Some(leaf_id),
                first_child: None,
                next_sibling: None,
                n_visits: 0,
                total_av: 0.0,
            });
            if first_child.is_none() {
                first_child = Some(child_id);
            }
            if let Some(prev_id) = prev {
                self.pool.get_mut(prev_id).next_sibling = Some(child_id);
            }
            prev = Some(child_id);
        }

        let leaf_node = self.pool.get_mut(leaf_id);
        leaf_node.first_child = first_child;
        leaf_node.n_visits = 1;
        leaf_node.total_av = value;
        let parent = leaf_node.parent;

        self.backpropagate(parent, -value);
        self.bump_generation();
        Ok(())
    }

    // --- committing a move --------------------------------------------

    fn require_playing(&self, operation: &'static str) -> SearchResult<NodeId> {
        let Some(root_id) = self.root else {
            return Err(contract_violation(operation, "search has already been collected"));
        };
        let root = self.pool.get(root_id);
        if !root.expanded() {
            return Err(contract_violation(operation, "root is not expanded yet"));
        }
        if root.terminal() {
            return Err(contract_violation(operation, "root is already terminal"));
        }
        Ok(root_id)
    }

    /// Commits the child with the strictly largest visit count, ties broken
    /// by earliest sibling.
    pub fn move_greedy(&mut self) -> SearchResult<M> {
        let root_id = self.require_playing("move_greedy")?;
        let new_root = self
            .most_visited_child(root_id)
            .expect("an expanded, non-terminal root has at least one child");
        let mv = self.pool.get(new_root).move_in.clone();
        self.commit(Some(new_root));
        Ok(mv)
    }

    /// Commits a child with probability proportional to its visit count.
    /// Special-cased when `root.n_visits == 1`: uniform over children via
    /// reservoir sampling.
    pub fn move_proportional(&mut self) -> SearchResult<M> {
        let root_id = self.require_playing("move_proportional")?;
        let root_visits = self.pool.get(root_id).n_visits;

        let new_root = if root_visits == 1 {
            self.reservoir_sample_child(root_id)
        } else {
            self.weighted_sample_child(root_id, root_visits)
        }
        .expect("an expanded, non-terminal root has at least one child");

        let mv = self.pool.get(new_root).move_in.clone();
        self.commit(Some(new_root));
        Ok(mv)
    }

    fn reservoir_sample_child(&mut self, root_id: NodeId) -> Option<NodeId> {
        let mut chosen = None;
        let mut k = 0usize;
        let mut next = self.pool.get(root_id).first_child;
        while let Some(child_id) = next {
            if self.rng.gen_range(0..=k) == 0 {
                chosen = Some(child_id);
            }
            k += 1;
            next = self.pool.get(child_id).next_sibling;
        }
        chosen
    }

    fn weighted_sample_child(&mut self, root_id: NodeId, root_visits: u32) -> Option<NodeId> {
        let total = root_visits - 1;
        let draw = self.rng.gen_range(0..total);

        let mut cumulative = 0u32;
        let mut chosen = None;
        let mut next = self.pool.get(root_id).first_child;
        while let Some(child_id) = next {
            let child = self.pool.get(child_id);
            cumulative += child.n_visits;
            if chosen.is_none() && draw < cumulative {
                chosen = Some(child_id);
            }
            next = child.next_sibling;
        }
        chosen
    }

    /// Produces `(score, history)` and drops the root. `score` is
    /// `root.total_av` if the root is terminal, else `0`; negated if the
    /// resulting history length is even, normalizing to the perspective of
    /// the player to move at the initial position.
    pub fn collect_result(&mut self) -> SearchResult<(f64, Vec<HistoryEntry<S, M>>)> {
        let Some(root_id) = self.root else {
            return Err(contract_violation("collect_result", "search has already been collected"));
        };
        let root = self.pool.get(root_id);
        let score = if root.terminal() { root.total_av } else { 0.0 };

        self.commit(None);

        let score = if self.history.len() % 2 == 0 { -score } else { score };
        let history = std::mem::take(&mut self.history);
        Ok((score, history))
    }

    /// Shared bookkeeping for `move_greedy`/`move_proportional`
    /// (`new_root = Some(..)`) and `collect_result`
    /// (`new_root = None`): records a `HistoryEntry` for the current root
    /// position, frees every discarded child subtree, and either adopts
    /// `new_root` or drops the root entirely.
    fn commit(&mut self, new_root: Option<NodeId>) {
        let root_id = self.root.expect("commit requires a live root");
        let root = self.pool.get(root_id);
        let denom = f64::from(root.n_visits.saturating_sub(1));

        let mut probabilities = Vec::new();
        let mut next = root.first_child;
        while let Some(child_id) = next {
            let child = self.pool.get(child_id);
            let p = if denom > 0.0 { f64::from(child.n_visits) / denom } else { 0.0 };
            probabilities.push((child.move_in.clone(), p));
            next = child.next_sibling;

            if Some(child_id) != new_root {
                self.pool.free_subtree(child_id);
            }
        }

        let root = self.pool.get(root_id);
        self.history.push(HistoryEntry {
            game_state: root.game_state.clone(),
            search_probabilities: probabilities,
        });

        if let Some(new_root_id) = new_root {
            let new_root_node = self.pool.get_mut(new_root_id);
            new_root_node.parent = None;
            new_root_node.next_sibling = None;
            self.pool.free(root_id);
            self.root = Some(new_root_id);
        } else {
            self.pool.free(root_id);
            self.root = None;
        }

        self.searches_this_turn = 0;
        self.bump_generation();
    }

    /// The number of simulations run at the current root since the last
    /// move commit, for the driver's turn-budget bookkeeping.
    pub fn searches_this_turn(&self) -> usize {
        self.searches_this_turn
    }

    /// Called by a driver after it runs a simulation against this search's
    /// current root, to track the per-turn budget reported by
    /// [`Self::searches_this_turn`].
    pub fn note_simulation(&mut self) {
        self.searches_this_turn += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeEvaluator, FakeGame};
    use pretty_assertions::assert_eq;

    fn opts(c_init: f64, c_base: f64) -> SearchOptions {
        SearchOptions { c_init, c_base, ..SearchOptions::default() }
    }

    fn run_cycle(search: &mut Search<FakeGame, bool>, evaluator: &FakeEvaluator) {
        match search.select_leaf().unwrap() {
            None => {}
            Some(leaf) => {
                let state = search.leaf_game_state(leaf).unwrap().clone();
                let (value, expansion) = evaluator.evaluate(&state);
                search.expand_leaf(leaf, value, expansion).unwrap();
            }
        }
    }

    #[test]
    fn fresh_search_is_not_expanded() {
        let search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(3), false, 1);
        assert!(!search.expanded());
        assert!(!search.complete());
        assert!(!search.collected());
        assert_eq!(search.nodes_in_tree(), 1);
    }

    #[test]
    fn select_leaf_on_fresh_root_returns_the_root() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(3), false, 1);
        let leaf = search.select_leaf().unwrap().expect("root is not terminal");
        assert!(search.leaf_game_state(leaf).unwrap().path.is_empty());
    }

    #[test]
    fn expand_leaf_expands_root_and_backpropagates() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(3), false, 1);
        let evaluator = FakeEvaluator;
        run_cycle(&mut search, &evaluator);
        assert!(search.expanded());
        assert_eq!(search.root_visits(), 1);
        assert_eq!(search.nodes_in_tree(), 3);
    }

    #[test]
    fn stale_leaf_handle_is_rejected() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(3), false, 1);
        let evaluator = FakeEvaluator;
        let leaf = search.select_leaf().unwrap().unwrap();
        let state = search.leaf_game_state(leaf).unwrap().clone();
        let (value, expansion) = evaluator.evaluate(&state);
        search.expand_leaf(leaf, value, expansion).unwrap();

        let err = search.leaf_game_state(leaf).unwrap_err();
        assert!(err.to_string().contains("stale"));
    }

    #[test]
    fn move_greedy_commits_a_single_child_and_records_history() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(4), false, 3);
        let evaluator = FakeEvaluator;
        for _ in 0..20 {
            run_cycle(&mut search, &evaluator);
        }
        search.move_greedy().unwrap();
        assert_eq!(search.turns(), 2);
        assert_eq!(search.game_state().path.len(), 1);
    }

    #[test]
    fn playing_to_completion_collects_a_result_and_history() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(2), false, 11);
        let evaluator = FakeEvaluator;

        while !search.complete() {
            if !search.expanded() {
                run_cycle(&mut search, &evaluator);
                continue;
            }
            for _ in 0..30 {
                run_cycle(&mut search, &evaluator);
            }
            search.move_greedy().unwrap();
        }

        let (_score, history) = search.collect_result().unwrap();
        assert!(!history.is_empty());
        assert!(search.collected());
    }

    #[test]
    fn collect_result_on_collected_search_errors() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(0), false, 1);
        run_cycle(&mut search, &FakeEvaluator);
        let _ = search.collect_result().unwrap();
        assert!(search.collect_result().is_err());
    }

    /// SPEC_FULL §8's round-trip property: `reset(s)` followed by a single
    /// `expand_leaf` with an empty expansion and then `collect_result`
    /// yields `score == av` and a one-entry history whose state is `s`, with
    /// no negation — the history length the negation check reads is the
    /// one `commit(None)` has just pushed to (length 1, odd), not the
    /// length from before that push (length 0, even).
    #[test]
    fn collect_result_round_trip_matches_av_with_no_prior_moves() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(0), false, 7);
        let initial_state = search.game_state().clone();
        let leaf = search.select_leaf().unwrap().expect("fresh root is not terminal");
        search.expand_leaf(leaf, 0.42, Vec::new()).unwrap();

        let (score, history) = search.collect_result().unwrap();

        assert_eq!(score, 0.42);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].game_state, initial_state);
        assert!(history[0].search_probabilities.is_empty());
    }

    /// Scenario 6's sign alternation, pinned down against an exact,
    /// hand-computed tree rather than the ambiguous prose count in SPEC_FULL
    /// §8 scenario 1: after one real move is committed via `move_greedy`
    /// before `collect_result` runs its own final commit, the returned
    /// history has two entries (even), so the terminal's own `total_av` is
    /// negated in the reported score.
    #[test]
    fn collect_result_negates_score_after_one_committed_move() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(1), false, 2);
        let evaluator = FakeEvaluator;
        run_cycle(&mut search, &evaluator); // expands the root into two depth-1 children
        run_cycle(&mut search, &evaluator); // expands the first (tied) child into a terminal

        search.move_greedy().unwrap(); // commits that terminal child as the new root
        assert!(search.complete());

        let (score, history) = search.collect_result().unwrap();

        assert_eq!(history.len(), 2);
        // The committed terminal's own value is -1.0 (odd path length under
        // FakeEvaluator's parity rule); the even resulting history length
        // negates it back to +1.0.
        assert_eq!(score, 1.0);
    }

    #[test]
    fn dirichlet_noise_preserves_a_probability_distribution() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(3), false, 42);
        run_cycle(&mut search, &FakeEvaluator);
        search.add_dirichlet_noise(0.3, 0.25).unwrap();

        let root_id = search.root.unwrap();
        let mut total = 0.0;
        let mut next = search.pool.get(root_id).first_child;
        while let Some(id) = next {
            let child = search.pool.get(id);
            total += f64::from(child.prior_probability);
            next = child.next_sibling;
        }
        assert!((total - 1.0).abs() < 1e-4);
    }

    #[test]
    fn c_base_zero_reduces_puct_to_pure_exploitation() {
        let mut search = Search::seeded(opts(0.0, 0.0), FakeGame::new(3), false, 5);
        run_cycle(&mut search, &FakeEvaluator);
        let root_id = search.root.unwrap();
        let chosen = search.select_best_child(root_id);
        assert!(!search.pool.get(chosen).terminal());
    }

    #[test]
    fn terminal_leaf_soaks_up_repeated_visits() {
        // depth 1: root's single expansion step already yields terminal
        // children (path.len() == 1 == depth).
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(1), false, 9);
        let evaluator = FakeEvaluator;
        run_cycle(&mut search, &evaluator); // expands the root
        run_cycle(&mut search, &evaluator); // expands a terminal child, av backprops to root

        let visits_after_first_terminal = search.root_visits();
        for _ in 0..5 {
            let leaf = search.select_leaf().unwrap();
            assert!(leaf.is_none(), "descent should land on an already-terminal child");
        }
        assert_eq!(search.root_visits(), visits_after_first_terminal + 5);
    }

    #[test]
    fn write_tree_does_not_panic_and_mentions_visits() {
        let mut search = Search::seeded(opts(1.25, 19_652.0), FakeGame::new(3), false, 3);
        run_cycle(&mut search, &FakeEvaluator);
        let mut buf = Vec::new();
        search.write_tree(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("visits="));
    }
}
