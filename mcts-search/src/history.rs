/// A single training record, recorded each time a move is committed at the
/// root: the game state the search was reasoning about, and the resulting
/// search probability assigned to each of the root's children, in the
/// root's child-list order at the moment of commit.
#[derive(Debug, Clone)]
pub struct HistoryEntry<S, M> {
    pub game_state: S,
    pub search_probabilities: Vec<(M, f64)>,
}
