/// Tunables for a single [`crate::Search`], passed to
/// [`crate::Search::new`]/[`crate::Search::seeded`].
///
/// `c_init`/`c_base` follow the defaults from the `AlphaZero`/MuZero family
/// of papers (`1.25`/`19652.0`); `dirichlet_alpha`/`dirichlet_fraction` are
/// the exploration-noise defaults used for self-play at the root, read by a
/// caller when it invokes [`crate::Search::add_dirichlet_noise`]. There is
/// no `logging` field here: a `Search` never logs on its own, only
/// [`crate::Search::write_tree`] on request, so logging configuration lives
/// on the driver that owns one or more searches instead.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// The `c_init` constant of the PUCT exploration term.
    pub c_init: f64,
    /// The `c_base` constant of the PUCT exploration term. Must not be zero.
    pub c_base: f64,
    /// The `alpha` parameter of the Dirichlet noise mixed into the root's
    /// child priors at the start of a turn.
    pub dirichlet_alpha: f64,
    /// The fraction of Dirichlet noise mixed into the root's child priors.
    pub dirichlet_fraction: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            c_init: 1.25,
            c_base: 19_652.0,
            dirichlet_alpha: 0.3,
            dirichlet_fraction: 0.25,
        }
    }
}
