/// Actions an observer can take during a Nelder-Mead search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the search and return the best point found so far.
    ///
    /// This is the hook for cancelling a long-running search: an observer
    /// that checks an external flag can return it at any event.
    StopEarly,

    /// Treat the just-evaluated candidate as if the oracle had failed.
    ///
    /// The candidate receives the penalty objective and its measurement is
    /// discarded, so it can never be reported as the best point. This steers
    /// the simplex away from a region the caller knows to be unusable even
    /// when the oracle measured it successfully.
    ///
    /// Ignored on [`Event::Iterated`](super::Event::Iterated).
    AssumeWorse,
}
