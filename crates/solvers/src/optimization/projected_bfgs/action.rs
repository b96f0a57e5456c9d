/// Actions an observer can take during a projected BFGS search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the current iterate.
    StopEarly,

    /// Reject this line-search trial as if its objective were infinite.
    ///
    /// The line search backtracks toward the current iterate instead. Use
    /// this to recover from model or problem errors in a region known to be
    /// unphysical, or to keep the search out of a region entirely.
    /// Ignored for gradient probes.
    AssumeWorse,
}
