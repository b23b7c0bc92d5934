/// An expensive, stateful evaluation that realizes a candidate and measures it.
///
/// An oracle stands in for an external collaborator such as a modeling
/// engine: [`evaluate`](Oracle::evaluate) applies a candidate parameter to
/// some shared external state and reports a scalar measurement, and
/// [`reset`](Oracle::reset) undoes whatever the previous evaluation left
/// behind.
///
/// Both methods take `&mut self` because every call mutates external state.
/// A solver holding `&mut O` for the duration of a run is therefore the only
/// party able to drive that oracle.
pub trait Oracle {
    /// Failure to realize or measure a specific candidate.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Failure to undo the effects of the previous evaluation.
    type ResetError: std::error::Error + Send + Sync + 'static;

    /// Restores the external state to how it was before the last evaluation.
    ///
    /// # Errors
    ///
    /// Returns [`Self::ResetError`] if the prior state cannot be restored.
    fn reset(&mut self) -> Result<(), Self::ResetError>;

    /// Realizes `candidate` and returns the resulting measurement.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the candidate cannot be realized or measured.
    fn evaluate(&mut self, candidate: f64) -> Result<f64, Self::Error>;
}

impl<O: Oracle + ?Sized> Oracle for &mut O {
    type Error = O::Error;
    type ResetError = O::ResetError;

    fn reset(&mut self) -> Result<(), Self::ResetError> {
        (**self).reset()
    }

    fn evaluate(&mut self, candidate: f64) -> Result<f64, Self::Error> {
        (**self).evaluate(candidate)
    }
}
