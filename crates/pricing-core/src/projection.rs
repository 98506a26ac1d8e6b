//! Replay-based projection abstraction.
//!
//! Projections hold no state between reads: a view is rebuilt by folding
//! the complete event history of a stream, oldest first, every time.

use crate::error::DomainError;

/// A read model derived purely from an ordered event history.
pub trait Projection: Default {
    /// The event type this projection consumes.
    type Event;

    /// Folds one event into the projection. Must be free of side effects.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedEvent` if the event cannot follow the
    /// events applied so far.
    fn apply(&mut self, event: &Self::Event) -> Result<(), DomainError>;
}

/// Replays `events` in the given order into a fresh projection.
///
/// # Errors
///
/// Propagates the first error returned by `Projection::apply`.
pub fn replay<'e, P, I>(events: I) -> Result<P, DomainError>
where
    P: Projection,
    P::Event: 'e,
    I: IntoIterator<Item = &'e P::Event>,
{
    events.into_iter().try_fold(P::default(), |mut projection, event| {
        projection.apply(event)?;
        Ok(projection)
    })
}
