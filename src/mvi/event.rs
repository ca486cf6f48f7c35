/// Marker trait for events.
///
/// Events represent:
/// - User actions forwarded through a [`crate::UiSpin`]
/// - Results of effects run by feedbacks
/// - Anything pushed through a [`crate::Gear`]
pub trait Event: Send + 'static {}

impl<T> Event for T where T: Send + 'static {}
