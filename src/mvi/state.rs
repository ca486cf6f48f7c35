/// Marker trait for loop state.
///
/// States are cloned into every feedback and into the output stream, so
/// they should be cheap to clone (or wrapped in an `Arc`).
pub trait State: Clone + Send + Sync + 'static {}

impl<T> State for T where T: Clone + Send + Sync + 'static {}
