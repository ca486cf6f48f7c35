//! Adapter between a loop and a UI layer.
//!
//! A [`UiSpin`] wraps a [`Spin`](crate::Spin) with one extra feedback that
//! mirrors every state into an observable value and a render callback, and
//! turns events emitted by the UI into loop events.

mod binding;
mod render;
mod spin;

pub use binding::Binding;
pub use spin::UiSpin;
