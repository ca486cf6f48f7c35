//! Feedback-loop state machines built on `futures` streams.
//!
//! A [`Spin`] closes a loop between state and side effects:
//!
//! ```text
//!  initial state ──→ Reducer ──→ State ──┬──→ output stream
//!                       ↑                │
//!                       │     replay-one holder
//!                       │                │
//!                     Events ←── Feedbacks ←┘
//! ```
//!
//! - **State**: the single current value, replayed to every feedback
//! - **Feedback**: turns the state stream into an event stream (the effect boundary)
//! - **Reducer**: pure `(State, Event) -> State`, run on its own [`Executor`]
//! - **Gear**: push-only event source for events not derived from state
//! - **UiSpin**: adapter exposing an observable state, `emit` and a render hook

pub mod config;
pub mod executor;
pub mod feedback;
pub mod gear;
pub mod logging;
pub mod mvi;
pub mod spin;
pub mod stream;
pub mod ui;

pub use executor::{Executor, ExecutorError, SerialExecutor};
pub use feedback::{ExecutionStrategy, Feedback};
pub use gear::Gear;
pub use mvi::{Event, Reduce, Reducer, State};
pub use spin::{Spin, SpinBuilder, SpinHandle};
pub use stream::{EventStream, StateStream};
pub use ui::{Binding, UiSpin};
