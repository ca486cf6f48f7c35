//! Model-View-Intent primitives the loop folds over.
//!
//! ```text
//! Event ──→ Reducer ──→ State ──→ Feedbacks
//!   ↑                                 │
//!   └─────────────────────────────────┘
//! ```
//!
//! - **State**: immutable value, cloned to create the next one
//! - **Event**: request for a change, consumed once by the reducer
//! - **Reducer**: pure function that folds events into state

mod event;
mod reducer;
mod state;

pub use event::Event;
pub use reducer::{Reduce, Reducer};
pub use state::State;
