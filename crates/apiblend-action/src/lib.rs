//! Action execution engine for APIBlend.
//!
//! Dispatches integration actions through pluggable per-kind handlers and
//! returns a normalized result envelope for every invocation. Data
//! operations (transform, filter) are pure; network actions go through a
//! shared HTTP client; unimplemented integrations are explicit simulations.

pub mod dispatcher;
pub mod error;
pub mod handler;

pub use dispatcher::Dispatcher;
pub use error::ActionError;
pub use handler::{ActionHandler, ActionRegistry};
