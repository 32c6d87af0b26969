//! Shared data model for the APIBlend action engine.
//!
//! Defines the closed set of action kinds, the per-request action shape,
//! and the normalized result envelope every action returns.

pub mod result;
pub mod types;

pub use result::{ExecutionResult, ResponseBody};
pub use types::{Action, ActionKind};
