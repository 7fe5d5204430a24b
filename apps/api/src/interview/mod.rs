//! Interview sessions: question generation, answer evaluation, results.
//!
//! Model output never reaches persistence unvalidated; see [`reconciler`].

pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod reconciler;
pub mod store;
pub mod summary;
