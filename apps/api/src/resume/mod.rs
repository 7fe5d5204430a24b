//! Resume upload and profiling.

pub mod handlers;
pub mod profiler;
