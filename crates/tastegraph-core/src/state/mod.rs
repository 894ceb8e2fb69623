//! Application state expressed as pure reducers.
//!
//! Each user action is applied to an immutable snapshot and produces a new
//! snapshot; callers replace their whole state with the result.

pub mod canvas;
pub mod graph;

pub use canvas::{CanvasAction, CanvasState};
pub use graph::{EdgeFilter, GraphAction, GraphState};
