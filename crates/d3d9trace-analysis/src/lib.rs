#![forbid(unsafe_code)]

//! Analytics over decoded D3D9 capture traces.
//!
//! [`FrameStatistics`] is a pure per-frame reduction of a decoded
//! [`d3d9trace::TraceFrame`]; the [`advisor`] folds any number of frames'
//! statistics into batching-efficiency findings; [`batch`] decodes many
//! trace files in parallel and aggregates the lot. Results are structured
//! data for report/CLI layers to render, never printed text.

mod advisor;
mod batch;
mod stats;

pub use advisor::{BatchingAdvisor, BatchingSummary, Finding, LOW_PRIMITIVES_PER_DRAW};
pub use batch::{analyze_files, BatchReport, FileFailure, FrameReport};
pub use stats::FrameStatistics;
