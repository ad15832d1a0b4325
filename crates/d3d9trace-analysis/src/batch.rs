use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use tracing::{debug, warn};

use d3d9trace::{decode_file, DecodeOptions, TraceFrame, TraceReadError};

use crate::advisor::{BatchingAdvisor, BatchingSummary, Finding};
use crate::stats::FrameStatistics;

/// Successful decode of one trace file plus its derived statistics.
#[derive(Debug)]
pub struct FrameReport {
    pub path: PathBuf,
    pub frame: TraceFrame,
    pub stats: FrameStatistics,
}

/// One trace file that could not be decoded at all.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: TraceReadError,
}

/// Outcome of a multi-file analysis pass.
#[derive(Debug)]
pub struct BatchReport {
    /// Per-file successes, in input order.
    pub reports: Vec<FrameReport>,
    /// Per-file failures, in input order. A failure here never aborted the
    /// rest of the batch.
    pub failures: Vec<FileFailure>,
    pub summary: BatchingSummary,
    pub findings: Vec<Finding>,
}

/// Decodes every file and folds the statistics into batching findings.
///
/// Each file decode is independent (pure given its own handle), so files are
/// decoded concurrently, one in flight per worker up to the host's available
/// parallelism. Workers only produce immutable per-file outcomes; the
/// calling thread does the advisor fold, which is an associative reduction
/// and therefore insensitive to completion order.
pub fn analyze_files(paths: &[PathBuf], options: &DecodeOptions) -> BatchReport {
    let mut outcomes = decode_all(paths, options);
    // Workers finish in arbitrary order; restore input order for reporting.
    outcomes.sort_by_key(|(index, _)| *index);

    let mut reports = Vec::new();
    let mut failures = Vec::new();
    let mut advisor = BatchingAdvisor::new();
    for (index, outcome) in outcomes {
        let path = paths[index].clone();
        match outcome {
            Ok(frame) => {
                let stats = FrameStatistics::from_frame(&frame);
                debug!(
                    path = %path.display(),
                    draw_calls = stats.draw_calls,
                    primitives = stats.total_primitives,
                    "decoded trace"
                );
                advisor.add(&stats);
                reports.push(FrameReport { path, frame, stats });
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "skipping undecodable trace");
                failures.push(FileFailure { path, error });
            }
        }
    }

    BatchReport {
        reports,
        failures,
        summary: advisor.summary(),
        findings: advisor.findings(),
    }
}

type Outcome = (usize, Result<TraceFrame, TraceReadError>);

fn decode_all(paths: &[PathBuf], options: &DecodeOptions) -> Vec<Outcome> {
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(paths.len());
    if workers <= 1 {
        return paths
            .iter()
            .enumerate()
            .map(|(index, path)| (index, decode_file(path, options)))
            .collect();
    }

    let next = AtomicUsize::new(0);
    let outcomes = Mutex::new(Vec::with_capacity(paths.len()));
    thread::scope(|scope| {
        for _ in 0..workers {
            scope.spawn(|| loop {
                let index = next.fetch_add(1, Ordering::Relaxed);
                let Some(path) = paths.get(index) else {
                    break;
                };
                let outcome = decode_file(path, options);
                outcomes
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push((index, outcome));
            });
        }
    });
    outcomes
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
