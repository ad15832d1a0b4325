use crate::stats::FrameStatistics;

/// Average primitives-per-draw below which a frame set is flagged as having
/// high batching potential.
pub const LOW_PRIMITIVES_PER_DRAW: f64 = 100.0;

/// Advisory finding about batching efficiency across a set of frames.
///
/// Findings are data, not errors; rendering them is a reporting concern.
#[derive(Clone, Debug, PartialEq)]
pub enum Finding {
    /// Many small draw calls: batching similar draws would cut per-call CPU
    /// overhead.
    LowPrimitivesPerDraw { average: f64 },
    /// Some draws supply vertex/index data inline ("user pointer"). Each one
    /// costs a fresh upload and is harder to batch.
    HighImmediateDrawRatio {
        ratio: f64,
        immediate_draws: u64,
        total_draws: u64,
    },
}

/// Aggregate numbers across the folded frame set.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BatchingSummary {
    pub frames: u64,
    pub total_draw_calls: u64,
    pub total_primitives: u64,
    pub immediate_draws: u64,
    pub average_draws_per_frame: f64,
    pub average_primitives_per_draw: f64,
}

/// Cross-frame accumulator for batching heuristics.
///
/// Folding is associative and order-independent, so per-frame statistics
/// computed on worker threads can be added in any order.
#[derive(Clone, Debug, Default)]
pub struct BatchingAdvisor {
    frames: u64,
    total_draw_calls: u64,
    total_primitives: u64,
    immediate_draws: u64,
}

impl BatchingAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stats: &FrameStatistics) {
        self.frames += 1;
        self.total_draw_calls += stats.draw_calls;
        self.total_primitives += stats.total_primitives;
        self.immediate_draws += stats.immediate_draws;
    }

    pub fn summary(&self) -> BatchingSummary {
        let average_draws_per_frame = if self.frames == 0 {
            0.0
        } else {
            self.total_draw_calls as f64 / self.frames as f64
        };
        let average_primitives_per_draw = if self.total_draw_calls == 0 {
            0.0
        } else {
            self.total_primitives as f64 / self.total_draw_calls as f64
        };
        BatchingSummary {
            frames: self.frames,
            total_draw_calls: self.total_draw_calls,
            total_primitives: self.total_primitives,
            immediate_draws: self.immediate_draws,
            average_draws_per_frame,
            average_primitives_per_draw,
        }
    }

    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        if self.total_draw_calls == 0 {
            return findings;
        }
        let summary = self.summary();
        if summary.average_primitives_per_draw < LOW_PRIMITIVES_PER_DRAW {
            findings.push(Finding::LowPrimitivesPerDraw {
                average: summary.average_primitives_per_draw,
            });
        }
        if self.immediate_draws > 0 {
            findings.push(Finding::HighImmediateDrawRatio {
                ratio: self.immediate_draws as f64 / self.total_draw_calls as f64,
                immediate_draws: self.immediate_draws,
                total_draws: self.total_draw_calls,
            });
        }
        findings
    }
}
