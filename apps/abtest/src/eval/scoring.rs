//! Composite scoring: combines the individual metrics into one normalized
//! [0, 1] score per task.
//!
//! Weights:
//!   bullets:      0.6 * keyword_coverage + 0.4 * normalized_quantify
//!   cover_letter: 0.5 * keyword_coverage + 0.4 * normalized_quantify
//!                 + 0.1 bonus when the length constraint holds
//! Quantification is normalized by dividing by 2.0 and capping at 1.0.

use serde::Serialize;

use crate::eval::metrics::{keyword_coverage, length_ok, quantify_score, MAX_WORDS, MIN_WORDS};
use crate::task::Task;

/// Divisor that maps a typical quantify_score into [0, 1].
const QUANTIFY_NORM: f64 = 2.0;

/// Per-output metric values. One record per (sample, task, variant).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub keyword_coverage: f64,
    pub quantify_score: f64,
    /// Only meaningful for `cover_letter`; `None` for other tasks.
    pub length_ok: Option<bool>,
}

/// Computes all metrics for one generated output.
/// Values are rounded to 4 decimal places.
pub fn compute_metrics(jd: &str, output: &str, task: Task) -> MetricRecord {
    let lo = match task {
        Task::CoverLetter => Some(length_ok(output, MIN_WORDS, MAX_WORDS)),
        Task::Bullets => None,
    };
    MetricRecord {
        keyword_coverage: round4(keyword_coverage(jd, output)),
        quantify_score: round4(quantify_score(output)),
        length_ok: lo,
    }
}

/// Single weighted quality proxy in [0, 1], rounded to 4 decimal places.
/// Total over the string/task domain; invalid task names never reach here
/// because `Task` parsing rejects them at the CLI boundary.
pub fn composite_score(jd: &str, output: &str, task: Task) -> f64 {
    let m = compute_metrics(jd, output, task);
    let nq = (m.quantify_score / QUANTIFY_NORM).min(1.0);
    let score = match task {
        Task::CoverLetter => {
            let bonus = if m.length_ok == Some(true) { 0.1 } else { 0.0 };
            0.5 * m.keyword_coverage + 0.4 * nq + bonus
        }
        Task::Bullets => 0.6 * m.keyword_coverage + 0.4 * nq,
    };
    round4(score.min(1.0))
}

pub(crate) fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
