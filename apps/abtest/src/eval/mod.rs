//! Heuristic evaluation of generated resume bullets and cover letters.
//!
//! `metrics` holds the individual surface-level metric functions;
//! `scoring` combines them into a per-output record and composite score.

pub mod metrics;
pub mod scoring;
