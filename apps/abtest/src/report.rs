//! Aggregation and export: the full results table, the grouped summary,
//! and the optional archive bundling everything for download.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::errors::AppError;
use crate::eval::scoring::round4;

pub const RESULTS_FILE: &str = "results.csv";
pub const SUMMARY_FILE: &str = "summary.csv";
pub const ARCHIVE_FILE: &str = "ab_run.zip";
pub const RAW_DIR: &str = "raw";

/// One row per (sample, task, variant). `output` carries the generated text
/// verbatim, including any `[ERROR ...]` placeholder.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRow {
    pub sample_id: String,
    pub task: String,
    pub model_type: String,
    pub model_name: String,
    pub output: String,
    pub keyword_coverage: f64,
    pub quantify_score: f64,
    pub length_ok: Option<bool>,
    pub composite_score: f64,
}

/// Mean metrics for one (task, model_type, model_name) group.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub task: String,
    pub model_type: String,
    pub model_name: String,
    pub keyword_coverage: f64,
    pub quantify_score: f64,
    pub composite_score: f64,
}

/// Groups result rows by (task, model_type, model_name) and averages the
/// numeric metrics. Group order is stable (lexicographic by key).
pub fn summarize(rows: &[ResultRow]) -> Vec<SummaryRow> {
    #[derive(Default)]
    struct Acc {
        n: usize,
        kc: f64,
        qs: f64,
        cs: f64,
    }

    let mut groups: BTreeMap<(String, String, String), Acc> = BTreeMap::new();
    for row in rows {
        let acc = groups
            .entry((row.task.clone(), row.model_type.clone(), row.model_name.clone()))
            .or_default();
        acc.n += 1;
        acc.kc += row.keyword_coverage;
        acc.qs += row.quantify_score;
        acc.cs += row.composite_score;
    }

    groups
        .into_iter()
        .map(|((task, model_type, model_name), acc)| {
            let n = acc.n as f64;
            SummaryRow {
                task,
                model_type,
                model_name,
                keyword_coverage: round4(acc.kc / n),
                quantify_score: round4(acc.qs / n),
                composite_score: round4(acc.cs / n),
            }
        })
        .collect()
}

/// Writes the full results table as CSV and returns its path.
pub fn write_results(out_dir: &Path, rows: &[ResultRow]) -> Result<PathBuf, AppError> {
    let path = out_dir.join(RESULTS_FILE);
    let mut wtr = csv::Writer::from_path(&path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    info!("Wrote {} result row(s) to {}", rows.len(), path.display());
    Ok(path)
}

/// Writes the grouped summary table as CSV and returns its path.
pub fn write_summary(out_dir: &Path, summary: &[SummaryRow]) -> Result<PathBuf, AppError> {
    let path = out_dir.join(SUMMARY_FILE);
    let mut wtr = csv::Writer::from_path(&path)?;
    for row in summary {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(path)
}

/// Renders the summary as an aligned plain-text table for stdout.
pub fn render_summary(summary: &[SummaryRow]) -> String {
    let headers = [
        "task",
        "model_type",
        "model_name",
        "keyword_coverage",
        "quantify_score",
        "composite_score",
    ];
    let cells: Vec<[String; 6]> = summary
        .iter()
        .map(|r| {
            [
                r.task.clone(),
                r.model_type.clone(),
                r.model_name.clone(),
                format!("{:.4}", r.keyword_coverage),
                format!("{:.4}", r.quantify_score),
                format!("{:.4}", r.composite_score),
            ]
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (i, h) in headers.iter().enumerate() {
        out.push_str(&format!("{:<width$}  ", h, width = widths[i]));
    }
    out.push('\n');
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            out.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
        }
        out.push('\n');
    }
    out
}

/// Bundles results.csv, summary.csv, and every raw output file into
/// `ab_run.zip` inside the output directory.
pub fn write_archive(out_dir: &Path) -> Result<PathBuf, AppError> {
    let archive_path = out_dir.join(ARCHIVE_FILE);
    let file = fs::File::create(&archive_path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for name in [RESULTS_FILE, SUMMARY_FILE] {
        zip.start_file(name, options)?;
        zip.write_all(&fs::read(out_dir.join(name))?)?;
    }

    let raw_dir = out_dir.join(RAW_DIR);
    if raw_dir.is_dir() {
        let mut raw_files: Vec<_> = fs::read_dir(&raw_dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "txt"))
            .collect();
        raw_files.sort();
        for path in raw_files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            zip.start_file(format!("{RAW_DIR}/{name}"), options)?;
            zip.write_all(&fs::read(&path)?)?;
        }
    }

    zip.finish()?;
    info!("Wrote archive {}", archive_path.display());
    Ok(archive_path)
}
