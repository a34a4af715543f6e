//! Batch runner — iterates samples x tasks x model variants, invokes the
//! generation adapter, scores outputs, and persists raw text.
//!
//! Failure policy: a generation error for one (sample, task, variant) is
//! converted to a placeholder output and scored like any other text; the
//! batch never aborts on a single call. Execution is strictly sequential.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::eval::scoring::{composite_score, compute_metrics};
use crate::llm::TextGenerator;
use crate::prompts::build_prompt;
use crate::report::ResultRow;
use crate::samples::Sample;
use crate::task::Task;

/// Which side of the A/B comparison a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    Baseline,
    Tuned,
}

impl ModelVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVariant::Baseline => "baseline",
            ModelVariant::Tuned => "tuned",
        }
    }
}

/// Everything a batch run needs besides the generator itself.
pub struct BatchRequest<'a> {
    pub samples: &'a [Sample],
    pub tasks: &'a [Task],
    pub baseline_model: &'a str,
    /// `None` skips tuned generation for every sample.
    pub tuned_model: Option<&'a str>,
    pub fewshot: &'a str,
}

/// Runs the full batch and returns one row per (sample, task, variant).
///
/// Raw outputs are written verbatim to `raw_dir` as
/// `{sample_id}_{task}_{variant}.txt`. `progress` receives the completed
/// fraction after each sample x task unit (baseline and tuned together
/// count as one unit). An unwritable raw directory is fatal.
pub async fn run_batch(
    generator: &dyn TextGenerator,
    request: &BatchRequest<'_>,
    raw_dir: &Path,
    mut progress: impl FnMut(f64),
) -> Result<Vec<ResultRow>, AppError> {
    fs::create_dir_all(raw_dir)?;

    let total = request.samples.len() * request.tasks.len();
    let mut done = 0usize;
    let mut rows = Vec::new();

    for sample in request.samples {
        for &task in request.tasks {
            let prompt = build_prompt(task, &sample.jd, &sample.profile, request.fewshot);

            let row = generate_one(
                generator,
                sample,
                task,
                ModelVariant::Baseline,
                request.baseline_model,
                &prompt,
                raw_dir,
            )
            .await?;
            info!(
                "[{}] {} {}: composite={:.4}",
                sample.id, task, ModelVariant::Baseline.as_str(), row.composite_score
            );
            rows.push(row);

            if let Some(tuned_model) = request.tuned_model {
                let row = generate_one(
                    generator,
                    sample,
                    task,
                    ModelVariant::Tuned,
                    tuned_model,
                    &prompt,
                    raw_dir,
                )
                .await?;
                info!(
                    "[{}] {} {}: composite={:.4}",
                    sample.id, task, ModelVariant::Tuned.as_str(), row.composite_score
                );
                rows.push(row);
            }

            done += 1;
            progress(done as f64 / total.max(1) as f64);
        }
    }

    Ok(rows)
}

/// One generation call plus scoring and raw-output persistence.
/// Only filesystem failures propagate; adapter failures become placeholder
/// text embedded in the row.
async fn generate_one(
    generator: &dyn TextGenerator,
    sample: &Sample,
    task: Task,
    variant: ModelVariant,
    model: &str,
    prompt: &str,
    raw_dir: &Path,
) -> Result<ResultRow, AppError> {
    let output = match generator.generate(prompt, model).await {
        Ok(text) => text,
        Err(e) => {
            warn!("[{}] {} {} generation failed: {e}", sample.id, task, variant.as_str());
            format!("[ERROR {}] {e}", variant.as_str())
        }
    };

    let metrics = compute_metrics(&sample.jd, &output, task);
    let composite = composite_score(&sample.jd, &output, task);

    let raw_path = raw_dir.join(format!("{}_{}_{}.txt", sample.id, task, variant.as_str()));
    fs::write(&raw_path, &output)?;

    Ok(ResultRow {
        sample_id: sample.id.clone(),
        task: task.to_string(),
        model_type: variant.as_str().to_string(),
        model_name: model.to_string(),
        output,
        keyword_coverage: metrics.keyword_coverage,
        quantify_score: metrics.quantify_score,
        length_ok: metrics.length_ok,
        composite_score: composite,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use tempfile::tempdir;

    use crate::llm::LlmError;

    /// Echoes a fixed string regardless of prompt or model.
    struct EchoGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, _prompt: &str, _model: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    /// Fails for one model id, echoes for everything else.
    struct FlakyGenerator {
        failing_model: &'static str,
    }

    #[async_trait]
    impl TextGenerator for FlakyGenerator {
        async fn generate(&self, _prompt: &str, model: &str) -> Result<String, LlmError> {
            if model == self.failing_model {
                Err(LlmError::Api {
                    status: 500,
                    message: "boom".to_string(),
                })
            } else {
                Ok("python sql tableau".to_string())
            }
        }
    }

    const JD: &str = "Seeking a Python analyst with SQL and Tableau experience.";
    const ECHO: &str =
        "- Built Python dashboards in Tableau\n- Wrote SQL pipelines increasing revenue by 20%";

    fn sample() -> Sample {
        Sample {
            id: "s1".to_string(),
            jd: JD.to_string(),
            profile: "- Led analytics team\n- Cut churn 15%\n- Shipped ML pipeline".to_string(),
        }
    }

    #[tokio::test]
    async fn test_baseline_only_run_produces_two_rows_with_known_metrics() {
        let tmp = tempdir().unwrap();
        let samples = vec![sample()];
        let request = BatchRequest {
            samples: &samples,
            tasks: &[Task::Bullets, Task::CoverLetter],
            baseline_model: "gpt-4o-mini",
            tuned_model: None,
            fewshot: "",
        };

        let rows = run_batch(&EchoGenerator(ECHO), &request, tmp.path(), |_| {})
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.model_type == "baseline"));
        assert!(rows.iter().all(|r| r.sample_id == "s1"));

        // Hand-computed from the fixed echo string: coverage 3/6, quantify
        // (1 "%" + 1 "revenue" + 2 digits * 0.05) / 2 lines = 1.05.
        let bullets = rows.iter().find(|r| r.task == "bullets").unwrap();
        assert!((bullets.keyword_coverage - 0.5).abs() < 1e-9);
        assert!((bullets.quantify_score - 1.05).abs() < 1e-9);
        assert_eq!(bullets.length_ok, None);
        assert!((bullets.composite_score - 0.51).abs() < 1e-9);

        let cover = rows.iter().find(|r| r.task == "cover_letter").unwrap();
        assert_eq!(cover.length_ok, Some(false));
        assert!((cover.composite_score - 0.46).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_tuned_model_doubles_rows_and_tags_variants() {
        let tmp = tempdir().unwrap();
        let samples = vec![sample()];
        let request = BatchRequest {
            samples: &samples,
            tasks: &[Task::Bullets],
            baseline_model: "gpt-4o-mini",
            tuned_model: Some("ft:gpt-4o-mini:custom"),
            fewshot: "",
        };

        let rows = run_batch(&EchoGenerator(ECHO), &request, tmp.path(), |_| {})
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model_type, "baseline");
        assert_eq!(rows[1].model_type, "tuned");
        assert_eq!(rows[1].model_name, "ft:gpt-4o-mini:custom");
    }

    #[tokio::test]
    async fn test_no_tuned_rows_without_tuned_model() {
        let tmp = tempdir().unwrap();
        let samples = vec![sample(), {
            let mut s = sample();
            s.id = "s2".to_string();
            s
        }];
        let request = BatchRequest {
            samples: &samples,
            tasks: &[Task::Bullets, Task::CoverLetter],
            baseline_model: "gpt-4o-mini",
            tuned_model: None,
            fewshot: "",
        };

        let rows = run_batch(&EchoGenerator(ECHO), &request, tmp.path(), |_| {})
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.model_type != "tuned"));
    }

    #[tokio::test]
    async fn test_generation_failure_becomes_placeholder_row() {
        let tmp = tempdir().unwrap();
        let samples = vec![sample()];
        let request = BatchRequest {
            samples: &samples,
            tasks: &[Task::Bullets],
            baseline_model: "gpt-4o-mini",
            tuned_model: Some("ft:broken"),
            fewshot: "",
        };
        let generator = FlakyGenerator {
            failing_model: "ft:broken",
        };

        let rows = run_batch(&generator, &request, tmp.path(), |_| {})
            .await
            .unwrap();

        assert_eq!(rows.len(), 2, "failure must not abort the batch");
        let tuned = rows.iter().find(|r| r.model_type == "tuned").unwrap();
        assert!(tuned.output.starts_with("[ERROR tuned]"));
        assert!(tuned.output.contains("boom"));

        // Placeholder is persisted verbatim like any other output
        let raw = fs::read_to_string(tmp.path().join("s1_bullets_tuned.txt")).unwrap();
        assert_eq!(raw, tuned.output);
    }

    #[tokio::test]
    async fn test_raw_outputs_written_per_variant() {
        let tmp = tempdir().unwrap();
        let samples = vec![sample()];
        let request = BatchRequest {
            samples: &samples,
            tasks: &[Task::Bullets, Task::CoverLetter],
            baseline_model: "gpt-4o-mini",
            tuned_model: None,
            fewshot: "",
        };

        run_batch(&EchoGenerator(ECHO), &request, tmp.path(), |_| {})
            .await
            .unwrap();

        for name in ["s1_bullets_baseline.txt", "s1_cover_letter_baseline.txt"] {
            assert_eq!(fs::read_to_string(tmp.path().join(name)).unwrap(), ECHO);
        }
    }

    #[tokio::test]
    async fn test_progress_is_fractional_per_unit() {
        let tmp = tempdir().unwrap();
        let samples = vec![sample()];
        let request = BatchRequest {
            samples: &samples,
            tasks: &[Task::Bullets, Task::CoverLetter],
            baseline_model: "gpt-4o-mini",
            tuned_model: Some("ft:x"),
            fewshot: "",
        };

        let mut seen = Vec::new();
        run_batch(&EchoGenerator(ECHO), &request, tmp.path(), |p| seen.push(p))
            .await
            .unwrap();

        // 1 sample x 2 tasks = 2 units; tuned does not add units
        assert_eq!(seen, vec![0.5, 1.0]);
    }
}
