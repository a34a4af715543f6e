use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// A generation task. Determines the prompt shape and which length
/// constraint applies during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    Bullets,
    CoverLetter,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Bullets => "bullets",
            Task::CoverLetter => "cover_letter",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Task {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bullets" => Ok(Task::Bullets),
            "cover_letter" => Ok(Task::CoverLetter),
            other => Err(AppError::Validation(format!("Unknown task: {other}"))),
        }
    }
}

/// Parses a comma-separated task list (e.g. `"bullets,cover_letter"`).
/// Fails fast on any unrecognized task name; an empty list is also an error.
pub fn parse_task_list(spec: &str) -> Result<Vec<Task>, AppError> {
    let tasks = spec
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Task::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    if tasks.is_empty() {
        return Err(AppError::Validation(
            "No tasks requested; expected at least one of: bullets, cover_letter".to_string(),
        ));
    }
    Ok(tasks)
}
