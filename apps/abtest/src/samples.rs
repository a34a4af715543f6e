//! Sample loader — discovers per-sample directories under the samples root.
//!
//! Each sample is a directory holding `jd.md` (job description) and
//! `profile.md` (base resume). A directory missing either file, or with an
//! empty file, is skipped and counted, never a hard error.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::errors::AppError;

pub const JD_FILE: &str = "jd.md";
pub const PROFILE_FILE: &str = "profile.md";

/// One usable evaluation sample. Invariant: both texts are non-empty.
#[derive(Debug, Clone)]
pub struct Sample {
    pub id: String,
    pub jd: String,
    pub profile: String,
}

/// Outcome of scanning the samples root.
#[derive(Debug)]
pub struct LoadedSamples {
    pub samples: Vec<Sample>,
    pub skipped: usize,
}

/// Enumerates subdirectories of `root` in lexicographic order and loads each
/// sample. `limit` of 0 means no cap; otherwise the first `limit` directories
/// (after sorting) are considered. An unreadable root is fatal.
pub fn load_samples(root: &Path, limit: usize) -> Result<LoadedSamples, AppError> {
    let mut dirs: Vec<_> = fs::read_dir(root)
        .map_err(|e| {
            AppError::Validation(format!("Cannot read samples directory {}: {e}", root.display()))
        })?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort(); // stable order for reproducible limits

    if limit > 0 {
        dirs.truncate(limit);
    }

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    for dir in dirs {
        let id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let jd = read_optional(&dir.join(JD_FILE));
        let profile = read_optional(&dir.join(PROFILE_FILE));
        match (jd, profile) {
            (Some(jd), Some(profile)) => samples.push(Sample { id, jd, profile }),
            _ => {
                warn!("Skipping sample '{id}': missing or empty {JD_FILE}/{PROFILE_FILE}");
                skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} sample(s) from {} ({} skipped)",
        samples.len(),
        root.display(),
        skipped
    );
    Ok(LoadedSamples { samples, skipped })
}

/// Reads a text file, treating missing files and empty content alike.
fn read_optional(path: &Path) -> Option<String> {
    fs::read_to_string(path)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_sample(root: &Path, id: &str, jd: Option<&str>, profile: Option<&str>) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        if let Some(jd) = jd {
            fs::write(dir.join(JD_FILE), jd).unwrap();
        }
        if let Some(profile) = profile {
            fs::write(dir.join(PROFILE_FILE), profile).unwrap();
        }
    }

    #[test]
    fn test_loads_complete_samples_in_sorted_order() {
        let tmp = tempdir().unwrap();
        write_sample(tmp.path(), "s2", Some("jd two"), Some("profile two"));
        write_sample(tmp.path(), "s1", Some("jd one"), Some("profile one"));

        let loaded = load_samples(tmp.path(), 0).unwrap();
        let ids: Vec<_> = loaded.samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
        assert_eq!(loaded.skipped, 0);
    }

    #[test]
    fn test_sample_missing_profile_is_skipped() {
        let tmp = tempdir().unwrap();
        write_sample(tmp.path(), "good", Some("jd"), Some("profile"));
        write_sample(tmp.path(), "no_profile", Some("jd"), None);

        let loaded = load_samples(tmp.path(), 0).unwrap();
        assert_eq!(loaded.samples.len(), 1);
        assert_eq!(loaded.samples[0].id, "good");
        assert_eq!(loaded.skipped, 1);
    }

    #[test]
    fn test_empty_file_counts_as_missing() {
        let tmp = tempdir().unwrap();
        write_sample(tmp.path(), "blank_jd", Some("   \n"), Some("profile"));

        let loaded = load_samples(tmp.path(), 0).unwrap();
        assert!(loaded.samples.is_empty());
        assert_eq!(loaded.skipped, 1);
    }

    #[test]
    fn test_limit_applies_after_sorting() {
        let tmp = tempdir().unwrap();
        for id in ["c", "a", "b"] {
            write_sample(tmp.path(), id, Some("jd"), Some("profile"));
        }

        let loaded = load_samples(tmp.path(), 2).unwrap();
        let ids: Vec<_> = loaded.samples.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_unreadable_root_is_fatal() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = load_samples(&missing, 0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_plain_files_in_root_are_ignored() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("stray.txt"), "not a sample").unwrap();
        write_sample(tmp.path(), "s1", Some("jd"), Some("profile"));

        let loaded = load_samples(tmp.path(), 0).unwrap();
        assert_eq!(loaded.samples.len(), 1);
        assert_eq!(loaded.skipped, 0);
    }
}
