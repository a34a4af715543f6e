//! Metric functions: keyword coverage, quantification density, length check.
//!
//! These are deliberately crude surface heuristics (substring containment,
//! digit counting) rather than anything semantic. The skill vocabulary, cue
//! list, and thresholds below are tunable constants.

use std::collections::BTreeSet;

/// Common analytics/engineering skill tokens that count as JD keywords even
/// when short or lowercase.
const SKILL_VOCAB: &[&str] = &[
    "python",
    "sql",
    "tableau",
    "power",
    "bi",
    "ml",
    "machine",
    "learning",
    "analytics",
    "django",
    "postgresql",
];

/// Substrings that signal quantified impact on a resume line.
const IMPACT_CUES: &[&str] = &[
    "%",
    "increased",
    "reduced",
    "cut",
    "grew",
    "decreased",
    "saved",
    "roi",
    "uplift",
    "improved",
    "revenue",
    "cost",
    "conversion",
];

/// Punctuation stripped from token edges before the keyword tests.
const EDGE_PUNCT: &[char] = &['.', ',', ':', ';', '(', ')', '[', ']', '{', '}'];

/// Weight per digit character when scoring quantification density.
const DIGIT_WEIGHT: f64 = 0.05;

/// Inclusive cover-letter word-count bounds.
pub const MIN_WORDS: usize = 120;
pub const MAX_WORDS: usize = 200;

/// Extracts a lowercased keyword set from a job description.
///
/// A token qualifies if it is title-cased with length >= 3, has length >= 7,
/// or is in the skill vocabulary. Tokens are stripped of edge punctuation
/// and must be purely alphabetic after stripping.
pub fn jd_keywords(jd: &str) -> BTreeSet<String> {
    jd.split_whitespace()
        .map(|w| w.trim_matches(EDGE_PUNCT))
        .filter(|w| {
            let lower = w.to_lowercase();
            (is_title_word(w) && w.chars().count() >= 3)
                || w.chars().count() >= 7
                || SKILL_VOCAB.contains(&lower.as_str())
        })
        .map(|w| w.to_lowercase())
        .filter(|w| !w.is_empty() && w.chars().all(char::is_alphabetic))
        .collect()
}

/// Fraction of JD keywords that appear (case-insensitively, as substrings)
/// in the output. 0.0 when the JD yields no keywords.
pub fn keyword_coverage(jd: &str, output: &str) -> f64 {
    let keys = jd_keywords(jd);
    if keys.is_empty() {
        return 0.0;
    }
    let out = output.to_lowercase();
    let hits = keys.iter().filter(|k| out.contains(k.as_str())).count();
    hits as f64 / keys.len() as f64
}

/// Quantification density: per non-blank line, impact-cue occurrences plus
/// DIGIT_WEIGHT per digit, averaged over non-blank lines.
/// Typical range for decent resume output is roughly 0.3 to 1.0.
pub fn quantify_score(output: &str) -> f64 {
    let lines: Vec<&str> = output.lines().filter(|ln| !ln.trim().is_empty()).collect();
    if lines.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for line in &lines {
        let lower = line.to_lowercase();
        for cue in IMPACT_CUES {
            total += lower.matches(cue).count() as f64;
        }
        total += lower.chars().filter(|c| c.is_ascii_digit()).count() as f64 * DIGIT_WEIGHT;
    }
    total / lines.len() as f64
}

/// True iff the whitespace-delimited word count falls within
/// [min_words, max_words] inclusive.
pub fn length_ok(output: &str, min_words: usize, max_words: usize) -> bool {
    let n = output.split_whitespace().count();
    (min_words..=max_words).contains(&n)
}

/// Title-cased as a single word: leading uppercase letter, no other
/// uppercase letters.
fn is_title_word(w: &str) -> bool {
    let mut chars = w.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| !c.is_uppercase()),
        _ => false,
    }
}
