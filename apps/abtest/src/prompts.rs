//! Prompt templates for the two generation tasks.
//! Placeholders are filled by plain string substitution before sending.

use crate::task::Task;

/// Resume bullets prompt. Replace `{jd}`, `{resume}`, `{examples}`.
const RESUME_BULLETS_TEMPLATE: &str = r#"You are a resume rewrite assistant.
Given a Job Description and a base resume, output 4-6 bullets for the target role.
Rules:
- Each bullet: <action verb> + <what you did> + <impact> + <metric>.
- Mirror relevant keywords from the JD.
- Keep to one line each, no pronouns, no fluff.

Job Description:
{jd}

Base Resume:
{resume}

Few-shot examples:
{examples}

Now write the bullets:
"#;

/// Cover letter prompt. Replace `{jd}`, `{highlights}`, `{examples}`.
const COVER_LETTER_TEMPLATE: &str = r#"You are a cover letter writer. 130-180 words.
- First line: align to the company's mission/problem from the JD.
- Middle: 2 achievements mapped to JD's must-haves; quantify impact.
- Close: show enthusiasm + availability.

Job Description:
{jd}

Candidate Highlights:
{highlights}

Few-shot examples:
{examples}

Now write the cover letter:
"#;

/// Max profile bullet lines carried into the cover-letter highlights block.
const MAX_HIGHLIGHTS: usize = 6;

/// Renders the task-specific prompt for one sample.
pub fn build_prompt(task: Task, jd: &str, resume: &str, examples: &str) -> String {
    match task {
        Task::Bullets => RESUME_BULLETS_TEMPLATE
            .replace("{jd}", jd)
            .replace("{resume}", resume)
            .replace("{examples}", examples),
        Task::CoverLetter => COVER_LETTER_TEMPLATE
            .replace("{jd}", jd)
            .replace("{highlights}", &highlights(resume))
            .replace("{examples}", examples),
    }
}

/// First up-to-6 profile lines that start with a bullet marker (`-`).
fn highlights(resume: &str) -> String {
    resume
        .lines()
        .filter(|l| l.trim_start().starts_with('-'))
        .take(MAX_HIGHLIGHTS)
        .collect::<Vec<_>>()
        .join("\n")
}
