//! Form and submission loading, and form validation.
//!
//! Forms are read from JSON or TOML (chosen by file extension); submissions
//! are JSON.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};

use crate::authoring::extract_blanks;
use crate::model::{FormDefinition, QuestionKind, Submission};

/// Parse a form definition file.
pub fn parse_form(path: &Path) -> Result<FormDefinition> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read form file: {}", path.display()))?;

    parse_form_str(&content, path)
}

/// Parse form content; `source_path` selects the format and labels errors.
pub fn parse_form_str(content: &str, source_path: &Path) -> Result<FormDefinition> {
    if source_path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))
    }
}

/// Parse a submission file.
pub fn parse_submission(path: &Path) -> Result<Submission> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submission file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse submission: {}", path.display()))
}

/// Recursively load all `.json` submissions from a directory, sorted by path.
pub fn load_submission_directory(dir: &Path) -> Result<Vec<Submission>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    collect_json_paths(dir, &mut paths)?;
    paths.sort();

    let mut submissions = Vec::with_capacity(paths.len());
    for path in paths {
        match parse_submission(&path) {
            Ok(submission) => submissions.push(submission),
            Err(e) => {
                tracing::warn!("skipping {}: {e:#}", path.display());
            }
        }
    }

    Ok(submissions)
}

fn collect_json_paths(dir: &Path, paths: &mut Vec<std::path::PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_paths(&path, paths)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    Ok(())
}

/// A warning from form validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a form for issues that would make questions ungradable.
pub fn validate_form(form: &FormDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if form.id.trim().is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "form id is empty".into(),
        });
    }

    // Only the first of a duplicated id is ever graded.
    let mut seen_ids = HashSet::new();
    for q in &form.questions {
        if !seen_ids.insert(q.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &form.questions {
        if q.kind.points().is_some_and(|p| p < 0.0) {
            warnings.push(ValidationWarning::question(
                &q.id,
                "negative points, question is worth 0",
            ));
        }

        match &q.kind {
            QuestionKind::Categorize(s) => match &s.correct_answer {
                None => warnings.push(ValidationWarning::question(
                    &q.id,
                    "categorize question has no correctAnswer",
                )),
                Some(mapping) => {
                    let mut homes: HashMap<&str, Vec<&str>> = HashMap::new();
                    for (label, items) in mapping {
                        for item in items {
                            homes.entry(item.as_str()).or_default().push(label.as_str());
                        }
                    }
                    let mut shared: Vec<_> = homes
                        .into_iter()
                        .filter(|(_, labels)| labels.len() > 1)
                        .collect();
                    shared.sort();
                    for (item, labels) in shared {
                        warnings.push(ValidationWarning::question(
                            &q.id,
                            format!("item '{item}' is filed under {}", labels.join(", ")),
                        ));
                    }
                }
            },
            QuestionKind::Cloze(s) => match &s.correct_answers {
                None => warnings.push(ValidationWarning::question(
                    &q.id,
                    "cloze question has no correctAnswers",
                )),
                Some(answers) if answers.is_empty() => warnings.push(
                    ValidationWarning::question(&q.id, "cloze question has no blanks"),
                ),
                Some(answers) => {
                    let blanks = s.passage.as_deref().map(extract_blanks).unwrap_or_default();
                    if !blanks.is_empty() && blanks.len() != answers.len() {
                        warnings.push(ValidationWarning::question(
                            &q.id,
                            format!(
                                "passage has {} blanks but {} correctAnswers",
                                blanks.len(),
                                answers.len()
                            ),
                        ));
                    }
                }
            },
            QuestionKind::Comprehension(s) => match s.correct_answer.as_deref() {
                None => warnings.push(ValidationWarning::question(
                    &q.id,
                    "comprehension question has no correctAnswer",
                )),
                Some(answer) if answer.trim().is_empty() => warnings.push(
                    ValidationWarning::question(&q.id, "correctAnswer is blank"),
                ),
                Some(_) => {}
            },
            QuestionKind::Unrecognized { type_tag, .. } => {
                warnings.push(ValidationWarning::question(
                    &q.id,
                    format!("unrecognized question type '{type_tag}', answers will score 0"),
                ));
            }
        }
    }

    warnings
}
