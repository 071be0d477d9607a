//! Response records with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EvaluatedAnswer, GradedSubmission, Submission};

/// The full graded result of one respondent's submission.
///
/// Built once from a [`GradedSubmission`]; the total score is fixed at
/// construction and there are no mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    id: Uuid,
    form_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    respondent_email: Option<String>,
    answers: Vec<EvaluatedAnswer>,
    total_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completion_time: Option<u64>,
    created_at: DateTime<Utc>,
}

impl ResponseRecord {
    /// `form_id` is the form the submission was graded against, which takes
    /// precedence over whatever the submission claims.
    pub fn from_graded(form_id: &str, submission: Submission, graded: GradedSubmission) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form_id.to_string(),
            respondent_email: submission.respondent_email,
            answers: graded.answers,
            total_score: graded.total_score,
            completion_time: submission.completion_time,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn respondent_email(&self) -> Option<&str> {
        self.respondent_email.as_deref()
    }

    pub fn answers(&self) -> &[EvaluatedAnswer] {
        &self.answers
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    /// Completion time in seconds.
    pub fn completion_time(&self) -> Option<u64> {
        self.completion_time
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// File name used when saving into an output directory.
    pub fn file_name(&self) -> String {
        format!("response-{}.json", self.id)
    }

    /// Save the record as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize response")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write response to {}", path.display()))?;
        Ok(())
    }

    /// Load a record from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read response from {}", path.display()))?;
        let record: ResponseRecord =
            serde_json::from_str(&content).context("failed to parse response JSON")?;
        Ok(record)
    }
}

/// Load every `.json` response record under `dir`, recursively.
///
/// Files that do not parse as response records are skipped with a warning.
/// Records are sorted by creation time.
pub fn load_response_directory(dir: &Path) -> Result<Vec<ResponseRecord>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut records = Vec::new();
    collect_records(dir, &mut records)?;
    records.sort_by_key(|r| r.created_at);
    Ok(records)
}

fn collect_records(dir: &Path, records: &mut Vec<ResponseRecord>) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if path.is_dir() {
            collect_records(&path, records)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            match ResponseRecord::load_json(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("skipping {}: {e:#}", path.display()),
            }
        }
    }
    Ok(())
}
