//! Core data model types for formgrade.
//!
//! Forms and submissions use a JSON contract with camelCase field names.
//! Questions are keyed by a stable `id` and carry a `type` tag plus a typed
//! `settings` record.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GradeError;

/// Category label mapped to the item identifiers filed under it.
pub type CategoryMap = BTreeMap<String, Vec<String>>;

/// A submitted categorize answer before its values are checked. Only the
/// categories a question defines need to hold item lists.
pub type AnswerMapping = BTreeMap<String, serde_json::Value>;

/// The authoritative set of questions for a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    /// Unique identifier for this form.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Description shown to respondents.
    #[serde(default)]
    pub description: String,
    /// The questions, in display order.
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

impl FormDefinition {
    /// Highest total score a submission to this form can reach.
    pub fn max_score(&self, default_points: f64) -> f64 {
        self.questions
            .iter()
            .filter(|q| !matches!(q.kind, QuestionKind::Unrecognized { .. }))
            .map(|q| crate::score::point_weight(q.kind.points(), default_points))
            .sum()
    }
}

/// One question: identifier, title and type-specific settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawQuestion", into = "RawQuestion")]
pub struct QuestionDefinition {
    pub id: String,
    pub title: String,
    pub kind: QuestionKind,
}

/// The question type together with its settings.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Categorize(CategorizeSettings),
    Cloze(ClozeSettings),
    Comprehension(ComprehensionSettings),
    /// A type tag no validator knows. The raw settings are kept so the
    /// question survives a load/save cycle untouched.
    Unrecognized {
        type_tag: String,
        settings: serde_json::Value,
    },
}

impl QuestionKind {
    /// The wire-level type tag.
    pub fn type_tag(&self) -> &str {
        match self {
            QuestionKind::Categorize(_) => "categorize",
            QuestionKind::Cloze(_) => "cloze",
            QuestionKind::Comprehension(_) => "comprehension",
            QuestionKind::Unrecognized { type_tag, .. } => type_tag,
        }
    }

    /// Configured point weight, if any.
    pub fn points(&self) -> Option<f64> {
        match self {
            QuestionKind::Categorize(s) => s.points,
            QuestionKind::Cloze(s) => s.points,
            QuestionKind::Comprehension(s) => s.points,
            QuestionKind::Unrecognized { .. } => None,
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Settings for a categorize question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizeSettings {
    /// Accepted items per category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<CategoryMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
}

/// Settings for a cloze (fill-in-the-gap) question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClozeSettings {
    /// The passage, with blanks written as `[word]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    /// Accepted answer per blank, in blank order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
}

/// Settings for a comprehension question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensionSettings {
    /// The reading passage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    /// The single accepted answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<f64>,
}

/// Wire shape of a question. Settings stay untyped until the tag is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawQuestion {
    id: String,
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    title: String,
    #[serde(default)]
    settings: serde_json::Value,
}

impl From<RawQuestion> for QuestionDefinition {
    fn from(raw: RawQuestion) -> Self {
        let kind = match raw.type_tag.as_str() {
            "categorize" => QuestionKind::Categorize(typed_settings(&raw.id, raw.settings)),
            "cloze" => QuestionKind::Cloze(typed_settings(&raw.id, raw.settings)),
            "comprehension" => QuestionKind::Comprehension(typed_settings(&raw.id, raw.settings)),
            _ => QuestionKind::Unrecognized {
                type_tag: raw.type_tag,
                settings: raw.settings,
            },
        };
        QuestionDefinition {
            id: raw.id,
            title: raw.title,
            kind,
        }
    }
}

impl From<QuestionDefinition> for RawQuestion {
    fn from(question: QuestionDefinition) -> Self {
        let type_tag = question.kind.type_tag().to_string();
        let settings = match question.kind {
            QuestionKind::Categorize(s) => serde_json::to_value(s),
            QuestionKind::Cloze(s) => serde_json::to_value(s),
            QuestionKind::Comprehension(s) => serde_json::to_value(s),
            QuestionKind::Unrecognized { settings, .. } => Ok(settings),
        }
        .unwrap_or(serde_json::Value::Null);
        RawQuestion {
            id: question.id,
            type_tag,
            title: question.title,
            settings,
        }
    }
}

/// Settings that fail to parse degrade to all-absent fields, which the
/// validators then treat as unsatisfiable.
fn typed_settings<T: DeserializeOwned + Default>(question_id: &str, value: serde_json::Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!("question {question_id}: unusable settings ({e}), treating as incomplete");
        T::default()
    })
}

/// A raw submitted answer value. Its expected shape depends on the question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// `null` or a missing `answer` field.
    #[default]
    Absent,
    Text(String),
    /// Blank answers in order; `null` entries compare as empty strings.
    Sequence(Vec<Option<String>>),
    Mapping(AnswerMapping),
    /// Anything else, preserved verbatim.
    Other(serde_json::Value),
}

impl AnswerValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, AnswerValue::Absent)
    }
}

/// One respondent-provided answer to one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    #[serde(default)]
    pub answer: AnswerValue,
}

/// A respondent's full submission to a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub form_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respondent_email: Option<String>,
    #[serde(default)]
    pub answers: Vec<SubmittedAnswer>,
    /// Time taken to complete the form, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<u64>,
}

/// A submitted answer plus its grading outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedAnswer {
    pub question_id: String,
    pub answer: AnswerValue,
    pub is_correct: bool,
    pub score: f64,
    /// Set when grading fell back to incorrect/zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<GradeError>,
}

/// Output of grading one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedSubmission {
    pub answers: Vec<EvaluatedAnswer>,
    /// Sum of all answer scores, in submission order.
    pub total_score: f64,
}

impl GradedSubmission {
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }
}
