//! Grading error types.
//!
//! None of these ever escape the grading pipeline. Each one is absorbed at the
//! granularity of a single answer, which is then graded as incorrect with a
//! score of zero. The error is kept on the evaluated answer for diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single answer could not be graded normally.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradeError {
    /// The answer references a question id the form does not define.
    #[error("question not found: {question_id}")]
    QuestionNotFound { question_id: String },

    /// The question's type tag has no validator.
    #[error("question {question_id} has unrecognized type '{type_tag}'")]
    UnrecognizedType {
        question_id: String,
        type_tag: String,
    },

    /// The submitted value does not have the shape the question type expects.
    #[error("answer to question {question_id} is not a {expected}")]
    MalformedAnswerShape {
        question_id: String,
        expected: AnswerShape,
    },

    /// The question's settings lack a field the validator needs.
    #[error("question {question_id} settings are missing {missing}")]
    IncompleteSettings {
        question_id: String,
        missing: String,
    },
}

impl GradeError {
    /// The question id this error was raised for.
    pub fn question_id(&self) -> &str {
        match self {
            GradeError::QuestionNotFound { question_id }
            | GradeError::UnrecognizedType { question_id, .. }
            | GradeError::MalformedAnswerShape { question_id, .. }
            | GradeError::IncompleteSettings { question_id, .. } => question_id,
        }
    }

    /// Short, stable label for tables and logs.
    pub fn label(&self) -> &'static str {
        match self {
            GradeError::QuestionNotFound { .. } => "question not found",
            GradeError::UnrecognizedType { .. } => "unrecognized type",
            GradeError::MalformedAnswerShape { .. } => "malformed answer",
            GradeError::IncompleteSettings { .. } => "incomplete settings",
        }
    }
}

/// Answer shapes expected by the question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerShape {
    CategoryMapping,
    Sequence,
    Text,
}

impl fmt::Display for AnswerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerShape::CategoryMapping => write!(f, "category mapping"),
            AnswerShape::Sequence => write!(f, "sequence"),
            AnswerShape::Text => write!(f, "string"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_question() {
        let err = GradeError::MalformedAnswerShape {
            question_id: "q2".into(),
            expected: AnswerShape::Sequence,
        };
        assert_eq!(err.to_string(), "answer to question q2 is not a sequence");
        assert_eq!(err.question_id(), "q2");
        assert_eq!(err.label(), "malformed answer");
    }

    #[test]
    fn serializes_with_kind_tag() {
        let err = GradeError::QuestionNotFound {
            question_id: "missing".into(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "question_not_found");
        assert_eq!(json["question_id"], "missing");

        let back: GradeError = serde_json::from_value(json).unwrap();
        assert_eq!(back, err);
    }
}
