//! Grading pipeline.
//!
//! For each submitted answer, in order: resolve the question, dispatch to the
//! validator for its type, score the result. Failures at any step grade that
//! one answer as incorrect with zero points and never stop the batch.

use crate::config::GradingConfig;
use crate::error::{AnswerShape, GradeError};
use crate::lookup::QuestionIndex;
use crate::model::{
    AnswerMapping, AnswerValue, CategoryMap, EvaluatedAnswer, FormDefinition, GradedSubmission, QuestionDefinition,
    QuestionKind, SubmittedAnswer, Submission,
};
use crate::score::{binary_score, point_weight};
use crate::validate::{
    cloze_score, validate_categorize, validate_cloze, validate_comprehension, CategoryMatch,
};

/// Correctness and score for one answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_correct: bool,
    pub score: f64,
}

impl Verdict {
    pub const INCORRECT: Verdict = Verdict {
        is_correct: false,
        score: 0.0,
    };
}

/// The grading engine. Holds configuration only; grading is a pure function
/// of the form and the answers.
#[derive(Debug, Clone, Default)]
pub struct GradingEngine {
    config: GradingConfig,
}

impl GradingEngine {
    pub fn new(config: GradingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Grade a submission against its form.
    pub fn grade_submission(&self, form: &FormDefinition, submission: &Submission) -> GradedSubmission {
        if !submission.form_id.is_empty() && submission.form_id != form.id {
            tracing::warn!(
                "submission targets form '{}' but is graded against '{}'",
                submission.form_id,
                form.id
            );
        }
        self.grade(form, &submission.answers)
    }

    /// Grade answers against a form's questions.
    pub fn grade(&self, form: &FormDefinition, answers: &[SubmittedAnswer]) -> GradedSubmission {
        let index = QuestionIndex::new(&form.questions);
        let mut evaluated = Vec::with_capacity(answers.len());
        let mut total_score = 0.0;

        for submitted in answers {
            let outcome = index
                .get(&submitted.question_id)
                .ok_or_else(|| GradeError::QuestionNotFound {
                    question_id: submitted.question_id.clone(),
                })
                .and_then(|question| self.evaluate(question, &submitted.answer));

            let (verdict, issue) = match outcome {
                Ok(verdict) => (verdict, None),
                Err(e) => {
                    tracing::debug!("form {}: {e}", form.id);
                    (Verdict::INCORRECT, Some(e))
                }
            };

            total_score += verdict.score;
            evaluated.push(EvaluatedAnswer {
                question_id: submitted.question_id.clone(),
                answer: submitted.answer.clone(),
                is_correct: verdict.is_correct,
                score: verdict.score,
                issue,
            });
        }

        GradedSubmission {
            answers: evaluated,
            total_score,
        }
    }

    /// Grade one answer against one question.
    pub fn evaluate(
        &self,
        question: &QuestionDefinition,
        answer: &AnswerValue,
    ) -> Result<Verdict, GradeError> {
        let weight = point_weight(question.kind.points(), self.config.default_points);

        match &question.kind {
            QuestionKind::Categorize(settings) => {
                let correct = settings
                    .correct_answer
                    .as_ref()
                    .ok_or_else(|| incomplete(question, "correctAnswer"))?;
                let user = match answer {
                    AnswerValue::Mapping(mapping) => {
                        Some(self.category_lists(question, mapping, correct)?)
                    }
                    AnswerValue::Absent => None,
                    _ => return Err(malformed(question, AnswerShape::CategoryMapping)),
                };
                let is_correct =
                    validate_categorize(user.as_ref(), Some(correct), self.config.category_match);
                Ok(Verdict {
                    is_correct,
                    score: binary_score(is_correct, weight),
                })
            }
            QuestionKind::Cloze(settings) => {
                let correct = settings
                    .correct_answers
                    .as_deref()
                    .filter(|blanks| !blanks.is_empty())
                    .ok_or_else(|| incomplete(question, "correctAnswers"))?;
                let user = match answer {
                    AnswerValue::Sequence(blanks) => blanks,
                    AnswerValue::Absent => return Ok(Verdict::INCORRECT),
                    _ => return Err(malformed(question, AnswerShape::Sequence)),
                };
                Ok(Verdict {
                    is_correct: validate_cloze(user, correct),
                    score: cloze_score(user, correct, weight),
                })
            }
            QuestionKind::Comprehension(settings) => {
                let correct = settings
                    .correct_answer
                    .as_deref()
                    .ok_or_else(|| incomplete(question, "correctAnswer"))?;
                let user = match answer {
                    AnswerValue::Text(text) => Some(text.as_str()),
                    AnswerValue::Absent => None,
                    _ => return Err(malformed(question, AnswerShape::Text)),
                };
                let is_correct = validate_comprehension(user, Some(correct));
                Ok(Verdict {
                    is_correct,
                    score: binary_score(is_correct, weight),
                })
            }
            QuestionKind::Unrecognized { type_tag, .. } => Err(GradeError::UnrecognizedType {
                question_id: question.id.clone(),
                type_tag: type_tag.clone(),
            }),
        }
    }

    /// Item lists for the categories that take part in matching. Categories
    /// the question does not define are only read in strict mode.
    fn category_lists(
        &self,
        question: &QuestionDefinition,
        mapping: &AnswerMapping,
        correct: &CategoryMap,
    ) -> Result<CategoryMap, GradeError> {
        let strict = self.config.category_match == CategoryMatch::Strict;
        mapping
            .iter()
            .filter(|(label, _)| strict || correct.contains_key(label.as_str()))
            .map(|(label, value)| {
                let items = match value {
                    serde_json::Value::Null => Vec::new(),
                    value => serde_json::from_value(value.clone())
                        .map_err(|_| malformed(question, AnswerShape::CategoryMapping))?,
                };
                Ok((label.clone(), items))
            })
            .collect()
    }
}

fn incomplete(question: &QuestionDefinition, missing: &str) -> GradeError {
    GradeError::IncompleteSettings {
        question_id: question.id.clone(),
        missing: missing.to_string(),
    }
}

fn malformed(question: &QuestionDefinition, expected: AnswerShape) -> GradeError {
    GradeError::MalformedAnswerShape {
        question_id: question.id.clone(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> FormDefinition {
        serde_json::from_value(json!({
            "id": "quiz",
            "questions": [
                {
                    "id": "sort",
                    "type": "categorize",
                    "settings": {
                        "correctAnswer": { "Fruit": ["apple", "banana"], "Veg": ["carrot"] },
                        "points": 2
                    }
                },
                {
                    "id": "fox",
                    "type": "cloze",
                    "settings": { "correctAnswers": ["brown", "fence"], "points": 2 }
                },
                {
                    "id": "capital",
                    "type": "comprehension",
                    "settings": { "correctAnswer": "Paris" }
                },
                { "id": "essay", "type": "essay", "settings": {} },
                { "id": "blank", "type": "cloze", "settings": { "correctAnswers": [] } },
                { "id": "bare", "type": "comprehension" }
            ]
        }))
        .unwrap()
    }

    fn answers(value: serde_json::Value) -> Vec<SubmittedAnswer> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn grades_each_type() {
        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([
                { "questionId": "sort", "answer": { "Fruit": ["banana", "apple"], "Veg": ["carrot"] } },
                { "questionId": "fox", "answer": ["brown", "wrong"] },
                { "questionId": "capital", "answer": "paris" }
            ])),
        );

        let scores: Vec<(bool, f64)> = graded
            .answers
            .iter()
            .map(|a| (a.is_correct, a.score))
            .collect();
        assert_eq!(scores, vec![(true, 2.0), (false, 1.0), (true, 1.0)]);
        assert_eq!(graded.total_score, 4.0);
        assert_eq!(graded.correct_count(), 2);
        assert!(graded.answers.iter().all(|a| a.issue.is_none()));
    }

    #[test]
    fn unknown_question_scores_zero_without_failing() {
        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([
                { "questionId": "nope", "answer": "x" },
                { "questionId": "capital", "answer": "Paris" }
            ])),
        );
        assert_eq!(graded.answers.len(), 2);
        assert!(!graded.answers[0].is_correct);
        assert_eq!(graded.answers[0].score, 0.0);
        assert!(matches!(
            graded.answers[0].issue,
            Some(GradeError::QuestionNotFound { .. })
        ));
        assert_eq!(graded.total_score, 1.0);
    }

    #[test]
    fn unrecognized_type_degrades() {
        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([{ "questionId": "essay", "answer": "words" }])),
        );
        assert_eq!(graded.total_score, 0.0);
        assert!(matches!(
            graded.answers[0].issue,
            Some(GradeError::UnrecognizedType { ref type_tag, .. }) if type_tag == "essay"
        ));
    }

    #[test]
    fn malformed_shapes_degrade_and_grading_continues() {
        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([
                { "questionId": "fox", "answer": "brown fence" },
                { "questionId": "sort", "answer": ["apple"] },
                { "questionId": "capital", "answer": ["Paris"] },
                { "questionId": "capital", "answer": "Paris" }
            ])),
        );
        for evaluated in &graded.answers[..3] {
            assert!(!evaluated.is_correct);
            assert_eq!(evaluated.score, 0.0);
            assert!(matches!(
                evaluated.issue,
                Some(GradeError::MalformedAnswerShape { .. })
            ));
        }
        assert!(graded.answers[3].is_correct);
        assert_eq!(graded.total_score, 1.0);
    }

    #[test]
    fn incomplete_settings_are_unsatisfiable() {
        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([
                { "questionId": "blank", "answer": [] },
                { "questionId": "bare", "answer": null }
            ])),
        );
        for evaluated in &graded.answers {
            assert!(!evaluated.is_correct);
            assert_eq!(evaluated.score, 0.0);
            assert!(matches!(
                evaluated.issue,
                Some(GradeError::IncompleteSettings { .. })
            ));
        }
    }

    #[test]
    fn absent_answers_are_incorrect() {
        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([
                { "questionId": "sort" },
                { "questionId": "fox", "answer": null },
                { "questionId": "capital" }
            ])),
        );
        assert!(graded.answers.iter().all(|a| !a.is_correct && a.score == 0.0));
        assert!(graded.answers.iter().all(|a| a.issue.is_none()));
    }

    #[test]
    fn evaluated_answer_keeps_submitted_value() {
        let submitted = answers(json!([{ "questionId": "fox", "answer": ["Brown", null] }]));
        let graded = GradingEngine::default().grade(&form(), &submitted);
        assert_eq!(graded.answers[0].answer, submitted[0].answer);
        assert_eq!(graded.answers[0].question_id, "fox");
    }

    #[test]
    fn strict_category_mode_from_config() {
        let engine = GradingEngine::new(GradingConfig {
            category_match: CategoryMatch::Strict,
            ..Default::default()
        });
        let graded = engine.grade(
            &form(),
            &answers(json!([{
                "questionId": "sort",
                "answer": { "Fruit": ["apple", "banana"], "Veg": ["carrot"], "Other": ["rock"] }
            }])),
        );
        assert!(!graded.answers[0].is_correct);

        let lenient = GradingEngine::default().grade(
            &form(),
            &answers(json!([{
                "questionId": "sort",
                "answer": { "Fruit": ["apple", "banana"], "Veg": ["carrot"], "Other": ["rock"] }
            }])),
        );
        assert!(lenient.answers[0].is_correct);
    }

    #[test]
    fn lenient_mode_ignores_shape_of_undefined_categories() {
        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([{
                "questionId": "sort",
                "answer": { "Fruit": ["apple", "banana"], "Veg": ["carrot"], "Mineral": "quartz" }
            }])),
        );
        assert!(graded.answers[0].is_correct);
        assert_eq!(graded.answers[0].score, 2.0);
        assert!(graded.answers[0].issue.is_none());
    }

    #[test]
    fn category_values_must_be_lists_where_checked() {
        let strict = GradingEngine::new(GradingConfig {
            category_match: CategoryMatch::Strict,
            ..Default::default()
        });
        let graded = strict.grade(
            &form(),
            &answers(json!([{
                "questionId": "sort",
                "answer": { "Fruit": ["apple", "banana"], "Veg": ["carrot"], "Mineral": "quartz" }
            }])),
        );
        assert!(matches!(
            graded.answers[0].issue,
            Some(GradeError::MalformedAnswerShape { expected: AnswerShape::CategoryMapping, .. })
        ));

        let graded = GradingEngine::default().grade(
            &form(),
            &answers(json!([{
                "questionId": "sort",
                "answer": { "Fruit": "apple banana", "Veg": ["carrot"] }
            }])),
        );
        assert_eq!(graded.answers[0].score, 0.0);
        assert!(matches!(
            graded.answers[0].issue,
            Some(GradeError::MalformedAnswerShape { .. })
        ));
    }

    #[test]
    fn default_points_from_config() {
        let engine = GradingEngine::new(GradingConfig {
            default_points: 5.0,
            ..Default::default()
        });
        let graded = engine.grade(
            &form(),
            &answers(json!([{ "questionId": "capital", "answer": "PARIS" }])),
        );
        assert_eq!(graded.total_score, 5.0);
    }

    #[test]
    fn grading_is_deterministic() {
        let engine = GradingEngine::default();
        let submitted = answers(json!([
            { "questionId": "fox", "answer": ["brown"] },
            { "questionId": "sort", "answer": { "Fruit": ["apple"] } },
            { "questionId": "missing", "answer": "x" }
        ]));
        let first = engine.grade(&form(), &submitted);
        let second = engine.grade(&form(), &submitted);
        assert_eq!(first, second);
        assert_eq!(first.total_score.to_bits(), second.total_score.to_bits());
    }

    #[test]
    fn empty_form_grades_everything_as_missing() {
        let empty = FormDefinition {
            id: "empty".into(),
            title: String::new(),
            description: String::new(),
            questions: vec![],
        };
        let graded = GradingEngine::default().grade(
            &empty,
            &answers(json!([{ "questionId": "q1", "answer": "x" }])),
        );
        assert_eq!(graded.total_score, 0.0);
        assert_eq!(graded.answers.len(), 1);
    }
}
