//! Aggregate statistics over graded responses to one form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{FormDefinition, QuestionKind};
use crate::report::ResponseRecord;
use crate::score::point_weight;

/// Statistics for a form across all of its responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormStats {
    pub form_id: String,
    /// Number of responses counted (records for other forms are ignored).
    pub response_count: usize,
    /// Mean total score per response.
    pub mean_score: f64,
    /// Highest total score a response can reach.
    pub max_possible: f64,
    /// Per-question statistics, keyed by question id.
    pub per_question: BTreeMap<String, QuestionStats>,
}

/// Statistics for a single question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionStats {
    pub question_id: String,
    pub question_type: String,
    pub points: f64,
    /// Answers submitted for this question.
    pub attempts: usize,
    /// Answers graded correct.
    pub correct: usize,
    pub correct_rate: f64,
    /// Mean score over attempts.
    pub mean_score: f64,
}

/// Compute statistics for `form` from graded `records`.
pub fn compute_form_stats(
    form: &FormDefinition,
    records: &[ResponseRecord],
    default_points: f64,
) -> FormStats {
    let mut per_question: BTreeMap<String, QuestionStats> = BTreeMap::new();
    for q in &form.questions {
        per_question.entry(q.id.clone()).or_insert_with(|| QuestionStats {
            question_id: q.id.clone(),
            question_type: q.kind.type_tag().to_string(),
            points: match q.kind {
                QuestionKind::Unrecognized { .. } => 0.0,
                _ => point_weight(q.kind.points(), default_points),
            },
            attempts: 0,
            correct: 0,
            correct_rate: 0.0,
            mean_score: 0.0,
        });
    }

    let relevant: Vec<&ResponseRecord> = records
        .iter()
        .filter(|r| r.form_id() == form.id)
        .collect();
    if relevant.len() < records.len() {
        tracing::debug!(
            "ignoring {} response(s) for other forms",
            records.len() - relevant.len()
        );
    }

    // Accumulate score sums in mean_score, divided out below.
    for record in &relevant {
        for answer in record.answers() {
            let Some(stats) = per_question.get_mut(&answer.question_id) else {
                continue;
            };
            stats.attempts += 1;
            if answer.is_correct {
                stats.correct += 1;
            }
            stats.mean_score += answer.score;
        }
    }

    for stats in per_question.values_mut() {
        if stats.attempts > 0 {
            let n = stats.attempts as f64;
            stats.correct_rate = stats.correct as f64 / n;
            stats.mean_score /= n;
        }
    }

    let response_count = relevant.len();
    let mean_score = if response_count == 0 {
        0.0
    } else {
        relevant.iter().map(|r| r.total_score()).sum::<f64>() / response_count as f64
    };

    FormStats {
        form_id: form.id.clone(),
        response_count,
        mean_score,
        max_possible: form.max_score(default_points),
        per_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GradingEngine;
    use crate::model::Submission;
    use serde_json::json;

    fn form() -> FormDefinition {
        serde_json::from_value(json!({
            "id": "geo",
            "questions": [
                { "id": "capital", "type": "comprehension", "settings": { "correctAnswer": "Paris" } },
                { "id": "fox", "type": "cloze", "settings": { "correctAnswers": ["brown", "fence"], "points": 2 } }
            ]
        }))
        .unwrap()
    }

    fn record(form: &FormDefinition, form_id: &str, answers: serde_json::Value) -> ResponseRecord {
        let submission: Submission =
            serde_json::from_value(json!({ "formId": form_id, "answers": answers })).unwrap();
        let graded = GradingEngine::default().grade(form, &submission.answers);
        ResponseRecord::from_graded(form_id, submission, graded)
    }

    #[test]
    fn aggregates_per_question() {
        let form = form();
        let records = vec![
            record(
                &form,
                "geo",
                json!([
                    { "questionId": "capital", "answer": "paris" },
                    { "questionId": "fox", "answer": ["brown", "fence"] }
                ]),
            ),
            record(
                &form,
                "geo",
                json!([
                    { "questionId": "capital", "answer": "Rome" },
                    { "questionId": "fox", "answer": ["brown", "gate"] },
                    { "questionId": "ghost", "answer": "boo" }
                ]),
            ),
        ];

        let stats = compute_form_stats(&form, &records, 1.0);
        assert_eq!(stats.response_count, 2);
        assert_eq!(stats.max_possible, 3.0);
        assert!((stats.mean_score - 2.0).abs() < 1e-9);

        let capital = &stats.per_question["capital"];
        assert_eq!(capital.attempts, 2);
        assert_eq!(capital.correct, 1);
        assert!((capital.correct_rate - 0.5).abs() < 1e-9);

        let fox = &stats.per_question["fox"];
        assert_eq!(fox.correct, 1);
        assert!((fox.mean_score - 1.5).abs() < 1e-9);
        assert!(!stats.per_question.contains_key("ghost"));
    }

    #[test]
    fn counts_submissions_without_form_id() {
        let form = form();
        let submission: Submission = serde_json::from_value(json!({
            "answers": [{ "questionId": "capital", "answer": "Paris" }]
        }))
        .unwrap();
        let graded = GradingEngine::default().grade_submission(&form, &submission);
        let records = vec![ResponseRecord::from_graded(&form.id, submission, graded)];

        let stats = compute_form_stats(&form, &records, 1.0);
        assert_eq!(stats.response_count, 1);
        assert_eq!(stats.per_question["capital"].correct, 1);
    }

    #[test]
    fn unrecognized_questions_are_worth_nothing() {
        let form: FormDefinition = serde_json::from_value(json!({
            "id": "mixed",
            "questions": [
                { "id": "capital", "type": "comprehension", "settings": { "correctAnswer": "Paris" } },
                { "id": "essay", "type": "essay", "settings": { "points": 5 } }
            ]
        }))
        .unwrap();
        let stats = compute_form_stats(&form, &[], 1.0);
        assert_eq!(stats.per_question["essay"].points, 0.0);
        let listed: f64 = stats.per_question.values().map(|q| q.points).sum();
        assert_eq!(listed, stats.max_possible);
    }

    #[test]
    fn ignores_other_forms_and_handles_empty() {
        let form = form();
        let records = vec![record(
            &form,
            "other",
            json!([{ "questionId": "capital", "answer": "Paris" }]),
        )];
        let stats = compute_form_stats(&form, &records, 1.0);
        assert_eq!(stats.response_count, 0);
        assert_eq!(stats.mean_score, 0.0);
        assert_eq!(stats.per_question["capital"].attempts, 0);
        assert_eq!(stats.per_question["capital"].correct_rate, 0.0);
    }
}
