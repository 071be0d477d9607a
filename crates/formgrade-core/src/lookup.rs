//! Question lookup by identifier.

use std::collections::HashMap;

use crate::model::QuestionDefinition;

/// Find the first question whose id matches exactly.
pub fn find_question<'a>(
    question_id: &str,
    questions: &'a [QuestionDefinition],
) -> Option<&'a QuestionDefinition> {
    questions.iter().find(|q| q.id == question_id)
}

/// Hash index over a form's questions, built once per grading call.
///
/// Lookups agree with [`find_question`]: when ids repeat, the first
/// occurrence wins.
#[derive(Debug)]
pub struct QuestionIndex<'a> {
    by_id: HashMap<&'a str, &'a QuestionDefinition>,
}

impl<'a> QuestionIndex<'a> {
    pub fn new(questions: &'a [QuestionDefinition]) -> Self {
        let mut by_id = HashMap::with_capacity(questions.len());
        for question in questions {
            by_id.entry(question.id.as_str()).or_insert(question);
        }
        Self { by_id }
    }

    pub fn get(&self, question_id: &str) -> Option<&'a QuestionDefinition> {
        self.by_id.get(question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComprehensionSettings, QuestionKind};

    fn question(id: &str, title: &str) -> QuestionDefinition {
        QuestionDefinition {
            id: id.into(),
            title: title.into(),
            kind: QuestionKind::Comprehension(ComprehensionSettings::default()),
        }
    }

    #[test]
    fn finds_exact_match() {
        let questions = vec![question("q1", "First"), question("q2", "Second")];
        assert_eq!(find_question("q2", &questions).unwrap().title, "Second");
        assert!(find_question("Q2", &questions).is_none());
        assert!(find_question("q", &questions).is_none());
    }

    #[test]
    fn empty_question_list() {
        assert!(find_question("q1", &[]).is_none());
        let index = QuestionIndex::new(&[]);
        assert!(index.is_empty());
        assert!(index.get("q1").is_none());
    }

    #[test]
    fn index_keeps_first_duplicate() {
        let questions = vec![
            question("dup", "first"),
            question("other", "other"),
            question("dup", "second"),
        ];
        let index = QuestionIndex::new(&questions);
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("dup").unwrap().title, "first");
        assert_eq!(find_question("dup", &questions).unwrap().title, "first");
    }
}
