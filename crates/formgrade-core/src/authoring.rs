//! Import of forms saved by the authoring UI.
//!
//! The authoring UI stores what it needs to render and edit questions rather
//! than accepted answers: categorize questions keep a list of categories plus
//! items pointing at a category index, cloze questions keep the selected
//! words, comprehension questions keep multiple-choice options flagged
//! `correct`. Questions may also lack an `id`. This module derives the
//! canonical grading settings from that shape.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::model::{
    CategorizeSettings, CategoryMap, ClozeSettings, ComprehensionSettings, FormDefinition,
    QuestionDefinition, QuestionKind,
};

static BLANK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").expect("blank pattern is valid"));

/// Contents of every `[...]` blank in a cloze passage, in order.
///
/// `[]` yields an empty string.
pub fn extract_blanks(passage: &str) -> Vec<String> {
    BLANK
        .captures_iter(passage)
        .map(|c| c.get(1).map_or("", |m| m.as_str()).to_string())
        .collect()
}

#[derive(Debug, Deserialize)]
struct AuthoringForm {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    document_id: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<AuthoringQuestion>,
}

#[derive(Debug, Deserialize)]
struct AuthoringQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default)]
    title: String,
    /// Kept raw so unknown question types carry their settings through.
    #[serde(default)]
    settings: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AuthoringSettings {
    categories: Vec<String>,
    items: Vec<AuthoringItem>,
    passage: Option<String>,
    selected_words: Vec<String>,
    mcqs: Vec<AuthoringMcq>,
    points: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthoringItem {
    text: String,
    /// Index into `categories`, stored as a string or a number.
    #[serde(default)]
    category_id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AuthoringMcq {
    #[serde(default)]
    options: Vec<AuthoringOption>,
}

#[derive(Debug, Deserialize)]
struct AuthoringOption {
    text: String,
    #[serde(default)]
    correct: bool,
}

/// Convert an authoring-UI form document (JSON) into a [`FormDefinition`].
///
/// The form id is taken from `id`, then `_id`, then `fallback_id`. Questions
/// without an id are numbered `q1`, `q2`, ... by position.
pub fn import_authoring_form(content: &str, fallback_id: &str) -> Result<FormDefinition> {
    let form: AuthoringForm =
        serde_json::from_str(content).context("failed to parse authoring form JSON")?;

    let questions = form
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            let id = q.id.unwrap_or_else(|| format!("q{}", i + 1));
            let kind = convert_settings(&id, q.type_tag, q.settings)?;
            Ok(QuestionDefinition {
                id,
                title: q.title,
                kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FormDefinition {
        id: form
            .id
            .or(form.document_id)
            .unwrap_or_else(|| fallback_id.to_string()),
        title: form.title,
        description: form.description,
        questions,
    })
}

fn convert_settings(id: &str, type_tag: String, raw: serde_json::Value) -> Result<QuestionKind> {
    let kind = match type_tag.as_str() {
        "categorize" => {
            let settings = authoring_settings(id, &type_tag, raw)?;
            QuestionKind::Categorize(CategorizeSettings {
                correct_answer: categorize_answer(id, &settings),
                points: settings.points,
            })
        }
        "cloze" => {
            let settings = authoring_settings(id, &type_tag, raw)?;
            let blanks = cloze_answers(&settings);
            QuestionKind::Cloze(ClozeSettings {
                passage: settings.passage,
                correct_answers: blanks,
                points: settings.points,
            })
        }
        "comprehension" => {
            let settings = authoring_settings(id, &type_tag, raw)?;
            if settings.mcqs.len() > 1 {
                tracing::warn!(
                    "question {id}: {} mcqs, only the first is graded",
                    settings.mcqs.len()
                );
            }
            let correct_answer = settings.mcqs.first().and_then(|mcq| {
                mcq.options
                    .iter()
                    .find(|o| o.correct)
                    .map(|o| o.text.clone())
            });
            QuestionKind::Comprehension(ComprehensionSettings {
                passage: settings.passage,
                correct_answer,
                points: settings.points,
            })
        }
        _ => QuestionKind::Unrecognized {
            type_tag,
            settings: raw,
        },
    };
    Ok(kind)
}

fn authoring_settings(
    id: &str,
    type_tag: &str,
    raw: serde_json::Value,
) -> Result<AuthoringSettings> {
    if raw.is_null() {
        return Ok(AuthoringSettings::default());
    }
    serde_json::from_value(raw)
        .with_context(|| format!("question {id}: invalid {type_tag} settings"))
}

fn categorize_answer(id: &str, settings: &AuthoringSettings) -> Option<CategoryMap> {
    if settings.categories.is_empty() {
        return None;
    }

    let mut mapping: CategoryMap = settings
        .categories
        .iter()
        .map(|label| (label.clone(), Vec::new()))
        .collect();

    for item in &settings.items {
        let label = item
            .category_id
            .as_ref()
            .and_then(category_index)
            .and_then(|index| settings.categories.get(index));
        match label {
            Some(label) => mapping.entry(label.clone()).or_default().push(item.text.clone()),
            None => tracing::warn!("question {id}: item '{}' has no valid category", item.text),
        }
    }

    Some(mapping)
}

fn category_index(value: &serde_json::Value) -> Option<usize> {
    match value {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        _ => None,
    }
}

/// Bracketed blanks win; otherwise the selected words, ordered by where they
/// first occur in the passage.
fn cloze_answers(settings: &AuthoringSettings) -> Option<Vec<String>> {
    let passage = settings.passage.as_deref().unwrap_or_default();
    let bracketed = extract_blanks(passage);
    if !bracketed.is_empty() {
        return Some(bracketed);
    }
    if settings.selected_words.is_empty() {
        return None;
    }

    let lowered = passage.to_lowercase();
    let mut words: Vec<(usize, &String)> = settings
        .selected_words
        .iter()
        .map(|w| (lowered.find(&w.to_lowercase()).unwrap_or(usize::MAX), w))
        .collect();
    words.sort_by_key(|(position, _)| *position);
    Some(words.into_iter().map(|(_, w)| w.clone()).collect())
}
