//! The `formgrade grade` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use formgrade_core::batch::{grade_batch, BatchReporter};
use formgrade_core::config::load_config_from;
use formgrade_core::engine::GradingEngine;
use formgrade_core::lookup::find_question;
use formgrade_core::model::FormDefinition;
use formgrade_core::parser;
use formgrade_core::report::ResponseRecord;
use formgrade_core::validate::CategoryMatch;

use super::OutputFormat;

/// Console progress reporter.
struct ConsoleReporter {
    total: usize,
}

impl BatchReporter for ConsoleReporter {
    fn on_graded(&self, index: usize, record: &ResponseRecord) {
        eprintln!(
            "  Graded [{}/{}] {}: {:.2} points",
            index + 1,
            self.total,
            record.respondent_email().unwrap_or("anonymous"),
            record.total_score(),
        );
    }

    fn on_batch_complete(&self, total: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {total} submission(s) graded ({:.3}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    form_path: PathBuf,
    submission_path: PathBuf,
    output: Option<PathBuf>,
    no_save: bool,
    format: OutputFormat,
    strict_categories: bool,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if strict_categories {
        config.category_match = CategoryMatch::Strict;
    }
    if let Some(n) = parallelism {
        anyhow::ensure!(n >= 1, "parallelism must be at least 1");
        config.parallelism = n;
    }
    tracing::debug!("grading config: {config:?}");

    let form = Arc::new(parser::parse_form(&form_path)?);

    let submissions = if submission_path.is_dir() {
        parser::load_submission_directory(&submission_path)?
    } else {
        vec![parser::parse_submission(&submission_path)?]
    };
    anyhow::ensure!(
        !submissions.is_empty(),
        "no submissions found in {}",
        submission_path.display()
    );

    eprintln!(
        "formgrade v{} — Grading {} submission(s) against '{}'",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        form.id
    );

    let engine = GradingEngine::new(config.clone());
    let reporter = ConsoleReporter {
        total: submissions.len(),
    };
    let records = grade_batch(
        &engine,
        Arc::clone(&form),
        submissions,
        config.parallelism,
        &reporter,
    )
    .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text => {
            for record in &records {
                print_record(&form, record, config.default_points);
            }
        }
    }

    if !no_save {
        let dir = output.unwrap_or(config.output_dir);
        for record in &records {
            record.save_json(&dir.join(record.file_name()))?;
        }
        eprintln!("Saved {} response(s) to: {}", records.len(), dir.display());
    }

    Ok(())
}

fn print_record(form: &FormDefinition, record: &ResponseRecord, default_points: f64) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Question", "Type", "Correct", "Score", "Note"]);

    for answer in record.answers() {
        let question_type = find_question(&answer.question_id, &form.questions)
            .map(|q| q.kind.type_tag().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(&answer.question_id),
            Cell::new(question_type),
            Cell::new(if answer.is_correct { "yes" } else { "no" }),
            Cell::new(format!("{:.2}", answer.score)),
            Cell::new(answer.issue.as_ref().map(|i| i.label()).unwrap_or("")),
        ]);
    }

    println!(
        "Response {} ({})",
        record.id(),
        record.respondent_email().unwrap_or("anonymous")
    );
    println!("{table}");
    println!(
        "Total: {:.2} / {:.2} ({} of {} correct)\n",
        record.total_score(),
        form.max_score(default_points),
        record.correct_count(),
        record.answers().len()
    );
}
