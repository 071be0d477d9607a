//! The `formgrade stats` command.

use std::path::PathBuf;

use anyhow::Result;

use formgrade_core::config::load_config_from;
use formgrade_core::parser;
use formgrade_core::report::load_response_directory;
use formgrade_core::statistics::compute_form_stats;

use super::OutputFormat;

pub fn execute(
    form_path: PathBuf,
    responses: Option<PathBuf>,
    format: OutputFormat,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let form = parser::parse_form(&form_path)?;
    let responses_dir = responses.unwrap_or_else(|| config.output_dir.clone());

    let records = load_response_directory(&responses_dir)?;
    let stats = compute_form_stats(&form, &records, config.default_points);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Text => {
            use comfy_table::{Cell, Table};

            println!(
                "Form: {} — {} response(s), mean score {:.2} / {:.2}",
                stats.form_id, stats.response_count, stats.mean_score, stats.max_possible
            );

            let mut table = Table::new();
            table.set_header(vec![
                "Question",
                "Type",
                "Points",
                "Attempts",
                "Correct %",
                "Mean Score",
            ]);
            for q in &form.questions {
                let Some(s) = stats.per_question.get(&q.id) else {
                    continue;
                };
                table.add_row(vec![
                    Cell::new(&s.question_id),
                    Cell::new(&s.question_type),
                    Cell::new(format!("{:.2}", s.points)),
                    Cell::new(s.attempts),
                    Cell::new(format!("{:.1}%", s.correct_rate * 100.0)),
                    Cell::new(format!("{:.2}", s.mean_score)),
                ]);
            }
            println!("{table}");
        }
    }

    Ok(())
}
