//! The `formgrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(form_path: PathBuf) -> Result<()> {
    let form = formgrade_core::parser::parse_form(&form_path)?;

    println!("Form: {} ({} questions)", form.id, form.questions.len());

    let warnings = formgrade_core::parser::validate_form(&form);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All questions valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
