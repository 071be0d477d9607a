//! The `formgrade import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use formgrade_core::authoring::import_authoring_form;
use formgrade_core::parser::validate_form;

pub fn execute(authoring_path: PathBuf, output: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&authoring_path)
        .with_context(|| format!("failed to read {}", authoring_path.display()))?;
    let fallback_id = authoring_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "imported".to_string());

    let form = import_authoring_form(&content, &fallback_id)?;

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&output, serde_json::to_string_pretty(&form)?)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Imported {} question(s) into {}",
        form.questions.len(),
        output.display()
    );

    for w in validate_form(&form) {
        let id = w.question_id.as_deref().unwrap_or("-");
        println!("  [{id}] WARNING: {}", w.message);
    }

    Ok(())
}
