//! The `formgrade init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("formgrade.toml").exists() {
        println!("formgrade.toml already exists, skipping.");
    } else {
        std::fs::write("formgrade.toml", SAMPLE_CONFIG)?;
        println!("Created formgrade.toml");
    }

    std::fs::create_dir_all("forms/submissions")?;
    for (path, content) in [
        ("forms/example.json", EXAMPLE_FORM),
        ("forms/submissions/example.json", EXAMPLE_SUBMISSION),
    ] {
        if std::path::Path::new(path).exists() {
            println!("{path} already exists, skipping.");
        } else {
            std::fs::write(path, content)?;
            println!("Created {path}");
        }
    }

    println!("\nNext steps:");
    println!("  1. Run: formgrade validate --form forms/example.json");
    println!("  2. Run: formgrade grade --form forms/example.json --submission forms/submissions");
    println!("  3. Run: formgrade stats --form forms/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# formgrade configuration

# Points for questions that do not set `points`.
default_points = 1.0

# "lenient" ignores categories a categorize question does not define;
# "strict" marks items filed under them as wrong.
category_match = "lenient"

parallelism = 4
output_dir = "./formgrade-results"
"#;

const EXAMPLE_FORM: &str = r#"{
  "id": "example",
  "title": "Example Quiz",
  "questions": [
    {
      "id": "sort-food",
      "type": "categorize",
      "title": "Sort the food",
      "settings": {
        "correctAnswer": { "Fruit": ["apple", "banana"], "Vegetable": ["carrot"] },
        "points": 2
      }
    },
    {
      "id": "fox",
      "type": "cloze",
      "title": "Fill in the blanks",
      "settings": {
        "passage": "A quick [brown] fox jumped over a [fence]",
        "correctAnswers": ["brown", "fence"],
        "points": 2
      }
    },
    {
      "id": "capital",
      "type": "comprehension",
      "title": "Capital city",
      "settings": {
        "passage": "Paris is the capital and largest city of France.",
        "correctAnswer": "Paris",
        "points": 1
      }
    }
  ]
}
"#;

const EXAMPLE_SUBMISSION: &str = r#"{
  "formId": "example",
  "respondentEmail": "student@example.com",
  "completionTime": 95,
  "answers": [
    { "questionId": "sort-food", "answer": { "Fruit": ["banana", "apple"], "Vegetable": ["carrot"] } },
    { "questionId": "fox", "answer": ["Brown", "gate"] },
    { "questionId": "capital", "answer": "paris" }
  ]
}
"#;
