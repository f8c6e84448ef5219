// file: tests/question_flow.rs
// description: chapter markdown through generation, export and statistics
// reference: generation run against a scripted completion backend

use pretty_assertions::assert_eq;
use quizbank::exporter::json::format_for_app;
use quizbank::{CompletionBackend, Config, JsonExporter, QuestionGenerator, Result, Validator};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use tempfile::TempDir;

struct ScriptedBackend;

impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        assert!(system.contains("Norwegian driving theory"));
        let category = if user.contains("Chapter: Vikeplikt") {
            "Trafikkregler"
        } else {
            "Sikkerhet"
        };

        Ok(format!(
            r#"```json
[
  {{"question": "Spørsmål en?", "correct_answer": "Riktig", "incorrect_answers": ["Feil 1", "Feil 2", "Feil 3"], "category": "{category}", "difficulty": "easy"}},
  {{"question": "Spørsmål to?", "correct_answer": "Riktig", "incorrect_answers": ["Feil 1", "Feil 2", "Feil 3"]}}
]
```"#
        ))
    }
}

fn write_chapter(dir: &std::path::Path, number: &str, title: &str) {
    let body = format!(
        "{title} handler om hvordan du samhandler med andre trafikanter. \
         Les teksten nøye og legg merke til reglene som gjelder i kryss og på veien."
    );
    fs::write(
        dir.join(format!("{number} - {title}.md")),
        format!("# Kapittel {number}: {title}\n\n---\nchapter: {number}\ntitle: {title}\n---\n\n{body}\n"),
    )
    .unwrap();
}

#[tokio::test]
async fn generated_bank_exports_in_app_format() {
    let markdown = TempDir::new().unwrap();
    write_chapter(markdown.path(), "7.1", "Vikeplikt");
    write_chapter(markdown.path(), "3.4", "Reaksjonstid");

    let config = Config::default_config();
    let generator = QuestionGenerator::new(ScriptedBackend, config.generator.clone(), 10_000)
        .with_progress(false);

    let bank = generator
        .generate_from_directory(markdown.path())
        .await
        .unwrap();
    assert_eq!(bank.len(), 4);
    assert!(Validator::question_issues(&bank).is_empty());

    let stats = bank.statistics();
    assert_eq!(stats.chapters.get("7.1"), Some(&2));
    assert_eq!(stats.chapters.get("3.4"), Some(&2));
    assert_eq!(stats.categories.get("General"), Some(&2));
    assert_eq!(stats.avg_answers_per_question, 4.0);

    let app = format_for_app(&bank, &mut StdRng::seed_from_u64(11));
    for question in &app.questions {
        assert_eq!(question.options[question.correct_answer.unwrap()], "Riktig");
    }

    let output = TempDir::new().unwrap();
    let path = output.path().join("questions.json");
    let exporter = JsonExporter::new();
    exporter.save_question_bank(&bank, &path).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let questions = raw["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 4);
    assert_eq!(questions[0]["id"], "ch3_4_q1");
    assert_eq!(questions[0]["category"], "Sikkerhet");
    assert!(questions[1]["explanation"]
        .as_str()
        .unwrap()
        .starts_with("Riktig svar er basert på"));

    let reloaded = exporter.load_question_bank(&path).unwrap();
    assert_eq!(reloaded.len(), 4);
    assert!(Validator::question_issues(&reloaded).is_empty());
}
