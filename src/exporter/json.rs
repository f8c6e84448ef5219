// file: src/exporter/json.rs
// description: json export of question banks in the app format
// reference: https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use crate::models::question::{DEFAULT_CATEGORY, DEFAULT_DIFFICULTY};
use crate::models::{AppQuestion, AppQuestionFile, Question, QuestionBank};
use chrono::Utc;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

pub const MANIFEST_FILE_NAME: &str = "manifest.json";

#[derive(Debug, Clone, Copy)]
pub struct JsonExporter {
    pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub questions: usize,
    pub sha256: String,
}

/// Record of the files written by one run, with content checksums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    pub exported_at: String,
    pub total_questions: usize,
    pub files: Vec<ExportedFile>,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }

    pub fn save_question_bank(&self, bank: &QuestionBank, path: &Path) -> Result<ExportedFile> {
        self.save_question_bank_with_rng(bank, path, &mut rand::thread_rng())
    }

    pub fn save_question_bank_with_rng<R: Rng + ?Sized>(
        &self,
        bank: &QuestionBank,
        path: &Path,
        rng: &mut R,
    ) -> Result<ExportedFile> {
        let file = format_for_app(bank, rng);
        let json = if self.pretty {
            serde_json::to_string_pretty(&file)?
        } else {
            serde_json::to_string(&file)?
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
        }
        fs::write(path, &json).map_err(|e| PipelineError::file_operation(path, e))?;

        info!("Saved {} questions to {}", file.questions.len(), path.display());

        Ok(ExportedFile {
            path: path.to_path_buf(),
            questions: file.questions.len(),
            sha256: sha256_hex(json.as_bytes()),
        })
    }

    pub fn load_question_bank(&self, path: &Path) -> Result<QuestionBank> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::file_operation(path, e))?;
        let file: AppQuestionFile = serde_json::from_str(&content)?;
        Ok(QuestionBank::from(file))
    }
}

/// App shape of a bank: answers shuffled per question, with the correct
/// index recomputed after the shuffle and display defaults filled in.
pub fn format_for_app<R: Rng + ?Sized>(bank: &QuestionBank, rng: &mut R) -> AppQuestionFile {
    AppQuestionFile {
        questions: bank
            .questions
            .iter()
            .map(|question| app_question(question, rng))
            .collect(),
    }
}

fn app_question<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> AppQuestion {
    let mut answers = question.answers.clone();
    answers.shuffle(rng);

    let category = question.category.as_deref();
    let explanation = question.explanation.clone().unwrap_or_else(|| {
        format!(
            "Riktig svar er basert på {}.",
            category.unwrap_or("teoripensum")
        )
    });

    AppQuestion {
        id: question
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        question: question.question.clone(),
        correct_answer: answers.iter().position(|answer| answer.is_correct),
        options: answers.into_iter().map(|answer| answer.text).collect(),
        explanation,
        category: category.unwrap_or(DEFAULT_CATEGORY).to_string(),
        difficulty: question
            .difficulty
            .clone()
            .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
        image_url: question.image_url.clone(),
        sign_id: question.sign_id.clone(),
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

impl ExportManifest {
    pub fn new(files: Vec<ExportedFile>) -> Self {
        Self {
            exported_at: Utc::now().to_rfc3339(),
            total_questions: files.iter().map(|file| file.questions).sum(),
            files,
        }
    }

    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| PipelineError::file_operation(dir, e))?;
        let path = dir.join(MANIFEST_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| PipelineError::file_operation(&path, e))?;

        info!(
            "Manifest written: {} files, {} questions",
            self.files.len(),
            self.total_questions
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::tempdir;

    fn question(id: Option<&str>, category: Option<&str>) -> Question {
        let mut question = Question::new(
            "Hva betyr et gult blinkende lys?",
            vec![
                Answer::correct("Vis særlig forsiktighet"),
                Answer::incorrect("Stopp"),
                Answer::incorrect("Kjør"),
                Answer::incorrect("Snu"),
            ],
        );
        question.id = id.map(str::to_string);
        question.category = category.map(str::to_string);
        question
    }

    #[test]
    fn test_correct_index_follows_shuffle() {
        let bank = QuestionBank::with_questions(vec![question(Some("q1"), Some("Skilt")); 20]);
        let file = format_for_app(&bank, &mut StdRng::seed_from_u64(7));

        for app in &file.questions {
            let index = app.correct_answer.unwrap();
            assert_eq!(app.options[index], "Vis særlig forsiktighet");
            assert_eq!(app.options.len(), 4);
        }
    }

    #[test]
    fn test_defaults_filled_in() {
        let mut bare = question(None, None);
        bare.difficulty = None;
        let bank = QuestionBank::with_questions(vec![bare, question(Some("q2"), Some("Fart"))]);
        let file = format_for_app(&bank, &mut StdRng::seed_from_u64(1));

        let first = &file.questions[0];
        assert!(Uuid::parse_str(&first.id).is_ok());
        assert_eq!(first.category, "General");
        assert_eq!(first.difficulty, "medium");
        assert_eq!(first.explanation, "Riktig svar er basert på teoripensum.");

        let second = &file.questions[1];
        assert_eq!(second.id, "q2");
        assert_eq!(second.explanation, "Riktig svar er basert på Fart.");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("questions.json");
        let bank = QuestionBank::with_questions(vec![question(Some("q1"), Some("Skilt"))]);

        let exporter = JsonExporter::new();
        let exported = exporter
            .save_question_bank_with_rng(&bank, &path, &mut StdRng::seed_from_u64(3))
            .unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"correctAnswer\""));
        assert!(raw.contains("særlig"));
        assert_eq!(exported.questions, 1);
        assert_eq!(exported.sha256, sha256_hex(raw.as_bytes()));

        let loaded = exporter.load_question_bank(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.questions[0].correct_answer().map(|a| a.text.as_str()),
            Some("Vis særlig forsiktighet")
        );
    }

    #[test]
    fn test_manifest_totals() {
        let dir = tempdir().unwrap();
        let manifest = ExportManifest::new(vec![
            ExportedFile {
                path: PathBuf::from("a.json"),
                questions: 5,
                sha256: sha256_hex(b"a"),
            },
            ExportedFile {
                path: PathBuf::from("b.json"),
                questions: 3,
                sha256: sha256_hex(b"b"),
            },
        ]);
        assert_eq!(manifest.total_questions, 8);

        let path = manifest.write_to(dir.path()).unwrap();
        let written: ExportManifest =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.files, manifest.files);
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
