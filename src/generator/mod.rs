// file: src/generator/mod.rs
// description: question generation across chapter markdown files
// reference: bounded concurrent llm requests with futures buffered streams

use crate::config::{Config, GeneratorConfig};
use crate::converter::scanner::ScannedFile;
use crate::error::{PipelineError, Result};
use crate::exporter::{ExportManifest, JsonExporter};
use crate::llm::{ChatCompletionClient, CompletionBackend, PromptOptions, SYSTEM_PROMPT};
use crate::llm::{build_prompt, parse_questions};
use crate::models::{ChapterContent, Question, QuestionBank};
use crate::parser::ChapterReader;
use crate::pipeline::progress::ProgressTracker;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
struct GeneratedChapter {
    chapter: ChapterContent,
    source: PathBuf,
    questions: Vec<Question>,
}

pub struct QuestionGenerator<B> {
    backend: Arc<B>,
    reader: ChapterReader,
    exporter: JsonExporter,
    config: GeneratorConfig,
    prompt: PromptOptions,
    show_progress: bool,
}

impl QuestionGenerator<ChatCompletionClient> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = ChatCompletionClient::new(config.llm.clone())?;
        Ok(Self::new(
            client,
            config.generator.clone(),
            config.llm.max_content_chars,
        ))
    }
}

impl<B: CompletionBackend> QuestionGenerator<B> {
    pub fn new(backend: B, config: GeneratorConfig, max_content_chars: usize) -> Self {
        let reader = ChapterReader::new(config.min_content_chars, config.skip_keywords.clone());
        let prompt = PromptOptions {
            num_questions: config.questions_per_chapter,
            num_incorrect_answers: config.incorrect_answers,
            max_content_chars,
        };

        Self {
            backend: Arc::new(backend),
            reader,
            exporter: JsonExporter::new(),
            config,
            prompt,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn reader(&self) -> &ChapterReader {
        &self.reader
    }

    pub async fn generate_for_chapter(&self, chapter: &ChapterContent) -> Result<Vec<Question>> {
        let prompt = build_prompt(chapter, self.prompt);
        let response = self.backend.complete(SYSTEM_PROMPT, &prompt).await?;
        parse_questions(&response, Some(chapter), Some(&chapter.id_prefix()))
    }

    /// All chapters in `dir` combined into one bank.
    pub async fn generate_from_directory(&self, dir: &Path) -> Result<QuestionBank> {
        let generated = self.generate_chapters(dir).await?;

        let mut bank = QuestionBank::new();
        for chapter in &generated {
            bank.extend(chapter.questions.iter().cloned());
        }

        self.set_run_metadata(&mut bank, dir, generated.len());
        info!(
            "Generated {} questions from {} chapters",
            bank.len(),
            generated.len()
        );
        Ok(bank)
    }

    /// One app-format JSON file per chapter in `out_dir`, plus a checksum
    /// manifest. The returned bank holds every question for statistics.
    pub async fn generate_from_directory_separate(
        &self,
        dir: &Path,
        out_dir: &Path,
    ) -> Result<(QuestionBank, ExportManifest)> {
        std::fs::create_dir_all(out_dir)
            .map_err(|e| PipelineError::file_operation(out_dir, e))?;

        let generated = self.generate_chapters(dir).await?;

        let mut bank = QuestionBank::new();
        let mut exported = Vec::with_capacity(generated.len());

        for item in &generated {
            let mut chapter_bank = QuestionBank::with_questions(item.questions.clone());
            chapter_bank.set_metadata("chapter_number", item.chapter.chapter_number.as_str());
            chapter_bank.set_metadata("chapter_title", item.chapter.title.as_str());
            chapter_bank.set_metadata("total_questions", item.questions.len());
            chapter_bank.set_metadata("questions_per_chapter", self.config.questions_per_chapter);
            chapter_bank.set_metadata(
                "incorrect_answers_per_question",
                self.config.incorrect_answers,
            );
            chapter_bank.set_metadata("source_file", item.source.display().to_string());
            chapter_bank.set_metadata("generated_at", Utc::now().to_rfc3339());

            let path = out_dir.join(chapter_file_name(&item.chapter));
            match self.exporter.save_question_bank(&chapter_bank, &path) {
                Ok(file) => {
                    exported.push(file);
                    bank.extend(item.questions.iter().cloned());
                }
                Err(e) => error!("Failed to save {}: {}", path.display(), e),
            }
        }

        let chapters_written = exported.len();
        self.set_run_metadata(&mut bank, dir, chapters_written);
        bank.set_metadata("output_directory", out_dir.display().to_string());
        bank.set_metadata("output_format", "separate_files");

        let manifest = ExportManifest::new(exported);
        manifest.write_to(out_dir)?;

        info!(
            "Created {} chapter files in {}",
            chapters_written,
            out_dir.display()
        );
        Ok((bank, manifest))
    }

    /// Questions for one markdown file. An empty bank when the chapter is
    /// too short to generate from.
    pub async fn generate_from_single_file(&self, path: &Path) -> Result<QuestionBank> {
        let Some(chapter) = self.reader.parse_file(path)? else {
            warn!("Skipping {}: insufficient content", path.display());
            return Ok(QuestionBank::new());
        };

        info!("Generating questions for: {}", chapter.title);
        let questions = self.generate_for_chapter(&chapter).await?;

        let mut bank = QuestionBank::with_questions(questions);
        bank.set_metadata("total_questions", bank.len());
        bank.set_metadata("source_file", path.display().to_string());
        bank.set_metadata("chapter_title", chapter.title.as_str());
        bank.set_metadata("generated_at", Utc::now().to_rfc3339());
        Ok(bank)
    }

    async fn generate_chapters(&self, dir: &Path) -> Result<Vec<GeneratedChapter>> {
        let files = self.reader.find_markdown_files(dir)?;

        if files.is_empty() {
            warn!("No markdown files found in {}", dir.display());
            return Ok(Vec::new());
        }

        let workers = self.config.parallel_workers.max(1);
        info!(
            "Generating from {} chapters with {} concurrent requests",
            files.len(),
            workers
        );

        let progress = if self.show_progress {
            ProgressTracker::new(files.len())
        } else {
            ProgressTracker::hidden(files.len())
        };

        let tracker = &progress;
        let results: Vec<Option<GeneratedChapter>> = stream::iter(files.iter())
            .map(move |file| self.process_file(file, tracker))
            .buffered(workers)
            .collect()
            .await;

        progress.finish();
        let stats = progress.snapshot();
        info!(
            "Chapters: {} generated, {} skipped, {} failed",
            stats.files_processed, stats.files_skipped, stats.files_failed
        );

        Ok(results.into_iter().flatten().collect())
    }

    async fn process_file(
        &self,
        file: &ScannedFile,
        progress: &ProgressTracker,
    ) -> Option<GeneratedChapter> {
        let chapter = match self.reader.parse_file(&file.path) {
            Ok(Some(chapter)) => chapter,
            Ok(None) => {
                warn!("Skipping {}: insufficient content", file.file_name);
                progress.record_skipped();
                return None;
            }
            Err(e) => {
                error!("Failed to read {}: {}", file.file_name, e);
                progress.record_failed();
                return None;
            }
        };

        match self.generate_for_chapter(&chapter).await {
            Ok(questions) if !questions.is_empty() => {
                info!(
                    "Generated {} questions from {}",
                    questions.len(),
                    chapter.title
                );
                progress.add_questions(questions.len());
                progress.record_processed();
                Some(GeneratedChapter {
                    chapter,
                    source: file.path.clone(),
                    questions,
                })
            }
            Ok(_) => {
                warn!("No questions generated for {}", chapter.title);
                progress.record_failed();
                None
            }
            Err(e) => {
                error!("Failed to generate questions for {}: {}", chapter.title, e);
                progress.record_failed();
                None
            }
        }
    }

    fn set_run_metadata(&self, bank: &mut QuestionBank, dir: &Path, chapters: usize) {
        bank.set_metadata("total_questions", bank.len());
        bank.set_metadata("chapters_processed", chapters);
        bank.set_metadata("questions_per_chapter", self.config.questions_per_chapter);
        bank.set_metadata(
            "incorrect_answers_per_question",
            self.config.incorrect_answers,
        );
        bank.set_metadata("source_directory", dir.display().to_string());
        bank.set_metadata("generated_at", Utc::now().to_rfc3339());
    }
}

/// `{chapter}_{title}.json` with dots in the chapter number turned into
/// underscores and the title reduced to word characters, '-' and '_'.
pub fn chapter_file_name(chapter: &ChapterContent) -> String {
    let safe_chapter = chapter.chapter_number.replace('.', "_");
    let safe_title: String = chapter
        .title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();

    format!(
        "{}_{}.json",
        safe_chapter,
        safe_title.trim_end().replace(' ', "_")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::json::MANIFEST_FILE_NAME;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    const RESPONSE: &str = r#"[
      {"question": "Hva betyr vikeplikt?",
       "correct_answer": "Slippe fram annen trafikk",
       "incorrect_answers": ["Kjøre først", "Stoppe alltid", "Tute"],
       "category": "Trafikkregler"},
      {"question": "Hvem har vikeplikt i rundkjøring?",
       "correct_answer": "De som skal inn",
       "incorrect_answers": ["De som er i den", "Ingen", "Busser"]}
    ]"#;

    struct CannedBackend {
        calls: AtomicUsize,
    }

    impl CannedBackend {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CompletionBackend for CannedBackend {
        async fn complete(&self, _system: &str, user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if user.contains("Chapter: Feil") {
                return Err(PipelineError::Llm("service unavailable".to_string()));
            }
            Ok(RESPONSE.to_string())
        }
    }

    fn body(topic: &str) -> String {
        format!(
            "{} er et viktig tema i trafikken. Du må alltid følge med på skilt, \
             oppmerking og andre trafikanter for å kjøre trygt.",
            topic
        )
    }

    fn write_chapter(dir: &Path, number: &str, title: &str, body: &str) {
        let content = format!(
            "# Kapittel {number}: {title}\n\n---\nchapter: {number}\ntitle: {title}\n---\n\n{body}\n"
        );
        fs::write(dir.join(format!("{} - {}.md", number, title)), content).unwrap();
    }

    fn generator() -> QuestionGenerator<CannedBackend> {
        let config = Config::default_config().generator;
        QuestionGenerator::new(CannedBackend::new(), config, 10_000).with_progress(false)
    }

    fn chapters_dir() -> TempDir {
        let temp = TempDir::new().unwrap();
        write_chapter(temp.path(), "7.1", "Vikeplikt", &body("Vikeplikt"));
        write_chapter(temp.path(), "7.2", "Rundkjøring", &body("Rundkjøring"));
        write_chapter(temp.path(), "7.3", "Kort", "For lite tekst.");
        write_chapter(temp.path(), "7.4", "Feil", &body("Feil"));
        write_chapter(temp.path(), "7.9", "Oppsummering", &body("Oppsummering"));
        temp
    }

    #[test]
    fn test_chapter_file_name() {
        let chapter = ChapterContent::new("Vikeplikt i kryss!", "7.1.4", "tekst");
        assert_eq!(chapter_file_name(&chapter), "7_1_4_Vikeplikt_i_kryss.json");

        let chapter = ChapterContent::new("Fart og avstand ", "3", "tekst");
        assert_eq!(chapter_file_name(&chapter), "3_Fart_og_avstand.json");
    }

    #[test]
    fn test_generate_for_chapter_uses_id_prefix() {
        let chapter = ChapterContent::new("Vikeplikt", "7.1", body("Vikeplikt"));
        let questions = tokio_test::block_on(generator().generate_for_chapter(&chapter)).unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id.as_deref(), Some("ch7_1_q1"));
        assert_eq!(questions[0].chapter.as_deref(), Some("7.1"));
        assert_eq!(questions[0].answers.len(), 4);
    }

    #[tokio::test]
    async fn test_generate_from_directory_skips_and_survives_failures() {
        let temp = chapters_dir();
        let generator = generator();

        let bank = generator.generate_from_directory(temp.path()).await.unwrap();

        assert_eq!(bank.len(), 4);
        assert_eq!(bank.metadata["chapters_processed"], 2);
        assert_eq!(bank.metadata["total_questions"], 4);
        assert_eq!(bank.metadata["questions_per_chapter"], 5);
        assert_eq!(bank.questions_by_chapter("7.1").len(), 2);
        assert_eq!(bank.questions_by_chapter("7.2").len(), 2);
        assert_eq!(bank.questions[0].id.as_deref(), Some("ch7_1_q1"));
        assert_eq!(bank.questions[2].id.as_deref(), Some("ch7_2_q1"));
        // summary page filtered, short chapter never sent
        assert_eq!(generator.backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_generate_separate_files() {
        let temp = chapters_dir();
        let out = TempDir::new().unwrap();

        let (bank, manifest) = generator()
            .generate_from_directory_separate(temp.path(), out.path())
            .await
            .unwrap();

        assert_eq!(bank.len(), 4);
        assert_eq!(bank.metadata["output_format"], "separate_files");
        assert_eq!(manifest.files.len(), 2);
        assert_eq!(manifest.total_questions, 4);

        assert!(out.path().join("7_1_Vikeplikt.json").exists());
        assert!(out.path().join("7_2_Rundkjøring.json").exists());
        assert!(out.path().join(MANIFEST_FILE_NAME).exists());

        let loaded = JsonExporter::new()
            .load_question_bank(&out.path().join("7_1_Vikeplikt.json"))
            .unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[tokio::test]
    async fn test_generate_from_single_file() {
        let temp = chapters_dir();
        let generator = generator();

        let bank = generator
            .generate_from_single_file(&temp.path().join("7.1 - Vikeplikt.md"))
            .await
            .unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.metadata["chapter_title"], "Vikeplikt");

        let short = generator
            .generate_from_single_file(&temp.path().join("7.3 - Kort.md"))
            .await
            .unwrap();
        assert!(short.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_is_error() {
        let temp = TempDir::new().unwrap();
        let result = generator()
            .generate_from_directory(&temp.path().join("mangler"))
            .await;
        assert!(result.is_err());
    }
}
