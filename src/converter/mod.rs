// file: src/converter/mod.rs
// description: batch conversion of saved html chapter pages into cleaned markdown
// reference: spawn_blocking workers fanned out with buffer_unordered

pub mod html;
pub mod scanner;

pub use html::{extract_main_content, extract_title};
pub use scanner::{ScannedFile, find_html_files};

use crate::cleaner::{
    ChapterStructurer, DocumentDeduplicator, chapter_number_from_stem, output_file_name,
};
use crate::config::{CleanerConfig, ConverterConfig};
use crate::error::{PipelineError, Result};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedChapter {
    pub chapter_id: String,
    pub title: String,
    pub file_name: String,
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Written(PathBuf),
    Skipped { reason: String },
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct ConversionSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl ConversionSummary {
    fn from_stats(stats: &PipelineStats) -> Self {
        Self {
            converted: stats.files_processed,
            skipped: stats.files_skipped,
            failed: stats.files_failed,
            total: stats.total_files(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HtmlConverter {
    config: ConverterConfig,
    deduplicator: DocumentDeduplicator,
    structurer: ChapterStructurer,
}

impl HtmlConverter {
    pub fn new(config: ConverterConfig, cleaner: CleanerConfig) -> Self {
        let structurer = ChapterStructurer::new(config.chapter_label.clone());
        Self {
            config,
            deduplicator: DocumentDeduplicator::new(cleaner),
            structurer,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    /// Converts one page. `None` when the extracted content is too short.
    pub fn convert_html(&self, html: &str, stem: &str) -> Option<ConvertedChapter> {
        let title = extract_title(html);
        let content = extract_main_content(html, &self.deduplicator);

        if content.chars().count() < self.config.min_content_chars {
            debug!(
                "Content for {} below {} chars",
                stem, self.config.min_content_chars
            );
            return None;
        }

        let chapter_id = chapter_number_from_stem(stem);
        let markdown = self.structurer.structure(&chapter_id, &title, &content);
        let file_name = output_file_name(&chapter_id, &title);

        Some(ConvertedChapter {
            chapter_id,
            title,
            file_name,
            markdown,
        })
    }

    pub fn convert_file(&self, path: &Path) -> Result<ConversionOutcome> {
        let html = fs::read_to_string(path).map_err(|e| PipelineError::file_operation(path, e))?;

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .ok_or_else(|| PipelineError::Conversion {
                file: path.display().to_string(),
                message: "file has no name".to_string(),
            })?;

        let Some(chapter) = self.convert_html(&html, &stem) else {
            return Ok(ConversionOutcome::Skipped {
                reason: format!("less than {} chars of content", self.config.min_content_chars),
            });
        };

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| PipelineError::file_operation(&self.config.output_dir, e))?;

        let output_path = self.config.output_dir.join(&chapter.file_name);
        fs::write(&output_path, &chapter.markdown)
            .map_err(|e| PipelineError::file_operation(&output_path, e))?;

        info!("Converted {} -> {}", path.display(), chapter.file_name);
        Ok(ConversionOutcome::Written(output_path))
    }

    /// Converts every page in the input directory; per-file failures are
    /// counted, never propagated.
    pub async fn convert_all(&self) -> Result<ConversionSummary> {
        self.convert_all_with(ProgressTracker::new).await
    }

    pub async fn convert_all_quiet(&self) -> Result<ConversionSummary> {
        self.convert_all_with(ProgressTracker::hidden).await
    }

    async fn convert_all_with(
        &self,
        make_tracker: fn(usize) -> ProgressTracker,
    ) -> Result<ConversionSummary> {
        let files = find_html_files(&self.config.input_dir)?;

        if files.is_empty() {
            warn!("No HTML files found in {}", self.config.input_dir.display());
            return Ok(ConversionSummary::default());
        }

        let workers = self.config.parallel_workers.max(1);
        info!(
            "Converting {} files with {} concurrent tasks",
            files.len(),
            workers
        );

        let progress = Arc::new(make_tracker(files.len()));
        let converter = Arc::new(self.clone());

        let tasks = files.into_iter().map(|file| {
            let converter = Arc::clone(&converter);
            let progress = Arc::clone(&progress);

            async move {
                let path = file.path.clone();
                let converted =
                    tokio::task::spawn_blocking(move || converter.convert_file(&path)).await;

                match converted {
                    Ok(Ok(ConversionOutcome::Written(_))) => {
                        progress.record_processed();
                    }
                    Ok(Ok(ConversionOutcome::Skipped { reason })) => {
                        debug!("Skipped {}: {}", file.file_name, reason);
                        progress.record_skipped();
                    }
                    Ok(Err(e)) => {
                        warn!("Failed to convert {}: {}", file.file_name, e);
                        progress.record_failed();
                    }
                    Err(e) => {
                        error!("Conversion task panicked: {}", e);
                        progress.record_failed();
                    }
                }
            }
        });

        stream::iter(tasks)
            .buffer_unordered(workers)
            .collect::<Vec<()>>()
            .await;

        progress.finish();
        let stats = progress.snapshot();
        let summary = ConversionSummary::from_stats(&stats);

        info!(
            "Conversion complete: {} converted, {} skipped, {} failed of {} ({:.1} files/s, {:.1}% ok)",
            summary.converted,
            summary.skipped,
            summary.failed,
            summary.total,
            stats.files_per_second(),
            stats.success_rate()
        );
        Ok(summary)
    }
}
