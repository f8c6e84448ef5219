// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod cleaner;
pub mod config;
pub mod converter;
pub mod error;
pub mod exporter;
pub mod generator;
pub mod llm;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use cleaner::{
    ChapterStructurer, DedupContext, DocumentDeduplicator, SimilarityMatcher, normalize_heading,
    normalize_line,
};
pub use config::{AuthMode, CleanerConfig, Config, ConverterConfig, GeneratorConfig, LlmConfig};
pub use converter::{ConversionOutcome, ConversionSummary, ConvertedChapter, HtmlConverter};
pub use error::{PipelineError, Result};
pub use exporter::{ExportManifest, ExportedFile, JsonExporter};
pub use generator::QuestionGenerator;
pub use llm::{ChatCompletionClient, CompletionBackend};
pub use models::{
    Answer, AppQuestion, AppQuestionFile, ChapterContent, Question, QuestionBank,
    QuestionBankStatistics, Subsection,
};
pub use parser::{ChapterReader, FrontmatterParser, MarkdownParser};
pub use pipeline::{PipelineStats, ProgressTracker};
pub use utils::Validator;
