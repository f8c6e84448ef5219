// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::cleaner::chapter::DEFAULT_CHAPTER_LABEL;
use crate::cleaner::dedup::MIN_TRACKED_TOKENS;
use crate::cleaner::similarity::{FUZZY_THRESHOLD, MIN_FUZZY_TOKENS};
use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "QUIZBANK";
const FALLBACK_API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub converter: ConverterConfig,
    #[serde(default)]
    pub cleaner: CleanerConfig,
    pub generator: GeneratorConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConverterConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub parallel_workers: usize,
    pub min_content_chars: usize,
    pub chapter_label: String,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct CleanerConfig {
    pub fuzzy_threshold: f64,
    pub min_fuzzy_tokens: usize,
    pub min_tracked_tokens: usize,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: FUZZY_THRESHOLD,
            min_fuzzy_tokens: MIN_FUZZY_TOKENS,
            min_tracked_tokens: MIN_TRACKED_TOKENS,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub questions_per_chapter: usize,
    pub incorrect_answers: usize,
    pub parallel_workers: usize,
    pub min_content_chars: usize,
    #[serde(default = "default_skip_keywords")]
    pub skip_keywords: Vec<String>,
}

fn default_skip_keywords() -> Vec<String> {
    ["nøkkelord", "fullført", "oppsummering"]
        .iter()
        .map(|keyword| keyword.to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Bearer,
    Azure,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub api_base: String,
    pub api_key: Option<String>,
    pub model: String,
    pub auth_mode: AuthMode,
    pub api_version: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_content_chars: usize,
}

impl LlmConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(FALLBACK_API_KEY_VAR).ok())
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            converter: ConverterConfig {
                input_dir: PathBuf::from("./html"),
                output_dir: PathBuf::from("./markdown"),
                parallel_workers: 4,
                min_content_chars: 100,
                chapter_label: DEFAULT_CHAPTER_LABEL.to_string(),
            },
            cleaner: CleanerConfig::default(),
            generator: GeneratorConfig {
                input_dir: PathBuf::from("./markdown"),
                output_path: PathBuf::from("./output/questions.json"),
                questions_per_chapter: 5,
                incorrect_answers: 3,
                parallel_workers: 4,
                min_content_chars: 100,
                skip_keywords: default_skip_keywords(),
            },
            llm: LlmConfig {
                api_base: "https://api.openai.com/v1".to_string(),
                api_key: None,
                model: "gpt-4o-mini".to_string(),
                auth_mode: AuthMode::Bearer,
                api_version: None,
                temperature: 0.7,
                max_tokens: 4000,
                timeout_secs: 120,
                max_content_chars: 10_000,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.converter.parallel_workers == 0 || self.generator.parallel_workers == 0 {
            return Err(PipelineError::Config(
                "parallel_workers must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.cleaner.fuzzy_threshold) {
            return Err(PipelineError::Config(
                "fuzzy_threshold must be between 0 and 1".to_string(),
            ));
        }

        if self.generator.questions_per_chapter == 0 {
            return Err(PipelineError::Config(
                "questions_per_chapter must be greater than 0".to_string(),
            ));
        }

        if self.generator.incorrect_answers == 0 {
            return Err(PipelineError::Config(
                "incorrect_answers must be greater than 0".to_string(),
            ));
        }

        if self.llm.auth_mode == AuthMode::Azure && self.llm.api_version.is_none() {
            return Err(PipelineError::Config(
                "api_version is required for azure auth mode".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.cleaner.min_fuzzy_tokens, 5);
        assert_eq!(config.converter.chapter_label, "Kapittel");
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = Config::default_config();
        config.generator.parallel_workers = 0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_azure_requires_api_version() {
        let mut config = Config::default_config();
        config.llm.auth_mode = AuthMode::Azure;
        assert!(config.validate().is_err());

        config.llm.api_version = Some("2024-02-15-preview".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[converter]
input_dir = "in"
output_dir = "out"
parallel_workers = 2
min_content_chars = 50
chapter_label = "Chapter"

[generator]
input_dir = "out"
output_path = "questions.json"
questions_per_chapter = 3
incorrect_answers = 2
parallel_workers = 1
min_content_chars = 100

[llm]
api_base = "http://localhost:8080/v1"
model = "local"
auth_mode = "bearer"
temperature = 0.2
max_tokens = 1000
timeout_secs = 30
max_content_chars = 5000
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.converter.chapter_label, "Chapter");
        assert_eq!(config.generator.questions_per_chapter, 3);
        assert!((config.cleaner.fuzzy_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.generator.skip_keywords.len(), 3);
    }
}
