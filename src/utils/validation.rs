// file: src/utils/validation.rs
// description: input path and question bank validation helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use crate::models::QuestionBank;
use std::fs;
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            PipelineError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Case-insensitive extension check against `allowed`.
    pub fn validate_extension(path: &Path, allowed: &[&str]) -> Result<()> {
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| allowed.iter().any(|a| ext.eq_ignore_ascii_case(a)));

        if matches {
            Ok(())
        } else {
            Err(PipelineError::Validation(format!(
                "Expected a {} file: {}",
                allowed.join("/"),
                path.display()
            )))
        }
    }

    pub fn validate_html_file(path: &Path) -> Result<()> {
        Self::validate_file_path(path)?;
        Self::validate_extension(path, &["html", "htm"])
    }

    pub fn validate_markdown_file(path: &Path) -> Result<()> {
        Self::validate_file_path(path)?;
        Self::validate_extension(path, &["md", "markdown"])
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Structural problems in a bank, one message per offending question.
    pub fn question_issues(bank: &QuestionBank) -> Vec<String> {
        let mut issues = Vec::new();

        for (index, question) in bank.questions.iter().enumerate() {
            let label = question
                .id
                .clone()
                .unwrap_or_else(|| format!("#{}", index + 1));

            if question.question.trim().is_empty() {
                issues.push(format!("{}: empty question text", label));
            }

            let correct = question.answers.iter().filter(|a| a.is_correct).count();
            if correct != 1 {
                issues.push(format!("{}: {} correct answers", label, correct));
            }

            if question.answers.len() < 2 {
                issues.push(format!("{}: only {} answers", label, question.answers.len()));
            }

            if question.answers.iter().any(|a| a.text.trim().is_empty()) {
                issues.push(format!("{}: empty answer text", label));
            }
        }

        issues
    }
}
