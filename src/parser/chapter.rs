// file: src/parser/chapter.rs
// description: reads cleaned chapter markdown back into chapter content
// reference: frontmatter, heading and subsection extraction

use crate::cleaner::patterns::BLANK_RUN;
use crate::converter::scanner::{ScannedFile, scan_directory};
use crate::error::{PipelineError, Result};
use crate::models::ChapterContent;
use crate::parser::{FrontmatterParser, MarkdownParser};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

const SUMMARY_SAMPLE_CHARS: usize = 500;

lazy_static! {
    static ref CHAPTER_LABEL_PREFIX: Regex =
        Regex::new(r"^\S+\s+[\d.]+:\s*").expect("CHAPTER_LABEL_PREFIX regex is valid");
    static ref H1_LINE: Regex = Regex::new(r"(?m)^#[ \t]+.*(?:\n|$)").expect("H1_LINE regex is valid");
}

#[derive(Debug, Clone)]
pub struct ChapterReader {
    min_content_chars: usize,
    skip_keywords: Vec<String>,
}

impl ChapterReader {
    pub fn new(min_content_chars: usize, skip_keywords: Vec<String>) -> Self {
        Self {
            min_content_chars,
            skip_keywords: skip_keywords
                .into_iter()
                .map(|keyword| keyword.to_lowercase())
                .collect(),
        }
    }

    /// `*.md` chapter files in `dir`, leaving out summary and keyword pages.
    pub fn find_markdown_files(&self, dir: &Path) -> Result<Vec<ScannedFile>> {
        scan_directory(dir, "md", |name| {
            let lowered = name.to_lowercase();
            !self
                .skip_keywords
                .iter()
                .any(|keyword| lowered.contains(keyword.as_str()))
        })
    }

    pub fn parse_file(&self, path: &Path) -> Result<Option<ChapterContent>> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::file_operation(path, e))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        self.parse_str(&content, &file_name)
    }

    /// `None` when the chapter body is too short to be worth generating from.
    pub fn parse_str(&self, content: &str, file_name: &str) -> Result<Option<ChapterContent>> {
        let (metadata, body) = match FrontmatterParser::new().extract(content) {
            Ok(Some((frontmatter, rest))) => (frontmatter.fields, rest),
            Ok(None) => (Default::default(), content.to_string()),
            Err(PipelineError::MarkdownParse { message, .. }) => {
                return Err(PipelineError::MarkdownParse {
                    file: file_name.to_string(),
                    message,
                });
            }
            Err(e) => return Err(e),
        };

        let markdown = MarkdownParser::new();
        let (chapter_number, title) = title_and_chapter(file_name, markdown.title(&body));

        let main_content = main_content(&body);
        if main_content.chars().count() < self.min_content_chars {
            debug!("Skipping {}: insufficient content", file_name);
            return Ok(None);
        }

        Ok(Some(ChapterContent {
            title,
            chapter_number,
            content: main_content,
            metadata,
            subsections: markdown.subsections(&body),
        }))
    }
}

/// Chapter number from the file name part before " - "; title from the H1
/// with its "Kapittel N:" label removed, else the file name part after " - ".
fn title_and_chapter(file_name: &str, heading: Option<String>) -> (String, String) {
    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    let (number, name) = match stem.split_once(" - ") {
        Some((number, name)) => (number, name),
        None => (stem, stem),
    };

    let title = heading
        .map(|heading| CHAPTER_LABEL_PREFIX.replace(&heading, "").trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| name.to_string());

    (number.to_string(), title)
}

fn main_content(body: &str) -> String {
    let without_title = H1_LINE.replace_all(body, "");
    BLANK_RUN
        .replace_all(&without_title, "\n\n")
        .trim()
        .to_string()
}

/// Short description of a chapter: title, non-empty subsection titles and
/// the first part of the body.
pub fn content_summary(chapter: &ChapterContent) -> String {
    let mut parts = vec![format!("Chapter: {}", chapter.title)];

    let topics: Vec<String> = chapter
        .subsections
        .iter()
        .filter(|subsection| !subsection.content.trim().is_empty())
        .map(|subsection| format!("- {}", subsection.title))
        .collect();

    if !topics.is_empty() {
        parts.push("Topics covered:".to_string());
        parts.extend(topics);
    }

    if chapter.content.chars().count() > SUMMARY_SAMPLE_CHARS {
        let sample: String = chapter.content.chars().take(SUMMARY_SAMPLE_CHARS).collect();
        parts.push(format!("Content sample: {}...", sample));
    } else {
        parts.push(format!("Content: {}", chapter.content));
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subsection;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const BODY: &str = "Vikeplikt betyr at du skal slippe fram annen trafikk. \
        Du må vise tydelig at du har tenkt å vike, for eksempel ved å senke farten i god tid.";

    fn reader() -> ChapterReader {
        ChapterReader::new(
            100,
            vec![
                "nøkkelord".to_string(),
                "Fullført".to_string(),
                "oppsummering".to_string(),
            ],
        )
    }

    fn chapter_markdown(body: &str) -> String {
        format!(
            "# Kapittel 7.1: Vikeplikt\n\n---\nchapter: 7.1\ntitle: Vikeplikt\n---\n\n{}\n\n## Høyreregelen\n\nVik for trafikk fra høyre.\n",
            body
        )
    }

    #[test]
    fn test_parse_structured_chapter() {
        let chapter = reader()
            .parse_str(&chapter_markdown(BODY), "7.1 - Vikeplikt.md")
            .unwrap()
            .unwrap();

        assert_eq!(chapter.title, "Vikeplikt");
        assert_eq!(chapter.chapter_number, "7.1");
        assert_eq!(chapter.metadata.get("chapter").map(String::as_str), Some("7.1"));
        assert!(chapter.content.starts_with("Vikeplikt betyr"));
        assert!(!chapter.content.contains("# Kapittel"));
        assert_eq!(
            chapter.subsections,
            vec![Subsection {
                title: "Høyreregelen".to_string(),
                content: "Vik for trafikk fra høyre.".to_string(),
            }]
        );
    }

    #[test]
    fn test_title_falls_back_to_file_name() {
        let content = format!("{}\n\n{}", BODY, BODY);
        let chapter = reader()
            .parse_str(&content, "3.2 - Fart og avstand.md")
            .unwrap()
            .unwrap();
        assert_eq!(chapter.title, "Fart og avstand");
        assert_eq!(chapter.chapter_number, "3.2");
        assert!(chapter.metadata.is_empty());
    }

    #[test]
    fn test_short_chapter_rejected() {
        let result = reader()
            .parse_str(&chapter_markdown("Kort."), "1 - Kort.md")
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_title_and_chapter_without_separator() {
        assert_eq!(
            title_and_chapter("index.md", None),
            ("index".to_string(), "index".to_string())
        );
        assert_eq!(
            title_and_chapter("2 - Lys.md", Some("Chapter 2: Bruk av lys".to_string())),
            ("2".to_string(), "Bruk av lys".to_string())
        );
    }

    #[test]
    fn test_find_markdown_files_skips_summaries() {
        let temp = TempDir::new().unwrap();
        for name in [
            "1 - Vikeplikt.md",
            "1.9 - Nøkkelord.md",
            "2 - Oppsummering.md",
            "3 - Kapittel fullført.md",
            "4 - Fart.md",
        ] {
            fs::write(temp.path().join(name), "x").unwrap();
        }

        let files = reader().find_markdown_files(temp.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["1 - Vikeplikt.md", "4 - Fart.md"]);
    }

    #[test]
    fn test_content_summary() {
        let mut chapter = ChapterContent::new("Vikeplikt", "7.1", "a".repeat(600));
        chapter.subsections = vec![
            Subsection {
                title: "Høyreregelen".to_string(),
                content: "tekst".to_string(),
            },
            Subsection {
                title: "Tom".to_string(),
                content: "  ".to_string(),
            },
        ];

        let summary = content_summary(&chapter);
        assert!(summary.starts_with("Chapter: Vikeplikt\nTopics covered:\n- Høyreregelen\n"));
        assert!(!summary.contains("- Tom"));
        assert!(summary.ends_with(&format!("Content sample: {}...", "a".repeat(500))));
    }
}
