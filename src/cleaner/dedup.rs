// file: src/cleaner/dedup.rs
// description: single-pass line deduplication over converted chapter markdown
// reference: exact, fuzzy and navigation-noise line removal with per-document memory

use super::heading::normalize_heading;
use super::line::normalize_line;
use super::patterns::{
    BLANK_RUN, EMPTY_BOLD, EMPTY_LINK, EMPTY_UNDERSCORE, HEADING_MARKER, HTML_COMMENT,
    HTML_ENTITY, MULTI_SPACE, is_navigation_noise,
};
use super::similarity::{SimilarityMatcher, TokenSet, tokenize};
use crate::config::CleanerConfig;
use tracing::debug;

/// Lines with this many tokens or fewer are always kept and never remembered.
pub const MIN_TRACKED_TOKENS: usize = 2;

const MAX_HEADING_LEVEL: usize = 6;

/// Upper bound on whole-document passes in [`DocumentDeduplicator::clean`].
const MAX_CLEAN_PASSES: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Noise,
    Heading { level: usize, text: String },
    Body,
}

pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }

    if is_navigation_noise(trimmed) {
        return LineKind::Noise;
    }

    if let Some(caps) = HEADING_MARKER.captures(trimmed)
        && caps[1].len() <= MAX_HEADING_LEVEL
    {
        return LineKind::Heading {
            level: caps[1].len(),
            text: caps[2].to_string(),
        };
    }

    LineKind::Body
}

/// Bullets and over-deep `#` runs are kept verbatim by the line normalizer.
fn is_verbatim(line: &str) -> bool {
    line.starts_with('-') || line.starts_with('*') || line.starts_with('#')
}

/// Dedup state for one document. Dropped as soon as the document is done,
/// so nothing leaks between chapters.
pub struct DedupContext {
    matcher: SimilarityMatcher,
    min_tracked_tokens: usize,
    seen: Vec<TokenSet>,
    previous: Option<String>,
    dropped: usize,
}

impl DedupContext {
    pub fn new(config: &CleanerConfig) -> Self {
        Self {
            matcher: SimilarityMatcher::from_config(config),
            min_tracked_tokens: config.min_tracked_tokens,
            seen: Vec::new(),
            previous: None,
            dropped: 0,
        }
    }

    /// Returns the line to emit, or `None` when the line is redundant.
    pub fn process_line(&mut self, raw: &str) -> Option<String> {
        let line = match classify_line(raw) {
            LineKind::Blank => return Some(String::new()),
            LineKind::Noise => return self.drop_line(raw, "navigation"),
            LineKind::Heading { level, text } => {
                let heading = normalize_heading(&text);
                let marker = "#".repeat(level);
                let rebuilt = if heading.is_empty() {
                    marker
                } else {
                    format!("{} {}", marker, heading)
                };

                if self.repeats_previous(&rebuilt) {
                    return self.drop_line(raw, "repeated heading");
                }
                self.previous = Some(rebuilt.clone());
                return Some(rebuilt);
            }
            LineKind::Body => {
                let trimmed = raw.trim();
                if is_verbatim(trimmed) {
                    trimmed.to_string()
                } else {
                    normalize_line(trimmed)
                }
            }
        };

        if self.repeats_previous(&line) {
            return self.drop_line(raw, "exact repeat");
        }

        let tokens = tokenize(&line);
        if tokens.len() <= self.min_tracked_tokens {
            self.previous = Some(line.clone());
            return Some(line);
        }

        if self
            .seen
            .iter()
            .any(|seen| self.matcher.is_duplicate_tokens(&tokens, seen))
        {
            return self.drop_line(raw, "fuzzy duplicate");
        }

        self.seen.push(tokens);
        self.previous = Some(line.clone());
        Some(line)
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn repeats_previous(&self, line: &str) -> bool {
        self.previous.as_deref() == Some(line)
    }

    fn drop_line(&mut self, raw: &str, reason: &str) -> Option<String> {
        self.dropped += 1;
        debug!(reason, line = raw.trim(), "dropping line");
        None
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentDeduplicator {
    config: CleanerConfig,
}

impl DocumentDeduplicator {
    pub fn new(config: CleanerConfig) -> Self {
        Self { config }
    }

    /// Runs the line pass alone: no pre-clean and no post-pass.
    pub fn dedupe_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let mut context = DedupContext::new(&self.config);
        lines
            .iter()
            .filter_map(|line| context.process_line(line.as_ref()))
            .collect()
    }

    /// Full cleaning of a converted markdown document.
    ///
    /// Passes repeat until the output stops changing, so cleaning an
    /// already cleaned document is a no-op.
    pub fn clean(&self, markdown: &str) -> String {
        let mut current = self.clean_once(markdown);

        for _ in 1..MAX_CLEAN_PASSES {
            let next = self.clean_once(&current);
            if next == current {
                break;
            }
            current = next;
        }

        current
    }

    fn clean_once(&self, markdown: &str) -> String {
        let prepared = Self::strip_residue(markdown);
        let lines: Vec<&str> = prepared.lines().collect();

        let mut context = DedupContext::new(&self.config);
        let kept: Vec<String> = lines
            .iter()
            .filter_map(|line| context.process_line(line))
            .collect();

        debug!(
            input_lines = lines.len(),
            kept_lines = kept.len(),
            dropped = context.dropped(),
            "document deduplicated"
        );

        Self::tidy(&kept.join("\n"))
    }

    /// Comments, entities, empty markup and space runs go before the line
    /// pass sees anything, so equal lines compare equal.
    fn strip_residue(markdown: &str) -> String {
        let without_comments = HTML_COMMENT.replace_all(markdown, "");
        let without_entities = HTML_ENTITY.replace_all(&without_comments, "");

        let trimmed = without_entities
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");

        let without_bold = EMPTY_BOLD.replace_all(&trimmed, "${1}");
        let without_underscore = EMPTY_UNDERSCORE.replace_all(&without_bold, "${1}");
        let without_links = EMPTY_LINK.replace_all(&without_underscore, "");
        MULTI_SPACE.replace_all(&without_links, " ").into_owned()
    }

    fn tidy(text: &str) -> String {
        let trimmed_lines = text
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n");

        BLANK_RUN
            .replace_all(&trimmed_lines, "\n\n")
            .trim()
            .to_string()
    }
}
