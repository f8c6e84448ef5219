// file: src/cleaner/patterns.rs
// description: compiled regex patterns shared by the markdown cleaning passes
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Tokens and line classification
    pub static ref WORD_TOKEN: Regex = Regex::new(r"\w+").expect("WORD_TOKEN regex is valid");

    pub static ref PAGE_NUMBER: Regex =
        Regex::new(r"^#?\d+$").expect("PAGE_NUMBER regex is valid");

    pub static ref NAVIGATION: Regex = Regex::new(
        r"(?i)^(forrige|neste|tilbake.*|previous|next)$"
    ).expect("NAVIGATION regex is valid");

    pub static ref HEADING_MARKER: Regex =
        Regex::new(r"^(#+)\s*(.*)$").expect("HEADING_MARKER regex is valid");

    // Sentence and whitespace handling
    pub static ref SENTENCE_BREAK: Regex =
        Regex::new(r"[.!?]+\s+").expect("SENTENCE_BREAK regex is valid");

    pub static ref WHITESPACE_RUN: Regex =
        Regex::new(r"\s+").expect("WHITESPACE_RUN regex is valid");

    pub static ref MULTI_SPACE: Regex = Regex::new(r" {2,}").expect("MULTI_SPACE regex is valid");

    pub static ref BLANK_RUN: Regex = Regex::new(r"\n{3,}").expect("BLANK_RUN regex is valid");

    // Conversion residue
    pub static ref HTML_COMMENT: Regex =
        Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex is valid");

    pub static ref HTML_ENTITY: Regex = Regex::new(r"&\w+;").expect("HTML_ENTITY regex is valid");

    pub static ref EMPTY_BOLD: Regex =
        Regex::new(r"(^|\s)\*\*\s*\*\*(\s|$)").expect("EMPTY_BOLD regex is valid");

    pub static ref EMPTY_UNDERSCORE: Regex =
        Regex::new(r"(^|\s)__\s*__(\s|$)").expect("EMPTY_UNDERSCORE regex is valid");

    pub static ref EMPTY_LINK: Regex =
        Regex::new(r"\[\s*\]\s*\(\s*\)").expect("EMPTY_LINK regex is valid");

    // Chapter naming
    pub static ref CHAPTER_NUMBER: Regex =
        Regex::new(r"^(\d+(?:\.\d+)*)").expect("CHAPTER_NUMBER regex is valid");

    pub static ref CHAPTER_TITLE_PREFIX: Regex =
        Regex::new(r"^\d+(\.\d+)*\s*-?\s*").expect("CHAPTER_TITLE_PREFIX regex is valid");

    pub static ref UNSAFE_FILE_CHARS: Regex =
        Regex::new(r"[^a-zA-Z0-9æøåÆØÅ\s-]").expect("UNSAFE_FILE_CHARS regex is valid");
}

pub fn is_navigation_noise(line: &str) -> bool {
    PAGE_NUMBER.is_match(line) || NAVIGATION.is_match(line)
}
