// file: src/models/chapter.rs
// description: parsed chapter content read back from cleaned markdown
// reference: internal data structures

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterContent {
    pub title: String,
    pub chapter_number: String,
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

impl ChapterContent {
    pub fn new(
        title: impl Into<String>,
        chapter_number: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            chapter_number: chapter_number.into(),
            content: content.into(),
            metadata: BTreeMap::new(),
            subsections: Vec::new(),
        }
    }

    /// Prefix for generated question ids, e.g. "ch7_1" for chapter 7.1.
    pub fn id_prefix(&self) -> String {
        format!("ch{}", self.chapter_number.replace('.', "_"))
    }
}
