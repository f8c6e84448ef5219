// file: src/cleaner/mod.rs
// description: markdown cleaning for converted textbook chapters
// reference: internal cleaning passes

pub mod chapter;
pub mod dedup;
pub mod heading;
pub mod line;
pub mod patterns;
pub mod similarity;

pub use chapter::{ChapterStructurer, chapter_number_from_stem, clean_title, output_file_name};
pub use dedup::{DedupContext, DocumentDeduplicator, LineKind, classify_line};
pub use heading::normalize_heading;
pub use line::normalize_line;
pub use similarity::SimilarityMatcher;
