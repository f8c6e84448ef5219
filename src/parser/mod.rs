// file: src/parser/mod.rs
// description: chapter markdown parsing module exports
// reference: internal module structure

pub mod chapter;
pub mod frontmatter;
pub mod markdown;

pub use chapter::{ChapterReader, content_summary};
pub use frontmatter::{Frontmatter, FrontmatterParser};
pub use markdown::{Heading, MarkdownParser, ParsedMarkdown};
