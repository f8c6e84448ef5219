// file: src/parser/markdown.rs
// description: markdown structure extraction with pulldown-cmark
// reference: https://docs.rs/pulldown-cmark

use crate::models::Subsection;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use std::ops::Range;

pub struct MarkdownParser;

#[derive(Debug, Clone)]
pub struct ParsedMarkdown {
    pub plain_text: String,
    pub headings: Vec<Heading>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u32,
    pub text: String,
    /// Byte range of the heading in the source.
    pub span: Range<usize>,
}

impl Heading {
    fn is_subsection(&self) -> bool {
        (2..=4).contains(&self.level)
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> ParsedMarkdown {
        let mut plain_text = String::new();
        let mut headings = Vec::new();
        let mut current_heading: Option<(HeadingLevel, String, Range<usize>)> = None;

        for (event, range) in Parser::new(content).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current_heading = Some((level, String::new(), range));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, text, span)) = current_heading.take() {
                        headings.push(Heading {
                            level: level as u32,
                            text: text.trim().to_string(),
                            span,
                        });
                    }
                    plain_text.push('\n');
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, ref mut heading_text, _)) = current_heading {
                        heading_text.push_str(&text);
                    }
                    plain_text.push_str(&text);
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, ref mut heading_text, _)) = current_heading {
                        heading_text.push(' ');
                    }
                    plain_text.push('\n');
                }
                Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Item) => {
                    plain_text.push('\n');
                }
                _ => {}
            }
        }

        ParsedMarkdown {
            plain_text: plain_text.trim().to_string(),
            headings,
        }
    }

    /// First level-one heading text.
    pub fn title(&self, content: &str) -> Option<String> {
        self.parse(content)
            .headings
            .into_iter()
            .find(|heading| heading.level == 1)
            .map(|heading| heading.text)
    }

    /// Every H2-H4 heading with the raw markdown up to the next one.
    pub fn subsections(&self, content: &str) -> Vec<Subsection> {
        let boundaries: Vec<Heading> = self
            .parse(content)
            .headings
            .into_iter()
            .filter(Heading::is_subsection)
            .collect();

        boundaries
            .iter()
            .enumerate()
            .map(|(index, heading)| {
                let end = boundaries
                    .get(index + 1)
                    .map(|next| next.span.start)
                    .unwrap_or(content.len());
                let start = heading.span.end.min(end);

                Subsection {
                    title: heading.text.clone(),
                    content: content[start..end].trim().to_string(),
                }
            })
            .collect()
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_basic_parsing() {
        let parser = MarkdownParser::new();
        let parsed = parser.parse("# Title\n\nSome content here.");

        assert_eq!(parsed.headings.len(), 1);
        assert_eq!(parsed.headings[0].text, "Title");
        assert_eq!(parsed.headings[0].level, 1);
        assert!(parsed.plain_text.contains("Some content"));
    }

    #[test]
    fn test_title() {
        let parser = MarkdownParser::new();
        assert_eq!(
            parser.title("Intro\n\n## Under\n\n# Kapittel 3: Fart\n"),
            Some("Kapittel 3: Fart".to_string())
        );
        assert_eq!(parser.title("Ingen overskrift"), None);
    }

    #[test]
    fn test_subsections() {
        let parser = MarkdownParser::new();
        let content = "# Kapittel 1: Skilt\n\nIntro.\n\n## Fareskilt\n\nVarsler om fare.\n\n##### Detalj\n\nMer.\n\n### Forbudsskilt\n\nForbyr noe.\n\n#### Tomt\n";
        let sections = parser.subsections(content);

        assert_eq!(
            sections,
            vec![
                Subsection {
                    title: "Fareskilt".to_string(),
                    content: "Varsler om fare.\n\n##### Detalj\n\nMer.".to_string(),
                },
                Subsection {
                    title: "Forbudsskilt".to_string(),
                    content: "Forbyr noe.".to_string(),
                },
                Subsection {
                    title: "Tomt".to_string(),
                    content: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_no_subsections() {
        let parser = MarkdownParser::new();
        assert!(parser.subsections("# Bare tittel\n\nTekst").is_empty());
    }
}
