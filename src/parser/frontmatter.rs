// file: src/parser/frontmatter.rs
// description: YAML metadata block extraction from chapter markdown
// reference: https://docs.rs/yaml-rust

use crate::error::{PipelineError, Result};
use std::collections::BTreeMap;
use yaml_rust::{Yaml, YamlLoader};

const DELIMITER: &str = "---";

pub struct FrontmatterParser;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    pub fields: BTreeMap<String, String>,
}

impl FrontmatterParser {
    pub fn new() -> Self {
        Self
    }

    /// Finds a `---` block at the top of the document, optionally preceded
    /// by the chapter's `#` heading, and returns it with the text around it.
    pub fn extract(&self, content: &str) -> Result<Option<(Frontmatter, String)>> {
        let lines: Vec<&str> = content.lines().collect();

        let Some(open) = Self::opening_line(&lines) else {
            return Ok(None);
        };

        let Some(close) = lines[open + 1..]
            .iter()
            .position(|line| line.trim_end() == DELIMITER)
            .map(|offset| open + 1 + offset)
        else {
            return Ok(None);
        };

        let yaml_content = lines[open + 1..close].join("\n");
        let fields = Self::parse_fields(&yaml_content)?;

        let mut remaining: Vec<&str> = lines[..open].to_vec();
        remaining.extend_from_slice(&lines[close + 1..]);

        Ok(Some((
            Frontmatter { fields },
            remaining.join("\n").trim().to_string(),
        )))
    }

    pub fn get_field(&self, frontmatter: &Frontmatter, key: &str) -> Option<String> {
        frontmatter.fields.get(key).cloned()
    }

    fn opening_line(lines: &[&str]) -> Option<usize> {
        let mut seen_heading = false;

        for (index, line) in lines.iter().enumerate() {
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed == DELIMITER {
                return Some(index);
            }
            if !seen_heading && trimmed.starts_with("# ") {
                seen_heading = true;
                continue;
            }
            return None;
        }

        None
    }

    fn parse_fields(yaml_content: &str) -> Result<BTreeMap<String, String>> {
        let docs =
            YamlLoader::load_from_str(yaml_content).map_err(|e| PipelineError::MarkdownParse {
                file: "frontmatter".to_string(),
                message: format!("YAML parse error: {}", e),
            })?;

        let mut fields = BTreeMap::new();

        if let Some(Yaml::Hash(hash)) = docs.first() {
            for (key, value) in hash {
                if let (Some(key), Some(value)) = (scalar_to_string(key), scalar_to_string(value)) {
                    fields.insert(key, value);
                }
            }
        }

        Ok(fields)
    }
}

fn scalar_to_string(value: &Yaml) -> Option<String> {
    match value {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(i) => Some(i.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

impl Default for FrontmatterParser {
    fn default() -> Self {
        Self::new()
    }
}
