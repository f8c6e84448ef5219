// file: src/cleaner/chapter.rs
// description: wraps a cleaned chapter body with its heading and metadata block
// reference: markdown chapter layout consumed by the chapter reader

use super::patterns::{CHAPTER_NUMBER, CHAPTER_TITLE_PREFIX, UNSAFE_FILE_CHARS};

pub const DEFAULT_CHAPTER_LABEL: &str = "Kapittel";

#[derive(Debug, Clone)]
pub struct ChapterStructurer {
    label: String,
}

impl ChapterStructurer {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Body is emitted verbatim; it is expected to be cleaned already.
    pub fn structure(&self, chapter_id: &str, raw_title: &str, body: &str) -> String {
        let title = clean_title(raw_title);
        format!(
            "# {label} {id}: {title}\n\n---\nchapter: {id}\ntitle: {title}\n---\n\n{body}",
            label = self.label,
            id = chapter_id,
            title = title,
            body = body,
        )
    }
}

impl Default for ChapterStructurer {
    fn default() -> Self {
        Self::new(DEFAULT_CHAPTER_LABEL)
    }
}

/// Strips a leading section number such as "7.1 - " from a page title.
pub fn clean_title(raw_title: &str) -> String {
    CHAPTER_TITLE_PREFIX
        .replace(raw_title.trim(), "")
        .trim()
        .to_string()
}

/// Leading dotted number of a file stem, or "0" when there is none.
pub fn chapter_number_from_stem(stem: &str) -> String {
    CHAPTER_NUMBER
        .captures(stem.trim())
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "0".to_string())
}

pub fn sanitize_file_title(title: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(title, "").trim().to_string()
}

pub fn output_file_name(chapter_id: &str, title: &str) -> String {
    format!("{} - {}.md", chapter_id, sanitize_file_title(&clean_title(title)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_structure_layout() {
        let structurer = ChapterStructurer::default();
        let output = structurer.structure("7.1", "7.1 - Vikeplikt", "Tekst om vikeplikt.");
        assert_eq!(
            output,
            "# Kapittel 7.1: Vikeplikt\n\n---\nchapter: 7.1\ntitle: Vikeplikt\n---\n\nTekst om vikeplikt."
        );
    }

    #[test]
    fn test_custom_label() {
        let structurer = ChapterStructurer::new("Chapter");
        assert!(structurer
            .structure("3", "Fart", "x")
            .starts_with("# Chapter 3: Fart\n"));
    }

    #[test]
    fn test_body_is_not_deduplicated() {
        let body = "Samme linje her\nSamme linje her";
        let output = ChapterStructurer::default().structure("1", "Tittel", body);
        assert!(output.ends_with(body));
    }

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("7.1.4 - Forbikjøring"), "Forbikjøring");
        assert_eq!(clean_title("12 Mørkekjøring"), "Mørkekjøring");
        assert_eq!(clean_title("Trafikkregler"), "Trafikkregler");
    }

    #[test]
    fn test_chapter_number_from_stem() {
        assert_eq!(chapter_number_from_stem("7.1.4 Forbikjøring"), "7.1.4");
        assert_eq!(chapter_number_from_stem("12_mørke"), "12");
        assert_eq!(chapter_number_from_stem("index"), "0");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("7.1", "7.1 - Vikeplikt: regler/skilt?"),
            "7.1 - Vikeplikt reglerskilt.md"
        );
        assert_eq!(output_file_name("2", "Bremsing på glatt føre"), "2 - Bremsing på glatt føre.md");
    }
}
