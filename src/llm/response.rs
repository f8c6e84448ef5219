// file: src/llm/response.rs
// description: parsing of model output into quiz questions
// reference: https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use crate::models::question::{DEFAULT_CATEGORY, DEFAULT_DIFFICULTY};
use crate::models::{Answer, ChapterContent, Question};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    question: String,
    correct_answer: String,
    #[serde(default)]
    incorrect_answers: Vec<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

/// Slice between the first `[` and the last `]`, so code fences and chatter
/// around the array are ignored.
pub fn extract_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    (end > start).then(|| &response[start..=end])
}

pub fn parse_questions(
    response: &str,
    chapter: Option<&ChapterContent>,
    id_prefix: Option<&str>,
) -> Result<Vec<Question>> {
    let json = extract_json_array(response).ok_or_else(|| {
        let preview: String = response.chars().take(200).collect();
        PipelineError::Llm(format!("No JSON array in response: {}", preview))
    })?;

    let generated: Vec<GeneratedQuestion> = serde_json::from_str(json)
        .map_err(|e| PipelineError::Llm(format!("Malformed question JSON: {}", e)))?;

    let questions = generated
        .into_iter()
        .enumerate()
        .map(|(index, item)| build_question(index, item, chapter, id_prefix))
        .collect::<Vec<_>>();

    if questions.is_empty() {
        warn!("Model returned an empty question list");
    }

    Ok(questions)
}

fn build_question(
    index: usize,
    item: GeneratedQuestion,
    chapter: Option<&ChapterContent>,
    id_prefix: Option<&str>,
) -> Question {
    let mut answers = vec![Answer::correct(item.correct_answer)];
    answers.extend(item.incorrect_answers.into_iter().map(Answer::incorrect));

    let id = match id_prefix {
        Some(prefix) => format!("{}_q{}", prefix, index + 1),
        None => Uuid::new_v4().to_string(),
    };

    let mut question = Question::new(item.question, answers);
    question.id = Some(id);
    question.chapter = chapter.map(|c| c.chapter_number.clone());
    question.category = Some(item.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()));
    question.difficulty = Some(
        item.difficulty
            .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
    );
    question.explanation = item.explanation.filter(|text| !text.trim().is_empty());
    question
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RESPONSE: &str = r#"Her er spørsmålene:
```json
[
  {
    "question": "Hva betyr vikeplikt?",
    "correct_answer": "Du skal slippe fram annen trafikk",
    "incorrect_answers": ["Du har forkjørsrett", "Du skal alltid stoppe"],
    "explanation": "Vikeplikt betyr at du skal slippe fram andre.",
    "category": "Trafikkregler",
    "difficulty": "easy"
  },
  {
    "question": "Når gjelder høyreregelen?",
    "correct_answer": "Når ikke annet er skiltet",
    "incorrect_answers": ["Bare i byen"]
  }
]
```"#;

    #[test]
    fn test_extract_json_array() {
        assert_eq!(extract_json_array("tekst [1, [2]] mer"), Some("[1, [2]]"));
        assert_eq!(extract_json_array("ingen liste"), None);
        assert_eq!(extract_json_array("] feil rekkefølge ["), None);
    }

    #[test]
    fn test_parse_questions_with_prefix() {
        let chapter = ChapterContent::new("Vikeplikt", "7.1", "tekst");
        let questions = parse_questions(RESPONSE, Some(&chapter), Some("ch7_1")).unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id.as_deref(), Some("ch7_1_q1"));
        assert_eq!(questions[1].id.as_deref(), Some("ch7_1_q2"));
        assert_eq!(questions[0].chapter.as_deref(), Some("7.1"));
        assert_eq!(questions[0].answers.len(), 3);
        assert!(questions[0].answers[0].is_correct);
        assert!(!questions[0].answers[1].is_correct);
        assert_eq!(questions[0].difficulty.as_deref(), Some("easy"));
    }

    #[test]
    fn test_defaults_applied() {
        let questions = parse_questions(RESPONSE, None, None).unwrap();
        let second = &questions[1];

        assert_eq!(second.category.as_deref(), Some("General"));
        assert_eq!(second.difficulty.as_deref(), Some("medium"));
        assert_eq!(second.explanation, None);
        assert_eq!(second.chapter, None);
        assert!(Uuid::parse_str(second.id.as_deref().unwrap()).is_ok());
    }

    #[test]
    fn test_malformed_responses_are_errors() {
        assert!(matches!(
            parse_questions("Beklager, jeg kan ikke", None, None),
            Err(PipelineError::Llm(_))
        ));
        assert!(matches!(
            parse_questions("[{\"question\": \"mangler svar\"}]", None, None),
            Err(PipelineError::Llm(_))
        ));
    }
}
