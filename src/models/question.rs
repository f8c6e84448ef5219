// file: src/models/question.rs
// description: quiz question, answer and question bank models plus the app export shape
// reference: internal data structures

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_DIFFICULTY: &str = "medium";
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub is_correct: bool,
}

impl Answer {
    pub fn correct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: true,
        }
    }

    pub fn incorrect(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: false,
        }
    }
}

fn default_difficulty() -> Option<String> {
    Some(DEFAULT_DIFFICULTY.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: Option<String>,
    pub question: String,
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub source_text: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sign_id: Option<String>,
}

impl Question {
    pub fn new(question: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            id: None,
            question: question.into(),
            answers,
            chapter: None,
            category: None,
            difficulty: default_difficulty(),
            source_text: None,
            explanation: None,
            image_url: None,
            sign_id: None,
        }
    }

    pub fn correct_answer(&self) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.is_correct)
    }

    pub fn incorrect_answers(&self) -> Vec<&Answer> {
        self.answers.iter().filter(|answer| !answer.is_correct).collect()
    }

    /// App shape with answers in their current order.
    pub fn to_app_format(&self) -> AppQuestion {
        AppQuestion {
            id: self.id.clone().unwrap_or_default(),
            question: self.question.clone(),
            options: self.answers.iter().map(|a| a.text.clone()).collect(),
            correct_answer: self.answers.iter().position(|a| a.is_correct),
            explanation: self.explanation.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            difficulty: self
                .difficulty
                .clone()
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string()),
            image_url: self.image_url.clone(),
            sign_id: self.sign_id.clone(),
        }
    }
}

/// Question as the mobile app reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    pub image_url: Option<String>,
    pub sign_id: Option<String>,
}

impl From<AppQuestion> for Question {
    fn from(app: AppQuestion) -> Self {
        let answers = app
            .options
            .into_iter()
            .enumerate()
            .map(|(index, text)| Answer {
                text,
                is_correct: app.correct_answer == Some(index),
            })
            .collect();

        let non_empty = |value: String| (!value.is_empty()).then_some(value);

        Self {
            id: non_empty(app.id),
            question: app.question,
            answers,
            chapter: None,
            category: non_empty(app.category),
            difficulty: non_empty(app.difficulty),
            source_text: None,
            explanation: non_empty(app.explanation),
            image_url: app.image_url,
            sign_id: app.sign_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppQuestionFile {
    pub questions: Vec<AppQuestion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionBankStatistics {
    pub total_questions: usize,
    pub categories: BTreeMap<String, usize>,
    pub chapters: BTreeMap<String, usize>,
    pub difficulties: BTreeMap<String, usize>,
    pub avg_answers_per_question: f64,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions,
            metadata: Map::new(),
        }
    }

    pub fn add_question(&mut self, question: Question) {
        self.questions.push(question);
    }

    pub fn extend(&mut self, questions: impl IntoIterator<Item = Question>) {
        self.questions.extend(questions);
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn questions_by_category(&self, category: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.category.as_deref() == Some(category))
            .collect()
    }

    pub fn questions_by_chapter(&self, chapter: &str) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.chapter.as_deref() == Some(chapter))
            .collect()
    }

    pub fn to_app_format(&self) -> Vec<AppQuestion> {
        self.questions.iter().map(Question::to_app_format).collect()
    }

    pub fn statistics(&self) -> QuestionBankStatistics {
        let mut stats = QuestionBankStatistics {
            total_questions: self.questions.len(),
            ..Default::default()
        };

        let bucket = |value: &Option<String>| value.clone().unwrap_or_else(|| UNKNOWN.to_string());

        for question in &self.questions {
            *stats.categories.entry(bucket(&question.category)).or_default() += 1;
            *stats.chapters.entry(bucket(&question.chapter)).or_default() += 1;
            *stats.difficulties.entry(bucket(&question.difficulty)).or_default() += 1;
        }

        if !self.questions.is_empty() {
            let answers: usize = self.questions.iter().map(|q| q.answers.len()).sum();
            stats.avg_answers_per_question = answers as f64 / self.questions.len() as f64;
        }

        stats
    }
}

impl From<AppQuestionFile> for QuestionBank {
    fn from(file: AppQuestionFile) -> Self {
        Self::with_questions(file.questions.into_iter().map(Question::from).collect())
    }
}
