// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod chapter;
pub mod question;

pub use chapter::{ChapterContent, Subsection};
pub use question::{
    Answer, AppQuestion, AppQuestionFile, Question, QuestionBank, QuestionBankStatistics,
};
