// file: src/llm/prompt.rs
// description: prompt construction for driving theory question generation
// reference: few-shot chat prompt with a fixed JSON answer schema

use crate::models::ChapterContent;

pub const SYSTEM_PROMPT: &str = "You are an expert in Norwegian driving theory and test creation. \
Generate realistic, challenging quiz questions that would appear on the official Norwegian \
driving license theory test.";

const EXAMPLES: &str = r#"<examples>
    <example>
    {"question": "Du er innblandet i en ulykke der du antar at politiet vil bli involvert. Hvor lenge etter ulykken må du avstå fra alkohol?",
    "answers": ["6 timer etter endt kjøring", "En uke etter endt kjøring", "12 timer etter endt kjøring", "24 timer etter endt kjøring"],
    "correct_answer": 0,
    "explanation": "**Etter en ulykke der du antar at politiet blir involvert, må du avstå fra alkohol i 6 timer etter endt kjøring.**"
    }
    </example>
    <example>
    {"question": "Hva kan være grunnen til at kjøretøyet trekker til en av sidene under bremsing?",
    "answers": ["Kjøretøyet er skjevt lastet", "Bremseeffekten er ulik mellom hjul på høyre og venstre side", "Kjøretøyets hjulvinkler er skjeve", "Det er ulikt lufttrykk i dekk på samme aksel"],
    "correct_answer": 1,
    "explanation": "**At kjøretøyet trekker til en side under bremsing kalles skjevtrekk. Det skyldes ulik bremseeffekt på høyre og venstre side.**"
    }
    </example>
    <example>
    {"question": "Hva oppnår du ved å gi tegn i god tid?",
    "answers": ["Jeg kan holde større fart inn mot krysset", "Andre trafikanter får tidlig informasjon og kan innrette seg etter dette", "Jeg får bedre tid til å manøvrere kjøretøyet", "Jeg trenger ikke å følge med på trafikken bak meg"],
    "correct_answer": 1,
    "explanation": "**Tegn må være tydelige og gis i god tid slik at andre trafikanter oppfatter dem.**"
    }
    </example>
</examples>"#;

#[derive(Debug, Clone, Copy)]
pub struct PromptOptions {
    pub num_questions: usize,
    pub num_incorrect_answers: usize,
    pub max_content_chars: usize,
}

/// Chapter text cut at `max_chars` characters, with "..." when cut.
pub fn truncate_content(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub fn build_prompt(chapter: &ChapterContent, options: PromptOptions) -> String {
    let content = truncate_content(&chapter.content, options.max_content_chars);
    let num_questions = options.num_questions;
    let num_incorrect = options.num_incorrect_answers;

    format!(
        r#"
Based on the following Norwegian driving theory content, generate {num_questions} realistic quiz questions that would be suitable for the official Norwegian driving license theory test.

Chapter: {title}
Content:
{content}

For each question, provide:
1. A clear, unambiguous question in Norwegian
2. One correct answer
3. {num_incorrect} incorrect but plausible answers (distractors)

Requirements:
- Questions should test practical knowledge that drivers need to know
- All text must be in Norwegian
- Incorrect answers should be believable but clearly wrong to someone who knows the material
- Vary question types: facts, scenarios, regulations, safety concepts
- Focus on information that could realistically appear on the driving test
- Make questions specific enough to have only one clearly correct answer

You can see some examples of good questions and options below, in a different structure. Use this as a reference:
{EXAMPLES}

Return the response as a JSON array with this exact structure:
[
  {{
    "question": "Question text in Norwegian?",
    "correct_answer": "The correct answer text",
    "incorrect_answers": [
      "Incorrect answer 1",
      "Incorrect answer 2",
      ...{num_incorrect} total incorrect answers
    ],
    "explanation": "Brief explanation in Norwegian of why this is the correct answer",
    "category": "Category name (e.g., 'Trafikkregler', 'Sikkerhet', 'Skilt og signaler')",
    "difficulty": "easy|medium|hard"
  }}
]

Ensure the JSON is valid and properly formatted.
"#,
        title = chapter.title,
    )
}
