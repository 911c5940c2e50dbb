use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A single four-option multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    pub explanation: String,
}

/// The two mutually exclusive result bodies the API returns: a quiz, or a
/// logical error the client renders instead of one. Both travel as HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizOutput {
    Quiz { questions: Vec<QuizQuestion> },
    Error { error: String },
}

impl QuizOutput {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

/// Response schema declared to the generation API. Constrains the shape of
/// each question; the number of questions is left to the model.
pub fn quiz_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "description": "List of quiz questions",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "question": {
                            "type": "STRING",
                            "description": "The quiz question"
                        },
                        "options": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "minItems": 4,
                            "maxItems": 4,
                            "description": "Four answer options"
                        },
                        "correctAnswer": {
                            "type": "STRING",
                            "description": "The correct answer, equal to one of the options"
                        },
                        "explanation": {
                            "type": "STRING",
                            "description": "Explanation of the correct answer"
                        }
                    },
                    "required": ["question", "options", "correctAnswer", "explanation"]
                }
            }
        },
        "required": ["questions"]
    })
}
