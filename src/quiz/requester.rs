use serde_json::Value;
use tracing::{debug, error};

use super::agent::GeminiAgent;
use super::types::QuizOutput;

/// The shapes a completion can come back in, one variant per shape.
/// [`classify`] picks the first applicable variant in declaration order, so
/// the priority is fixed and the downstream match is exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    /// Schema-constrained JSON rendering: a single text part.
    Json(String),
    /// Raw completion text: several parts concatenated in order.
    Raw(String),
    /// A completion already decoded into a mapping.
    Parsed(Value),
    /// A bare string body expected to carry embedded JSON.
    Text(String),
}

fn build_prompt(content: &str) -> String {
    format!(
        "Analyze the following content and generate a multiple-choice quiz:\n\n{}\n\n\
         Create as many questions as possible, each with:\n\
         1. A clear, concise question.\n\
         2. Four distinct answer options (one correct, three plausible distractors).\n\
         3. A correct answer.\n\
         4. An explanation based on the provided content.\n\
         Return the result as a JSON object with a 'questions' key. \
         If the content is insufficient, return {{\"error\": \"Insufficient content to generate a quiz.\"}}.",
        content
    )
}

/// Runs quiz generation over extracted text and folds every failure mode
/// into a `{"error": ...}` body. The HTTP layer returns those as 200; only
/// extraction-side failures become HTTP errors.
pub struct QuizService {
    agent: GeminiAgent,
}

impl QuizService {
    pub fn new(agent: GeminiAgent) -> Self {
        Self { agent }
    }

    pub async fn generate(&self, content: &str) -> QuizOutput {
        let prompt = build_prompt(content);
        debug!("Submitting {} characters to the quiz agent", content.len());

        let body = match self.agent.complete(&prompt).await {
            Ok(body) => body,
            Err(e) => {
                error!("Quiz agent call failed: {}", e);
                return QuizOutput::error(format!("Failed to generate quiz: {}", e));
            }
        };

        match classify(&body) {
            Some(output) => normalize(output),
            None => {
                error!("Unrecognized completion shape: {}", body);
                QuizOutput::error("Invalid quiz format returned from the agent.")
            }
        }
    }
}

/// Classifies a completion body into an [`AgentOutput`], trying shapes in
/// fixed priority order. `None` means no shape applied at all, which the
/// caller reports as a format error.
fn classify(body: &Value) -> Option<AgentOutput> {
    if let Some(parts) = body
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
    {
        let texts: Vec<&str> = parts
            .iter()
            .filter_map(|p| p.get("text").and_then(Value::as_str))
            .collect();

        match texts.len() {
            1 => return Some(AgentOutput::Json(texts[0].to_string())),
            n if n > 1 => return Some(AgentOutput::Raw(texts.concat())),
            _ => {}
        }
    }

    if let Some(content) = body.pointer("/candidates/0/content") {
        if content.is_object() && content.get("parts").is_none() {
            return Some(AgentOutput::Parsed(content.clone()));
        }
    }

    if let Some(s) = body.as_str() {
        return Some(AgentOutput::Text(s.to_string()));
    }

    None
}

/// Decodes a classified completion into a [`QuizOutput`]. The same logical
/// payload decodes identically whichever shape carried it; a payload that
/// is not valid JSON for the quiz model becomes a parse-error body.
fn normalize(output: AgentOutput) -> QuizOutput {
    let decoded = match output {
        AgentOutput::Json(s) => serde_json::from_str::<QuizOutput>(&s),
        AgentOutput::Raw(s) => serde_json::from_str::<QuizOutput>(&s),
        AgentOutput::Parsed(v) => serde_json::from_value::<QuizOutput>(v),
        AgentOutput::Text(s) => serde_json::from_str::<QuizOutput>(&s),
    };

    match decoded {
        Ok(output) => output,
        Err(e) => {
            error!("Quiz JSON decode error: {}", e);
            QuizOutput::error("Failed to parse quiz output as JSON.")
        }
    }
}
