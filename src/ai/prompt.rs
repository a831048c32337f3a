//! Explanation prompt and generation settings.

use serde::Serialize;

/// Model used when the configuration does not name one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// System instruction sent with every explanation request.
pub const SYSTEM_INSTRUCTION: &str = "\
<role>
You are a specialized assistant for Education and Concept Simplification.
You are precise, analytical, and persistent.
</role>

<instructions>
1. **Plan**: Analyze the term and definition to identify key concepts and potential analogies.
2. **Execute**: Create an explanation that is simple, relatable, and easy to understand. Keep your answer concise and to the point.
3. **Validate**: Ensure the explanation clarifies the original definition without losing accuracy.
4. **Format**: Present the final answer in the requested structure.
</instructions>

<constraints>
- Verbosity: Medium
- Tone: Friendly, Enthusiastic, Conversational
</constraints>

<output_format>
Structure your response as follows, in markdown:
1. **Executive Summary**: A concise 1-sentence overview.
2. **Detailed Response**: A clear, engaging explanation using analogies.
</output_format>";

/// Builds the user prompt for one card.
///
/// ```
/// let prompt = flashdeck::ai::prompt::build_prompt("Osmosis", "Diffusion of water");
/// assert!(prompt.contains("Term: Osmosis"));
/// assert!(prompt.contains("Definition: Diffusion of water"));
/// ```
#[must_use]
pub fn build_prompt(term: &str, definition: &str) -> String {
    format!(
        "<context>\nTerm: {term}\nDefinition: {definition}\n</context>\n\n\
         <task>\nExplain this term and definition to a student.\n</task>\n\n\
         <final_instruction>\nRemember to think step-by-step before answering.\n</final_instruction>"
    )
}

/// Sampling parameters, serialized as Gemini's `generationConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.75,
            top_k: 45,
            max_output_tokens: 1500,
        }
    }
}
