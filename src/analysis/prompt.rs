//! Analysis prompt templates
//!
//! Two versions are kept. V1 is the original breakdown (thesis, arguments,
//! evidence, context, historiography). V2 additionally asks for the author,
//! key terms, per-evidence explanations, and significance, and gets a larger
//! reply budget to fit them.

/// Which instruction template to send with each reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptVersion {
    V1,
    #[default]
    V2,
}

impl PromptVersion {
    pub fn instructions(self) -> &'static str {
        match self {
            PromptVersion::V1 => PROMPT_V1,
            PromptVersion::V2 => PROMPT_V2,
        }
    }

    /// Maximum reply length, in tokens, requested from the model.
    pub fn max_tokens(self) -> u32 {
        match self {
            PromptVersion::V1 => 2000,
            PromptVersion::V2 => 3000,
        }
    }
}

const PROMPT_V1: &str = r#"You are an expert academic assistant helping history students understand their readings.

Analyze the following academic text and provide a structured breakdown. Return your analysis as valid JSON with this exact structure:

{
  "title": "The title of the work (extract from text or infer from content)",
  "thesis": "The main argument or central claim of the text in 2-3 sentences",
  "arguments": [
    {
      "argument": "First key supporting argument",
      "evidence": [
        {"text": "Specific evidence supporting this argument", "page": "p. 12"},
        {"text": "Another piece of evidence", "page": "pp. 15-16"}
      ]
    },
    {
      "argument": "Second key supporting argument",
      "evidence": [
        {"text": "Evidence for this argument", "page": "p. 23"}
      ]
    }
  ],
  "historical_context": "The historical period, events, and context that the text addresses (2-3 sentences)",
  "historiography": "The historiographical school of thought or approach the author takes (e.g., social history, Marxist, revisionist, cultural history, etc.) and how it relates to other scholarship in the field"
}

Guidelines:
- Be concise but comprehensive
- Focus on what would help a student understand and remember the key points
- Identify 3-5 main arguments that support the thesis
- For each argument, find 1-3 specific pieces of evidence from the text
- IMPORTANT: Include page numbers for each piece of evidence (look for page markers like "p.", "pg", page breaks, or numbered sections in the text)
- If page numbers aren't clear, use approximate locations like "early in text", "middle section", "conclusion"
- If the text doesn't clearly fit academic history writing, do your best to extract the main ideas

TEXT TO ANALYZE:
"#;

const PROMPT_V2: &str = r#"You are an expert academic assistant helping history students understand their readings.

Analyze the following academic text and provide a structured breakdown. Return your analysis as valid JSON with this exact structure:

{
  "title": "The title of the work (extract from text or infer from content)",
  "author": "The author of the work, if identifiable from the text",
  "thesis": "The main argument or central claim of the text in 2-3 sentences",
  "key_terms": [
    {"term": "A specialized term or concept central to the text", "definition": "What it means in this context"}
  ],
  "arguments": [
    {
      "argument": "First key supporting argument",
      "evidence": [
        {"text": "Specific evidence supporting this argument", "page": "p. 12", "explanation": "How this evidence supports the argument"},
        {"text": "Another piece of evidence", "page": "pp. 15-16", "explanation": "Why this matters"}
      ]
    },
    {
      "argument": "Second key supporting argument",
      "evidence": [
        {"text": "Evidence for this argument", "page": "p. 23", "explanation": "Its role in the argument"}
      ]
    }
  ],
  "historical_context": "The historical period, events, and context that the text addresses (2-3 sentences)",
  "historiography": "The historiographical school of thought or approach the author takes (e.g., social history, Marxist, revisionist, cultural history, etc.) and how it relates to other scholarship in the field",
  "significance": "Why this reading matters for the field and what a student should take away from it (2-3 sentences)"
}

Guidelines:
- Be concise but comprehensive
- Focus on what would help a student understand and remember the key points
- Identify 3-5 key terms a student may not already know
- Identify 3-5 main arguments that support the thesis
- For each argument, find 1-3 specific pieces of evidence from the text, each with a one-sentence explanation of how it supports the argument
- IMPORTANT: Include page numbers for each piece of evidence (look for page markers like "p.", "pg", page breaks, or numbered sections in the text)
- If page numbers aren't clear, use approximate locations like "early in text", "middle section", "conclusion"
- If the text doesn't clearly fit academic history writing, do your best to extract the main ideas

TEXT TO ANALYZE:
"#;
