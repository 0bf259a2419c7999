//! Structured analysis types
//!
//! The shape the model is asked to return. Every field is defaulted so a
//! partially-complete reply still deserializes; the optional fields (author,
//! key terms, significance) only appear when the richer prompt version asked
//! for them.

use serde::{Deserialize, Serialize};

/// One piece of evidence supporting an argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Quoted or paraphrased text from the reading
    #[serde(default)]
    pub text: String,
    /// Page reference, e.g. "p. 12" or "conclusion"
    #[serde(default)]
    pub page: String,
    /// Why this evidence matters (richer prompt only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A supporting argument with its evidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    #[serde(default)]
    pub argument: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

/// A key term with its definition (richer prompt only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
}

/// The full structured breakdown of one reading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingAnalysis {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub thesis: String,
    #[serde(default)]
    pub key_terms: Vec<KeyTerm>,
    #[serde(default)]
    pub arguments: Vec<Argument>,
    #[serde(default)]
    pub historical_context: String,
    #[serde(default)]
    pub historiography: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub significance: Option<String>,
}

impl ReadingAnalysis {
    /// Degraded record used when the model reply is not valid JSON.
    ///
    /// The request still succeeds: the raw reply (first 500 characters) is
    /// preserved in the thesis field so the student sees what came back.
    pub fn unparsed(raw_reply: &str) -> Self {
        ReadingAnalysis {
            title: "Unable to parse".to_string(),
            thesis: raw_reply.chars().take(500).collect(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsed_keeps_first_500_chars() {
        let raw = "a".repeat(800);
        let degraded = ReadingAnalysis::unparsed(&raw);
        assert_eq!(degraded.title, "Unable to parse");
        assert_eq!(degraded.thesis.chars().count(), 500);
        assert!(degraded.arguments.is_empty());
        assert!(degraded.key_terms.is_empty());
        assert_eq!(degraded.historical_context, "");
    }

    #[test]
    fn unparsed_truncation_is_char_aware() {
        // Multibyte input must not be sliced mid-codepoint.
        let raw = "é".repeat(600);
        let degraded = ReadingAnalysis::unparsed(&raw);
        assert_eq!(degraded.thesis.chars().count(), 500);
    }

    #[test]
    fn partial_json_deserializes_with_defaults() {
        let analysis: ReadingAnalysis =
            serde_json::from_str(r#"{"title": "The Great Cat Massacre", "thesis": "t"}"#).unwrap();
        assert_eq!(analysis.title, "The Great Cat Massacre");
        assert!(analysis.arguments.is_empty());
        assert!(analysis.author.is_none());
        assert!(analysis.significance.is_none());
    }
}
