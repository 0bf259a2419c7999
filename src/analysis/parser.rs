//! Reply-shape classification and JSON extraction
//!
//! The model is asked for a bare JSON object but routinely wraps it in a
//! markdown code fence. Rather than guessing with ad-hoc string surgery at
//! the call site, the reply is classified into one of three shapes, each
//! with its own extraction rule.

use super::types::ReadingAnalysis;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// How the model framed its reply
#[derive(Debug, PartialEq, Eq)]
pub enum ReplyShape<'a> {
    /// A ```json fence: content between the first such fence and the next fence
    JsonFenced(&'a str),
    /// A generic ``` fence: content between the first pair of fences
    Fenced(&'a str),
    /// No fence at all: the whole reply
    Raw(&'a str),
}

impl<'a> ReplyShape<'a> {
    pub fn classify(reply: &'a str) -> Self {
        if let Some(start) = reply.find(JSON_FENCE) {
            let body = &reply[start + JSON_FENCE.len()..];
            let end = body.find(FENCE).unwrap_or(body.len());
            return ReplyShape::JsonFenced(&body[..end]);
        }
        if let Some(start) = reply.find(FENCE) {
            let body = &reply[start + FENCE.len()..];
            let end = body.find(FENCE).unwrap_or(body.len());
            return ReplyShape::Fenced(&body[..end]);
        }
        ReplyShape::Raw(reply)
    }

    /// The candidate JSON payload for this shape.
    pub fn payload(&self) -> &'a str {
        match self {
            ReplyShape::JsonFenced(s) | ReplyShape::Fenced(s) | ReplyShape::Raw(s) => s,
        }
    }
}

/// Parse a model reply into a [`ReadingAnalysis`].
///
/// Never fails: an unparsable reply becomes the degraded record from
/// [`ReadingAnalysis::unparsed`], carrying the raw reply in its thesis.
pub fn parse_reply(reply: &str) -> ReadingAnalysis {
    let payload = ReplyShape::classify(reply).payload();
    match serde_json::from_str(payload.trim()) {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::warn!("Model reply was not valid JSON ({}), storing degraded record", e);
            ReadingAnalysis::unparsed(reply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "title": "Peasants into Frenchmen",
        "thesis": "Rural France was culturally integrated only after 1870.",
        "arguments": [
            {
                "argument": "Roads and railways broke village isolation",
                "evidence": [
                    {"text": "freight tonnage tripled", "page": "p. 201"}
                ]
            }
        ],
        "historical_context": "Third Republic modernization.",
        "historiography": "Modernization theory applied to cultural history."
    }"#;

    #[test]
    fn classifies_json_fence() {
        let reply = format!("Here is the analysis:\n```json\n{}\n```\nHope it helps!", VALID);
        let shape = ReplyShape::classify(&reply);
        assert!(matches!(shape, ReplyShape::JsonFenced(_)));
        assert!(shape.payload().contains("Peasants into Frenchmen"));
        assert!(!shape.payload().contains("Hope it helps"));
    }

    #[test]
    fn classifies_generic_fence() {
        let reply = format!("```\n{}\n```", VALID);
        let shape = ReplyShape::classify(&reply);
        assert!(matches!(shape, ReplyShape::Fenced(_)));
    }

    #[test]
    fn json_fence_wins_over_generic() {
        // A generic fence earlier in the reply does not shadow the json fence.
        let reply = format!("```json\n{}\n```", VALID);
        assert!(matches!(
            ReplyShape::classify(&reply),
            ReplyShape::JsonFenced(_)
        ));
    }

    #[test]
    fn classifies_raw() {
        assert!(matches!(ReplyShape::classify(VALID), ReplyShape::Raw(_)));
    }

    #[test]
    fn unclosed_fence_takes_rest_of_reply() {
        let reply = format!("```json\n{}", VALID);
        let analysis = parse_reply(&reply);
        assert_eq!(analysis.title, "Peasants into Frenchmen");
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = format!("```json\n{}\n```", VALID);
        let analysis = parse_reply(&reply);
        assert_eq!(analysis.title, "Peasants into Frenchmen");
        assert_eq!(analysis.arguments.len(), 1);
        assert_eq!(analysis.arguments[0].evidence[0].page, "p. 201");
    }

    #[test]
    fn parses_raw_reply_with_surrounding_whitespace() {
        let reply = format!("\n\n  {}  \n", VALID);
        let analysis = parse_reply(&reply);
        assert_eq!(analysis.title, "Peasants into Frenchmen");
    }

    #[test]
    fn unparsable_reply_degrades() {
        let reply = "I'm sorry, I can't produce JSON for this document.";
        let analysis = parse_reply(reply);
        assert_eq!(analysis.title, "Unable to parse");
        assert_eq!(analysis.thesis, reply);
        assert!(analysis.arguments.is_empty());
    }

    #[test]
    fn unparsable_fenced_reply_keeps_raw_reply_in_thesis() {
        let reply = "```json\n{not json at all\n```";
        let analysis = parse_reply(reply);
        assert_eq!(analysis.title, "Unable to parse");
        // The degraded thesis is the raw reply, fences included.
        assert_eq!(analysis.thesis, reply);
    }

    #[test]
    fn long_unparsable_reply_is_truncated_to_500() {
        let reply = "not json ".repeat(100);
        let analysis = parse_reply(&reply);
        assert_eq!(analysis.thesis.chars().count(), 500);
        assert_eq!(analysis.thesis, reply.chars().take(500).collect::<String>());
    }
}
