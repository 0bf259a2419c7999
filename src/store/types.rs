//! Persisted reading and note records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{Argument, KeyTerm};

/// A persisted, analyzed reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub week_number: i64,
    pub title: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub thesis: String,
    pub key_terms: Vec<KeyTerm>,
    pub arguments: Vec<Argument>,
    pub historical_context: String,
    pub historiography: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significance: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A note attached to one argument of a reading.
///
/// `argument_index` is a position in the reading's argument list, not a
/// reference to an argument row; if the analysis were regenerated the index
/// would silently point at whatever now occupies that slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub reading_id: i64,
    pub argument_index: i64,
    pub note_text: String,
}
