//! Sentences: the lines of a conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ConversationId, SentenceId};

use crate::error::ConversationError;

/// Who says a sentence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeakerType {
    /// Narration between the spoken lines
    #[default]
    Description,
    PersonA,
    PersonB,
}

impl SpeakerType {
    pub const ALL: [SpeakerType; 3] = [
        SpeakerType::Description,
        SpeakerType::PersonA,
        SpeakerType::PersonB,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerType::Description => "Description",
            SpeakerType::PersonA => "PersonA",
            SpeakerType::PersonB => "PersonB",
        }
    }

    /// Avatar letter shown next to spoken lines; narration has none
    pub fn initial(&self) -> Option<char> {
        match self {
            SpeakerType::Description => None,
            SpeakerType::PersonA => Some('A'),
            SpeakerType::PersonB => Some('B'),
        }
    }

    /// Parses a label, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Result<Self, ConversationError> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|speaker| speaker.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConversationError::UnknownSpeaker(trimmed.to_string()))
    }
}

impl fmt::Display for SpeakerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SpeakerType {
    type Err = ConversationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Highest position a sentence may occupy; the store enforces the same bound
pub const MAX_POSITION: i32 = 1_000_000;

/// A validated request to append a sentence
///
/// `position: None` appends after the current last sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSentence {
    pub speaker: SpeakerType,
    pub text: String,
    pub position: Option<i32>,
}

/// One line of a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: SentenceId,
    pub conversation_id: ConversationId,
    pub position: i32,
    pub speaker: SpeakerType,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Sentence {
    /// Builds a sentence at the given position; an explicit position on the
    /// request takes precedence
    pub fn new(conversation_id: ConversationId, next_position: i32, request: NewSentence) -> Self {
        Self {
            id: SentenceId::new_v7(),
            conversation_id,
            position: request.position.unwrap_or(next_position),
            speaker: request.speaker,
            text: request.text,
            created_at: Utc::now(),
        }
    }
}
