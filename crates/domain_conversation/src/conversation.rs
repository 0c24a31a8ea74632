//! Conversation aggregate
//!
//! A conversation is a dialogue script owned by one user and categorized by
//! proficiency level, course and lesson. Its sentences are kept in display
//! order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ConversationId, UserId};

use crate::error::ConversationError;
use crate::sentence::{Sentence, MAX_POSITION};

/// Proficiency level of a conversation
///
/// The six CEFR levels plus a separate business-language track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    Business,
}

impl Level {
    /// All levels in the order they are offered on the form
    pub const ALL: [Level; 7] = [
        Level::A1,
        Level::A2,
        Level::B1,
        Level::B2,
        Level::C1,
        Level::C2,
        Level::Business,
    ];

    /// Canonical label, as stored and rendered
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
            Level::C1 => "C1",
            Level::C2 => "C2",
            Level::Business => "Business",
        }
    }

    /// Parses a label, ignoring case and surrounding whitespace
    pub fn parse(value: &str) -> Result<Self, ConversationError> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConversationError::UnknownLevel(trimmed.to_string()))
    }

    /// Like [`Level::parse`], but any label that names no level is `Business`
    pub fn parse_or_business(value: &str) -> Self {
        Self::parse(value).unwrap_or(Level::Business)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConversationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A validated request to create a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversation {
    pub level: Level,
    pub course: i32,
    pub lesson: i32,
}

/// A conversation with its sentences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub owner: UserId,
    pub level: Level,
    pub course: i32,
    pub lesson: i32,
    pub sentences: Vec<Sentence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Creates a new, empty conversation for the given owner
    pub fn new(owner: UserId, request: NewConversation) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new_v7(),
            owner,
            level: request.level,
            course: request.course,
            lesson: request.lesson,
            sentences: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Heading shown on the detail page and in lists
    pub fn title(&self) -> String {
        format_title(self.level, self.course, self.lesson)
    }

    /// Checks whether the given user owns this conversation
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Position the next appended sentence receives
    ///
    /// `None` once the last sentence already sits at [`MAX_POSITION`].
    pub fn next_position(&self) -> Option<i32> {
        match self.sentences.iter().map(|s| s.position).max() {
            None => Some(1),
            Some(max) => max.checked_add(1).filter(|next| *next <= MAX_POSITION),
        }
    }

    /// Sorts sentences into display order
    pub fn sort_sentences(&mut self) {
        self.sentences
            .sort_by(|a, b| a.position.cmp(&b.position).then(a.created_at.cmp(&b.created_at)));
    }

    /// Returns the list projection of this conversation
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id,
            level: self.level,
            course: self.course,
            lesson: self.lesson,
            created_at: self.created_at,
        }
    }
}

/// List item projection of a conversation (no sentences)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub level: Level,
    pub course: i32,
    pub lesson: i32,
    pub created_at: DateTime<Utc>,
}

impl ConversationSummary {
    pub fn title(&self) -> String {
        format_title(self.level, self.course, self.lesson)
    }
}

fn format_title(level: Level, course: i32, lesson: i32) -> String {
    format!("Level {}, Course {}, Lesson {}", level, course, lesson)
}
