//! Form validation
//!
//! The HTML forms post raw strings. This module turns them into validated
//! domain requests or a set of per-field messages that the form re-renders
//! next to each input.
//!
//! # Rules
//!
//! ## New conversation
//! - `level` is required; a label that names no level counts as `Business`
//! - `course` and `lesson` are required positive integers
//!
//! ## New sentence
//! - `text` is required (whitespace alone does not count)
//! - `speaker` defaults to narration when omitted
//! - `position` is optional; when given it must be a positive integer no
//!   larger than [`MAX_POSITION`]
//!
//! Every failing field is reported, not just the first one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::conversation::{Level, NewConversation};
use crate::sentence::{NewSentence, SpeakerType, MAX_POSITION};

/// Per-field validation messages, keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field; the first message for a field wins
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

/// Raw values posted by the new-conversation form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewConversationForm {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub lesson: Option<String>,
}

impl NewConversationForm {
    pub fn validate(&self) -> Result<NewConversation, FieldErrors> {
        let mut errors = FieldErrors::new();

        let level = non_blank(&self.level).map(Level::parse_or_business);
        if level.is_none() {
            errors.add("level", "level is required");
        }

        let course = parse_positive(&self.course);
        if course.is_none() {
            errors.add("course", "course is required");
        }

        let lesson = parse_positive(&self.lesson);
        if lesson.is_none() {
            errors.add("lesson", "lesson is required");
        }

        match (level, course, lesson) {
            (Some(level), Some(course), Some(lesson)) => errors.into_result(|| NewConversation {
                level,
                course,
                lesson,
            }),
            _ => Err(errors),
        }
    }
}

/// Raw values posted by the add-sentence form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NewSentenceForm {
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
}

impl NewSentenceForm {
    pub fn validate(&self) -> Result<NewSentence, FieldErrors> {
        let mut errors = FieldErrors::new();

        let speaker = match non_blank(&self.speaker) {
            None => Some(SpeakerType::default()),
            Some(raw) => match SpeakerType::parse(raw) {
                Ok(speaker) => Some(speaker),
                Err(_) => {
                    errors.add("speaker", "speaker is invalid");
                    None
                }
            },
        };

        let text = non_blank(&self.text).map(str::to_string);
        if text.is_none() {
            errors.add("text", "text is required");
        }

        let position = match non_blank(&self.position) {
            None => Some(None),
            Some(_) => match parse_positive(&self.position).filter(|p| *p <= MAX_POSITION) {
                Some(position) => Some(Some(position)),
                None => {
                    errors.add("position", "position must be a positive number");
                    None
                }
            },
        };

        match (speaker, text, position) {
            (Some(speaker), Some(text), Some(position)) => errors.into_result(|| NewSentence {
                speaker,
                text,
                position,
            }),
            _ => Err(errors),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_positive(value: &Option<String>) -> Option<i32> {
    non_blank(value)
        .and_then(|v| v.parse::<i32>().ok())
        .filter(|v| *v > 0)
}
