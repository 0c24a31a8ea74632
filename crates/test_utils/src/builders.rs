//! Test Data Builders
//!
//! Builders for constructing conversations with sensible defaults, so tests
//! only spell out the fields they care about.

use chrono::{DateTime, Utc};
use core_kernel::{ConversationId, UserId};
use domain_conversation::{Conversation, Level, NewConversation, NewSentence, Sentence, SpeakerType};
use fake::faker::lorem::en::Sentence as LoremSentence;
use fake::Fake;

use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Builder for a fully-formed [`Conversation`] (with sentences)
pub struct ConversationBuilder {
    id: ConversationId,
    owner: UserId,
    level: Level,
    course: i32,
    lesson: i32,
    created_at: DateTime<Utc>,
    sentences: Vec<NewSentence>,
}

impl Default for ConversationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            id: ConversationId::new_v7(),
            owner: IdFixtures::owner(),
            level: Level::A1,
            course: 1,
            lesson: 1,
            created_at: TemporalFixtures::start_of_2024(),
            sentences: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ConversationId) -> Self {
        self.id = id;
        self
    }

    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = owner;
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_course(mut self, course: i32) -> Self {
        self.course = course;
        self
    }

    pub fn with_lesson(mut self, lesson: i32) -> Self {
        self.lesson = lesson;
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Appends a sentence with the given speaker and text
    pub fn with_sentence(mut self, speaker: SpeakerType, text: impl Into<String>) -> Self {
        self.sentences.push(NewSentence {
            speaker,
            text: text.into(),
            position: None,
        });
        self
    }

    /// Appends `count` sentences of lorem ipsum, alternating between speakers
    pub fn with_random_sentences(mut self, count: usize) -> Self {
        for i in 0..count {
            let speaker = if i % 2 == 0 {
                SpeakerType::PersonA
            } else {
                SpeakerType::PersonB
            };
            let text: String = LoremSentence(3..10).fake();
            self.sentences.push(NewSentence {
                speaker,
                text,
                position: None,
            });
        }
        self
    }

    /// Appends all of the given sentences
    pub fn with_script(mut self, script: Vec<NewSentence>) -> Self {
        self.sentences.extend(script);
        self
    }

    /// Builds the conversation; sentences get consecutive positions
    pub fn build(self) -> Conversation {
        let mut conversation = Conversation::new(
            self.owner,
            NewConversation {
                level: self.level,
                course: self.course,
                lesson: self.lesson,
            },
        );
        conversation.id = self.id;
        conversation.created_at = self.created_at;
        conversation.updated_at = self.created_at;

        for request in self.sentences {
            let next = conversation
                .next_position()
                .expect("builder scripts stay below MAX_POSITION");
            let sentence = Sentence::new(conversation.id, next, request);
            conversation.sentences.push(sentence);
        }
        conversation.sort_sentences();
        conversation
    }
}
