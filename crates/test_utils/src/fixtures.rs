//! Pre-built Test Fixtures
//!
//! Ready-to-use, predictable test data for conversations and sentences.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::UserId;
use domain_conversation::{Level, NewConversation, NewSentence, SpeakerType};
use uuid::Uuid;

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// A fixed user id, stable across test runs
    pub fn owner() -> UserId {
        UserId::from(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
    }

    /// A second fixed user id, for ownership tests
    pub fn stranger() -> UserId {
        UserId::from(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0002))
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Jan 1, 2024
    pub fn start_of_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// `days` after [`Self::start_of_2024`]
    pub fn days_later(days: i64) -> DateTime<Utc> {
        Self::start_of_2024() + chrono::Duration::days(days)
    }
}

/// Fixture for conversation data
pub struct ConversationFixtures;

impl ConversationFixtures {
    /// Level A1, course 2, lesson 14
    pub fn a1_request() -> NewConversation {
        NewConversation {
            level: Level::A1,
            course: 2,
            lesson: 14,
        }
    }

    /// Form fields as a browser would post them for [`Self::a1_request`]
    pub fn a1_form() -> [(&'static str, &'static str); 3] {
        [("level", "A1"), ("course", "2"), ("lesson", "14")]
    }

    /// The twelve-line "sport tickets" dialogue, narration included
    pub fn sport_tickets_script() -> Vec<NewSentence> {
        use SpeakerType::*;

        [
            (Description, "Es ist beinah an der Zeit für einen großen Sport-Wettkampf. Ren und Aida versuchen, online Tickets zu bekommen..."),
            (PersonA, "What do you want to see, Aida? Do you like swimming?"),
            (PersonB, "Yes, I love swimming. It's my favorite sport."),
            (PersonA, "Great, me too!"),
            (Description, "Ren versucht, Tickets für Schwimmen zu bekommen, aber sie sind schon alle weg..."),
            (PersonB, "Oh no! We can't watch swimming. Do you like basketball?"),
            (PersonA, "Umm, no, I don't like basketball."),
            (PersonB, "Do you like watching tennis?"),
            (PersonA, "Yes, I like watching tennis."),
            (Description, "Die beiden versuchen, Tickets für Tennis zu reservieren..."),
            (PersonB, "We got the last two tickets!"),
            (PersonA, "Yes, I'm so excited!"),
        ]
        .into_iter()
        .map(|(speaker, text)| NewSentence {
            speaker,
            text: text.to_string(),
            position: None,
        })
        .collect()
    }
}
