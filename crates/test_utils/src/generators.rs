//! Property-Based Test Generators
//!
//! Proptest strategies producing values that respect the domain invariants.

use domain_conversation::{Level, NewConversationForm, NewSentence, SpeakerType};
use proptest::prelude::*;

/// Strategy for generating any Level
pub fn level_strategy() -> impl Strategy<Value = Level> {
    proptest::sample::select(Level::ALL.to_vec())
}

/// Strategy for generating any SpeakerType
pub fn speaker_strategy() -> impl Strategy<Value = SpeakerType> {
    proptest::sample::select(SpeakerType::ALL.to_vec())
}

/// Strategy for sentence text with at least one visible character
pub fn sentence_text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-zÄÖÜäöüß,.!? ]{0,60}[A-Za-z]"
}

/// Strategy for an appended (unpositioned) sentence
pub fn new_sentence_strategy() -> impl Strategy<Value = NewSentence> {
    (speaker_strategy(), sentence_text_strategy()).prop_map(|(speaker, text)| NewSentence {
        speaker,
        text,
        position: None,
    })
}

/// Strategy for a new-conversation form that passes validation
pub fn valid_conversation_form_strategy() -> impl Strategy<Value = NewConversationForm> {
    (level_strategy(), 1i32..100, 1i32..100).prop_map(|(level, course, lesson)| {
        NewConversationForm {
            level: Some(level.to_string()),
            course: Some(course.to_string()),
            lesson: Some(lesson.to_string()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_forms_validate(form in valid_conversation_form_strategy()) {
            prop_assert!(form.validate().is_ok());
        }

        #[test]
        fn generated_text_is_never_blank(text in sentence_text_strategy()) {
            prop_assert!(!text.trim().is_empty());
        }
    }
}
