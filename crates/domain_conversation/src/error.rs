//! Conversation domain errors

use thiserror::Error;

/// Errors raised while interpreting conversation data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    /// The level label is not one of the known proficiency levels
    #[error("Unknown level: {0}")]
    UnknownLevel(String),

    /// The speaker label is not one of the known speaker types
    #[error("Unknown speaker type: {0}")]
    UnknownSpeaker(String),
}
