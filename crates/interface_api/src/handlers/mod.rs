//! Request handlers

pub mod conversations;
pub mod health;
pub mod home;
pub mod sentences;

use core_kernel::ConversationId;

use crate::error::ApiError;

/// Parses a conversation id from the path; anything unparseable is a 404
pub(crate) fn parse_conversation_id(raw: &str) -> Result<ConversationId, ApiError> {
    raw.parse::<ConversationId>()
        .map_err(|_| ApiError::NotFound(format!("Conversation {}", raw)))
}
