//! Conversation Domain Ports
//!
//! The `ConversationPort` trait is everything the HTTP layer needs from
//! storage. Every operation is scoped to the requesting user: a conversation
//! owned by someone else behaves exactly like one that does not exist.
//!
//! Implementations:
//!
//! - **PostgreSQL adapter**: `infra_db::adapters::PostgresConversationAdapter`
//! - **Mock adapter**: [`mock::MockConversationPort`], in memory, for tests
//!
//! ```rust,ignore
//! use domain_conversation::ConversationPort;
//! use std::sync::Arc;
//!
//! let port: Arc<dyn ConversationPort> = Arc::new(PostgresConversationAdapter::new(pool));
//! let items = port.list_conversations(user_id).await?;
//! ```

use async_trait::async_trait;

use core_kernel::{ConversationId, DomainPort, HealthCheckable, PortError, UserId};

use crate::conversation::{Conversation, ConversationSummary, NewConversation};
use crate::sentence::{NewSentence, Sentence};

/// Storage operations for conversations and their sentences
#[async_trait]
pub trait ConversationPort: DomainPort + HealthCheckable {
    /// Lists the owner's conversations, newest first
    async fn list_conversations(&self, owner: UserId) -> Result<Vec<ConversationSummary>, PortError>;

    /// Loads a conversation with its sentences in display order
    ///
    /// # Returns
    ///
    /// The conversation, or `PortError::NotFound` if it does not exist or
    /// belongs to another user
    async fn get_conversation(
        &self,
        id: ConversationId,
        owner: UserId,
    ) -> Result<Conversation, PortError>;

    /// Creates an empty conversation owned by `owner`
    async fn create_conversation(
        &self,
        owner: UserId,
        request: NewConversation,
    ) -> Result<Conversation, PortError>;

    /// Appends a sentence to an owned conversation
    ///
    /// Without an explicit position the sentence is placed after the current
    /// last sentence; `PortError::Conflict` when that would pass
    /// [`MAX_POSITION`](crate::MAX_POSITION).
    async fn add_sentence(
        &self,
        id: ConversationId,
        owner: UserId,
        request: NewSentence,
    ) -> Result<Sentence, PortError>;

    /// Deletes an owned conversation together with its sentences
    ///
    /// # Returns
    ///
    /// `PortError::NotFound` when nothing matched both id and owner
    async fn delete_conversation(&self, id: ConversationId, owner: UserId) -> Result<(), PortError>;
}

/// Mock implementation for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use core_kernel::HealthCheckResult;

    /// In-memory mock implementation of ConversationPort
    #[derive(Debug, Default, Clone)]
    pub struct MockConversationPort {
        conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
    }

    impl MockConversationPort {
        /// Creates a new mock port
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with conversations for testing
        pub async fn with_conversations(conversations: Vec<Conversation>) -> Self {
            let port = Self::new();
            {
                let mut store = port.conversations.write().await;
                for conversation in conversations {
                    store.insert(conversation.id, conversation);
                }
            }
            port
        }

        /// Number of stored conversations, regardless of owner
        pub async fn len(&self) -> usize {
            self.conversations.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.conversations.read().await.is_empty()
        }

        /// Whether a conversation exists, regardless of owner
        pub async fn contains(&self, id: ConversationId) -> bool {
            self.conversations.read().await.contains_key(&id)
        }
    }

    impl DomainPort for MockConversationPort {}

    #[async_trait]
    impl HealthCheckable for MockConversationPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult::healthy("mock-conversation-port", 0)
        }
    }

    #[async_trait]
    impl ConversationPort for MockConversationPort {
        async fn list_conversations(
            &self,
            owner: UserId,
        ) -> Result<Vec<ConversationSummary>, PortError> {
            let store = self.conversations.read().await;
            let mut items: Vec<_> = store
                .values()
                .filter(|c| c.is_owned_by(owner))
                .map(Conversation::summary)
                .collect();
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(items)
        }

        async fn get_conversation(
            &self,
            id: ConversationId,
            owner: UserId,
        ) -> Result<Conversation, PortError> {
            let store = self.conversations.read().await;
            let mut conversation = store
                .get(&id)
                .filter(|c| c.is_owned_by(owner))
                .cloned()
                .ok_or_else(|| PortError::not_found("Conversation", id))?;
            conversation.sort_sentences();
            Ok(conversation)
        }

        async fn create_conversation(
            &self,
            owner: UserId,
            request: NewConversation,
        ) -> Result<Conversation, PortError> {
            let conversation = Conversation::new(owner, request);
            self.conversations
                .write()
                .await
                .insert(conversation.id, conversation.clone());
            Ok(conversation)
        }

        async fn add_sentence(
            &self,
            id: ConversationId,
            owner: UserId,
            request: NewSentence,
        ) -> Result<Sentence, PortError> {
            let mut store = self.conversations.write().await;
            let conversation = store
                .get_mut(&id)
                .filter(|c| c.is_owned_by(owner))
                .ok_or_else(|| PortError::not_found("Conversation", id))?;

            let position = match request.position {
                Some(position) => position,
                None => conversation
                    .next_position()
                    .ok_or_else(|| PortError::conflict("Conversation has no free position left"))?,
            };
            let sentence = Sentence::new(id, position, request);
            conversation.sentences.push(sentence.clone());
            conversation.updated_at = Utc::now();
            Ok(sentence)
        }

        async fn delete_conversation(
            &self,
            id: ConversationId,
            owner: UserId,
        ) -> Result<(), PortError> {
            let mut store = self.conversations.write().await;
            let owned = store.get(&id).is_some_and(|c| c.is_owned_by(owner));
            if !owned {
                return Err(PortError::not_found("Conversation", id));
            }
            store.remove(&id);
            Ok(())
        }
    }
}
