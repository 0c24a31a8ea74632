//! Conversation repository implementation
//!
//! Database access for conversations and their sentences. Every query that
//! touches an existing conversation is filtered by both the conversation id
//! and the owning user id, so ownership is enforced by the SQL itself.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain_conversation::MAX_POSITION;

use crate::error::DatabaseError;

/// Repository for the `conversations` and `sentences` tables
#[derive(Debug, Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    /// Creates a new ConversationRepository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists a user's conversations, newest first
    pub async fn list_by_owner(&self, user_id: Uuid) -> Result<Vec<ConversationRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, level, course, lesson, created_at, updated_at
            FROM conversations
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Retrieves a conversation owned by the given user
    ///
    /// # Returns
    ///
    /// The conversation row or `DatabaseError::NotFound`
    pub async fn get_owned(&self, id: Uuid, user_id: Uuid) -> Result<ConversationRow, DatabaseError> {
        sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, user_id, level, course, lesson, created_at, updated_at
            FROM conversations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Conversation", id))
    }

    /// Retrieves the sentences of a conversation in display order
    pub async fn list_sentences(&self, conversation_id: Uuid) -> Result<Vec<SentenceRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, SentenceRow>(
            r#"
            SELECT id, conversation_id, position, speaker, text, created_at
            FROM sentences
            WHERE conversation_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserts a new conversation
    pub async fn insert(&self, conversation: NewConversationRow) -> Result<ConversationRow, DatabaseError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            INSERT INTO conversations (id, user_id, level, course, lesson, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, user_id, level, course, lesson, created_at, updated_at
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(conversation.level)
        .bind(conversation.course)
        .bind(conversation.lesson)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Appends a sentence to an owned conversation
    ///
    /// The parent row is locked for the duration of the transaction so two
    /// concurrent appends cannot be handed the same position.
    pub async fn insert_sentence(
        &self,
        user_id: Uuid,
        sentence: NewSentenceRow,
    ) -> Result<SentenceRow, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM conversations
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(sentence.conversation_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Conversation", sentence.conversation_id))?;

        let position = match sentence.position {
            Some(position) => position,
            None => {
                let next = sqlx::query_scalar::<_, i64>(
                    "SELECT COALESCE(MAX(position), 0)::BIGINT + 1 FROM sentences WHERE conversation_id = $1",
                )
                .bind(sentence.conversation_id)
                .fetch_one(&mut *tx)
                .await?;

                i32::try_from(next)
                    .ok()
                    .filter(|next| *next <= MAX_POSITION)
                    .ok_or_else(|| {
                        DatabaseError::ConstraintViolation(format!(
                            "no free position after {} in conversation {}",
                            next - 1,
                            sentence.conversation_id
                        ))
                    })?
            }
        };

        let row = sqlx::query_as::<_, SentenceRow>(
            r#"
            INSERT INTO sentences (id, conversation_id, position, speaker, text, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, conversation_id, position, speaker, text, created_at
            "#,
        )
        .bind(sentence.id)
        .bind(sentence.conversation_id)
        .bind(position)
        .bind(sentence.speaker)
        .bind(&sentence.text)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = $2 WHERE id = $1")
            .bind(sentence.conversation_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Deletes a conversation only if it belongs to the given user
    ///
    /// Sentences go with it through `ON DELETE CASCADE`.
    ///
    /// # Returns
    ///
    /// The number of conversations removed (0 or 1)
    pub async fn delete_owned(&self, id: Uuid, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Proficiency level as stored in the `conversation_level` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "conversation_level")]
pub enum Level {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
    Business,
}

/// Speaker as stored in the `speaker_type` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "speaker_type")]
pub enum SpeakerType {
    Description,
    PersonA,
    PersonB,
}

/// Database row for a conversation
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ConversationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: Level,
    pub course: i32,
    pub lesson: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row for a sentence
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SentenceRow {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub position: i32,
    pub speaker: SpeakerType,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Values for inserting a conversation
#[derive(Debug, Clone)]
pub struct NewConversationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level: Level,
    pub course: i32,
    pub lesson: i32,
}

/// Values for inserting a sentence; `position: None` appends
#[derive(Debug, Clone)]
pub struct NewSentenceRow {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub position: Option<i32>,
    pub speaker: SpeakerType,
    pub text: String,
}
