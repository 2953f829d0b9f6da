//! Message and conversation repository

use std::collections::HashMap;

use sqlx::{postgres::PgRow, FromRow, PgPool, Row};
use uuid::Uuid;

use super::appointments::user_summary_from_prefixed_row;
use crate::{
    models::{Conversation, ConversationDetail, Message, MessageDetail, UserSummary},
    Error, Result,
};

const MESSAGE_DETAIL_SELECT: &str = r#"
    SELECT
        m.id, m.conversation_id, m.sender_id, m.receiver_id, m.content,
        m.attachments, m.read, m.created_at, m.updated_at,
        s.id AS sender_user_id, s.full_name AS sender_full_name, s.email AS sender_email,
        s.phone_number AS sender_phone_number, s.avatar AS sender_avatar,
        s.specialty AS sender_specialty, s.date_of_birth AS sender_date_of_birth,
        s.gender AS sender_gender, s.created_at AS sender_created_at,
        r.id AS receiver_user_id, r.full_name AS receiver_full_name, r.email AS receiver_email,
        r.phone_number AS receiver_phone_number, r.avatar AS receiver_avatar,
        r.specialty AS receiver_specialty, r.date_of_birth AS receiver_date_of_birth,
        r.gender AS receiver_gender, r.created_at AS receiver_created_at
    FROM messages m
    LEFT JOIN users s ON s.id = m.sender_id
    LEFT JOIN users r ON r.id = m.receiver_id
"#;

fn message_detail_from_row(row: &PgRow) -> std::result::Result<MessageDetail, sqlx::Error> {
    Ok(MessageDetail {
        message: Message::from_row(row)?,
        sender: user_summary_from_prefixed_row(row, "sender")?,
        receiver: user_summary_from_prefixed_row(row, "receiver")?,
    })
}

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The two-participant conversation between the given users, if any.
    pub async fn find_conversation_between(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.* FROM conversations c
            JOIN conversation_participants p1
                ON p1.conversation_id = c.id AND p1.user_id = $1
            JOIN conversation_participants p2
                ON p2.conversation_id = c.id AND p2.user_id = $2
            LIMIT 1
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;
        Ok(conversation)
    }

    pub async fn create_conversation(&self, user_a: Uuid, user_b: Uuid) -> Result<Conversation> {
        let mut tx = self.pool.begin().await?;

        let conversation = sqlx::query_as::<_, Conversation>(
            "INSERT INTO conversations DEFAULT VALUES RETURNING *",
        )
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO conversation_participants (conversation_id, user_id) VALUES ($1, $2), ($1, $3)",
        )
        .bind(conversation.id)
        .bind(user_a)
        .bind(user_b)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(conversation)
    }

    pub async fn find_conversation(&self, id: Uuid) -> Result<Option<Conversation>> {
        let conversation =
            sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(conversation)
    }

    pub async fn insert_message(
        &self,
        conversation_id: Uuid,
        sender_id: Uuid,
        receiver_id: Uuid,
        content: &str,
        attachments: Option<&Vec<String>>,
    ) -> Result<Message> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, receiver_id, content, attachments)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(receiver_id)
        .bind(content)
        .bind(attachments)
        .fetch_one(&self.pool)
        .await?;
        Ok(message)
    }

    /// Record the latest message and bump the unread counter.
    pub async fn bump_conversation(
        &self,
        conversation_id: Uuid,
        last_message_id: Uuid,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE conversations
            SET last_message_id = $2, unread_count = unread_count + 1, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(conversation_id)
        .bind(last_message_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// All conversations of a user, with participants and messages attached,
    /// most recently updated first.
    pub async fn conversations_for_user(&self, user_id: Uuid) -> Result<Vec<ConversationDetail>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT c.* FROM conversations c
            JOIN conversation_participants p ON p.conversation_id = c.id
            WHERE p.user_id = $1
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        if conversations.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = conversations.iter().map(|c| c.id).collect();

        let participant_rows = sqlx::query(
            r#"
            SELECT cp.conversation_id,
                   u.id, u.full_name, u.email, u.phone_number, u.avatar, u.specialty,
                   u.date_of_birth, u.gender, u.created_at
            FROM conversation_participants cp
            JOIN users u ON u.id = cp.user_id
            WHERE cp.conversation_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut participants: HashMap<Uuid, Vec<UserSummary>> = HashMap::new();
        for row in &participant_rows {
            let conversation_id: Uuid = row.try_get("conversation_id").map_err(Error::from)?;
            let summary = UserSummary::from_row(row).map_err(Error::from)?;
            participants.entry(conversation_id).or_default().push(summary);
        }

        let message_rows = sqlx::query_as::<_, Message>(
            r#"
            SELECT * FROM messages
            WHERE conversation_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut messages: HashMap<Uuid, Vec<Message>> = HashMap::new();
        for message in message_rows {
            messages
                .entry(message.conversation_id)
                .or_default()
                .push(message);
        }

        Ok(conversations
            .into_iter()
            .map(|conversation| {
                let id = conversation.id;
                ConversationDetail {
                    conversation,
                    participants: participants.remove(&id).unwrap_or_default(),
                    messages: messages.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    pub async fn count_conversations_for_user(&self, user_id: Uuid) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM conversation_participants WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Messages of a conversation, oldest first, with sender/receiver joined.
    pub async fn messages_by_conversation_detailed(
        &self,
        conversation_id: Uuid,
    ) -> Result<Vec<MessageDetail>> {
        let rows = sqlx::query(&format!(
            "{MESSAGE_DETAIL_SELECT} WHERE m.conversation_id = $1 ORDER BY m.created_at ASC"
        ))
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| message_detail_from_row(row).map_err(Error::from))
            .collect()
    }

    pub async fn mark_read(&self, message_id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            "UPDATE messages SET read = TRUE, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(message_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(message)
    }
}
