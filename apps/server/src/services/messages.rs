//! Messaging: find-or-create conversations and send/read messages.

use uuid::Uuid;

use crate::{
    db::MessageRepository,
    models::{Conversation, ConversationDetail, CreateMessageDto, Message, MessageDetail},
    Error, Result,
};

#[derive(Clone)]
pub struct MessagesService {
    messages: MessageRepository,
}

impl MessagesService {
    pub fn new(messages: MessageRepository) -> Self {
        Self { messages }
    }

    pub async fn create(&self, dto: CreateMessageDto) -> Result<Message> {
        let conversation = self
            .find_or_create_conversation(dto.sender_id, dto.receiver_id)
            .await?;

        let message = self
            .messages
            .insert_message(
                conversation.id,
                dto.sender_id,
                dto.receiver_id,
                &dto.content,
                dto.attachments.as_ref(),
            )
            .await?;

        self.messages
            .bump_conversation(conversation.id, message.id)
            .await?;

        Ok(message)
    }

    pub async fn find_or_create_conversation(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Conversation> {
        if let Some(conversation) = self
            .messages
            .find_conversation_between(user_a, user_b)
            .await?
        {
            return Ok(conversation);
        }
        self.messages.create_conversation(user_a, user_b).await
    }

    pub async fn get_conversations(&self, user_id: Uuid) -> Result<Vec<ConversationDetail>> {
        self.messages.conversations_for_user(user_id).await
    }

    pub async fn count_conversations(&self, user_id: Uuid) -> Result<i64> {
        self.messages.count_conversations_for_user(user_id).await
    }

    pub async fn find_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<MessageDetail>> {
        if self
            .messages
            .find_conversation(conversation_id)
            .await?
            .is_none()
        {
            return Err(Error::NotFound(format!(
                "Conversation with ID {conversation_id} not found"
            )));
        }
        self.messages
            .messages_by_conversation_detailed(conversation_id)
            .await
    }

    pub async fn mark_as_read(&self, message_id: Uuid) -> Result<Message> {
        self.messages
            .mark_read(message_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Message with ID {message_id} not found")))
    }
}
