//! Direct messages between users, optionally about a property
//!
//! There is no conversations table. A conversation is every message
//! exchanged between two users, and [`MessageStore::conversations`] derives
//! the inbox view from the messages themselves.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::messages;
use crate::error::{Result, StoreError};
use crate::ids::generate_id;
use crate::marshal::{self, marshal_all, Marshal};
use crate::repository::{newest_first, Repository};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub property_id: Option<String>,
    pub content: String,
    /// Set once the receiver has seen it
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// The participant that is not `user_id`.
    pub fn other_party(&self, user_id: &str) -> &str {
        if self.sender_id == user_id {
            &self.receiver_id
        } else {
            &self.sender_id
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub property_id: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePatch {
    pub content: Option<String>,
    pub read: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    /// Sent or received by this user
    pub participant: Option<String>,
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    pub property_id: Option<String>,
    pub unread_only: bool,
}

/// Inbox entry: the latest message with one other user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub other_user_id: String,
    pub last_message: Message,
    /// Messages from the other user not yet read
    pub unread_count: u32,
    pub message_count: u32,
}

fn checked_content(content: String) -> Result<String> {
    if content.trim().is_empty() {
        return Err(StoreError::invalid("content", content));
    }
    Ok(content)
}

/// Store for the `messages` table
#[derive(Clone)]
pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn send(
        &self,
        sender_id: &str,
        receiver_id: &str,
        content: &str,
        property_id: Option<&str>,
    ) -> Result<Message> {
        self.create(NewMessage {
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            property_id: property_id.map(str::to_string),
            content: content.to_string(),
        })
        .await
    }

    /// Messages sent or received by a user, newest first
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Message>> {
        self.list(&MessageFilter {
            participant: Some(user_id.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn mark_read(&self, id: &str) -> Result<bool> {
        let result = messages::Entity::update_many()
            .col_expr(messages::Column::Read, Expr::value(1))
            .filter(messages::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// Mark everything `other_id` sent to `user_id` as read. Returns the
    /// number of messages changed.
    pub async fn mark_conversation_read(&self, user_id: &str, other_id: &str) -> Result<u64> {
        let result = messages::Entity::update_many()
            .col_expr(messages::Column::Read, Expr::value(1))
            .filter(messages::Column::ReceiverId.eq(user_id))
            .filter(messages::Column::SenderId.eq(other_id))
            .filter(messages::Column::Read.eq(0))
            .exec(&self.db)
            .await?;

        debug!(
            "Marked {} messages from {} to {} as read",
            result.rows_affected, other_id, user_id
        );
        Ok(result.rows_affected)
    }

    /// Messages received by a user and not yet read
    pub async fn unread_count(&self, user_id: &str) -> Result<u64> {
        Ok(messages::Entity::find()
            .filter(messages::Column::ReceiverId.eq(user_id))
            .filter(messages::Column::Read.eq(0))
            .count(&self.db)
            .await?)
    }

    /// One entry per user `user_id` has exchanged messages with, most
    /// recently active first.
    pub async fn conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let history = self.list_for_user(user_id).await?;

        let mut order: Vec<String> = Vec::new();
        let mut by_party: HashMap<String, Conversation> = HashMap::new();
        for message in history {
            let other = message.other_party(user_id).to_string();
            let unread = !message.read && message.receiver_id == user_id;
            match by_party.get_mut(&other) {
                Some(conversation) => {
                    conversation.message_count += 1;
                    if unread {
                        conversation.unread_count += 1;
                    }
                }
                None => {
                    order.push(other.clone());
                    by_party.insert(
                        other.clone(),
                        Conversation {
                            other_user_id: other,
                            last_message: message,
                            unread_count: u32::from(unread),
                            message_count: 1,
                        },
                    );
                }
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|other| by_party.remove(&other))
            .collect())
    }
}

#[async_trait]
impl Repository for MessageStore {
    type Record = Message;
    type Draft = NewMessage;
    type Patch = MessagePatch;
    type Filter = MessageFilter;

    async fn list(&self, filter: &MessageFilter) -> Result<Vec<Message>> {
        let mut query = messages::Entity::find();
        if let Some(user_id) = &filter.participant {
            query = query.filter(
                Condition::any()
                    .add(messages::Column::SenderId.eq(user_id.as_str()))
                    .add(messages::Column::ReceiverId.eq(user_id.as_str())),
            );
        }
        if let Some(sender_id) = &filter.sender_id {
            query = query.filter(messages::Column::SenderId.eq(sender_id.as_str()));
        }
        if let Some(receiver_id) = &filter.receiver_id {
            query = query.filter(messages::Column::ReceiverId.eq(receiver_id.as_str()));
        }
        if let Some(property_id) = &filter.property_id {
            query = query.filter(messages::Column::PropertyId.eq(property_id.as_str()));
        }
        if filter.unread_only {
            query = query.filter(messages::Column::Read.eq(0));
        }

        let rows = newest_first(query, messages::Column::CreatedAt)
            .all(&self.db)
            .await?;
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Message>> {
        messages::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(Message::marshal_in)
            .transpose()
    }

    async fn create(&self, draft: NewMessage) -> Result<Message> {
        let message = Message {
            id: generate_id(),
            sender_id: draft.sender_id,
            receiver_id: draft.receiver_id,
            property_id: draft.property_id,
            content: checked_content(draft.content)?,
            read: false,
            created_at: marshal::now(),
        };

        let model = message
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        info!("Message {} from {} to {}", model.id, model.sender_id, model.receiver_id);
        Message::marshal_in(model)
    }

    async fn update(&self, id: &str, patch: MessagePatch) -> Result<Option<Message>> {
        let Some(model) = messages::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: messages::ActiveModel = model.clone().into();
        if let Some(content) = patch.content {
            active.content = Set(checked_content(content)?);
        }
        if let Some(read) = patch.read {
            active.read = Set(marshal::flag(read));
        }

        if !active.is_changed() {
            return Message::marshal_in(model).map(Some);
        }

        let model = active.update(&self.db).await?;
        Message::marshal_in(model).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = messages::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
