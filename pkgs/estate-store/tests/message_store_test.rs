// Copyright 2024 Gigi Team.
//
// Tests for MessageStore and derived conversations

mod common;

use common::{create_property, create_user, open_store};
use estate_store::{MessageFilter, MessagePatch, PropertyType, Repository, StoreError};
use tempfile::NamedTempFile;

#[tokio::test]
async fn test_send_and_list_for_user() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let buyer = create_user(&store, "buyer@example.com").await;
    let agent = create_user(&store, "agent@example.com").await;
    let property = create_property(&store, &agent.id, "Loft", PropertyType::Rent, 2000.0).await;
    let messages = store.message_store();

    let question = messages
        .send(&buyer.id, &agent.id, "Is it still available?", Some(property.id.as_str()))
        .await
        .unwrap();
    let answer = messages
        .send(&agent.id, &buyer.id, "Yes, viewing Saturday?", Some(property.id.as_str()))
        .await
        .unwrap();

    assert!(!question.read);
    assert_eq!(question.property_id.as_deref(), Some(property.id.as_str()));

    let buyer_view = messages.list_for_user(&buyer.id).await.unwrap();
    assert_eq!(buyer_view, vec![answer.clone(), question.clone()]);

    let about_property = messages
        .list(&MessageFilter {
            property_id: Some(property.id.clone()),
            sender_id: Some(agent.id.clone()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(about_property, vec![answer]);
}

#[tokio::test]
async fn test_empty_content_rejected() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let a = create_user(&store, "a@example.com").await;
    let b = create_user(&store, "b@example.com").await;

    let err = store.message_store().send(&a.id, &b.id, "  ", None).await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidValue { field: "content", .. }));
}

#[tokio::test]
async fn test_conversations_group_by_other_party() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let me = create_user(&store, "me@example.com").await;
    let alice = create_user(&store, "alice@example.com").await;
    let bob = create_user(&store, "bob@example.com").await;
    let messages = store.message_store();

    messages.send(&alice.id, &me.id, "Hi from Alice", None).await.unwrap();
    messages.send(&me.id, &alice.id, "Hi Alice", None).await.unwrap();
    messages.send(&bob.id, &me.id, "Hi from Bob", None).await.unwrap();
    messages.send(&bob.id, &me.id, "Are you there?", None).await.unwrap();
    let latest_alice = messages.send(&alice.id, &me.id, "Following up", None).await.unwrap();

    let conversations = messages.conversations(&me.id).await.unwrap();
    assert_eq!(conversations.len(), 2);

    assert_eq!(conversations[0].other_user_id, alice.id);
    assert_eq!(conversations[0].last_message, latest_alice);
    assert_eq!(conversations[0].message_count, 3);
    assert_eq!(conversations[0].unread_count, 2);

    assert_eq!(conversations[1].other_user_id, bob.id);
    assert_eq!(conversations[1].message_count, 2);
    assert_eq!(conversations[1].unread_count, 2);

    assert_eq!(messages.unread_count(&me.id).await.unwrap(), 4);
    assert_eq!(messages.unread_count(&alice.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_mark_read() {
    let temp_file = NamedTempFile::new().unwrap();
    let store = open_store(&temp_file).await;
    let me = create_user(&store, "me@example.com").await;
    let alice = create_user(&store, "alice@example.com").await;
    let bob = create_user(&store, "bob@example.com").await;
    let messages = store.message_store();

    messages.send(&alice.id, &me.id, "One", None).await.unwrap();
    messages.send(&alice.id, &me.id, "Two", None).await.unwrap();
    let from_bob = messages.send(&bob.id, &me.id, "Three", None).await.unwrap();

    assert_eq!(messages.mark_conversation_read(&me.id, &alice.id).await.unwrap(), 2);
    assert_eq!(messages.unread_count(&me.id).await.unwrap(), 1);

    assert!(messages.mark_read(&from_bob.id).await.unwrap());
    assert!(!messages.mark_read("missing").await.unwrap());
    assert_eq!(messages.unread_count(&me.id).await.unwrap(), 0);

    let unread = messages
        .list(&MessageFilter {
            participant: Some(me.id.clone()),
            unread_only: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(unread.is_empty());

    let edited = messages
        .update(
            &from_bob.id,
            MessagePatch {
                content: Some("Three (edited)".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(edited.content, "Three (edited)");
    assert!(edited.read);
}
