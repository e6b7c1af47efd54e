use batepapo::{
    db::{Message, MessageKind, Participant},
    store::{MemoryStore, Store, StoreError},
};

use super::helpers::*;

fn participant(name: &str, last_status: i64) -> Participant {
    Participant {
        name: name.to_owned(),
        last_status,
    }
}

fn message(from: &str, to: &str, text: &str) -> Message {
    Message::new(
        from.to_owned(),
        to.to_owned(),
        text.to_owned(),
        MessageKind::Message,
        "10:00:00".to_owned(),
    )
}

async fn check_participants(store: &dyn Store) {
    store.insert_participant(&participant("alice", T0)).await.unwrap();
    store.insert_participant(&participant("bob", T0)).await.unwrap();

    let err = store.insert_participant(&participant("alice", T0 + 1)).await.unwrap_err();
    assert!(matches!(err, StoreError::DuplicateName(name) if name == "alice"));

    // the failed insert must not have overwritten the original
    let alice = store.find_participant("alice").await.unwrap().unwrap();
    assert_eq!(alice.last_status, T0);
    assert!(store.find_participant("carol").await.unwrap().is_none());

    let mut names: Vec<String> = store
        .list_participants()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    names.sort();
    assert_eq!(names, ["alice", "bob"]);

    assert!(store.touch_participant("alice", T0 + 500).await.unwrap());
    assert!(!store.touch_participant("carol", T0 + 500).await.unwrap());
    assert_eq!(store.find_participant("alice").await.unwrap().unwrap().last_status, T0 + 500);

    // cutoff is exclusive: only strictly older timestamps go
    assert!(!store.delete_participant_if_idle("alice", T0 + 500).await.unwrap());
    assert!(!store.delete_participant_if_idle("carol", T0 + 10_000).await.unwrap());
    assert!(store.delete_participant_if_idle("alice", T0 + 501).await.unwrap());
    assert!(store.find_participant("alice").await.unwrap().is_none());
    assert!(!store.delete_participant_if_idle("alice", T0 + 501).await.unwrap());

    // the name is free again
    store.insert_participant(&participant("alice", T0 + 600)).await.unwrap();
}

async fn check_messages(store: &dyn Store) {
    assert!(store.list_messages().await.unwrap().is_empty());

    let sent = [
        message("alice", "Todos", "one"),
        message("bob", "alice", "two"),
        message("alice", "bob", "three"),
    ];
    for m in &sent {
        store.insert_message(m).await.unwrap();
    }

    assert_eq!(store.list_messages().await.unwrap(), sent);
}

#[tokio::test]
async fn memory_participants() {
    check_participants(&MemoryStore::new()).await;
}

#[tokio::test]
async fn memory_messages() {
    check_messages(&MemoryStore::new()).await;
}

#[tokio::test]
async fn sqlite_participants() {
    check_participants(&sqlite_store().await).await;
}

#[tokio::test]
async fn sqlite_messages() {
    check_messages(&sqlite_store().await).await;
}

#[tokio::test]
async fn sqlite_schema_is_idempotent() {
    let store = sqlite_store().await;
    store.insert_participant(&participant("alice", T0)).await.unwrap();

    // re-running the schema against the same pool keeps existing rows
    let reopened = batepapo::store::SqliteStore::from_pool(store.pool().clone()).await.unwrap();
    assert!(reopened.find_participant("alice").await.unwrap().is_some());
}

#[tokio::test]
async fn connect_memory_url() {
    let store = batepapo::store::connect("memory").await.unwrap();
    store.insert_participant(&participant("alice", T0)).await.unwrap();
    assert_eq!(store.list_participants().await.unwrap().len(), 1);
}
