use batepapo::{
    db::{MessageKind, BROADCAST},
    ChatError, Draft,
};

use super::helpers::*;

#[tokio::test]
async fn unknown_sender_is_rejected() {
    let room = memory_room();
    room.join_at("alice", T0).await;
    let before = room.log.list_for(None, None).await.unwrap().len();

    for from in [Some("ghost"), Some(""), None] {
        let err = room
            .log
            .append(from, draft(BROADCAST, "boo", "message"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::UnknownSender));
    }

    assert_eq!(room.log.list_for(None, None).await.unwrap().len(), before);
}

#[tokio::test]
async fn invalid_body_is_rejected_before_sender_lookup() {
    let room = memory_room();
    room.join_at("alice", T0).await;

    let bad = [
        draft("", "hi", "message"),
        draft("bob", "", "message"),
        draft("bob", "hi", "status"),
        draft("bob", "hi", "whisper"),
        Draft::default(),
    ];
    for draft in bad {
        let err = room.log.append(Some("ghost"), draft.clone()).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
        let err = room.log.append(Some("alice"), draft).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
    }

    // just the join message
    assert_eq!(room.log.list_for(Some("alice"), None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn append_stamps_message() {
    let room = memory_room();
    room.join_at("alice", T0).await;
    room.clock.advance(65_000);

    let message = room
        .log
        .append(Some("alice"), draft("bob", "hi", "private_message"))
        .await
        .unwrap();
    assert_eq!(message.from, "alice");
    assert_eq!(message.to, "bob");
    assert_eq!(message.kind, MessageKind::PrivateMessage);
    assert_eq!(message.time, "22:14:25");
}

async fn check_visibility(room: Room) {
    room.join_at("alice", T0).await;
    room.join_at("bob", T0).await;
    room.join_at("carol", T0).await;

    room.log.append(Some("alice"), draft("bob", "hi", "message")).await.unwrap();

    let seen_by = |messages: Vec<batepapo::db::Message>| {
        messages.into_iter().any(|m| m.text == "hi")
    };
    assert!(seen_by(room.log.list_for(Some("bob"), None).await.unwrap()));
    assert!(seen_by(room.log.list_for(Some("alice"), None).await.unwrap()));
    assert!(!seen_by(room.log.list_for(Some("carol"), None).await.unwrap()));
    assert!(!seen_by(room.log.list_for(None, None).await.unwrap()));

    room.log.append(Some("alice"), draft(BROADCAST, "hello all", "message")).await.unwrap();
    let carol = room.log.list_for(Some("carol"), None).await.unwrap();
    assert!(carol.iter().any(|m| m.text == "hello all"));
    // carol sees the three joins and the broadcast, not the private line
    assert_eq!(carol.len(), 4);
}

#[tokio::test]
async fn private_messages_are_scoped() {
    check_visibility(memory_room()).await;
}

#[tokio::test]
async fn private_messages_are_scoped_sqlite() {
    check_visibility(sqlite_room().await).await;
}

async fn check_limit(room: Room) {
    room.join_at("alice", T0).await;
    room.join_at("bob", T0).await;

    for text in ["one", "two", "three"] {
        room.log.append(Some("alice"), draft(BROADCAST, text, "message")).await.unwrap();
    }
    // not visible to bob, must not count toward his limit
    room.log.append(Some("alice"), draft("carol", "psst", "private_message")).await.unwrap();

    let last_two: Vec<String> = room
        .log
        .list_for(Some("bob"), Some(2))
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(last_two, ["two", "three"]);

    let all = room.log.list_for(Some("bob"), None).await.unwrap();
    assert_eq!(all.len(), 5);
    assert_eq!(room.log.list_for(Some("bob"), Some(50)).await.unwrap(), all);

    // the sender still sees their private line
    let alice_last = room.log.list_for(Some("alice"), Some(1)).await.unwrap();
    assert_eq!(alice_last[0].text, "psst");
}

#[tokio::test]
async fn limit_keeps_latest() {
    check_limit(memory_room()).await;
}

#[tokio::test]
async fn limit_keeps_latest_sqlite() {
    check_limit(sqlite_room().await).await;
}
