//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use folio_core::{
  document::{Document, Fields, decode_timestamp, server_timestamp},
  store::{CollectionQuery, Direction, DocumentStore, Subscription},
};
use serde_json::{Value, json};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn fields(v: Value) -> Fields {
  match v {
    Value::Object(m) => m,
    _ => panic!("not an object"),
  }
}

/// Every snapshot already queued on `sub`, oldest first.
async fn drain(sub: &mut Subscription) -> Vec<Vec<Document>> {
  let mut snaps = Vec::new();
  while let Ok(Some(snap)) = tokio::time::timeout(Duration::from_millis(20), sub.next()).await {
    snaps.push(snap);
  }
  snaps
}

// ─── Point reads and writes ──────────────────────────────────────────────────

#[tokio::test]
async fn set_then_get() {
  let s = store().await;
  s.set("aboutSection", "content", fields(json!({ "text": "hello" })))
    .await
    .unwrap();

  let doc = s.get("aboutSection", "content").await.unwrap().unwrap();
  assert_eq!(doc.id, "content");
  assert_eq!(doc.fields["text"], "hello");
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get("aboutSection", "content").await.unwrap().is_none());
}

#[tokio::test]
async fn set_replaces_the_whole_document() {
  let s = store().await;
  s.set("contacts", "main", fields(json!({ "email": "a@b.com", "phone": "1" })))
    .await
    .unwrap();
  s.set("contacts", "main", fields(json!({ "email": "c@d.com" })))
    .await
    .unwrap();

  let doc = s.get("contacts", "main").await.unwrap().unwrap();
  assert_eq!(doc.fields["email"], "c@d.com");
  assert!(!doc.fields.contains_key("phone"));
}

#[tokio::test]
async fn same_id_in_different_collections_is_distinct() {
  let s = store().await;
  s.set("admin", "x", fields(json!({ "a": 1 }))).await.unwrap();
  s.set("contacts", "x", fields(json!({ "b": 2 }))).await.unwrap();

  assert_eq!(s.get("admin", "x").await.unwrap().unwrap().fields["a"], 1);
  assert_eq!(s.get("contacts", "x").await.unwrap().unwrap().fields["b"], 2);
}

#[tokio::test]
async fn server_timestamps_are_filled_in() {
  let s = store().await;
  let doc = s
    .set("activeUsers", "203.0.113.7", fields(json!({ "lastSeen": server_timestamp() })))
    .await
    .unwrap();
  let seen = decode_timestamp(&doc.fields["lastSeen"]).expect("timestamp");
  assert_eq!(seen.timestamp_micros(), doc.updated_at.timestamp_micros());

  let stored = s.get("activeUsers", "203.0.113.7").await.unwrap().unwrap();
  assert_eq!(stored.fields["lastSeen"], doc.fields["lastSeen"]);
}

// ─── Collections ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_assigns_unique_ids() {
  let s = store().await;
  let a = s.add("skills", fields(json!({ "name": "Rust" }))).await.unwrap();
  let b = s.add("skills", fields(json!({ "name": "SQL" }))).await.unwrap();
  assert_ne!(a.id, b.id);

  let all = s.list(&CollectionQuery::all("skills")).await.unwrap();
  assert_eq!(all.len(), 2);
  // Insertion order without an explicit ordering.
  assert_eq!(all[0].fields["name"], "Rust");
  assert_eq!(all[1].fields["name"], "SQL");
}

#[tokio::test]
async fn ordered_list_descending() {
  let s = store().await;
  s.add("messages", fields(json!({ "name": "old", "timestamp": "2024-01-01T00:00:00.000000Z" })))
    .await
    .unwrap();
  s.add("messages", fields(json!({ "name": "new", "timestamp": "2024-06-01T00:00:00.000000Z" })))
    .await
    .unwrap();
  s.add("messages", fields(json!({ "name": "mid", "timestamp": "2024-03-01T00:00:00.000000Z" })))
    .await
    .unwrap();

  let q = CollectionQuery::ordered("messages", "timestamp", Direction::Descending);
  let names: Vec<_> = s
    .list(&q)
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.fields["name"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(names, vec!["new", "mid", "old"]);
}

#[tokio::test]
async fn replace_keeps_insertion_position() {
  let s = store().await;
  let first = s.add("projects", fields(json!({ "title": "A" }))).await.unwrap();
  s.add("projects", fields(json!({ "title": "B" }))).await.unwrap();
  s.set("projects", &first.id, fields(json!({ "title": "A2" }))).await.unwrap();

  let all = s.list(&CollectionQuery::all("projects")).await.unwrap();
  assert_eq!(all[0].fields["title"], "A2");
  assert_eq!(all[1].fields["title"], "B");
}

#[tokio::test]
async fn delete_removes_only_the_target() {
  let s = store().await;
  let a = s.add("certificates", fields(json!({ "title": "A" }))).await.unwrap();
  s.add("certificates", fields(json!({ "title": "B" }))).await.unwrap();

  assert!(s.delete("certificates", &a.id).await.unwrap());
  assert!(!s.delete("certificates", &a.id).await.unwrap());

  let all = s.list(&CollectionQuery::all("certificates")).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].fields["title"], "B");
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn subscription_delivers_initial_snapshot() {
  let s = store().await;
  s.add("messages", fields(json!({ "name": "Alice" }))).await.unwrap();

  let mut sub = s.subscribe(CollectionQuery::all("messages")).await.unwrap();
  let first = sub.next().await.unwrap();
  assert_eq!(first.len(), 1);
}

#[tokio::test]
async fn subscription_sees_writes_and_deletes() {
  let s = store().await;
  let mut sub = s
    .subscribe(CollectionQuery::ordered("messages", "timestamp", Direction::Descending))
    .await
    .unwrap();
  assert!(sub.next().await.unwrap().is_empty());

  let doc = s
    .add("messages", fields(json!({ "name": "Alice", "timestamp": server_timestamp() })))
    .await
    .unwrap();
  let after_add = sub.next().await.unwrap();
  assert_eq!(after_add.len(), 1);
  assert_eq!(after_add[0].id, doc.id);

  s.delete("messages", &doc.id).await.unwrap();
  assert!(sub.next().await.unwrap().is_empty());
}

#[tokio::test]
async fn subscription_ignores_other_collections() {
  let s = store().await;
  let mut sub = s.subscribe(CollectionQuery::all("messages")).await.unwrap();
  sub.next().await.unwrap();

  s.add("skills", fields(json!({ "name": "Rust" }))).await.unwrap();
  s.add("messages", fields(json!({ "name": "Bob" }))).await.unwrap();

  // The next snapshot is triggered by the message, not the skill.
  let snap = sub.next().await.unwrap();
  assert_eq!(snap.len(), 1);
  assert_eq!(snap[0].fields["name"], "Bob");
}

#[tokio::test]
async fn dropped_subscriptions_are_pruned() {
  let s = store().await;
  let sub = s.subscribe(CollectionQuery::all("messages")).await.unwrap();
  drop(sub);

  s.add("messages", fields(json!({ "name": "Alice" }))).await.unwrap();
  assert!(s.subscribers.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn subscribing_during_a_write_still_sees_it() {
  for _ in 0..100 {
    let s = store().await;
    let writer = {
      let s = s.clone();
      tokio::spawn(async move {
        s.add("messages", fields(json!({ "name": "Alice" }))).await.unwrap();
      })
    };
    let mut sub = s.subscribe(CollectionQuery::all("messages")).await.unwrap();
    writer.await.unwrap();

    let latest = drain(&mut sub).await.pop().expect("at least the initial snapshot");
    assert_eq!(latest.len(), 1);
  }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_deliver_snapshots_in_order() {
  let s = store().await;
  let mut sub = s.subscribe(CollectionQuery::all("messages")).await.unwrap();

  let writers: Vec<_> = (0..20)
    .map(|i| {
      let s = s.clone();
      tokio::spawn(async move {
        s.add("messages", fields(json!({ "n": i }))).await.unwrap();
      })
    })
    .collect();
  for w in writers {
    w.await.unwrap();
  }

  let sizes: Vec<usize> = drain(&mut sub).await.iter().map(Vec::len).collect();
  assert!(sizes.windows(2).all(|w| w[0] <= w[1]), "snapshots went backwards: {sizes:?}");
  assert_eq!(sizes.last(), Some(&20));
}
