//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, Utc};
use mnemo_core::{
  card::NewCard,
  event::{ReviewEvent, ReviewStats},
  progress::{CardStatus, Progress},
  scheduler::Scheduler,
  service::Srs,
  store::{CardCatalog, ProgressStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn seed_row(user_id: Uuid, card_id: Uuid) -> Progress {
  Scheduler::default().seed_progress(user_id, card_id, Utc::now())
}

// ─── Card catalog ────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_card_and_get_it_back() {
  let s = store().await;

  let card = s
    .add_card(NewCard {
      prompt: "犬".into(),
      answer: "dog".into(),
    })
    .await
    .unwrap();

  let fetched = s.get_card(card.card_id).await.unwrap().unwrap();
  assert_eq!(fetched.card_id, card.card_id);
  assert_eq!(fetched.prompt, "犬");
  assert_eq!(fetched.answer, "dog");
  assert_eq!(fetched.created_at, card.created_at);
}

#[tokio::test]
async fn get_card_missing_returns_none() {
  let s = store().await;
  assert!(s.get_card(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_card_ids_covers_the_catalog() {
  let s = store().await;
  let mut expected = Vec::new();
  for i in 0..3 {
    let card = s
      .add_card(NewCard {
        prompt: format!("prompt {i}"),
        answer: format!("answer {i}"),
      })
      .await
      .unwrap();
    expected.push(card.card_id);
  }

  assert_eq!(s.list_card_ids().await.unwrap(), expected);
}

// ─── Progress rows ───────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_if_absent_then_get_roundtrip() {
  let s = store().await;
  let (user, card) = (Uuid::new_v4(), Uuid::new_v4());
  let seed = seed_row(user, card);

  assert!(s.insert_progress_if_absent(seed.clone()).await.unwrap());

  let fetched = s.get_progress(user, card).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, user);
  assert_eq!(fetched.card_id, card);
  assert_eq!(fetched.ease_factor, seed.ease_factor);
  assert_eq!(fetched.interval_days, 0);
  assert_eq!(fetched.repetitions, 0);
  assert!(fetched.last_reviewed.is_none());
  assert_eq!(fetched.next_review, seed.next_review);
  assert_eq!(fetched.status, CardStatus::New);
  assert_eq!(fetched.version, 0);
}

#[tokio::test]
async fn insert_if_absent_is_idempotent() {
  let s = store().await;
  let (user, card) = (Uuid::new_v4(), Uuid::new_v4());

  assert!(s.insert_progress_if_absent(seed_row(user, card)).await.unwrap());
  assert!(!s.insert_progress_if_absent(seed_row(user, card)).await.unwrap());

  // The second call must not have touched the stored row.
  let fetched = s.get_progress(user, card).await.unwrap().unwrap();
  assert_eq!(fetched.total_reviews, 0);
  assert_eq!(fetched.version, 0);
}

#[tokio::test]
async fn get_progress_missing_returns_none() {
  let s = store().await;
  let row = s.get_progress(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
  assert!(row.is_none());
}

// ─── Version-checked writes ──────────────────────────────────────────────────

#[tokio::test]
async fn save_commits_and_bumps_version() {
  let s = store().await;
  let (user, card) = (Uuid::new_v4(), Uuid::new_v4());
  s.insert_progress_if_absent(seed_row(user, card)).await.unwrap();

  let scheduler = Scheduler::default();
  let now = Utc::now();
  let current = s.get_progress(user, card).await.unwrap().unwrap();
  let updated = scheduler.review(
    &current,
    mnemo_core::scheduler::Quality::new(5).unwrap(),
    now,
  );

  s.save_progress(updated.clone(), current.version).await.unwrap();

  let stored = s.get_progress(user, card).await.unwrap().unwrap();
  assert_eq!(stored.version, 1);
  assert_eq!(stored.total_reviews, 1);
  assert_eq!(stored.interval_days, 1);
  assert_eq!(stored.last_reviewed, Some(now));
  assert_eq!(stored.status, CardStatus::Learning);
}

#[tokio::test]
async fn save_with_stale_version_conflicts() {
  let s = store().await;
  let (user, card) = (Uuid::new_v4(), Uuid::new_v4());
  s.insert_progress_if_absent(seed_row(user, card)).await.unwrap();

  let current = s.get_progress(user, card).await.unwrap().unwrap();
  s.save_progress(current.clone(), current.version).await.unwrap();

  // Writing again against the version we already consumed must lose.
  let err = s.save_progress(current.clone(), current.version).await.unwrap_err();
  assert!(matches!(err, crate::Error::Conflict { .. }));

  // Only the first write landed.
  let stored = s.get_progress(user, card).await.unwrap().unwrap();
  assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn save_missing_row_reports_not_found() {
  let s = store().await;
  let row = seed_row(Uuid::new_v4(), Uuid::new_v4());
  let err = s.save_progress(row, 0).await.unwrap_err();
  assert!(matches!(err, crate::Error::ProgressNotFound { .. }));
}

// ─── Due query ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn query_due_filters_orders_and_limits() {
  let s = store().await;
  let user = Uuid::new_v4();
  let now = Utc::now();

  // Three due rows with staggered due times and eases, one future row,
  // one row for somebody else.
  let mut late = seed_row(user, Uuid::new_v4());
  late.next_review = now - Duration::days(3);
  late.ease_factor = 2.5;

  let mut tied_hard = seed_row(user, Uuid::new_v4());
  tied_hard.next_review = now - Duration::days(1);
  tied_hard.ease_factor = 1.3;

  let mut tied_easy = seed_row(user, Uuid::new_v4());
  tied_easy.next_review = now - Duration::days(1);
  tied_easy.ease_factor = 2.8;

  let mut future = seed_row(user, Uuid::new_v4());
  future.next_review = now + Duration::days(5);

  let other_user = seed_row(Uuid::new_v4(), Uuid::new_v4());

  for row in [&late, &tied_hard, &tied_easy, &future, &other_user] {
    s.insert_progress_if_absent((*row).clone()).await.unwrap();
  }

  let due = s.query_due(user, now, 10).await.unwrap();
  let ids: Vec<_> = due.iter().map(|p| p.card_id).collect();
  assert_eq!(ids, vec![late.card_id, tied_hard.card_id, tied_easy.card_id]);

  let limited = s.query_due(user, now, 2).await.unwrap();
  assert_eq!(limited.len(), 2);
  assert_eq!(limited[0].card_id, late.card_id);

  // Identical inputs, identical output.
  let again = s.query_due(user, now, 10).await.unwrap();
  let ids_again: Vec<_> = again.iter().map(|p| p.card_id).collect();
  assert_eq!(ids, ids_again);
}

#[tokio::test]
async fn query_due_empty_is_not_an_error() {
  let s = store().await;
  let due = s.query_due(Uuid::new_v4(), Utc::now(), 10).await.unwrap();
  assert!(due.is_empty());
}

// ─── Review events ───────────────────────────────────────────────────────────

#[tokio::test]
async fn events_append_and_list_oldest_first() {
  let s = store().await;
  let (user, card) = (Uuid::new_v4(), Uuid::new_v4());
  let base = Utc::now();

  for (i, quality) in [5u8, 2, 4].into_iter().enumerate() {
    s.append_event(ReviewEvent {
      event_id: Uuid::new_v4(),
      user_id: user,
      card_id: card,
      quality,
      time_to_answer_secs: Some(i as u32 + 1),
      recorded_at: base + Duration::minutes(i as i64),
    })
    .await
    .unwrap();
  }

  let events = s.list_events(user, card).await.unwrap();
  assert_eq!(events.len(), 3);
  let qualities: Vec<_> = events.iter().map(|e| e.quality).collect();
  assert_eq!(qualities, vec![5, 2, 4]);
  assert_eq!(events[0].time_to_answer_secs, Some(1));

  // Scoped to the pair.
  let other = s.list_events(user, Uuid::new_v4()).await.unwrap();
  assert!(other.is_empty());
}

// ─── Service over SQLite ─────────────────────────────────────────────────────

#[tokio::test]
async fn full_review_flow_over_sqlite() {
  let srs = Srs::new(Scheduler::default(), store().await);
  let user = Uuid::new_v4();
  let now = Utc::now();

  for i in 0..3 {
    srs
      .store()
      .add_card(NewCard {
        prompt: format!("prompt {i}"),
        answer: format!("answer {i}"),
      })
      .await
      .unwrap();
  }

  // Initializer seeds the whole catalog, once.
  assert_eq!(srs.initialize_from_catalog(user, now).await.unwrap(), 3);
  assert_eq!(srs.initialize_from_catalog(user, now).await.unwrap(), 0);

  let due = srs.due_cards(user, now, 10).await.unwrap();
  assert_eq!(due.len(), 3);

  // Review one card through the whole stack.
  let card = due[0].card_id;
  let mut when = now;
  for quality in [5, 5, 5] {
    let progress = srs.submit_review(user, card, quality, Some(2), when).await.unwrap();
    when = progress.next_review;
  }

  let progress = srs.progress(user, card).await.unwrap();
  assert_eq!(progress.repetitions, 3);
  assert_eq!(progress.interval_days, 16);
  assert_eq!(progress.status, CardStatus::Young);
  assert_eq!(progress.version, 3);

  // The reviewed card dropped out of the due list.
  let due_after = srs.due_cards(user, now, 10).await.unwrap();
  assert_eq!(due_after.len(), 2);

  // The event log independently re-derives the counters.
  let (events, stats) = srs.history(user, card).await.unwrap();
  assert_eq!(events.len(), 3);
  assert_eq!(
    stats,
    ReviewStats {
      total:    3,
      correct:  3,
      accuracy: 1.0,
      streak:   3,
    }
  );
}

#[tokio::test]
async fn review_of_uninitialized_pair_fails_over_sqlite() {
  let srs = Srs::new(Scheduler::default(), store().await);
  let err = srs
    .submit_review(Uuid::new_v4(), Uuid::new_v4(), 3, None, Utc::now())
    .await
    .unwrap_err();
  assert!(matches!(err, mnemo_core::Error::ProgressNotFound { .. }));
}
