mod test_utils;

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use portfolio_projects::{
    auth::{digest::ReferenceDigest, session::SessionGate},
    constants::{ADMIN_FLAG_KEY, ADMIN_TIMESTAMP_KEY, DEFAULT_SESSION_TTL},
    settings::AppConfig,
    storage::{KeyValueStore, MemoryStore},
};
use test_utils::*;

fn gate(store: &MemoryStore, clock: &ManualClock) -> SessionGate<MemoryStore> {
    SessionGate::new(
        store.clone(),
        Some(ReferenceDigest::of_secret(ADMIN_SECRET)),
        DEFAULT_SESSION_TTL,
    )
    .with_clock(Arc::new(clock.clone()))
}

#[tokio::test]
async fn short_secret_fails_without_touching_slots() {
    let store = MemoryStore::new();
    let gate = gate(&store, &ManualClock::new(Utc::now()));

    assert!(!gate.login("abc").await);
    assert!(!gate.login("").await);

    assert!(store.get(ADMIN_FLAG_KEY).unwrap().is_none());
    assert!(store.get(ADMIN_TIMESTAMP_KEY).unwrap().is_none());
}

#[tokio::test]
async fn successful_login_is_restored_by_next_process() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(Utc::now());

    let first = gate(&store, &clock);
    assert!(first.login(ADMIN_SECRET).await);
    assert!(first.is_admin());

    let next = gate(&store.new_view(), &clock);
    assert!(next.restore());
    assert!(next.is_admin());
}

#[test]
fn restore_discards_day_old_session() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let stale = now - TimeDelta::hours(25);
    store.set(ADMIN_FLAG_KEY, "true").unwrap();
    store.set(ADMIN_TIMESTAMP_KEY, &stale.timestamp_millis().to_string()).unwrap();

    let gate = gate(&store, &ManualClock::new(now));

    assert!(!gate.restore());
    assert!(!gate.is_admin());
    assert!(store.get(ADMIN_FLAG_KEY).unwrap().is_none());
    assert!(store.get(ADMIN_TIMESTAMP_KEY).unwrap().is_none());
}

#[tokio::test]
async fn session_expires_when_next_checked() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(Utc::now());
    let gate = gate(&store, &clock);
    assert!(gate.login(ADMIN_SECRET).await);

    clock.advance(TimeDelta::hours(23));
    assert!(gate.is_admin());

    clock.advance(TimeDelta::hours(2));
    assert!(gate.require_admin().is_err());
    assert!(store.get(ADMIN_FLAG_KEY).unwrap().is_none());
}

#[tokio::test]
async fn expiring_view_leaves_newer_login_in_place() {
    let store = MemoryStore::new();
    let clock = ManualClock::new(Utc::now());

    let first = gate(&store, &clock);
    assert!(first.login(ADMIN_SECRET).await);

    clock.advance(TimeDelta::hours(23));
    let second = gate(&store.new_view(), &clock);
    assert!(second.login(ADMIN_SECRET).await);

    clock.advance(TimeDelta::hours(2));
    assert!(!first.is_admin());
    assert!(second.is_admin());

    let restarted = gate(&store.new_view(), &clock);
    assert!(restarted.restore());
}

#[tokio::test]
async fn misconfigured_digest_disables_admin() {
    for hash in ["", "not-hex", "abcd"] {
        let config = AppConfig {
            admin_password_hash: hash.to_string(),
            ..AppConfig::default()
        };
        let gate = SessionGate::from_config(MemoryStore::new(), &config);

        assert!(!gate.login(ADMIN_SECRET).await, "hash: {:?}", hash);
        assert!(!gate.is_admin());
    }
}

#[tokio::test]
async fn logout_clears_everything() {
    let store = MemoryStore::new();
    let gate = gate(&store, &ManualClock::new(Utc::now()));
    assert!(gate.login(ADMIN_SECRET).await);

    gate.logout();

    assert!(!gate.is_admin());
    assert!(!gate.restore());
    assert!(store.get(ADMIN_FLAG_KEY).unwrap().is_none());
}
