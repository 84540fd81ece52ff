mod test_utils;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use portfolio_projects::{
    constants::{ADMIN_FLAG_KEY, LANGUAGE_KEY},
    entities::language::Language,
    storage::KeyValueStore,
};
use test_utils::*;

#[tokio::test]
async fn login_add_logout_keeps_data() {
    let app = TestApp::spawn();
    let handler = &app.state.project_handler;

    assert!(app.state.session.login(ADMIN_SECRET).await);
    handler.add_project(sample_project("2", "new-project")).unwrap();
    assert_eq!(handler.list_projects().len(), 2);

    app.state.session.logout();

    assert!(!app.state.session.is_admin());
    assert!(app.store.get(ADMIN_FLAG_KEY).unwrap().is_none());
    assert_eq!(handler.list_projects().len(), 2);
}

#[tokio::test]
async fn second_process_restores_session_and_sees_catalog() {
    let first = TestApp::spawn();
    assert!(first.state.session.login(ADMIN_SECRET).await);
    first.state.project_handler.add_project(sample_project("2", "shared")).unwrap();

    let second = TestApp::spawn_on(first.store.new_view());

    assert!(second.state.session.is_admin());
    assert!(second.state.project_handler.get_project("shared").is_some());
}

#[tokio::test]
async fn other_view_is_told_to_re_read() {
    let first = TestApp::spawn();
    let second = TestApp::spawn_on(first.store.new_view());

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let _subscription = second.state.project_handler.subscribe(move || {
        let _ = tx.send(());
    });
    let relay = second.state.project_handler.project_repo.spawn_storage_relay()
        .expect("memory storage is observable");

    assert!(first.state.session.login(ADMIN_SECRET).await);
    first.state.project_handler.add_project(sample_project("2", "broadcast")).unwrap();

    tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
        .await
        .expect("change signal delivered")
        .expect("channel open");
    assert!(second.state.project_handler.get_project("broadcast").is_some());

    relay.abort();
}

#[tokio::test]
async fn own_mutations_notify_local_views() {
    let app = TestApp::spawn();
    assert!(app.state.session.login(ADMIN_SECRET).await);

    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    let _subscription = app.state.project_handler.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    app.state.project_handler.add_project(sample_project("2", "two")).unwrap();
    app.state.project_handler.delete_project("2").unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn language_preference_defaults_to_spanish() {
    let app = TestApp::spawn();
    assert_eq!(app.state.language.get(), Language::Es);

    app.state.language.set(Language::En).unwrap();
    assert_eq!(app.store.get(LANGUAGE_KEY).unwrap().as_deref(), Some("en"));
}
