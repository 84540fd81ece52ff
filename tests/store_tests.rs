mod test_utils;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use portfolio_projects::{
    constants::CATALOG_KEY,
    repositories::project::{LocalProjectRepo, ProjectRepository},
    seed::SEED_PROJECT_SLUG,
    storage::{FileStore, KeyValueStore, MemoryStore},
};
use test_utils::*;

#[test]
fn fresh_store_lists_only_the_seed() {
    let repo = LocalProjectRepo::new(MemoryStore::new());

    let projects = repo.list();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].slug, SEED_PROJECT_SLUG);
    assert_eq!(projects[0].content.en.title, "NovaNN");
}

#[test]
fn added_project_is_appended_once_and_found_by_slug() {
    let repo = LocalProjectRepo::new(MemoryStore::new());
    let project = sample_project("2", "test-project");

    repo.add(project.clone()).unwrap();
    let projects = repo.list();

    assert_eq!(projects.len(), 2);
    assert_eq!(projects.iter().filter(|p| p.id == "2").count(), 1);
    assert_eq!(projects.last(), Some(&project));
    assert_eq!(repo.get_by_slug("test-project"), Some(project));
}

#[test]
fn removing_added_project_restores_length() {
    let repo = LocalProjectRepo::new(MemoryStore::new());
    let before = repo.list().len();

    repo.add(sample_project("test-delete-id", "test-delete")).unwrap();
    assert!(repo.remove("test-delete-id").unwrap());

    assert_eq!(repo.list().len(), before);
    assert!(repo.get_by_slug("test-delete").is_none());
}

#[test]
fn unknown_slug_is_absent() {
    let repo = LocalProjectRepo::new(MemoryStore::new());
    assert!(repo.get_by_slug("non-existent").is_none());
}

#[test]
fn featured_lookup_follows_flags() {
    let repo = LocalProjectRepo::new(MemoryStore::new());
    assert_eq!(repo.get_featured().unwrap().slug, SEED_PROJECT_SLUG);

    let mut seed = repo.get_by_slug(SEED_PROJECT_SLUG).unwrap();
    seed.featured = false;
    assert!(repo.update(&seed.id.clone(), seed).unwrap());
    assert!(repo.get_featured().is_none());

    let mut starred = sample_project("3", "starred");
    starred.featured = true;
    repo.add(starred).unwrap();
    let featured = repo.get_featured().unwrap();
    assert!(featured.featured);
    assert_eq!(featured.slug, "starred");
}

#[test]
fn corrupt_catalog_falls_back_to_seed() {
    for garbage in [r#"{"not":"an array"}"#, "not json at all", "42", r#"[{"id":1}]"#] {
        let store = MemoryStore::new();
        store.set(CATALOG_KEY, garbage).unwrap();
        let repo = LocalProjectRepo::new(store.clone());

        let projects = repo.list();

        assert_eq!(projects.len(), 1, "input: {}", garbage);
        assert_eq!(projects[0].slug, SEED_PROJECT_SLUG);
        // The slot is left as found until the next mutation
        assert_eq!(store.get(CATALOG_KEY).unwrap().as_deref(), Some(garbage));
    }
}

#[test]
fn every_mutation_notifies_subscribers() {
    let repo = LocalProjectRepo::new(MemoryStore::new());
    let hits = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&hits);
    let subscription = repo.subscribe(Box::new(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    }));

    repo.add(sample_project("2", "two")).unwrap();
    repo.update("2", sample_project("2", "two-renamed")).unwrap();
    repo.remove("2").unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    subscription.unsubscribe();
    repo.add(sample_project("3", "three")).unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn last_writer_wins_between_views() {
    let store = MemoryStore::new();
    let first = LocalProjectRepo::new(store.clone());
    let second = LocalProjectRepo::new(store.new_view());

    let stale_snapshot = first.list();
    second.add(sample_project("2", "from-second")).unwrap();

    // A view that re-reads sees the other view's write
    assert_eq!(first.list().len(), stale_snapshot.len() + 1);

    first.add(sample_project("3", "from-first")).unwrap();
    let slugs: Vec<_> = second.list().into_iter().map(|p| p.slug).collect();
    assert_eq!(slugs, vec![SEED_PROJECT_SLUG, "from-second", "from-first"]);
}

#[test]
fn file_backed_catalog_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let repo = LocalProjectRepo::new(FileStore::open(dir.path()).unwrap());
        repo.add(sample_project("2", "persisted")).unwrap();
    }

    let reopened = LocalProjectRepo::new(FileStore::open(dir.path()).unwrap());
    let projects = reopened.list();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[1].slug, "persisted");
}
