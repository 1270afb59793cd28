use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use acme_users::fetch::{self, FileSource, UserSource};
use acme_users::{FetchError, Record, RecordStore, schema};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

struct FailingSource;

impl UserSource for FailingSource {
    fn describe(&self) -> String {
        "failing".to_string()
    }

    fn fetch_users(&self) -> std::result::Result<Vec<Record>, FetchError> {
        Err(FetchError::Shape("object".to_string()))
    }
}

#[test]
fn file_source_loads_heterogeneous_records() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("users.json");

    let input = r#"[
  { "id": 1, "name": "Ann", "address": { "city": "Oslo" } },
  { "id": 2, "email": "b@x.com", "active": true },
  { "id": "x-3", "name": "Cy", "tags": ["a", "b"] }
]
"#;
    std::fs::write(&path, input.as_bytes())?;

    let mut store = RecordStore::new();
    fetch::load_users(&FileSource::new(&path), &mut store);

    assert_eq!(store.records().len(), 3);
    assert_eq!(
        schema::derive_headers(store.records()),
        vec!["id", "name", "address", "email", "active", "tags"]
    );
    assert!(store.lookup_by_id("x-3").is_some());
    Ok(())
}

#[test]
fn file_source_accepts_json5_fixtures() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("users.json5");
    std::fs::write(&path, "[\n  // seed data\n  { id: 1, name: 'Ann', },\n]\n")?;

    let users = FileSource::new(&path).fetch_users()?;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].get("name").and_then(|v| v.as_str()), Some("Ann"));
    Ok(())
}

#[test]
fn missing_file_is_a_file_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = FileSource::new(dir.path().join("absent.json")).fetch_users();
    assert!(matches!(result, Err(FetchError::File { .. })));
}

#[test]
fn failed_fetch_empties_store_and_notifies() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(fetch::parse_collection(r#"[{ "id": 1 }]"#)?);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    store.subscribe(move |users| sink.borrow_mut().push(users.len()));

    fetch::load_users(&FailingSource, &mut store);

    assert!(store.records().is_empty());
    assert_eq!(*seen.borrow(), vec![1, 0]);
    Ok(())
}

#[test]
fn background_fetch_delivers_result() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("users.json");
    std::fs::write(&path, r#"[{ "id": 1 }, { "id": 2 }]"#)?;

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    let pending = fetch::spawn_fetch(Arc::new(FileSource::new(&path)), move || {
        let _ = done_tx.send(());
    });

    let users = pending.wait()?;
    assert_eq!(users.len(), 2);
    done_rx.recv()?;
    Ok(())
}

#[test]
fn last_applied_fetch_wins() -> Result<()> {
    let mut store = RecordStore::new();
    fetch::apply_fetch_result(&mut store, Ok(fetch::parse_collection(r#"[{ "id": 1 }]"#)?));
    fetch::apply_fetch_result(
        &mut store,
        Ok(fetch::parse_collection(r#"[{ "id": 7 }, { "id": 8 }]"#)?),
    );

    assert_eq!(store.records().len(), 2);
    assert!(store.lookup_by_id("1").is_none());
    assert!(store.lookup_by_id("8").is_some());
    Ok(())
}
