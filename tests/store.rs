use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

use acme_users::{Record, RecordStore, UserValue, schema};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn records(text: &str) -> Vec<Record> {
    acme_users::fetch::parse_collection(text).expect("valid collection")
}

#[test]
fn lookup_and_merge_scenario() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(records(
        r#"[{ "id": 1, "name": "Ann" }, { "id": 2, "email": "b@x.com" }]"#,
    ));

    assert_eq!(schema::derive_headers(store.records()), vec!["id", "name", "email"]);

    let second = store.lookup_by_id("2").expect("user 2");
    assert_eq!(second, &store.records()[1]);

    store.merge_update(&Record::from_json5(r#"{ "id": 2, "name": "Bee" }"#)?);

    let merged = store.lookup_by_id("2").expect("user 2 after merge");
    let expected = Record::from_json5(r#"{ "id": 2, "email": "b@x.com", "name": "Bee" }"#)?;
    assert_eq!(merged, &expected);

    // The other record is untouched.
    assert_eq!(
        store.lookup_by_id("1"),
        Some(&Record::from_json5(r#"{ "id": 1, "name": "Ann" }"#)?)
    );
    Ok(())
}

#[test]
fn merge_with_unknown_id_changes_nothing() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(records(r#"[{ "id": 1, "name": "Ann" }]"#));

    let notified = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&notified);
    store.subscribe(move |_| *counter.borrow_mut() += 1);

    let before = store.records().to_vec();
    store.merge_update(&Record::from_json5(r#"{ "id": 99, "name": "Ghost" }"#)?);

    assert_eq!(store.records(), before.as_slice());
    assert!(store.lookup_by_id("99").is_none());
    // Only the initial delivery on subscribe.
    assert_eq!(*notified.borrow(), 1);
    Ok(())
}

#[test]
fn subscribers_see_current_value_then_every_change() {
    let mut store = RecordStore::new();
    store.replace_all(records(r#"[{ "id": 1 }]"#));

    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = store.subscribe(move |users| sink.borrow_mut().push(users.len()));

    store.replace_all(records(r#"[{ "id": 1 }, { "id": 2 }]"#));
    store.replace_all(Vec::new());
    assert_eq!(*seen.borrow(), vec![1, 2, 0]);

    assert!(store.unsubscribe(sub));
    store.replace_all(records(r#"[{ "id": 3 }]"#));
    assert_eq!(*seen.borrow(), vec![1, 2, 0]);
}

#[test]
fn merge_notifies_with_new_snapshot() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(records(r#"[{ "id": "a", "n": 1 }]"#));
    let first = store.snapshot();

    let latest = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&latest);
    store.subscribe(move |users| *sink.borrow_mut() = Some(std::sync::Arc::clone(users)));

    store.merge_update(&Record::from_json5(r#"{ "id": "a", "n": 2 }"#)?);

    let latest = latest.borrow().clone().expect("notified");
    assert!(!std::sync::Arc::ptr_eq(&first, &latest));
    assert_eq!(latest[0].get("n").map(UserValue::to_plain_string).as_deref(), Some("2"));
    // Earlier snapshots are not mutated in place.
    assert_eq!(first[0].get("n").map(UserValue::to_plain_string).as_deref(), Some("1"));
    Ok(())
}

#[test]
fn edit_session_commits_only_on_save() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(records(r#"[{ "id": 1, "name": "Ann", "email": "a@x.com" }]"#));

    store.start_edit("1")?;
    store.update_field("name", "Anna")?;
    assert_eq!(
        store.lookup_by_id("1").and_then(|r| r.get("name")),
        Some(&UserValue::from("Ann"))
    );

    let committed = store.save_edit()?;
    assert_eq!(committed.get("name"), Some(&UserValue::from("Anna")));
    assert_eq!(
        store.lookup_by_id("1").and_then(|r| r.get("name")),
        Some(&UserValue::from("Anna"))
    );
    assert!(!store.is_editing());
    Ok(())
}

#[test]
fn cancel_restores_snapshot_fields_but_keeps_additions() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(records(r#"[{ "id": 2, "email": "b@x.com" }]"#));
    let before = store.records().to_vec();

    store.start_edit("2")?;
    store.update_field("email", "changed@x.com")?;
    // "name" is a table column from another record; typing into it adds the field.
    store.update_field("name", "Bee")?;

    let reverted = store.cancel_edit()?;
    assert_eq!(reverted.get("email"), Some(&UserValue::from("b@x.com")));
    assert_eq!(reverted.get("name"), Some(&UserValue::from("Bee")));
    assert_eq!(reverted.keys().collect::<Vec<_>>(), vec!["id", "email", "name"]);

    // The store never saw the session.
    assert_eq!(store.records(), before.as_slice());
    assert!(!store.is_editing());
    Ok(())
}

#[test]
fn save_after_collection_replaced_is_ignored() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(records(r#"[{ "id": 1, "name": "Ann" }]"#));

    store.start_edit("1")?;
    store.update_field("name", "Anna")?;
    store.replace_all(records(r#"[{ "id": 5, "name": "Eve" }]"#));

    store.save_edit()?;
    assert!(store.lookup_by_id("1").is_none());
    assert_eq!(
        store.lookup_by_id("5").and_then(|r| r.get("name")),
        Some(&UserValue::from("Eve"))
    );
    Ok(())
}

#[test]
fn edit_started_on_a_row_saves_into_that_row() -> Result<()> {
    let mut store = RecordStore::new();
    store.replace_all(records(r#"[{ "id": "1", "n": "a" }, { "id": 1, "n": "b" }]"#));

    let session = store.start_edit_at(1)?;
    assert_eq!(session.working().get("n"), Some(&UserValue::from("b")));

    store.update_field("n", "EDITED")?;
    store.save_edit()?;

    assert_eq!(store.records()[0].get("n"), Some(&UserValue::from("a")));
    assert_eq!(store.records()[1].get("n"), Some(&UserValue::from("EDITED")));
    Ok(())
}
