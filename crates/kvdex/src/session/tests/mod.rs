
use super::Session;
use crate::{
    error::{ErrorKind, IndexErrorKind, RecordErrorKind},
    record::Record,
    schema::Schema,
};
use kvdex_core::{
    config::IndexConfig,
    model::identity::RecordId,
    obs::{EventCounters, MetricsSink},
    store::{KvStore, MemoryStore},
    value::Value,
};
use proptest::prelude::*;
use std::sync::Arc;

fn schema() -> Schema {
    Schema::builder()
        .model("User", |m| {
            m.index(&["first_name"])
                .index(&["last_name"])
                .index(&["first_name", "last_name"])
        })
        .model("OmniUser", |m| {
            m.index_ci(&["email"])
                .index(&["uid"])
                .index_ci(&["email", "uid"])
        })
        .model("Street", |m| m.index_ci(&["name"]))
        .build()
        .unwrap()
}

fn session() -> Session<MemoryStore> {
    Session::new(schema(), MemoryStore::new(), IndexConfig::default()).unwrap()
}

fn user(first: &str, last: &str) -> Record {
    Record::new()
        .with("first_name", first)
        .with("last_name", last)
}

fn v(values: &[&str]) -> Vec<Value> {
    values.iter().map(|s| Value::from(*s)).collect()
}

fn find_id<S: KvStore>(
    s: &Session<S>,
    ty: &str,
    attrs: &[&str],
    values: &[Value],
) -> Option<RecordId> {
    s.find_by(ty, attrs, values).unwrap().map(|(id, _)| id)
}

#[test]
fn save_moves_indices_with_the_model() {
    let s = session();
    let id = s.create("User", user("Robert", "Pirsig")).unwrap();

    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Robert"])), Some(id.clone()));
    assert_eq!(
        find_id(&s, "User", &["first_name", "last_name"], &v(&["Robert", "Pirsig"])),
        Some(id.clone())
    );

    s.save("User", &id, user("Chris", "Pirsig")).unwrap();

    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Robert"])), None);
    assert_eq!(
        find_id(&s, "User", &["first_name", "last_name"], &v(&["Robert", "Pirsig"])),
        None
    );
    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Chris"])), Some(id.clone()));
    assert_eq!(find_id(&s, "User", &["last_name"], &v(&["Pirsig"])), Some(id.clone()));
    assert_eq!(
        find_id(&s, "User", &["first_name", "last_name"], &v(&["Chris", "Pirsig"])),
        Some(id)
    );
}

#[test]
fn update_attributes_moves_indices() {
    let s = session();
    let id = s.create("User", user("Robert", "Pirsig")).unwrap();

    let updated = s
        .update_attributes("User", &id, user("Christofer", "Robin"))
        .unwrap();
    assert_eq!(updated, user("Christofer", "Robin"));

    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Robert"])), None);
    assert_eq!(find_id(&s, "User", &["last_name"], &v(&["Pirsig"])), None);
    assert_eq!(
        find_id(&s, "User", &["first_name", "last_name"], &v(&["Robert", "Pirsig"])),
        None
    );
    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Christofer"])), Some(id.clone()));
    assert_eq!(find_id(&s, "User", &["last_name"], &v(&["Robin"])), Some(id.clone()));
    assert_eq!(
        find_id(&s, "User", &["first_name", "last_name"], &v(&["Christofer", "Robin"])),
        Some(id)
    );
}

#[test]
fn update_attributes_keeps_unchanged_fields() {
    let s = session();
    let id = s.create("User", user("Robert", "Pirsig")).unwrap();

    let updated = s
        .update_attributes("User", &id, Record::new().with("first_name", "Chris"))
        .unwrap();

    assert_eq!(updated, user("Chris", "Pirsig"));
    assert_eq!(s.get("User", &id).unwrap(), Some(updated));
}

#[test]
fn case_insensitive_indices() {
    let s = session();
    let omni = Record::new()
        .with("email", "GERMAN@Ya.ru")
        .with("uid", 2_718_281_828_u64);
    s.create("OmniUser", omni).unwrap();

    assert_eq!(s.count("OmniUser").unwrap(), 1);
    assert!(s.find_by("OmniUser", &["email"], &v(&["german@ya.ru"])).unwrap().is_some());
    assert_eq!(
        s.find_all_by("OmniUser", &["email"], &v(&["german@ya.ru"]))
            .unwrap()
            .len(),
        1
    );

    let uid = Value::from(2_718_281_828_u64);
    let email_uid = |email: &str, uid: &Value| {
        s.find_all_by("OmniUser", &["email", "uid"], &[Value::from(email), uid.clone()])
            .unwrap()
            .len()
    };
    assert_eq!(email_uid("german@ya.ru", &uid), 1);
    assert!(s.find_by("OmniUser", &["email"], &v(&["geRman@yA.rU"])).unwrap().is_some());
    assert_eq!(email_uid("GerMan@Ya.ru", &uid), 1);
    assert_eq!(email_uid("german@ya.ru", &Value::from(2_718_281_829_u64)), 0);
}

#[test]
fn case_insensitive_greek_lookup_ignores_sigma_form() {
    let s = session();
    let id = s
        .create("Street", Record::new().with("name", "ΟΔΟΣ"))
        .unwrap();

    assert_eq!(find_id(&s, "Street", &["name"], &v(&["οδος"])), Some(id.clone()));
    assert_eq!(find_id(&s, "Street", &["name"], &v(&["οδοσ"])), Some(id.clone()));
    assert_eq!(find_id(&s, "Street", &["name"], &v(&["Οδος"])), Some(id));
}

#[test]
fn delete_removes_record_and_entries() {
    let s = session();
    let id = s.create("User", user("Robert", "Pirsig")).unwrap();
    let other = s.create("User", user("Robert", "Smith")).unwrap();

    s.delete("User", &id).unwrap();

    assert_eq!(s.get("User", &id).unwrap(), None);
    assert_eq!(s.count("User").unwrap(), 1);
    assert_eq!(find_id(&s, "User", &["last_name"], &v(&["Pirsig"])), None);
    assert_eq!(
        find_id(&s, "User", &["first_name", "last_name"], &v(&["Robert", "Pirsig"])),
        None
    );
    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Robert"])), Some(other));
}

#[test]
fn deleting_missing_record_is_not_found() {
    let s = session();
    let err = s.delete("User", &RecordId::generate()).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.kind, ErrorKind::Record(RecordErrorKind::NotFound));

    let err = s
        .update_attributes("User", &RecordId::generate(), Record::new())
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn find_all_by_returns_every_match() {
    let s = session();
    let a = s.create("User", user("Robert", "Pirsig")).unwrap();
    let b = s.create("User", user("Robert", "Smith")).unwrap();
    s.create("User", user("Chris", "Pirsig")).unwrap();

    let mut ids: Vec<RecordId> = s
        .find_all_by("User", &["first_name"], &v(&["Robert"]))
        .unwrap()
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    ids.sort();
    let mut expected = vec![a, b];
    expected.sort();

    assert_eq!(ids, expected);
    assert!(s.find_all_by("User", &["first_name"], &v(&["Nobody"])).unwrap().is_empty());
}

#[test]
fn undeclared_lookup_is_an_error() {
    let s = session();
    let err = s
        .find_by("User", &["last_name", "first_name"], &v(&["Pirsig", "Robert"]))
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Index(IndexErrorKind::Unknown));
    assert!(!err.is_retryable());
}

#[test]
fn null_attributes_are_not_indexed() {
    let s = session();
    let id = s
        .create("User", Record::new().with("first_name", "Robert").with("last_name", Value::Null))
        .unwrap();

    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Robert"])), Some(id));
    assert_eq!(find_id(&s, "User", &["last_name"], &[Value::Null]), None);
    assert_eq!(
        s.store()
            .keys_with_prefix("kvdex:User:idx:")
            .len(),
        1
    );
}

#[test]
fn reindex_restores_lost_entries() {
    let s = session();
    let id = s.create("User", user("Robert", "Pirsig")).unwrap();
    let key = "kvdex:User:idx:cs:first_name=6.Robert";
    s.store().remove_member(key, id.as_str()).unwrap();
    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Robert"])), None);

    let report = s.reindex("User").unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(report.index_writes, 3);
    assert_eq!(find_id(&s, "User", &["first_name"], &v(&["Robert"])), Some(id));
}

#[test]
fn reindex_prunes_identifiers_without_records() {
    let s = session();
    let id = s.create("User", user("Robert", "Pirsig")).unwrap();
    let stray = RecordId::generate();
    s.store().add_member("kvdex:User:ids", stray.as_str()).unwrap();
    assert_eq!(s.count("User").unwrap(), 2);

    let report = s.reindex("User").unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(report.pruned, 1);
    assert_eq!(report.index_writes, 0);
    assert_eq!(s.ids("User").unwrap(), vec![id]);
}

#[test]
fn records_round_trip_through_the_store() {
    let s = session();
    let record = user("Robert", "Pirsig").with("age", 42_i64).with("active", true);
    let id = s.create("User", record.clone()).unwrap();

    assert_eq!(s.get("User", &id).unwrap(), Some(record));
    assert_eq!(s.ids("User").unwrap(), vec![id]);
}

#[test]
fn corrupt_record_body_is_reported() {
    let s = session();
    let id = s.create("User", user("Robert", "Pirsig")).unwrap();
    s.store()
        .set(&format!("kvdex:User:rec:{id}"), "not json")
        .unwrap();

    let err = s.get("User", &id).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Store(_)));
}

#[test]
fn metrics_sink_sees_session_traffic() {
    let counters = Arc::new(EventCounters::new());
    let s = session().metrics_sink(counters.clone() as Arc<dyn MetricsSink>);

    let id = s.create("User", user("Robert", "Pirsig")).unwrap();
    s.find_by("User", &["first_name"], &v(&["Robert"])).unwrap();
    s.delete("User", &id).unwrap();

    let report = counters.report();
    assert_eq!(report.types["User"].apply_calls, 2);
    assert_eq!(report.types["User"].index_inserts, 3);
    assert_eq!(report.types["User"].index_removes, 3);
    assert_eq!(report.types["User"].resolve_hits, 1);
}

proptest! {
    #[test]
    fn last_saved_value_wins(names in prop::collection::vec("[a-z]{1,6}", 1..6)) {
        let s = session();
        let id = s.create("User", user(&names[0], "Pirsig")).unwrap();
        for name in &names[1..] {
            s.save("User", &id, user(name, "Pirsig")).unwrap();
        }

        let last = names.last().unwrap();
        prop_assert_eq!(find_id(&s, "User", &["first_name"], &v(&[last.as_str()])), Some(id.clone()));
        for name in names.iter().filter(|name| *name != last) {
            prop_assert_eq!(find_id(&s, "User", &["first_name"], &v(&[name.as_str()])), None);
        }
    }
}
