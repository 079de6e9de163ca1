use kodegen_tools_session::{
    MemorySessions, Session, SessionError, SessionSnapshot, SessionStore, Sessions,
    SessionsConfig, StoreError, Value,
};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn new_session() -> (MemorySessions, Arc<dyn Session>) {
    let sessions = MemorySessions::new(SessionsConfig::default());
    let session = sessions.get("").expect("new session");
    (sessions, session)
}

#[derive(Default)]
struct RecordingStore {
    saved: Mutex<Vec<SessionSnapshot>>,
}

impl SessionStore for RecordingStore {
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        self.saved.lock().push(snapshot.clone());
        Ok(())
    }
}

struct FailingStore;

impl SessionStore for FailingStore {
    fn save(&self, _snapshot: &SessionSnapshot) -> Result<(), StoreError> {
        Err(StoreError::Backend("disk full".to_string()))
    }
}

#[tokio::test]
async fn test_set_get_identity() {
    let (_sessions, session) = new_session();

    let values = [
        Value::from("text"),
        Value::from(-17),
        Value::from(true),
        Value::from(json!({"cart": [1, 2, 3]})),
    ];
    for (i, value) in values.into_iter().enumerate() {
        let name = format!("k{}", i);
        let stored = session.set(&name, value.clone()).unwrap();
        assert_eq!(stored, value);
        assert_eq!(session.get(&name).unwrap(), Some(value));
    }

    assert_eq!(session.get("never-set").unwrap(), None);
}

#[tokio::test]
async fn test_typed_setters_echo() {
    let (_sessions, session) = new_session();

    assert_eq!(session.set_string("s", "v".to_string()).unwrap(), "v");
    assert_eq!(session.set_int("i", 9).unwrap(), 9);
    assert!(!session.set_bool("b", false).unwrap());

    assert_eq!(session.get("i").unwrap(), Some(Value::Int(9)));
    assert_eq!(session.get("b").unwrap(), Some(Value::Bool(false)));
}

#[tokio::test]
async fn test_get_int_coercion() {
    let (_sessions, session) = new_session();

    session.set_string("k", "42".to_string()).unwrap();
    assert_eq!(session.get_int("k"), Some(42));

    session.set_string("k", "abc".to_string()).unwrap();
    assert_eq!(session.get_int("k"), None);
    assert_eq!(session.get_int("k").unwrap_or_default(), 0);

    session.set_int("k", 7).unwrap();
    assert_eq!(session.get_int("k"), Some(7));

    assert_eq!(session.get_int("missing"), None);
}

#[tokio::test]
async fn test_get_bool_coercion() {
    let (_sessions, session) = new_session();

    session.set_string("k", "no".to_string()).unwrap();
    assert_eq!(session.get_bool("k"), Some(false));

    session.set_string("k", "Yes".to_string()).unwrap();
    assert_eq!(session.get_bool("k"), Some(true));

    session.set_int("k", 0).unwrap();
    assert_eq!(session.get_bool("k"), Some(false));

    session.set_bool("k", true).unwrap();
    assert_eq!(session.get_bool("k"), Some(true));

    session.set_string("k", "perhaps".to_string()).unwrap();
    assert_eq!(session.get_bool("k"), None);
}

#[tokio::test]
async fn test_get_string_renders_any_value() {
    let (_sessions, session) = new_session();

    session.set_int("n", 12).unwrap();
    session.set_bool("b", true).unwrap();
    session.set("o", Value::from(json!({"a": "b"}))).unwrap();

    assert_eq!(session.get_string("n").as_deref(), Some("12"));
    assert_eq!(session.get_string("b").as_deref(), Some("true"));
    assert_eq!(session.get_string("o").as_deref(), Some(r#"{"a":"b"}"#));
    assert_eq!(session.get_string("missing"), None);
}

#[tokio::test]
async fn test_closed_session_rejects_access() {
    let (_sessions, session) = new_session();
    session.set_string("k", "1".to_string()).unwrap();

    session.close();
    session.close();

    let err = session.set("k", Value::from(2)).unwrap_err();
    assert!(err.is_closed());
    assert_eq!(
        err.to_string(),
        format!("session[{}].set(k) after closing", session.id())
    );
    assert!(session.set_string("k", "x".to_string()).unwrap_err().is_closed());
    assert!(session.set_int("k", 1).unwrap_err().is_closed());
    assert!(session.set_bool("k", true).unwrap_err().is_closed());
    assert!(matches!(
        session.get("k"),
        Err(SessionError::Closed { op: "get", .. })
    ));

    assert_eq!(session.get_string("k"), None);
    assert_eq!(session.get_int("k"), None);
    assert_eq!(session.get_bool("k"), None);

    // Failed writes leave the attributes untouched
    assert_eq!(session.data().get("k"), Some(&Value::from("1")));
}

#[tokio::test]
async fn test_data_is_a_snapshot() {
    let (_sessions, session) = new_session();
    session.set_int("a", 1).unwrap();

    let mut data = session.data();
    data.insert("b".to_string(), Value::from(2));

    assert_eq!(data.len(), 2);
    assert_eq!(session.data().len(), 1);
    assert_eq!(session.get("b").unwrap(), None);
}

#[tokio::test]
async fn test_save_with_default_store() {
    let (_sessions, session) = new_session();
    session.set_int("a", 1).unwrap();
    assert!(session.save().is_ok());
}

#[tokio::test]
async fn test_save_hands_snapshot_to_store() {
    let store = Arc::new(RecordingStore::default());
    let sessions = MemorySessions::with_store(SessionsConfig::default(), store.clone());
    let session = sessions.get("").unwrap();
    session.set_string("user", "bob".to_string()).unwrap();

    session.save().unwrap();

    let saved = store.saved.lock();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, session.id());
    assert!(!saved[0].closed);
    assert_eq!(saved[0].started_at, session.started_at());
    assert_eq!(saved[0].attributes.get("user"), Some(&Value::from("bob")));
}

#[tokio::test]
async fn test_save_surfaces_store_errors() {
    let sessions = MemorySessions::with_store(SessionsConfig::default(), Arc::new(FailingStore));
    let session = sessions.get("").unwrap();

    assert_eq!(
        session.save(),
        Err(SessionError::Store("Backend error: disk full".to_string()))
    );
}

#[tokio::test]
async fn test_activity_fixed_by_default() {
    let (_sessions, session) = new_session();
    let created = session.last_activity_at();
    assert_eq!(created, session.started_at());

    tokio::time::sleep(Duration::from_millis(10)).await;
    session.set_int("a", 1).unwrap();

    assert_eq!(session.last_activity_at(), created);
}

#[tokio::test]
async fn test_activity_refresh_when_enabled() {
    let config = SessionsConfig {
        refresh_activity_on_access: true,
        ..SessionsConfig::default()
    };
    let sessions = MemorySessions::new(config);
    let session = sessions.get("").unwrap();
    let created = session.last_activity_at();

    tokio::time::sleep(Duration::from_millis(10)).await;
    session.set_int("a", 1).unwrap();

    assert!(session.last_activity_at() > created);
    assert_eq!(session.started_at(), created);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_on_one_session() {
    let (_sessions, session) = new_session();

    let mut handles = Vec::new();
    for writer in 0..8 {
        let session = session.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..100 {
                session.set_int(&format!("w{}-{}", writer, i), i).unwrap();
                session.set_int("shared", writer).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let data = session.data();
    assert_eq!(data.len(), 8 * 100 + 1);
    for writer in 0..8 {
        for i in 0..100 {
            assert_eq!(session.get_int(&format!("w{}-{}", writer, i)), Some(i));
        }
    }
    let shared = session.get_int("shared").unwrap();
    assert!((0..8).contains(&shared));
}
