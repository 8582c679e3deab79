//! Request-scoped log accumulator.
//!
//! The generator attaches a shared [`RequestLog`] to every request it builds
//! (as an `Arc<RequestLog>` extension). Anything holding the request, or a
//! clone of the `Arc`, can add entries concurrently; the logging middleware
//! emits them once the response arrives.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::info;

/// Read access to accumulated log entries.
pub trait ExtendedLog {
    /// Copy of every entry.
    fn get_all(&self) -> HashMap<String, Value>;
}

/// Key/value log entries collected while a request is in flight.
#[derive(Debug, Default)]
pub struct RequestLog {
    entries: Mutex<HashMap<String, Value>>,
}

impl RequestLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty log ready to be shared.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Record one entry, replacing any previous value for `key`.
    pub fn log(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.lock().insert(key.into(), value.into());
    }

    /// Record alternating keys and values.
    ///
    /// Keys that are JSON strings are used as is, other keys use their JSON
    /// rendering. A trailing key without a value maps to `null`.
    pub fn log_pairs(&self, values: impl IntoIterator<Item = Value>) {
        let mut values = values.into_iter();
        let mut entries = self.lock();
        while let Some(key) = values.next() {
            let key = match key {
                Value::String(key) => key,
                other => other.to_string(),
            };
            entries.insert(key, values.next().unwrap_or(Value::Null));
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing was logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Forward every entry to `tracing`, sorted by key.
    pub fn emit(&self) {
        let mut entries: Vec<_> = self.get_all().into_iter().collect();
        entries.sort_by(|(left, _), (right, _)| left.cmp(right));
        for (key, value) in entries {
            info!(target: "wirecall::request_log", %key, %value, "request log");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExtendedLog for RequestLog {
    fn get_all(&self) -> HashMap<String, Value> {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use assert2::check;
    use serde_json::json;

    use super::*;

    #[test]
    fn log_and_get_all() {
        let log = RequestLog::new();
        check!(log.is_empty());

        log.log("user", "alice");
        log.log("attempt", 2);
        log.log("attempt", 3);

        let all = log.get_all();
        check!(all.len() == 2);
        check!(all["user"] == json!("alice"));
        check!(all["attempt"] == json!(3));
    }

    #[test]
    fn get_all_is_a_copy() {
        let log = RequestLog::new();
        log.log("a", 1);

        let mut copy = log.get_all();
        copy.insert("b".to_string(), json!(2));

        check!(log.len() == 1);
    }

    #[test]
    fn pairs_with_odd_trailing_key() {
        let log = RequestLog::new();
        log.log_pairs([json!("a"), json!(1), json!(7), json!(true), json!("dangling")]);

        let all = log.get_all();
        check!(all["a"] == json!(1));
        check!(all["7"] == json!(true));
        check!(all["dangling"] == Value::Null);
    }

    #[test]
    fn concurrent_writers() {
        let log = RequestLog::shared();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    for j in 0..25 {
                        log.log(format!("{i}-{j}"), j);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer thread");
        }

        check!(log.len() == 200);
    }

    #[test]
    fn emit_does_not_drain() {
        let log = RequestLog::new();
        log.log("k", "v");
        log.emit();
        check!(log.len() == 1);
    }
}
