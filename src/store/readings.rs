use crate::errors::AppResult;
use crate::models::account::AccountRecord;
use crate::store::json_file::{read_array, write_atomic};
use crate::utils::path::ensure_file_component;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Default capacity: one reading per minute for 24 hours.
pub const DEFAULT_CAPACITY: usize = 1440;

/// Persistence seam for the per-account readings logs.
pub trait ReadingsBackend: Send + Sync {
    /// `None` when no log exists yet for `key`.
    fn load(&self, key: &str) -> AppResult<Option<Vec<Value>>>;
    fn save(&self, key: &str, entries: &[Value]) -> AppResult<()>;
}

/// One `{key}.json` array per account inside `dir`.
pub struct JsonDirBackend {
    dir: PathBuf,
}

impl JsonDirBackend {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    fn file_for(&self, key: &str) -> AppResult<PathBuf> {
        ensure_file_component(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl ReadingsBackend for JsonDirBackend {
    fn load(&self, key: &str) -> AppResult<Option<Vec<Value>>> {
        read_array(&self.file_for(key)?)
    }

    fn save(&self, key: &str, entries: &[Value]) -> AppResult<()> {
        write_atomic(&self.file_for(key)?, &entries)
    }
}

#[derive(Default)]
pub struct MemoryReadings {
    logs: Mutex<HashMap<String, Vec<Value>>>,
}

impl ReadingsBackend for MemoryReadings {
    fn load(&self, key: &str) -> AppResult<Option<Vec<Value>>> {
        ensure_file_component(key)?;
        Ok(self
            .logs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn save(&self, key: &str, entries: &[Value]) -> AppResult<()> {
        ensure_file_component(key)?;
        self.logs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), entries.to_vec());
        Ok(())
    }
}

fn reading_of(account: &AccountRecord) -> Option<&Value> {
    account.meter.as_ref().filter(|m| !m.is_null())
}

/// Bounded FIFO of meter readings, one log per account.
pub struct ReadingsLog {
    backend: Box<dyn ReadingsBackend>,
    capacity: usize,
    lock: Mutex<()>,
}

impl ReadingsLog {
    pub fn new<B: ReadingsBackend + 'static>(backend: B, capacity: usize) -> Self {
        Self {
            backend: Box::new(backend),
            capacity: capacity.max(1),
            lock: Mutex::new(()),
        }
    }

    pub fn open<P: Into<PathBuf>>(dir: P, capacity: usize) -> Self {
        Self::new(JsonDirBackend::new(dir), capacity)
    }

    pub fn in_memory(capacity: usize) -> Self {
        Self::new(MemoryReadings::default(), capacity)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append `reading` to the log of `key`, evicting the oldest entries so the
    /// log never exceeds its capacity. Returns the stored count.
    pub fn append(&self, key: &str, reading: Value) -> AppResult<usize> {
        let _g = self.guard();
        let mut entries = self.backend.load(key)?.unwrap_or_default();

        if entries.len() >= self.capacity {
            let excess = entries.len() + 1 - self.capacity;
            entries.drain(..excess);
        }
        entries.push(reading);

        self.backend.save(key, &entries)?;
        Ok(entries.len())
    }

    /// Reject an account update whose reading could not be stored, before
    /// anything else is written.
    pub fn check(&self, account: &AccountRecord) -> AppResult<()> {
        if reading_of(account).is_some() {
            ensure_file_component(&account.readings_key())?;
        }
        Ok(())
    }

    /// Append the `meter` reading carried by an account update, if any.
    /// Returns `None` (and touches nothing) when the payload has no reading.
    pub fn record(&self, account: &AccountRecord) -> AppResult<Option<usize>> {
        match reading_of(account) {
            Some(reading) => {
                let n = self.append(&account.readings_key(), reading.clone())?;
                Ok(Some(n))
            }
            None => Ok(None),
        }
    }

    /// Stored readings of `key`, oldest first.
    pub fn entries(&self, key: &str) -> AppResult<Vec<Value>> {
        let _g = self.guard();
        Ok(self.backend.load(key)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_log_evicts_exactly_the_oldest() {
        let log = ReadingsLog::in_memory(3);
        for i in 0..3 {
            log.append("i_h", json!(i)).unwrap();
        }

        assert_eq!(log.append("i_h", json!(3)).unwrap(), 3);
        assert_eq!(log.entries("i_h").unwrap(), vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn oversized_log_is_trimmed_back_to_capacity() {
        let backend = MemoryReadings::default();
        backend
            .save("i_h", &(0..5).map(|i| json!(i)).collect::<Vec<_>>())
            .unwrap();
        let log = ReadingsLog::new(backend, 3);

        assert_eq!(log.append("i_h", json!(5)).unwrap(), 3);
        assert_eq!(log.entries("i_h").unwrap(), vec![json!(3), json!(4), json!(5)]);
    }

    #[test]
    fn payload_without_meter_is_ignored() {
        let log = ReadingsLog::in_memory(DEFAULT_CAPACITY);
        let acc: AccountRecord =
            serde_json::from_value(json!({"user": "u", "info": "i", "hepek": "h"})).unwrap();

        assert_eq!(log.record(&acc).unwrap(), None);
        assert!(log.entries("i_h").unwrap().is_empty());
    }

    #[test]
    fn check_only_looks_at_keys_of_updates_with_a_reading() {
        let log = ReadingsLog::in_memory(DEFAULT_CAPACITY);
        let bad = |meter: serde_json::Value| -> AccountRecord {
            serde_json::from_value(json!({"user": "u", "info": "site/1", "hepek": "h", "meter": meter}))
                .unwrap()
        };

        assert!(log.check(&bad(json!({"kwh": 1}))).is_err());
        assert!(log.check(&bad(serde_json::Value::Null)).is_ok());
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let log = ReadingsLog::in_memory(DEFAULT_CAPACITY);
        assert!(log.append("../x", json!(1)).is_err());
    }
}
