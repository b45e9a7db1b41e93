use crate::errors::AppResult;
use crate::models::account::{AccountRecord, ContractAddresses, LookupField};
use crate::store::json_file::{read_array, write_atomic};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Persistence seam for the account collection: the whole list is loaded and
/// saved at once.
pub trait AccountBackend: Send + Sync {
    fn load(&self) -> AppResult<Vec<AccountRecord>>;
    fn save(&self, accounts: &[AccountRecord]) -> AppResult<()>;
}

/// Account collection kept as a single JSON array on disk.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl AccountBackend for JsonFileBackend {
    fn load(&self) -> AppResult<Vec<AccountRecord>> {
        Ok(read_array(&self.path)?.unwrap_or_default())
    }

    fn save(&self, accounts: &[AccountRecord]) -> AppResult<()> {
        write_atomic(&self.path, &accounts)
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    accounts: Mutex<Vec<AccountRecord>>,
}

impl AccountBackend for MemoryBackend {
    fn load(&self) -> AppResult<Vec<AccountRecord>> {
        Ok(self
            .accounts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, accounts: &[AccountRecord]) -> AppResult<()> {
        *self.accounts.lock().unwrap_or_else(|e| e.into_inner()) = accounts.to_vec();
        Ok(())
    }
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// Replaced the record at this position.
    Updated(usize),
    /// Appended at this position.
    Inserted(usize),
}

/// The account/meter collection.
pub struct AccountStore {
    backend: Box<dyn AccountBackend>,
    lock: Mutex<()>,
}

impl AccountStore {
    pub fn new<B: AccountBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Box::new(backend),
            lock: Mutex::new(()),
        }
    }

    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self::new(JsonFileBackend::new(path))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Insert `record`, or overwrite the first record it matches.
    ///
    /// A stored record matches when it has the same `hepek`, or the same
    /// `info` under a different `hepek`. Existing deployments rely on the
    /// second clause to move an installation to a new meter.
    pub fn upsert(&self, record: AccountRecord) -> AppResult<Upserted> {
        let _g = self.guard();
        let mut accounts = self.backend.load()?;

        let outcome = match accounts.iter().position(|a| a.matches_for_upsert(&record)) {
            Some(idx) => {
                accounts[idx] = record;
                Upserted::Updated(idx)
            }
            None => {
                accounts.push(record);
                Upserted::Inserted(accounts.len() - 1)
            }
        };

        self.backend.save(&accounts)?;
        Ok(outcome)
    }

    /// Apply the given contract addresses to every record in the collection.
    /// Returns how many records changed.
    pub fn update_contracts(&self, addrs: &ContractAddresses) -> AppResult<usize> {
        let _g = self.guard();
        let mut accounts = self.backend.load()?;

        let changed = accounts
            .iter_mut()
            .map(|a| a.apply_contracts(addrs))
            .filter(|c| *c)
            .count();

        self.backend.save(&accounts)?;
        Ok(changed)
    }

    /// First record whose `field` equals `value`.
    pub fn lookup(&self, field: LookupField, value: &str) -> AppResult<Option<AccountRecord>> {
        let _g = self.guard();
        Ok(self
            .backend
            .load()?
            .into_iter()
            .find(|a| a.field(field) == value))
    }

    pub fn list_all(&self) -> AppResult<Vec<AccountRecord>> {
        let _g = self.guard();
        self.backend.load()
    }
}
