use {
    crate::error::{ConflictSnafu, Error, Result},
    def::storage::{KvClient, KvTransaction},
    snafu::prelude::*,
    std::{
        collections::{BTreeMap, HashMap},
        sync::{Arc, Mutex, MutexGuard},
    },
};

/// Committed state shared by every transaction of one client.
///
/// `versions` keeps an entry per key ever written, including deleted keys,
/// so a reader that observed a tombstone still conflicts with a concurrent
/// re-insert. Keys never written read as version 0.
#[derive(Default)]
struct Shared {
    rows: HashMap<Vec<u8>, Vec<u8>>,
    versions: HashMap<Vec<u8>, u64>,
    last_commit: u64,
}

impl Shared {
    fn version_of(&self, key: &[u8]) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }
}

/// Connection handle; cheap to clone, all clones share one committed state.
#[derive(Clone, Default)]
pub struct MemClient {
    shared: Arc<Mutex<Shared>>,
}

impl MemClient {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvClient for MemClient {
    type Transaction = MemTransaction;
    type Error = Error;

    fn begin(&self) -> Result<MemTransaction> {
        Ok(MemTransaction {
            shared: self.shared.clone(),
            reads: HashMap::new(),
            writes: BTreeMap::new(),
        })
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

pub struct MemTransaction {
    shared: Arc<Mutex<Shared>>,
    /// Key -> version observed at first read. Validated on commit.
    reads: HashMap<Vec<u8>, u64>,
    /// Buffered mutations; `None` is a delete.
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl MemTransaction {
    fn shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().expect("store mutex poisoned")
    }
}

impl KvTransaction for MemTransaction {
    type Error = Error;

    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        // Own writes shadow committed state.
        if let Some(buffered) = self.writes.get(key) {
            return Ok(buffered.clone());
        }

        let shared = self.shared();
        let value = shared.rows.get(key).cloned();
        let version = shared.version_of(key);
        drop(shared);

        self.reads.entry(key.to_vec()).or_insert(version);
        Ok(value)
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.writes.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let shared = Arc::clone(&self.shared);
        let mut shared = shared.lock().expect("store mutex poisoned");

        for (key, observed) in &self.reads {
            ensure!(
                shared.version_of(key) == *observed,
                ConflictSnafu { key: key.clone() }
            );
        }

        shared.last_commit += 1;
        let commit_version = shared.last_commit;

        for (key, value) in std::mem::take(&mut self.writes) {
            match value {
                Some(value) => {
                    shared.rows.insert(key.clone(), value);
                }
                None => {
                    shared.rows.remove(&key);
                }
            }
            shared.versions.insert(key, commit_version);
        }

        self.reads.clear();
        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.reads.clear();
        self.writes.clear();
        Ok(())
    }
}
