mod error;

pub use error::{Error, Result};

use {
    crate::storage::KvTransaction,
    error::ClosedSnafu,
    snafu::prelude::*,
    std::sync::{Mutex, MutexGuard},
};

/// A concurrency-safe envelope around one store transaction.
///
/// Every operation takes the same mutex before touching the underlying
/// handle, so concurrent callers are strictly serialized. The store handle
/// is not assumed to tolerate concurrent access.
///
/// The lifecycle is `Active` until a successful `commit` or `rollback`;
/// after that every operation fails with [`Error::Closed`] and performs no
/// store I/O. A commit rejected by the store (e.g. a write conflict) leaves
/// the transaction active; rolling back or retrying is the caller's call.
pub struct Transaction<T: KvTransaction> {
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    store: T,
    active: bool,
}

impl<T: KvTransaction> Transaction<T> {
    pub fn new(store: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                store,
                active: true,
            }),
        }
    }

    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let mut inner = self.lock();
        ensure!(inner.active, ClosedSnafu);

        inner.store.get(key).map_err(store_error)
    }

    pub fn set(&self, key: &[u8], value: Vec<u8>) -> Result<()> {
        let mut inner = self.lock();
        ensure!(inner.active, ClosedSnafu);

        inner.store.set(key, value).map_err(store_error)
    }

    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        ensure!(inner.active, ClosedSnafu);

        inner.store.delete(key).map_err(store_error)
    }

    pub fn commit(&self) -> Result<()> {
        let mut inner = self.lock();
        ensure!(inner.active, ClosedSnafu);

        inner.store.commit().map_err(store_error)?;
        inner.active = false;

        tracing::debug!("committed transaction");
        Ok(())
    }

    pub fn rollback(&self) -> Result<()> {
        let mut inner = self.lock();
        ensure!(inner.active, ClosedSnafu);

        inner.store.rollback().map_err(store_error)?;
        inner.active = false;

        tracing::debug!("rolled back transaction");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().expect("transaction mutex poisoned")
    }
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(source: E) -> Error {
    Error::Store {
        source: Box::new(source),
    }
}
