//! The database catalog: a registry of tables plus a transaction factory.
//!
//! A [`Database`] owns a key-value client and an in-memory map of table
//! definitions. It is plain owned state; callers construct one and pass it
//! around explicitly. Tables are immutable once created and shared as
//! `Arc<Table>` across transactions.

mod error;

pub use error::{Error, Result};

use {
    access::Table,
    def::{
        storage::KvClient,
        ColumnDef, Transaction,
    },
    error::{TableAlreadyExistsSnafu, TableDefinitionSnafu, TableNotExistsSnafu},
    snafu::prelude::*,
    std::{
        collections::HashMap,
        sync::{Arc, RwLock},
    },
};

pub struct Database<C: KvClient> {
    client: C,
    // Coarse-grained: one lock over the whole registry. Fine for a small,
    // mostly-static set of tables.
    tables: RwLock<HashMap<String, Arc<Table>>>,
}

impl<C: KvClient> Database<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a new table. The definition is validated by
    /// [`Table::new`]; duplicate names are rejected.
    pub fn create_table(
        &self,
        name: &str,
        columns: Vec<ColumnDef>,
        primary: Vec<String>,
    ) -> Result<Arc<Table>> {
        let mut tables = self.tables.write().expect("catalog lock poisoned");
        ensure!(!tables.contains_key(name), TableAlreadyExistsSnafu { name });

        let table = Arc::new(
            Table::new(name, columns, primary).context(TableDefinitionSnafu { name })?,
        );
        tables.insert(name.to_string(), table.clone());

        tracing::debug!(table = name, "created table");
        Ok(table)
    }

    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        self.tables
            .read()
            .expect("catalog lock poisoned")
            .get(name)
            .cloned()
            .context(TableNotExistsSnafu { name })
    }

    /// Opens a new store transaction, independent of any table.
    pub fn begin(&self) -> Result<Transaction<C::Transaction>> {
        let store = self.client.begin().map_err(store_error)?;

        tracing::debug!("began transaction");
        Ok(Transaction::new(store))
    }

    /// Tears the catalog down and closes the client connection. Consuming
    /// `self` makes use-after-close unrepresentable.
    pub fn close(self) -> Result<()> {
        tracing::debug!("closing database");
        self.client.close().map_err(store_error)
    }
}

fn store_error<E: std::error::Error + Send + Sync + 'static>(source: E) -> Error {
    Error::Store {
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use {super::*, def::DataType, storage::MemClient};

    fn columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", DataType::String, false),
            ColumnDef::new("name", DataType::String, true),
        ]
    }

    #[test]
    fn create_then_get() {
        let db = Database::new(MemClient::new());

        let created = db
            .create_table("users", columns(), vec!["id".to_string()])
            .unwrap();
        let fetched = db.get_table("users").unwrap();

        assert!(Arc::ptr_eq(&created, &fetched));
        assert_eq!(fetched.name(), "users");
    }

    #[test]
    fn duplicate_table_name_is_rejected() {
        let db = Database::new(MemClient::new());

        db.create_table("users", columns(), vec!["id".to_string()])
            .unwrap();
        assert!(matches!(
            db.create_table("users", columns(), vec!["id".to_string()])
                .unwrap_err(),
            Error::TableAlreadyExists { name, .. } if name == "users"
        ));
    }

    #[test]
    fn unknown_table_is_rejected() {
        let db = Database::new(MemClient::new());

        assert!(matches!(
            db.get_table("ghost").unwrap_err(),
            Error::TableNotExists { name, .. } if name == "ghost"
        ));
    }

    #[test]
    fn invalid_definition_is_rejected_and_not_registered() {
        let db = Database::new(MemClient::new());

        assert!(matches!(
            db.create_table("users", columns(), vec!["missing".to_string()])
                .unwrap_err(),
            Error::TableDefinition { .. }
        ));
        assert!(db.get_table("users").is_err());
    }

    #[test]
    fn close_consumes_the_database() {
        let db = Database::new(MemClient::new());
        db.close().unwrap();
    }
}
