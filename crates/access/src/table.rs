use {
    crate::codec::{self, RowCodec},
    def::{
        storage::{Decoder, Encoder, KvTransaction},
        transaction, ColumnDef, Row, Transaction,
    },
    snafu::{prelude::*, Backtrace},
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("primary key column {} is not a declared column", column))]
    UnknownPrimaryColumn { column: String, backtrace: Backtrace },

    #[snafu(display("required column {} is missing", column))]
    MissingColumn { column: String, backtrace: Backtrace },

    #[snafu(display("primary key column {} is missing", column))]
    MissingPrimaryKey { column: String, backtrace: Backtrace },

    #[snafu(display("row {} already exists", key))]
    RowAlreadyExists { key: String, backtrace: Backtrace },

    #[snafu(display("row {} does not exist", key))]
    RowNotFound { key: String, backtrace: Backtrace },

    #[snafu(display("failed to encode row {}: {}", key, source))]
    EncodeRow {
        key: String,
        #[snafu(backtrace)]
        source: codec::Error,
    },

    #[snafu(display("failed to decode row {}: {}", key, source))]
    DecodeRow {
        key: String,
        #[snafu(backtrace)]
        source: codec::Error,
    },

    Transaction {
        #[snafu(backtrace)]
        source: transaction::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Separator between the table name and each primary-key value in a storage
/// key. A value whose string form contains it can collide with another key;
/// callers own that convention (see DESIGN.md).
const KEY_SEPARATOR: &str = ":";

/// A table definition plus the row operations against it.
///
/// Immutable once constructed; safe to share across concurrent transactions.
/// All operations go through a caller-supplied [`Transaction`], so nothing
/// here is durable until that transaction commits.
#[derive(Debug)]
pub struct Table {
    name: String,
    columns: Vec<ColumnDef>,
    primary: Vec<String>,
    codec: RowCodec,
}

impl Table {
    /// Every name in `primary` must reference a declared column.
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>, primary: Vec<String>) -> Result<Self> {
        for pk in &primary {
            ensure!(
                columns.iter().any(|col| col.name == *pk),
                UnknownPrimaryColumnSnafu { column: pk.clone() }
            );
        }

        Ok(Self {
            name: name.into(),
            columns,
            primary,
            codec: RowCodec,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn primary(&self) -> &[String] {
        &self.primary
    }

    /// Presence-only validation: every non-nullable column must appear as a
    /// key in the row. The value itself may be `Null`; declared types are
    /// never checked. Returns the first missing column.
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        for col in &self.columns {
            if !col.is_nullable {
                ensure!(
                    row.contains_key(&col.name),
                    MissingColumnSnafu {
                        column: col.name.clone()
                    }
                );
            }
        }

        Ok(())
    }

    /// Derives the storage key `<table>:<pk1>:<pk2>:...` from the row's
    /// primary-key values in declared order.
    pub fn row_key(&self, row: &Row) -> Result<String> {
        let mut parts = Vec::with_capacity(1 + self.primary.len());
        parts.push(self.name.clone());

        for pk in &self.primary {
            let value = row.get(pk).context(MissingPrimaryKeySnafu { column: pk.clone() })?;
            parts.push(value.to_string());
        }

        Ok(parts.join(KEY_SEPARATOR))
    }

    /// Adds a new row. Fails if a row with the same primary key is already
    /// visible to the transaction.
    pub fn insert<T: KvTransaction>(&self, txn: &Transaction<T>, row: &Row) -> Result<()> {
        self.validate_row(row)?;
        let key = self.row_key(row)?;

        let existing = txn.get(key.as_bytes()).context(TransactionSnafu)?;
        ensure!(existing.is_none(), RowAlreadyExistsSnafu { key: key.clone() });

        let value = self.codec.encode(row).context(EncodeRowSnafu { key: key.clone() })?;
        txn.set(key.as_bytes(), value).context(TransactionSnafu)
    }

    /// Patches an existing row: incoming columns overwrite, everything else
    /// stored under the key is preserved.
    pub fn update<T: KvTransaction>(&self, txn: &Transaction<T>, row: &Row) -> Result<()> {
        self.validate_row(row)?;
        let key = self.row_key(row)?;

        let existing = txn
            .get(key.as_bytes())
            .context(TransactionSnafu)?
            .context(RowNotFoundSnafu { key: key.clone() })?;

        let mut merged = self
            .codec
            .decode(&existing)
            .context(DecodeRowSnafu { key: key.clone() })?;
        for (name, value) in row {
            merged.insert(name.clone(), value.clone());
        }

        let value = self
            .codec
            .encode(&merged)
            .context(EncodeRowSnafu { key: key.clone() })?;
        txn.set(key.as_bytes(), value).context(TransactionSnafu)
    }

    /// Removes the row addressed by `key_values`, which must contain every
    /// primary-key column. Fails if no such row is visible.
    pub fn delete<T: KvTransaction>(&self, txn: &Transaction<T>, key_values: &Row) -> Result<()> {
        let key = self.row_key(key_values)?;

        let existing = txn.get(key.as_bytes()).context(TransactionSnafu)?;
        ensure!(existing.is_some(), RowNotFoundSnafu { key: key.clone() });

        txn.delete(key.as_bytes()).context(TransactionSnafu)
    }

    /// Reads the row addressed by `key_values`.
    pub fn get<T: KvTransaction>(&self, txn: &Transaction<T>, key_values: &Row) -> Result<Row> {
        let key = self.row_key(key_values)?;

        let data = txn
            .get(key.as_bytes())
            .context(TransactionSnafu)?
            .context(RowNotFoundSnafu { key: key.clone() })?;

        self.codec.decode(&data).context(DecodeRowSnafu { key })
    }
}
