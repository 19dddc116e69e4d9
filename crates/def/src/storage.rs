//! Contracts for the transactional key-value collaborator.
//!
//! The table and catalog layers never talk to a store directly; they go
//! through these traits so that any transactional key-value client (the
//! bundled in-memory store, or a networked one) can back a database.

/// One store transaction. Implementations must provide read-your-own-writes
/// within the transaction; isolation across transactions is theirs to define.
pub trait KvTransaction {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Absent keys are `None`, not an error.
    fn get(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, Self::Error>;
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), Self::Error>;
    fn delete(&mut self, key: &[u8]) -> Result<(), Self::Error>;

    /// Atomically publishes the buffered writes. A conflict detected by the
    /// store surfaces here as `Self::Error`.
    fn commit(&mut self) -> Result<(), Self::Error>;
    fn rollback(&mut self) -> Result<(), Self::Error>;
}

/// A connection to the store; factory for transactions.
pub trait KvClient {
    type Transaction: KvTransaction;
    type Error: std::error::Error + Send + Sync + 'static;

    fn begin(&self) -> Result<Self::Transaction, Self::Error>;
    fn close(self) -> Result<(), Self::Error>;
}

pub trait Encoder {
    type Item;
    type Error: std::error::Error + 'static;

    fn encode(&self, item: &Self::Item) -> Result<Vec<u8>, Self::Error>;
}

pub trait Decoder {
    type Item;
    type Error: std::error::Error + 'static;

    fn decode(&self, src: &[u8]) -> Result<Self::Item, Self::Error>;
}
