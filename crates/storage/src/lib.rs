//! An in-memory transactional key-value store.
//!
//! Implements the `def::storage` collaborator traits with optimistic
//! concurrency: a transaction buffers its writes, records the commit
//! version of every key it reads, and validates those versions at commit
//! time. The first committer wins; the loser gets [`Error::Conflict`].

mod error;
mod mem;

pub use {
    error::{Error, Result},
    mem::{MemClient, MemTransaction},
};
