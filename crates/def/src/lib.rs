pub mod meta;
pub mod storage;
pub mod transaction;
mod value;

pub use {
    meta::{ColumnDef, DataType},
    transaction::Transaction,
    value::{Row, Value},
};
