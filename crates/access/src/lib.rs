pub mod codec;
pub mod table;

pub use {codec::RowCodec, table::Table};
