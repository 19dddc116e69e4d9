use {
    access::table,
    snafu::{prelude::*, Backtrace},
};

pub type BoxedStoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display(r#"table "{}" already exists"#, name))]
    TableAlreadyExists { name: String, backtrace: Backtrace },

    #[snafu(display(r#"table "{}" does not exist"#, name))]
    TableNotExists { name: String, backtrace: Backtrace },

    #[snafu(display(r#"invalid definition for table "{}": {}"#, name, source))]
    TableDefinition {
        name: String,
        #[snafu(backtrace)]
        source: table::Error,
    },

    #[snafu(display("key-value store error: {}", source))]
    Store { source: BoxedStoreError },
}

pub type Result<T> = std::result::Result<T, Error>;
