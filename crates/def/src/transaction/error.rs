use snafu::{prelude::*, Backtrace};

pub type BoxedStoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("transaction is closed"))]
    Closed { backtrace: Backtrace },

    #[snafu(display("key-value store error: {}", source))]
    Store { source: BoxedStoreError },
}

impl Error {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
