use snafu::{prelude::*, Backtrace};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("write conflict on key {:?}", String::from_utf8_lossy(key)))]
    Conflict { key: Vec<u8>, backtrace: Backtrace },
}

pub type Result<T> = std::result::Result<T, Error>;
