//! Self-describing row encoding.
//!
//! A row is stored as `u32` entry count followed by one entry per column:
//! `u16` name length, name bytes, `u8` type tag, then the tag's payload.
//! Strings carry a `u32` length prefix; integers and floats are fixed-size
//! little-endian. The payload is the only persisted representation of a row
//! and must round-trip exactly for every `Value` variant.

use {
    byteorder::{ReadBytesExt, WriteBytesExt, LE},
    def::{
        storage::{Decoder, Encoder},
        Row, Value,
    },
    snafu::{prelude::*, Backtrace},
    std::{
        io::{self, Cursor},
        string::FromUtf8Error,
    },
};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    Io {
        source: io::Error,
    },

    Utf8Encoding {
        source: FromUtf8Error,
    },

    #[snafu(display("column name of {} bytes exceeds the length prefix", length))]
    NameTooLong {
        length: usize,
        backtrace: Backtrace,
    },

    #[snafu(display("string value of {} bytes exceeds the length prefix", length))]
    StringTooLong {
        length: usize,
        backtrace: Backtrace,
    },

    #[snafu(display("string length {} exceeds the {} bytes remaining", len, remaining))]
    StringOutOfBounds {
        len: usize,
        remaining: usize,
        backtrace: Backtrace,
    },

    #[snafu(display("invalid value tag {}", tag))]
    InvalidTag {
        tag: u8,
        backtrace: Backtrace,
    },

    #[snafu(display("invalid boolean byte {}", byte))]
    InvalidBoolean {
        byte: u8,
        backtrace: Backtrace,
    },

    #[snafu(display("{} trailing bytes after the last entry", count))]
    TrailingBytes {
        count: usize,
        backtrace: Backtrace,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

const TAG_NULL: u8 = 0;
const TAG_BOOLEAN: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STRING: u8 = 4;

#[derive(Clone, Copy, Debug, Default)]
pub struct RowCodec;

impl Encoder for RowCodec {
    type Item = Row;
    type Error = Error;

    fn encode(&self, row: &Row) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();

        bytes.write_u32::<LE>(row.len() as u32).context(IoSnafu)?;

        for (name, value) in row {
            ensure!(
                name.len() <= u16::MAX as usize,
                NameTooLongSnafu { length: name.len() }
            );
            bytes
                .write_u16::<LE>(name.len() as u16)
                .context(IoSnafu)?;
            bytes.extend_from_slice(name.as_bytes());

            match value {
                Value::Null => bytes.write_u8(TAG_NULL).context(IoSnafu)?,
                Value::Boolean(v) => {
                    bytes.write_u8(TAG_BOOLEAN).context(IoSnafu)?;
                    bytes.write_u8(*v as u8).context(IoSnafu)?;
                }
                Value::Int(v) => {
                    bytes.write_u8(TAG_INT).context(IoSnafu)?;
                    bytes.write_i64::<LE>(*v).context(IoSnafu)?;
                }
                Value::Float(v) => {
                    bytes.write_u8(TAG_FLOAT).context(IoSnafu)?;
                    bytes.write_f64::<LE>(*v).context(IoSnafu)?;
                }
                Value::String(v) => {
                    ensure!(
                        v.len() <= u32::MAX as usize,
                        StringTooLongSnafu { length: v.len() }
                    );
                    bytes.write_u8(TAG_STRING).context(IoSnafu)?;
                    bytes.write_u32::<LE>(v.len() as u32).context(IoSnafu)?;
                    bytes.extend_from_slice(v.as_bytes());
                }
            }
        }

        Ok(bytes)
    }
}

impl Decoder for RowCodec {
    type Item = Row;
    type Error = Error;

    fn decode(&self, src: &[u8]) -> Result<Row> {
        let mut reader = Cursor::new(src);
        let count = reader.read_u32::<LE>().context(IoSnafu)?;

        let mut row = Row::new();

        for _ in 0..count {
            let name_len = reader.read_u16::<LE>().context(IoSnafu)? as usize;
            let name = read_string(&mut reader, name_len)?;

            let value = match reader.read_u8().context(IoSnafu)? {
                TAG_NULL => Value::Null,
                TAG_BOOLEAN => match reader.read_u8().context(IoSnafu)? {
                    0 => Value::Boolean(false),
                    1 => Value::Boolean(true),
                    byte => return InvalidBooleanSnafu { byte }.fail(),
                },
                TAG_INT => Value::Int(reader.read_i64::<LE>().context(IoSnafu)?),
                TAG_FLOAT => Value::Float(reader.read_f64::<LE>().context(IoSnafu)?),
                TAG_STRING => {
                    let len = reader.read_u32::<LE>().context(IoSnafu)? as usize;
                    Value::String(read_string(&mut reader, len)?)
                }
                tag => return InvalidTagSnafu { tag }.fail(),
            };

            row.insert(name, value);
        }

        let trailing = src.len() - reader.position() as usize;
        ensure!(trailing == 0, TrailingBytesSnafu { count: trailing });

        Ok(row)
    }
}

// The declared length is untrusted input; bounds-check it against the
// remaining payload before allocating.
fn read_string(reader: &mut Cursor<&[u8]>, len: usize) -> Result<String> {
    let start = reader.position() as usize;
    let src = *reader.get_ref();
    let remaining = src.len().saturating_sub(start);
    ensure!(len <= remaining, StringOutOfBoundsSnafu { len, remaining });

    reader.set_position((start + len) as u64);
    String::from_utf8(src[start..start + len].to_vec()).context(Utf8EncodingSnafu)
}
