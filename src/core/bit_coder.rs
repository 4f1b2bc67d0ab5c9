//! Binary STL fields are little-endian throughout; reads and writes go
//! through `byteorder` with this order.

use std::io;

pub type Order = byteorder::LittleEndian;

/// A failed read from a binary stream. Running out of bytes is told apart
/// from the stream itself failing, so decoders can report truncation.
#[derive(thiserror::Error, Debug)]
pub enum ReaderErr {
    #[error("I/O error: {0}")]
    Io(io::Error),
    #[error("Not enough data to read")]
    NotEnoughData,
}

impl From<io::Error> for ReaderErr {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            ReaderErr::NotEnoughData
        } else {
            ReaderErr::Io(e)
        }
    }
}
