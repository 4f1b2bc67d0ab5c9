use std::io::{self, BufRead, Cursor, Read};

use crate::core::shared::Encoding;

const ASCII_MAGIC: &[u8] = b"solid";

/// A reader whose already inspected leading bytes are served again before
/// the rest of the stream.
pub type Rewound<R> = io::Chain<Cursor<Vec<u8>>, R>;

/// Classifies a stream by its first bytes: `solid` means ASCII, anything else binary.
///
/// This is a prefix heuristic. A binary file whose free-form header happens
/// to start with `solid` is reported as ASCII, and the ASCII parser will then
/// reject it.
pub fn detect_prefix(bytes: &[u8]) -> Encoding {
    if bytes.starts_with(ASCII_MAGIC) {
        Encoding::Ascii
    } else {
        Encoding::Binary
    }
}

/// Reads up to five bytes from `reader` and classifies them.
///
/// A single buffer fill may hold fewer bytes than the magic word, so the
/// prefix is gathered across as many fills as it takes. The bytes read are
/// handed back in front of the remaining stream; parsers reading from the
/// returned reader start at byte zero. A stream shorter than the magic word,
/// including an empty one, is treated as binary.
pub fn detect<R>(mut reader: R) -> io::Result<(Encoding, Rewound<R>)>
    where R: BufRead
{
    let mut prefix = Vec::with_capacity(ASCII_MAGIC.len());
    while prefix.len() < ASCII_MAGIC.len() {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }
        let n = buf.len().min(ASCII_MAGIC.len() - prefix.len());
        prefix.extend_from_slice(&buf[..n]);
        reader.consume(n);
    }

    let encoding = detect_prefix(&prefix);
    Ok((encoding, Cursor::new(prefix).chain(reader)))
}
