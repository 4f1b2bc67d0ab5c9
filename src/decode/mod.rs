pub mod ascii;
pub mod binary;
mod detector;

use std::io::BufRead;

use crate::core::shared::{ConfigType, Encoding};
use crate::Mesh;

pub use ascii::decode_ascii;
pub use binary::decode_binary;
pub use detector::{detect, detect_prefix, Rewound};

/// Detects the encoding of `reader` and parses it into a mesh.
/// The bytes read for detection are replayed, so each parser starts at byte zero.
pub fn decode<R>(reader: R, cfg: &Config) -> Result<(Mesh, Encoding), Err>
    where R: BufRead
{
    let (encoding, reader) = detect(reader)?;
    log::debug!("Detected {} STL stream", encoding);

    let mesh = match encoding {
        Encoding::Ascii => decode_ascii(reader)?,
        Encoding::Binary => decode_binary(reader, cfg)?,
    };

    log::debug!("Decoded {} triangles", mesh.len());
    Ok((mesh, encoding))
}


#[derive(Debug, Clone)]
pub struct Config {
    /// Accept bytes after the last binary triangle record instead of failing.
    pub allow_trailing_data: bool,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            allow_trailing_data: false,
        }
    }
}


#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("ASCII STL decoding error: {0}")]
    AsciiError(#[from] ascii::Err),
    #[error("Binary STL decoding error: {0}")]
    BinaryError(#[from] binary::Err),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
