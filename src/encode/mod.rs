pub mod ascii;
pub mod binary;

use std::io::{Seek, Write};

use crate::core::mesh::{Mesh, Triangle};
use crate::core::shared::{ConfigType, Encoding};

pub use ascii::AsciiEncoder;
pub use binary::BinaryEncoder;

#[derive(Debug, Clone)]
pub struct Config {
    /// Name written after `solid` and `endsolid` in ASCII output.
    pub solid_name: String,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            solid_name: String::new(),
        }
    }
}

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("solid name {0:?} must fit on one line")]
    InvalidSolidName(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("binary STL cannot hold more than {} triangles", u32::MAX)]
    TooManyTriangles,
}


/// A streaming STL writer. Triangles go out one at a time in the order they
/// are given; whatever closes the file happens in the encoder's `finish`.
#[enum_dispatch::enum_dispatch]
pub trait TriangleSink {
    fn write_triangle(&mut self, triangle: &Triangle) -> Result<(), Err>;

    /// Number of triangles written so far.
    fn triangles_written(&self) -> usize;
}

#[enum_dispatch::enum_dispatch(TriangleSink)]
pub enum Encoder<W: Write + Seek> {
    Ascii(AsciiEncoder<W>),
    Binary(BinaryEncoder<W>),
}

impl<W: Write + Seek> Encoder<W> {
    /// Starts an encoder for `encoding`, writing its preamble to `writer`.
    pub fn new(encoding: Encoding, writer: W, cfg: &Config) -> Result<Self, Err> {
        Ok(match encoding {
            Encoding::Ascii => AsciiEncoder::new(writer, cfg)?.into(),
            Encoding::Binary => BinaryEncoder::new(writer)?.into(),
        })
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Encoder::Ascii(_) => Encoding::Ascii,
            Encoder::Binary(_) => Encoding::Binary,
        }
    }

    /// Writes the closing part of the file and hands the writer back.
    pub fn finish(self) -> Result<W, Err> {
        match self {
            Encoder::Ascii(enc) => enc.finish(),
            Encoder::Binary(enc) => enc.finish(),
        }
    }
}


/// Encodes the mesh into `writer` in the requested encoding.
pub fn encode<W>(mesh: Mesh, writer: &mut W, encoding: Encoding, cfg: &Config) -> Result<(), Err>
    where W: Write + Seek
{
    let mut encoder = Encoder::new(encoding, writer, cfg)?;
    for triangle in mesh {
        encoder.write_triangle(&triangle)?;
    }
    log::debug!("Encoded {} triangles as {}", encoder.triangles_written(), encoder.encoding());
    encoder.finish()?;
    Ok(())
}

/// Encodes the mesh as ASCII STL. Unlike binary output, this needs no seeking.
pub fn encode_ascii<W>(mesh: Mesh, writer: &mut W, cfg: &Config) -> Result<(), Err>
    where W: Write
{
    let mut encoder = AsciiEncoder::new(writer, cfg)?;
    for triangle in mesh {
        encoder.write_triangle(&triangle)?;
    }
    encoder.finish()?;
    Ok(())
}

/// Encodes the mesh as binary STL.
pub fn encode_binary<W>(mesh: Mesh, writer: &mut W) -> Result<(), Err>
    where W: Write + Seek
{
    let mut encoder = BinaryEncoder::new(writer)?;
    for triangle in mesh {
        encoder.write_triangle(&triangle)?;
    }
    encoder.finish()?;
    Ok(())
}
