use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::Path;

use serde::Serialize;

use crate::core::shared::{ConfigType, Encoding};
use crate::{decode, encode, Mesh};

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("Decoding error: {0}")]
    DecodeError(#[from] decode::Err),
    #[error("Encoding error: {0}")]
    EncodeError(#[from] encode::Err),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Outcome of one conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Conversion {
    pub from: Encoding,
    pub to: Encoding,
    pub num_triangles: usize,
}

/// Reads an STL stream in either encoding and writes it to `output` in the other one.
pub fn convert<R, W>(input: &mut R, output: &mut W) -> Result<Conversion, Err>
    where R: BufRead, W: Write + Seek
{
    convert_with(input, output, &decode::Config::default(), &encode::Config::default())
}

pub fn convert_with<R, W>(
    input: &mut R,
    output: &mut W,
    decode_cfg: &decode::Config,
    encode_cfg: &encode::Config,
) -> Result<Conversion, Err>
    where R: BufRead, W: Write + Seek
{
    let (mesh, from) = decode::decode(input, decode_cfg)?;
    let to = from.opposite();
    let num_triangles = mesh.len();
    encode::encode(mesh, output, to, encode_cfg)?;
    Ok(Conversion { from, to, num_triangles })
}

/// Loads an STL file, returning the mesh and the encoding the file was in.
pub fn load_stl<P: AsRef<Path>>(path: P, cfg: &decode::Config) -> Result<(Mesh, Encoding), Err> {
    let reader = BufReader::new(File::open(path)?);
    Ok(decode::decode(reader, cfg)?)
}

/// Saves the mesh to `path` in the given encoding, replacing any existing file.
pub fn save_stl<P: AsRef<Path>>(mesh: Mesh, path: P, encoding: Encoding, cfg: &encode::Config) -> Result<(), Err> {
    let path = path.as_ref();
    let result = write_file(path, |writer| {
        encode::encode(mesh, writer, encoding, cfg)?;
        Ok(())
    });
    discard_on_failure(path, result)
}

/// Converts `input` into `output`. When the conversion fails, the partly
/// written output file is removed rather than left behind with a wrong
/// triangle count.
pub fn convert_file<P, Q>(
    input: P,
    output: Q,
    decode_cfg: &decode::Config,
    encode_cfg: &encode::Config,
) -> Result<Conversion, Err>
    where P: AsRef<Path>, Q: AsRef<Path>
{
    let mut reader = BufReader::new(File::open(input.as_ref())?);
    let output = output.as_ref();
    let result = write_file(output, |writer| convert_with(&mut reader, writer, decode_cfg, encode_cfg));
    discard_on_failure(output, result)
}

/// Creates `path` and runs `f` on a buffered writer, flushing it on success.
/// The file handle is closed before this returns, on every path.
fn write_file<T>(path: &Path, f: impl FnOnce(&mut BufWriter<File>) -> Result<T, Err>) -> Result<T, Err> {
    let mut writer = BufWriter::new(File::create(path)?);
    let out = f(&mut writer)?;
    writer.flush()?;
    Ok(out)
}

fn discard_on_failure<T>(path: &Path, result: Result<T, Err>) -> Result<T, Err> {
    if result.is_err() && path.exists() {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("Could not remove incomplete output {}: {}", path.display(), e);
        }
    }
    result
}
