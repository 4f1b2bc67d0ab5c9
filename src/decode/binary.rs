use std::io::{BufRead, Read};

use byteorder::ReadBytesExt;

use crate::core::bit_coder::{Order, ReaderErr};
use crate::core::mesh::Mesh;
use crate::shared::layout::{self, HEADER_LEN, PREAMBLE_LEN};

use super::Config;

/// Upper bound on triangles reserved up front. The count comes from the
/// header and is not checked against the stream length.
const MAX_PREALLOCATED_TRIANGLES: usize = 1 << 16;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("data found after the {count} triangles declared in the header")]
    TrailingData { count: u32 },
    #[error("stream ends inside the {}-byte header", PREAMBLE_LEN)]
    TruncatedHeader,
    #[error("stream ends inside triangle {index} of {count}")]
    TruncatedTriangle { index: u32, count: u32 },
}

/// Parses a binary STL stream positioned at its first byte.
pub fn decode_binary<R>(mut reader: R, cfg: &Config) -> Result<Mesh, Err>
    where R: BufRead
{
    let mut header = [0_u8; HEADER_LEN];
    reader.read_exact(&mut header).map_err(|e| truncated(e.into(), Err::TruncatedHeader))?;
    let count = reader.read_u32::<Order>().map_err(|e| truncated(e.into(), Err::TruncatedHeader))?;

    let mut triangles = Vec::with_capacity((count as usize).min(MAX_PREALLOCATED_TRIANGLES));
    for index in 0..count {
        let triangle = layout::read_triangle(&mut reader)
            .map_err(|e| truncated(e, Err::TruncatedTriangle { index, count }))?;
        triangles.push(triangle);
    }

    if !reader.fill_buf()?.is_empty() {
        if !cfg.allow_trailing_data {
            return Err(Err::TrailingData { count });
        }
        log::warn!("Ignoring data after the {} declared triangles", count);
    }

    Ok(Mesh::new(triangles))
}

fn truncated(e: ReaderErr, on_short_read: Err) -> Err {
    match e {
        ReaderErr::NotEnoughData => on_short_read,
        ReaderErr::Io(e) => Err::IoError(e),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mesh::{Triangle, Vec3};
    use byteorder::WriteBytesExt;
    use crate::prelude::ConfigType;
    use crate::shared::layout::TRIANGLE_RECORD_LEN;

    fn stl_bytes(count: u32, triangles: &[Triangle]) -> Vec<u8> {
        let mut buffer = vec![0_u8; HEADER_LEN];
        buffer.write_u32::<Order>(count).unwrap();
        for t in triangles {
            layout::write_triangle(t, &mut buffer).unwrap();
        }
        buffer
    }

    fn triangle(i: f32) -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 1.0),
            [Vec3::new(i, 0.0, 0.0), Vec3::new(0.0, i, 0.0), Vec3::new(0.0, 0.0, i)],
        )
    }

    #[test]
    fn reads_declared_triangles_in_order() {
        let tris = [triangle(1.0), triangle(2.0), triangle(3.0)];
        let bytes = stl_bytes(3, &tris);
        assert_eq!(bytes.len(), PREAMBLE_LEN + 3 * TRIANGLE_RECORD_LEN);
        let mesh = decode_binary(bytes.as_slice(), &Config::default()).unwrap();
        assert_eq!(mesh.triangles(), &tris);
    }

    #[test]
    fn header_content_is_ignored() {
        let mut bytes = stl_bytes(1, &[triangle(1.0)]);
        bytes[..12].copy_from_slice(b"exported by ");
        let mesh = decode_binary(bytes.as_slice(), &Config::default()).unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn truncated_header() {
        let err = decode_binary(&[0_u8; PREAMBLE_LEN - 1][..], &Config::default()).unwrap_err();
        assert!(matches!(err, Err::TruncatedHeader));
        assert_eq!(err.to_string(), "stream ends inside the 84-byte header");
    }

    #[test]
    fn count_larger_than_data() {
        let bytes = stl_bytes(3, &[triangle(1.0), triangle(2.0)]);
        let err = decode_binary(bytes.as_slice(), &Config::default()).unwrap_err();
        assert!(matches!(err, Err::TruncatedTriangle { index: 2, count: 3 }));
    }

    #[test]
    fn partial_record() {
        let mut bytes = stl_bytes(1, &[triangle(1.0)]);
        bytes.truncate(bytes.len() - 1);
        let err = decode_binary(bytes.as_slice(), &Config::default()).unwrap_err();
        assert!(matches!(err, Err::TruncatedTriangle { index: 0, count: 1 }));
    }

    #[test]
    fn huge_count_fails_without_huge_allocation() {
        let bytes = stl_bytes(u32::MAX, &[triangle(1.0)]);
        let err = decode_binary(bytes.as_slice(), &Config::default()).unwrap_err();
        assert!(matches!(err, Err::TruncatedTriangle { index: 1, .. }));
    }

    #[test]
    fn count_smaller_than_data() {
        let bytes = stl_bytes(1, &[triangle(1.0), triangle(2.0)]);
        let err = decode_binary(bytes.as_slice(), &Config::default()).unwrap_err();
        assert!(matches!(err, Err::TrailingData { count: 1 }));

        let cfg = Config { allow_trailing_data: true };
        let mesh = decode_binary(bytes.as_slice(), &cfg).unwrap();
        assert_eq!(mesh.triangles(), &[triangle(1.0)]);
    }
}
