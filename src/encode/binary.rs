use std::io::{Seek, SeekFrom, Write};

use byteorder::WriteBytesExt;

use crate::core::bit_coder::Order;
use crate::core::mesh::Triangle;
use crate::shared::layout::{self, COUNT_OFFSET, HEADER_LEN};

use super::{Err, TriangleSink};

/// Writes the binary layout.
///
/// The triangle count precedes the records but is only final once the last
/// record is out, so `new` writes a zero placeholder and `finish` seeks back
/// and patches it. Until `finish` runs the file claims zero triangles, never
/// more than it holds.
pub struct BinaryEncoder<W> {
    writer: W,
    /// Stream position of the header, so the count can be found again.
    start: u64,
    count: u32,
}

impl<W: Write + Seek> BinaryEncoder<W> {
    pub fn new(mut writer: W) -> Result<Self, Err> {
        let start = writer.stream_position()?;
        writer.write_all(&[0_u8; HEADER_LEN])?;
        writer.write_u32::<Order>(0)?;
        Ok(Self { writer, start, count: 0 })
    }

    pub fn finish(mut self) -> Result<W, Err> {
        let end = self.writer.stream_position()?;
        debug_assert_eq!(end - self.start, layout::file_len(self.count));
        self.writer.seek(SeekFrom::Start(self.start + COUNT_OFFSET))?;
        self.writer.write_u32::<Order>(self.count)?;
        self.writer.seek(SeekFrom::Start(end))?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write + Seek> TriangleSink for BinaryEncoder<W> {
    fn write_triangle(&mut self, triangle: &Triangle) -> Result<(), Err> {
        let count = self.count.checked_add(1).ok_or(Err::TooManyTriangles)?;
        layout::write_triangle(triangle, &mut self.writer)?;
        self.count = count;
        Ok(())
    }

    fn triangles_written(&self) -> usize {
        self.count as usize
    }
}
