pub(crate) mod scientific;

pub(crate) mod layout {
    use std::io::{self, Read, Write};

    use byteorder::{ReadBytesExt, WriteBytesExt};

    use crate::core::bit_coder::{Order, ReaderErr};
    use crate::core::mesh::{Triangle, Vec3};

    /// Free-form header, ignored on read and zero-filled on write.
    pub(crate) const HEADER_LEN: usize = 80;

    /// Byte offset of the little-endian u32 triangle count.
    pub(crate) const COUNT_OFFSET: u64 = HEADER_LEN as u64;

    /// Header plus count; the size of an empty binary STL file.
    pub(crate) const PREAMBLE_LEN: usize = HEADER_LEN + 4;

    /// Normal, three vertices and the attribute byte count.
    pub(crate) const TRIANGLE_RECORD_LEN: usize = 50;

    /// Size of a complete binary file holding `count` triangles.
    pub(crate) fn file_len(count: u32) -> u64 {
        PREAMBLE_LEN as u64 + count as u64 * TRIANGLE_RECORD_LEN as u64
    }

    #[inline]
    pub(crate) fn read_vec3<R>(reader: &mut R) -> Result<Vec3, ReaderErr>
        where R: Read
    {
        Ok(Vec3::new(
            reader.read_f32::<Order>()?,
            reader.read_f32::<Order>()?,
            reader.read_f32::<Order>()?,
        ))
    }

    #[inline]
    pub(crate) fn write_vec3<W>(v: Vec3, writer: &mut W) -> io::Result<()>
        where W: Write
    {
        writer.write_f32::<Order>(v.x)?;
        writer.write_f32::<Order>(v.y)?;
        writer.write_f32::<Order>(v.z)
    }

    /// Reads one record. The attribute byte count is read and dropped.
    pub(crate) fn read_triangle<R>(reader: &mut R) -> Result<Triangle, ReaderErr>
        where R: Read
    {
        let normal = read_vec3(reader)?;
        let vertices = [read_vec3(reader)?, read_vec3(reader)?, read_vec3(reader)?];
        reader.read_u16::<Order>()?;
        Ok(Triangle::new(normal, vertices))
    }

    /// Writes one record with a zero attribute byte count.
    pub(crate) fn write_triangle<W>(triangle: &Triangle, writer: &mut W) -> io::Result<()>
        where W: Write
    {
        write_vec3(triangle.normal, writer)?;
        for v in triangle.vertices {
            write_vec3(v, writer)?;
        }
        writer.write_u16::<Order>(0)
    }

}
