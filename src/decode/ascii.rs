use std::io::BufRead;

use crate::core::mesh::{Mesh, Triangle, Vec3};
use crate::shared::scientific::parse_scientific;

#[remain::sorted]
#[derive(thiserror::Error, Debug)]
pub enum Err {
    #[error("line {line}: expected 3 components, found {found}")]
    ComponentCount { line: usize, found: usize },
    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
    #[error("line {line}: not valid UTF-8")]
    InvalidUtf8 { line: usize },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("line {line}: expected '{marker}'")]
    MissingMarker { line: usize, marker: &'static str },
    #[error("stream does not start with 'solid'")]
    MissingSolidHeader,
    #[error("unexpected end of stream after line {line}, expected '{expected}'")]
    UnexpectedEof { line: usize, expected: &'static str },
}

/// Walks the non-blank lines of the stream, counting every line read.
///
/// Lines are kept as raw bytes. Solid names and the structural lines may
/// carry any encoding; only lines holding numbers are decoded as text.
struct LineCursor<R> {
    reader: R,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineCursor<R> {
    fn new(reader: R) -> Self {
        Self { reader, line: 0, buf: Vec::new() }
    }

    /// Moves to the next non-blank line. Returns `false` at the end of the stream.
    fn advance(&mut self) -> Result<bool, Err> {
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            if !self.buf.iter().all(u8::is_ascii_whitespace) {
                return Ok(true);
            }
        }
    }

    /// Like `advance`, but the end of the stream is an error naming what was due.
    fn expect_line(&mut self, expected: &'static str) -> Result<(), Err> {
        if !self.advance()? {
            return Err(Err::UnexpectedEof { line: self.line, expected });
        }
        Ok(())
    }

    /// The current line without its line ending.
    fn current(&self) -> &[u8] {
        let bytes = self.buf.strip_suffix(b"\n").unwrap_or(&self.buf[..]);
        bytes.strip_suffix(b"\r").unwrap_or(bytes)
    }

    fn current_text(&self) -> Result<&str, Err> {
        std::str::from_utf8(self.current()).map_err(|_| Err::InvalidUtf8 { line: self.line })
    }
}

/// Parses an ASCII STL stream positioned at its `solid` line.
///
/// The `outer loop`, `endloop` and `endfacet` lines are required but their
/// text is not checked. Several `solid ... endsolid` blocks in one stream are
/// read into a single mesh.
pub fn decode_ascii<R>(reader: R) -> Result<Mesh, Err>
    where R: BufRead
{
    let mut cursor = LineCursor::new(reader);

    if !cursor.advance()? || !cursor.current().trim_ascii_start().starts_with(b"solid") {
        return Err(Err::MissingSolidHeader);
    }

    let mut triangles = Vec::new();
    while cursor.advance()? {
        if is_solid_boundary(cursor.current()) {
            continue;
        }

        let normal = parse_marked_vec3(cursor.current_text()?, &["facet", "normal"], "facet normal", cursor.line)?;
        cursor.expect_line("outer loop")?;
        let mut vertices = [Vec3::default(); 3];
        for v in vertices.iter_mut() {
            cursor.expect_line("vertex")?;
            *v = parse_marked_vec3(cursor.current_text()?, &["vertex"], "vertex", cursor.line)?;
        }
        cursor.expect_line("endloop")?;
        cursor.expect_line("endfacet")?;

        triangles.push(Triangle::new(normal, vertices));
    }

    Ok(Mesh::new(triangles))
}

/// `endsolid` lines and the `solid` line of a following block. Checked on the
/// raw bytes, as the solid name after either keyword is free-form.
fn is_solid_boundary(line: &[u8]) -> bool {
    const END: &[u8] = b"endsolid";
    line.windows(END.len()).any(|w| w == END)
        || line.split(u8::is_ascii_whitespace).find(|t| !t.is_empty()) == Some(&b"solid"[..])
}

/// Strips the marker words from the front of `line` and parses the three numbers after them.
fn parse_marked_vec3(line: &str, words: &[&str], marker: &'static str, line_no: usize) -> Result<Vec3, Err> {
    let mut tokens = line.split_whitespace();
    for word in words {
        if tokens.next() != Some(*word) {
            return Err(Err::MissingMarker { line: line_no, marker });
        }
    }

    let tokens = tokens.collect::<Vec<_>>();
    if tokens.len() != 3 {
        return Err(Err::ComponentCount { line: line_no, found: tokens.len() });
    }

    let mut out = [0.0_f32; 3];
    for (o, token) in out.iter_mut().zip(tokens) {
        *o = parse_scientific(token)
            .map_err(|_| Err::InvalidNumber { line: line_no, token: token.to_string() })?;
    }
    Ok(Vec3::from(out))
}
