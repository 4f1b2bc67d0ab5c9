use std::io::Write;

use crate::core::mesh::{Triangle, Vec3};
use crate::shared::scientific::format_scientific;

use super::{Config, Err, TriangleSink};

/// Writes the ASCII grammar: a `solid` line, one indented facet block per
/// triangle and an `endsolid` line.
pub struct AsciiEncoder<W> {
    writer: W,
    solid_name: String,
    num_triangles: usize,
}

impl<W: Write> AsciiEncoder<W> {
    pub fn new(mut writer: W, cfg: &Config) -> Result<Self, Err> {
        if cfg.solid_name.contains(['\n', '\r']) {
            return Err(Err::InvalidSolidName(cfg.solid_name.clone()));
        }
        writeln!(writer, "solid {}", cfg.solid_name)?;
        Ok(Self {
            writer,
            solid_name: cfg.solid_name.clone(),
            num_triangles: 0,
        })
    }

    pub fn finish(mut self) -> Result<W, Err> {
        writeln!(self.writer, "endsolid {}", self.solid_name)?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> TriangleSink for AsciiEncoder<W> {
    fn write_triangle(&mut self, triangle: &Triangle) -> Result<(), Err> {
        let w = &mut self.writer;
        writeln!(w, "  facet normal {}", vec3_text(triangle.normal))?;
        writeln!(w, "    outer loop")?;
        for v in triangle.vertices {
            writeln!(w, "      vertex {}", vec3_text(v))?;
        }
        writeln!(w, "    endloop")?;
        writeln!(w, "  endfacet")?;
        self.num_triangles += 1;
        Ok(())
    }

    fn triangles_written(&self) -> usize {
        self.num_triangles
    }
}

fn vec3_text(v: Vec3) -> String {
    format!("{} {} {}", format_scientific(v.x), format_scientific(v.y), format_scientific(v.z))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::ConfigType;

    #[test]
    fn empty_mesh() {
        let enc = AsciiEncoder::new(Vec::new(), &Config::default()).unwrap();
        let out = enc.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "solid \nendsolid \n");
    }

    #[test]
    fn facet_block_layout() {
        let mut enc = AsciiEncoder::new(Vec::new(), &Config::default()).unwrap();
        enc.write_triangle(&Triangle::new(
            Vec3::new(0.0, 0.0, 1.0),
            [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        )).unwrap();
        assert_eq!(enc.triangles_written(), 1);
        let out = String::from_utf8(enc.finish().unwrap()).unwrap();
        let expected = "solid \n\
            \x20 facet normal 0.000000E+00 0.000000E+00 1.000000E+00\n\
            \x20   outer loop\n\
            \x20     vertex 0.000000E+00 0.000000E+00 0.000000E+00\n\
            \x20     vertex 1.000000E+00 0.000000E+00 0.000000E+00\n\
            \x20     vertex 0.000000E+00 1.000000E+00 0.000000E+00\n\
            \x20   endloop\n\
            \x20 endfacet\n\
            endsolid \n";
        assert_eq!(out, expected);
    }

    #[test]
    fn named_solid() {
        let cfg = Config { solid_name: "bracket".to_string() };
        let out = AsciiEncoder::new(Vec::new(), &cfg).unwrap().finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "solid bracket\nendsolid bracket\n");
    }

    #[test]
    fn multi_line_name_is_rejected() {
        let cfg = Config { solid_name: "a\nfacet".to_string() };
        assert!(matches!(AsciiEncoder::new(Vec::new(), &cfg), Err(Err::InvalidSolidName(_))));
    }
}
