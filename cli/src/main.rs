use std::ffi::OsString;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use stl_transcode::io::convert_file;
use stl_transcode::prelude::*;

#[derive(Parser)]
#[command(name = "stl-convert")]
#[command(about = "Converts STL files between the ASCII and binary encodings")]
struct Cli {
    /// Files to convert. Wildcards such as "*.stl" are expanded
    #[arg(required = true)]
    files: Vec<String>,

    /// Directory that receives output-ascii/ and output-binary/
    /// [default: the directory of each input]
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Name written on the solid and endsolid lines of ASCII output
    #[arg(long, default_value = "")]
    solid_name: String,

    /// Accept binary input with bytes after the declared triangles
    #[arg(long)]
    allow_trailing_data: bool,

    /// Print a JSON report of every file to stdout
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct FileReport {
    input: PathBuf,
    output: Option<PathBuf>,
    #[serde(flatten)]
    conversion: Option<Conversion>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let inputs = expand_inputs(&cli.files)?;
    let decode_cfg = decode::Config {
        allow_trailing_data: cli.allow_trailing_data,
    };
    let encode_cfg = encode::Config {
        solid_name: cli.solid_name.clone(),
    };

    let reports = convert_all(inputs, cli.out_dir.as_deref(), &decode_cfg, &encode_cfg);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} files could not be converted", failed, reports.len());
    }
    Ok(())
}

/// Expands wildcard arguments. Arguments without wildcards are taken as they are,
/// so a missing file is reported when it is converted.
fn expand_inputs(args: &[String]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for arg in args {
        if !arg.contains(['*', '?', '[']) {
            inputs.push(PathBuf::from(arg));
            continue;
        }
        let matched = glob::glob(arg)
            .with_context(|| format!("Invalid wildcard pattern {arg:?}"))?
            .collect::<Result<Vec<_>, _>>()?;
        if matched.is_empty() {
            log::warn!("No files match {}", arg);
        }
        inputs.extend(matched);
    }
    Ok(inputs)
}

/// Converts every input in turn. A failure is recorded and logged, then the
/// next file is attempted.
fn convert_all(
    inputs: Vec<PathBuf>,
    out_dir: Option<&Path>,
    decode_cfg: &decode::Config,
    encode_cfg: &encode::Config,
) -> Vec<FileReport> {
    inputs.into_iter()
        .map(|input| match convert_one(&input, out_dir, decode_cfg, encode_cfg) {
            Ok((output, conversion)) => FileReport {
                input,
                output: Some(output),
                conversion: Some(conversion),
                error: None,
            },
            Err(e) => {
                log::error!("Error: {}: {:#}", input.display(), e);
                FileReport {
                    input,
                    output: None,
                    conversion: None,
                    error: Some(format!("{e:#}")),
                }
            },
        })
        .collect()
}

fn convert_one(
    input: &Path,
    out_dir: Option<&Path>,
    decode_cfg: &decode::Config,
    encode_cfg: &encode::Config,
) -> Result<(PathBuf, Conversion)> {
    let encoding = {
        let file = File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;
        detect(BufReader::new(file))?.0
    };

    let output = output_path(input, out_dir, encoding.opposite())?;
    if let Some(dir) = output.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    log::info!(
        "{} is in {} format, converting to {}: {}",
        input.display(), encoding, encoding.opposite(), output.display()
    );
    let conversion = convert_file(input, &output, decode_cfg, encode_cfg)?;
    log::debug!("Wrote {} triangles to {}", conversion.num_triangles, output.display());
    Ok((output, conversion))
}

/// `<base>/output-binary/binary-<name>` or `<base>/output-ascii/ascii-<name>`,
/// where `<base>` is `out_dir` or else the input's own directory.
fn output_path(input: &Path, out_dir: Option<&Path>, target: Encoding) -> Result<PathBuf> {
    let name = input.file_name()
        .with_context(|| format!("{} does not name a file", input.display()))?;
    let base = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let (folder, prefix) = match target {
        Encoding::Binary => ("output-binary", "binary-"),
        Encoding::Ascii => ("output-ascii", "ascii-"),
    };
    let mut file_name = OsString::from(prefix);
    file_name.push(name);
    Ok(base.join(folder).join(file_name))
}


#[cfg(test)]
mod tests {
    use super::*;

    const ONE_FACET: &str = "solid \n  facet normal 0 0 1\n    outer loop\n      vertex 0 0 0\n      vertex 1 0 0\n      vertex 0 1 0\n    endloop\n  endfacet\nendsolid \n";

    #[test]
    fn output_next_to_input() {
        let path = output_path(Path::new("models/part.stl"), None, Encoding::Binary).unwrap();
        assert_eq!(path, Path::new("models/output-binary/binary-part.stl"));
        let path = output_path(Path::new("part.stl"), None, Encoding::Ascii).unwrap();
        assert_eq!(path, Path::new("output-ascii/ascii-part.stl"));
    }

    #[test]
    fn output_under_out_dir() {
        let path = output_path(Path::new("models/part.stl"), Some(Path::new("/tmp/out")), Encoding::Ascii).unwrap();
        assert_eq!(path, Path::new("/tmp/out/output-ascii/ascii-part.stl"));
    }

    #[test]
    fn output_needs_a_file_name() {
        assert!(output_path(Path::new("/"), None, Encoding::Ascii).is_err());
    }

    #[test]
    fn wildcards_are_expanded() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.stl", "b.stl", "c.obj"] {
            fs::write(dir.path().join(name), ONE_FACET).unwrap();
        }
        let pattern = dir.path().join("*.stl").to_string_lossy().into_owned();
        let literal = "does-not-exist.stl".to_string();
        let inputs = expand_inputs(&[pattern, literal]).unwrap();
        assert_eq!(inputs, vec![
            dir.path().join("a.stl"),
            dir.path().join("b.stl"),
            PathBuf::from("does-not-exist.stl"),
        ]);
    }

    #[test]
    fn batch_continues_after_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.stl");
        let broken = dir.path().join("broken.stl");
        let missing = dir.path().join("missing.stl");
        fs::write(&good, ONE_FACET).unwrap();
        fs::write(&broken, "solid \n  facet normal 0 0 1\n    outer loop\n").unwrap();

        let reports = convert_all(
            vec![broken.clone(), missing, good.clone()],
            None,
            &decode::Config::default(),
            &encode::Config::default(),
        );
        assert_eq!(reports.len(), 3);
        assert!(reports[0].error.is_some());
        assert!(reports[1].error.is_some());
        assert!(reports[2].error.is_none());

        // no half-written file for the broken input
        assert!(!dir.path().join("output-binary/binary-broken.stl").exists());

        let binary = dir.path().join("output-binary/binary-good.stl");
        assert_eq!(reports[2].output.as_deref(), Some(binary.as_path()));
        assert_eq!(fs::metadata(&binary).unwrap().len(), 134);

        // and back again
        let reports = convert_all(vec![binary], None, &decode::Config::default(), &encode::Config::default());
        let ascii = dir.path().join("output-binary/output-ascii/ascii-binary-good.stl");
        assert_eq!(reports[0].output.as_deref(), Some(ascii.as_path()));
        let text = fs::read_to_string(ascii).unwrap();
        assert!(text.starts_with("solid \n  facet normal 0.000000E+00 0.000000E+00 1.000000E+00\n"));
    }

    #[test]
    fn report_serializes_flat() {
        let report = FileReport {
            input: PathBuf::from("a.stl"),
            output: Some(PathBuf::from("output-binary/binary-a.stl")),
            conversion: Some(Conversion { from: Encoding::Ascii, to: Encoding::Binary, num_triangles: 12 }),
            error: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["from"], "ascii");
        assert_eq!(json["to"], "binary");
        assert_eq!(json["num_triangles"], 12);
        assert!(json["error"].is_null());
    }
}
