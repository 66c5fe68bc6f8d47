pub mod bits;
pub use bits::reader::{read_u24, read_u32_be, read_u8};

pub mod flv;
pub use flv::{FileHeader, Tag, TagKind, TagReader};

pub mod split;
pub use split::{
    BoundaryDetector, CodecHeaderSet, FfmpegRemuxSink, FfmpegSinkFactory, RawFileSink,
    RawFileSinkFactory, SegmentEmitter, SegmentSink, Session, SessionOutcome, SinkFactory,
    SplitOptions, SplitSummary, Splitter,
};

pub mod errors;
pub use errors::{FlvSplitError, FlvSplitResult, ParseError, ParseErrorKind, SinkError};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

fn output_dir_for(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("split_output"),
    }
}

fn base_name_for(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Split a local FLV file into per-session files remuxed through ffmpeg.
///
/// Output files are named `<basename>_part<N>.flv` under `output_dir`
/// (default: `split_output` next to the input).
pub fn split_local_file<P: AsRef<Path>>(
    input: P,
    output_dir: Option<&Path>,
    options: SplitOptions,
) -> FlvSplitResult<SplitSummary> {
    let input = input.as_ref();
    let dir = output_dir_for(input, output_dir);
    std::fs::create_dir_all(&dir)?;
    let source = BufReader::new(File::open(input)?);
    let factory = FfmpegSinkFactory::new(dir, base_name_for(input));
    Ok(Splitter::new(source, factory, options)?.run())
}

/// Split a local FLV file writing the corrected tag streams as-is, without
/// invoking ffmpeg.
pub fn split_local_file_raw<P: AsRef<Path>>(
    input: P,
    output_dir: Option<&Path>,
    options: SplitOptions,
) -> FlvSplitResult<SplitSummary> {
    let input = input.as_ref();
    let dir = output_dir_for(input, output_dir);
    std::fs::create_dir_all(&dir)?;
    let source = BufReader::new(File::open(input)?);
    let factory = RawFileSinkFactory::new(dir, base_name_for(input));
    Ok(Splitter::new(source, factory, options)?.run())
}
