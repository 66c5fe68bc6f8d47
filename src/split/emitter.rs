use crate::errors::SinkError;
use crate::flv::FileHeader;
use crate::split::codec_headers::CodecHeaderSet;
use crate::split::normalizer::Session;
use log::{info, warn};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Destination for one emitted session's byte stream.
///
/// Writes may block when the downstream consumer applies backpressure;
/// that is expected and propagates all the way back to the tag reader.
#[cfg_attr(test, mockall::automock)]
pub trait SegmentSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), SinkError>;

    /// Signal end-of-input and wait for the consumer to finish.
    fn finish(&mut self) -> Result<(), SinkError>;
}

/// Produces one sink per session, with stable 1-based output naming.
pub trait SinkFactory {
    fn segment_path(&self, index: u32) -> PathBuf;
    fn open_segment(&mut self, index: u32) -> io::Result<Box<dyn SegmentSink>>;
}

fn part_path(output_dir: &Path, base_name: &str, index: u32) -> PathBuf {
    output_dir.join(format!("{}_part{}.flv", base_name, index))
}

/// Sink that pipes the corrected tag stream through ffmpeg stream-copy,
/// producing a strictly conformant output file. ffmpeg also applies the
/// aac_adtstoasc bitstream fixup the raw stream may need.
pub struct FfmpegRemuxSink {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegRemuxSink {
    pub fn spawn(output_path: &Path) -> io::Result<Self> {
        let mut child = Command::new("ffmpeg")
            .arg("-y")
            .args(["-f", "flv", "-i", "pipe:0"])
            .args(["-c", "copy", "-bsf:a", "aac_adtstoasc"])
            .arg(output_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        let stdin = child.stdin.take();
        Ok(Self { child, stdin })
    }
}

impl SegmentSink for FfmpegRemuxSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), SinkError> {
        match self.stdin.as_mut() {
            Some(stdin) => stdin
                .write_all(buf)
                .map_err(|e| SinkError::new(format!("ffmpeg stdin write failed: {}", e))),
            None => Err(SinkError::new("ffmpeg stdin already closed")),
        }
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        // Closing stdin is what tells ffmpeg the stream is over
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| SinkError::new(format!("failed to wait for ffmpeg: {}", e)))?;
        if status.success() {
            Ok(())
        } else {
            Err(SinkError::with_exit_code(
                "ffmpeg remux failed",
                status.code().unwrap_or(-1),
            ))
        }
    }
}

impl Drop for FfmpegRemuxSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        let _ = self.child.wait();
    }
}

/// Sink that writes the corrected tag stream to disk unchanged, for use
/// when ffmpeg is unavailable or the raw stream is wanted for inspection.
pub struct RawFileSink {
    writer: io::BufWriter<std::fs::File>,
}

impl RawFileSink {
    pub fn create(output_path: &Path) -> io::Result<Self> {
        Ok(Self {
            writer: io::BufWriter::new(std::fs::File::create(output_path)?),
        })
    }
}

impl SegmentSink for RawFileSink {
    fn write_all(&mut self, buf: &[u8]) -> Result<(), SinkError> {
        self.writer
            .write_all(buf)
            .map_err(|e| SinkError::new(format!("file write failed: {}", e)))
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer
            .flush()
            .map_err(|e| SinkError::new(format!("file flush failed: {}", e)))
    }
}

/// Factory spawning one ffmpeg remux process per session.
pub struct FfmpegSinkFactory {
    output_dir: PathBuf,
    base_name: String,
}

impl FfmpegSinkFactory {
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }
}

impl SinkFactory for FfmpegSinkFactory {
    fn segment_path(&self, index: u32) -> PathBuf {
        part_path(&self.output_dir, &self.base_name, index)
    }

    fn open_segment(&mut self, index: u32) -> io::Result<Box<dyn SegmentSink>> {
        Ok(Box::new(FfmpegRemuxSink::spawn(&self.segment_path(index))?))
    }
}

/// Factory writing raw corrected streams straight to disk.
pub struct RawFileSinkFactory {
    output_dir: PathBuf,
    base_name: String,
}

impl RawFileSinkFactory {
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }
}

impl SinkFactory for RawFileSinkFactory {
    fn segment_path(&self, index: u32) -> PathBuf {
        part_path(&self.output_dir, &self.base_name, index)
    }

    fn open_segment(&mut self, index: u32) -> io::Result<Box<dyn SegmentSink>> {
        Ok(Box::new(RawFileSink::create(&self.segment_path(index))?))
    }
}

/// Result of one emitted session.
#[derive(Debug, Serialize)]
pub struct SessionOutcome {
    pub index: u32,
    pub path: PathBuf,
    pub tags_written: u64,
    pub error: Option<String>,
    pub exit_code: Option<i32>,
}

impl SessionOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

struct ActiveSegment {
    index: u32,
    path: PathBuf,
    sink: Option<Box<dyn SegmentSink>>,
    tags_written: u64,
    error: Option<SinkError>,
}

impl ActiveSegment {
    fn fail(&mut self, error: SinkError) {
        warn!("segment {} sink failed: {}", self.index, error);
        self.error = Some(error);
        // Dropping the sink closes the pipe so the consumer can exit
        self.sink = None;
    }
}

/// Assembles each session's self-contained output stream and drives its
/// sink to completion.
///
/// Exactly one segment is open at a time; a sink failure is recorded for
/// that session alone and never aborts later sessions.
pub struct SegmentEmitter<F: SinkFactory> {
    factory: F,
    preamble: Vec<u8>,
    active: Option<ActiveSegment>,
}

impl<F: SinkFactory> SegmentEmitter<F> {
    pub fn new(factory: F, header: &FileHeader) -> Self {
        Self {
            factory,
            preamble: header.encode(),
            active: None,
        }
    }

    /// Open the output stream for `session`: preamble first, then (for
    /// sessions after the first) the captured codec configuration tags,
    /// video before audio, each replayed verbatim.
    ///
    /// Panics if the previous segment was not closed.
    pub fn open(&mut self, session: &Session, headers: &CodecHeaderSet) {
        assert!(self.active.is_none(), "previous segment still open");
        let path = self.factory.segment_path(session.index);
        let mut segment = match self.factory.open_segment(session.index) {
            Ok(sink) => ActiveSegment {
                index: session.index,
                path,
                sink: Some(sink),
                tags_written: 0,
                error: None,
            },
            Err(e) => {
                let mut segment = ActiveSegment {
                    index: session.index,
                    path,
                    sink: None,
                    tags_written: 0,
                    error: None,
                };
                segment.fail(SinkError::new(format!("failed to open sink: {}", e)));
                self.active = Some(segment);
                return;
            }
        };

        Self::forward(&mut segment, &self.preamble);
        if session.needs_codec_headers() {
            if let Some(video) = headers.video() {
                info!("segment {}: replaying AVC sequence header", session.index);
                Self::forward(&mut segment, video);
            }
            if let Some(audio) = headers.audio() {
                info!("segment {}: replaying AAC sequence header", session.index);
                Self::forward(&mut segment, audio);
            }
        }
        self.active = Some(segment);
    }

    fn forward(segment: &mut ActiveSegment, bytes: &[u8]) {
        if segment.error.is_some() {
            return;
        }
        if let Some(sink) = segment.sink.as_mut() {
            if let Err(e) = sink.write_all(bytes) {
                segment.fail(e);
            }
        }
    }

    /// Forward one fully rebased tag (or passthrough tag) to the open sink.
    /// After a sink failure the remaining writes for this session are
    /// swallowed; the failure is reported at close.
    pub fn write(&mut self, tag_bytes: &[u8]) {
        let segment = self
            .active
            .as_mut()
            .expect("write called with no open segment");
        Self::forward(segment, tag_bytes);
        if segment.error.is_none() {
            segment.tags_written += 1;
        }
    }

    /// Close the open segment, waiting for the sink, and report its outcome.
    pub fn close(&mut self) -> SessionOutcome {
        let mut segment = self
            .active
            .take()
            .expect("close called with no open segment");
        if segment.error.is_none() {
            if let Some(mut sink) = segment.sink.take() {
                if let Err(e) = sink.finish() {
                    segment.fail(e);
                }
            }
        }
        let error = segment.error;
        SessionOutcome {
            index: segment.index,
            path: segment.path,
            tags_written: segment.tags_written,
            error: error.as_ref().map(|e| e.message.clone()),
            exit_code: error.and_then(|e| e.exit_code),
        }
    }

    /// True while a segment is open.
    pub fn has_open_segment(&self) -> bool {
        self.active.is_some()
    }
}
