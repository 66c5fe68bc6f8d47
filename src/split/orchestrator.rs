use crate::errors::{FlvSplitError, FlvSplitResult, ParseErrorKind};
use crate::flv::{FileHeader, Tag, TagKind, TagReader};
use crate::split::boundary::BoundaryDetector;
use crate::split::codec_headers::CodecHeaderSet;
use crate::split::emitter::{SegmentEmitter, SessionOutcome, SinkFactory};
use crate::split::normalizer::Session;
use log::{debug, info, warn};
use serde::Serialize;
use std::io::Read;

/// Tuning knobs for a split run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    /// Drop video tags at the start of each session until the first
    /// keyframe, so outputs never open on an undecodable inter frame.
    /// Audio tags are never dropped.
    pub drop_leading_non_keyframes: bool,
}

/// Final report of a split run: one outcome per emitted session plus the
/// read-side failure, if any. A parse error does not invalidate sessions
/// that were already closed before it.
#[derive(Debug, Serialize)]
pub struct SplitSummary {
    pub sessions: Vec<SessionOutcome>,
    pub boundary_markers: u32,
    pub parse_error: Option<ParseErrorKind>,
    pub read_error: Option<String>,
}

impl SplitSummary {
    pub fn all_succeeded(&self) -> bool {
        self.parse_error.is_none()
            && self.read_error.is_none()
            && self.sessions.iter().all(|s| s.succeeded())
    }
}

/// Single-pass splitter driving the tag reader to completion.
///
/// Tags must be handled in file order: boundary detection, codec-header
/// capture and timestamp rebasing are all order-dependent, so there is no
/// per-session parallelism to be had from one pass.
pub struct Splitter<R: Read, F: SinkFactory> {
    reader: TagReader<R>,
    emitter: SegmentEmitter<F>,
    detector: BoundaryDetector,
    headers: CodecHeaderSet,
    session: Option<Session>,
    outcomes: Vec<SessionOutcome>,
    options: SplitOptions,
    scratch: Vec<u8>,
}

impl<R: Read, F: SinkFactory> Splitter<R, F> {
    /// Read and validate the file preamble, leaving the source positioned
    /// at the first tag.
    pub fn new(mut source: R, factory: F, options: SplitOptions) -> FlvSplitResult<Self> {
        let header = FileHeader::read_from(&mut source)?;
        Ok(Self {
            reader: TagReader::new(source),
            emitter: SegmentEmitter::new(factory, &header),
            detector: BoundaryDetector::new(),
            headers: CodecHeaderSet::new(),
            session: None,
            outcomes: Vec::new(),
            options,
            scratch: Vec::new(),
        })
    }

    /// Process the whole input and return the per-session outcomes.
    ///
    /// A parse error stops reading immediately and finalizes the open
    /// session with the tags routed to it so far; sink failures are local
    /// to their session and never stop the run.
    pub fn run(mut self) -> SplitSummary {
        let mut parse_error = None;
        let mut read_error = None;
        loop {
            match self.reader.next_tag() {
                Ok(Some(tag)) => {
                    self.handle_tag(tag);
                    if self.reader.tags_read() % 1000 == 0 {
                        debug!("processed {} tags", self.reader.tags_read());
                    }
                }
                Ok(None) => break,
                Err(FlvSplitError::Parse(p)) => {
                    warn!("stopping read: {}", p);
                    parse_error = Some(p.kind);
                    break;
                }
                Err(e) => {
                    warn!("stopping read: {}", e);
                    read_error = Some(e.to_string());
                    break;
                }
            }
        }
        self.close_session();
        info!(
            "split finished: {} session(s), {} boundary marker(s)",
            self.outcomes.len(),
            self.detector.markers_seen()
        );
        SplitSummary {
            sessions: self.outcomes,
            boundary_markers: self.detector.markers_seen(),
            parse_error,
            read_error,
        }
    }

    fn open_session(&mut self) {
        let index = self.outcomes.len() as u32 + 1;
        let session = Session::new(index);
        info!("opening session {}", index);
        self.emitter.open(&session, &self.headers);
        self.session = Some(session);
    }

    fn close_session(&mut self) {
        if self.session.take().is_some() {
            let outcome = self.emitter.close();
            match &outcome.error {
                Some(e) => warn!("session {} failed: {}", outcome.index, e),
                None => info!(
                    "session {} done: {} ({} tags)",
                    outcome.index,
                    outcome.path.display(),
                    outcome.tags_written
                ),
            }
            self.outcomes.push(outcome);
        }
    }

    fn handle_tag(&mut self, mut tag: Tag) {
        if self.detector.observe(tag.kind) {
            self.close_session();
            self.open_session();
            // Boundary markers are never forwarded: each output is a
            // continuous media stream, not a re-wrapped multi-program file
            return;
        }
        if self.session.is_none() {
            // Session 1 opens implicitly on the first tag of the stream
            self.open_session();
        }
        if tag.kind == TagKind::ScriptData {
            // The first metadata tag marks session 1 and is not re-emitted
            return;
        }

        if self.session.as_ref().is_some_and(|s| s.index == 1) {
            self.headers.observe(&tag);
        }

        let session = self.session.as_mut().expect("session open");
        if self.options.drop_leading_non_keyframes
            && tag.kind == TagKind::Video
            && !session.seen_keyframe()
        {
            match tag.video_packet_header() {
                Some(h) if h.is_keyframe() => session.mark_keyframe(),
                _ => {
                    debug!(
                        "session {}: dropping leading non-keyframe at {} ms",
                        session.index, tag.timestamp
                    );
                    return;
                }
            }
        }

        tag.timestamp = session.rebase(tag.kind, tag.timestamp);
        self.scratch.clear();
        tag.encode_into(&mut self.scratch);
        self.emitter.write(&self.scratch);
    }
}
