mod boundary;
mod codec_headers;
mod emitter;
mod normalizer;
mod orchestrator;

pub use boundary::BoundaryDetector;
pub use codec_headers::CodecHeaderSet;
pub use emitter::{
    FfmpegRemuxSink, FfmpegSinkFactory, RawFileSink, RawFileSinkFactory, SegmentEmitter,
    SegmentSink, SessionOutcome, SinkFactory,
};
pub use normalizer::Session;
pub use orchestrator::{SplitOptions, SplitSummary, Splitter};
