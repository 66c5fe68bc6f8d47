use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::io;

/// Enumeration of all possible errors that can occur in the splitter
#[derive(Debug)]
pub enum FlvSplitError {
    Parse(ParseError),
    Sink(SinkError),
    Other(io::Error),
}

/// The kinds of malformed input the tag reader can hit.
///
/// The FLV format has no sync markers, so every one of these is fatal to
/// further reading; sessions already emitted before the error stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// The file does not start with the `FLV` signature
    InvalidSignature,
    /// Fewer than 13 bytes of preamble (header + PreviousTagSize0)
    TruncatedPreamble,
    /// A tag header started but ended before its 11th byte
    TruncatedHeader,
    /// A tag payload ended before `payload_size` bytes
    TruncatedPayload,
    /// The trailing 4-byte back-pointer was cut short
    TruncatedBackPointer,
}

impl ParseErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParseErrorKind::InvalidSignature => "invalid signature",
            ParseErrorKind::TruncatedPreamble => "truncated preamble",
            ParseErrorKind::TruncatedHeader => "truncated tag header",
            ParseErrorKind::TruncatedPayload => "truncated tag payload",
            ParseErrorKind::TruncatedBackPointer => "truncated back-pointer",
        }
    }
}

/// Parse failure with the byte offset where reading stopped.
#[derive(Debug)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: u64,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: u64) -> Self {
        Self { kind, offset }
    }
}

/// Failure reported by a downstream segment sink (e.g. the ffmpeg remuxer).
#[derive(Debug, Clone)]
pub struct SinkError {
    pub message: String,
    pub exit_code: Option<i32>,
}

impl SinkError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            exit_code: None,
        }
    }

    /// Create an error carrying the sink process exit code.
    pub fn with_exit_code(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code: Some(exit_code),
        }
    }
}

impl fmt::Display for FlvSplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlvSplitError::Parse(err) => write!(f, "Parse error: {}", err),
            FlvSplitError::Sink(err) => write!(f, "Sink error: {}", err),
            FlvSplitError::Other(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte offset {}", self.kind, self.offset)
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.exit_code {
            Some(code) => write!(f, "{} (exit code {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for FlvSplitError {}
impl Error for ParseError {}
impl Error for SinkError {}

// Conversion implementations
impl From<io::Error> for FlvSplitError {
    fn from(err: io::Error) -> Self {
        FlvSplitError::Other(err)
    }
}

impl From<ParseError> for FlvSplitError {
    fn from(err: ParseError) -> Self {
        FlvSplitError::Parse(err)
    }
}

impl From<SinkError> for FlvSplitError {
    fn from(err: SinkError) -> Self {
        FlvSplitError::Sink(err)
    }
}

// Conversion to io::Error for backward compatibility
impl From<FlvSplitError> for io::Error {
    fn from(err: FlvSplitError) -> Self {
        io::Error::other(err)
    }
}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> Self {
        io::Error::other(err)
    }
}

impl From<SinkError> for io::Error {
    fn from(err: SinkError) -> Self {
        io::Error::other(err)
    }
}

// Type alias for Result with FlvSplitError
pub type FlvSplitResult<T> = Result<T, FlvSplitError>;
