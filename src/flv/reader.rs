use crate::bits::reader::{read_full, read_u24, read_u32_be, read_u8};
use crate::errors::{FlvSplitError, FlvSplitResult, ParseError, ParseErrorKind};
use crate::flv::tag::{Tag, TagKind, BACK_POINTER_SIZE, TAG_HEADER_SIZE};
use log::warn;
use std::io::Read;

/// Pull-based reader that yields one FLV tag per call.
///
/// The reader owns the byte source and its cursor. FLV has no recovery
/// mechanism for a corrupt tag, so after any parse error the caller must
/// stop reading and finalize whatever was already emitted.
pub struct TagReader<R: Read> {
    source: R,
    offset: u64,
    tags_read: u64,
}

impl<R: Read> TagReader<R> {
    /// Wrap a byte source positioned at the first tag (i.e. just past the
    /// file preamble).
    pub fn new(source: R) -> Self {
        Self {
            source,
            offset: 0,
            tags_read: 0,
        }
    }

    /// Byte offset past the preamble of the next unread tag.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of complete tags returned so far.
    pub fn tags_read(&self) -> u64 {
        self.tags_read
    }

    fn parse_error(&self, kind: ParseErrorKind, read: usize) -> FlvSplitError {
        FlvSplitError::Parse(ParseError::new(kind, self.offset + read as u64))
    }

    /// Read the next tag, `Ok(None)` at a clean end of stream.
    pub fn next_tag(&mut self) -> FlvSplitResult<Option<Tag>> {
        let mut header = [0u8; TAG_HEADER_SIZE];
        let n = read_full(&mut self.source, &mut header)?;
        if n == 0 {
            return Ok(None);
        }
        if n < TAG_HEADER_SIZE {
            return Err(self.parse_error(ParseErrorKind::TruncatedHeader, n));
        }

        let mut fields = header.as_slice();
        let kind = TagKind::from_type_byte(read_u8(&mut fields)?);
        let payload_size = read_u24(&mut fields)? as usize;
        let timestamp = read_u32_be(&mut fields)?;
        let stream_id = [fields[0], fields[1], fields[2]];

        let mut payload = vec![0u8; payload_size];
        let n = read_full(&mut self.source, &mut payload)?;
        if n < payload_size {
            return Err(self.parse_error(ParseErrorKind::TruncatedPayload, TAG_HEADER_SIZE + n));
        }

        let mut back_pointer = [0u8; BACK_POINTER_SIZE];
        let n = read_full(&mut self.source, &mut back_pointer)?;
        if n < BACK_POINTER_SIZE {
            return Err(self.parse_error(
                ParseErrorKind::TruncatedBackPointer,
                TAG_HEADER_SIZE + payload_size + n,
            ));
        }
        let stored = u32::from_be_bytes(back_pointer);
        let expected = (TAG_HEADER_SIZE + payload_size) as u32;
        if stored != expected {
            // Common in the wild; the value is recomputed on emission anyway.
            warn!(
                "back-pointer mismatch after {} tag at offset {}: stored {}, expected {}",
                kind, self.offset, stored, expected
            );
        }

        self.offset += (TAG_HEADER_SIZE + payload_size + BACK_POINTER_SIZE) as u64;
        self.tags_read += 1;
        Ok(Some(Tag {
            kind,
            timestamp,
            stream_id,
            payload,
        }))
    }
}
