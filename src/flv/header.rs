use crate::bits::reader::read_full;
use crate::errors::{FlvSplitError, FlvSplitResult, ParseError, ParseErrorKind};
use std::io::Read;

/// Length of the FLV file header (signature, version, flags, header size).
pub const PREAMBLE_SIZE: usize = 9;

/// The 9-byte FLV file header, copied verbatim from the source file and
/// replayed at the start of every emitted segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    bytes: [u8; PREAMBLE_SIZE],
}

impl FileHeader {
    /// Read the file header plus the 4-byte PreviousTagSize0 that follows
    /// it, validating the `FLV` signature.
    pub fn read_from<R: Read>(r: &mut R) -> FlvSplitResult<Self> {
        let mut bytes = [0u8; PREAMBLE_SIZE];
        let n = read_full(r, &mut bytes)?;
        if n < PREAMBLE_SIZE {
            return Err(FlvSplitError::Parse(ParseError::new(
                ParseErrorKind::TruncatedPreamble,
                n as u64,
            )));
        }
        if &bytes[..3] != b"FLV" {
            return Err(FlvSplitError::Parse(ParseError::new(
                ParseErrorKind::InvalidSignature,
                0,
            )));
        }
        let mut ptr0 = [0u8; 4];
        let n = read_full(r, &mut ptr0)?;
        if n < 4 {
            return Err(FlvSplitError::Parse(ParseError::new(
                ParseErrorKind::TruncatedPreamble,
                (PREAMBLE_SIZE + n) as u64,
            )));
        }
        Ok(Self { bytes })
    }

    /// The header bytes followed by a zeroed PreviousTagSize0, as written
    /// at the start of every output stream.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PREAMBLE_SIZE + 4);
        out.extend_from_slice(&self.bytes);
        out.extend_from_slice(&0u32.to_be_bytes());
        out
    }

    pub fn has_video(&self) -> bool {
        self.bytes[4] & 0x01 != 0
    }

    pub fn has_audio(&self) -> bool {
        self.bytes[4] & 0x04 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: [u8; 13] = [
        b'F', b'L', b'V', 1, 0x05, 0, 0, 0, 9, // header, audio + video flags
        0, 0, 0, 0, // PreviousTagSize0
    ];

    #[test]
    fn test_read_and_replay() {
        let mut r = Cursor::new(&HEADER);
        let header = FileHeader::read_from(&mut r).unwrap();
        assert!(header.has_audio());
        assert!(header.has_video());
        assert_eq!(header.encode(), HEADER.to_vec());
        assert_eq!(r.position(), 13);
    }

    #[test]
    fn test_bad_signature() {
        let mut bad = HEADER;
        bad[0] = b'X';
        let err = FileHeader::read_from(&mut Cursor::new(&bad)).unwrap_err();
        match err {
            FlvSplitError::Parse(p) => assert_eq!(p.kind, ParseErrorKind::InvalidSignature),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_truncated_preamble() {
        let err = FileHeader::read_from(&mut Cursor::new(&HEADER[..7])).unwrap_err();
        match err {
            FlvSplitError::Parse(p) => assert_eq!(p.kind, ParseErrorKind::TruncatedPreamble),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
