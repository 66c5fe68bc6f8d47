use crate::flv::{Tag, TagKind};
use log::info;

/// The codec configuration tags captured from session 1.
///
/// Later sessions are not guaranteed to carry their own sequence headers,
/// so the ones from the start of the file are replayed verbatim at the top
/// of every subsequent output stream. Each slot is first-match-wins and
/// never overwritten.
#[derive(Debug, Default)]
pub struct CodecHeaderSet {
    video: Option<Vec<u8>>,
    audio: Option<Vec<u8>>,
}

impl CodecHeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect a tag from session 1 and capture it if it is an AVC or AAC
    /// sequence header. Stored as the full on-disk bytes (header + payload
    /// + back-pointer) so replay is byte-exact.
    pub fn observe(&mut self, tag: &Tag) {
        match tag.kind {
            TagKind::Video if self.video.is_none() => {
                if tag
                    .video_packet_header()
                    .is_some_and(|h| h.is_avc_sequence_header())
                {
                    info!("captured AVC sequence header ({} bytes)", tag.payload_size());
                    self.video = Some(tag.encode());
                }
            }
            TagKind::Audio if self.audio.is_none() => {
                if tag
                    .audio_packet_header()
                    .is_some_and(|h| h.is_aac_sequence_header())
                {
                    info!("captured AAC sequence header ({} bytes)", tag.payload_size());
                    self.audio = Some(tag.encode());
                }
            }
            _ => {}
        }
    }

    pub fn video(&self) -> Option<&[u8]> {
        self.video.as_deref()
    }

    pub fn audio(&self) -> Option<&[u8]> {
        self.audio.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.video.is_some() && self.audio.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(kind: TagKind, timestamp: u32, payload: &[u8]) -> Tag {
        Tag {
            kind,
            timestamp,
            stream_id: [0, 0, 0],
            payload: payload.to_vec(),
        }
    }

    #[test]
    fn test_captures_sequence_headers_verbatim() {
        let mut set = CodecHeaderSet::new();
        let video = tag(TagKind::Video, 0, &[0x17, 0x00, 0x01, 0x64]);
        let audio = tag(TagKind::Audio, 0, &[0xaf, 0x00, 0x12, 0x10]);
        set.observe(&video);
        set.observe(&audio);
        assert!(set.is_complete());
        assert_eq!(set.video().unwrap(), video.encode().as_slice());
        assert_eq!(set.audio().unwrap(), audio.encode().as_slice());
    }

    #[test]
    fn test_first_match_wins() {
        let mut set = CodecHeaderSet::new();
        let first = tag(TagKind::Video, 0, &[0x17, 0x00, 0x01]);
        let second = tag(TagKind::Video, 40, &[0x17, 0x00, 0x02]);
        set.observe(&first);
        set.observe(&second);
        assert_eq!(set.video().unwrap(), first.encode().as_slice());
    }

    #[test]
    fn test_ignores_frames_and_other_codecs() {
        let mut set = CodecHeaderSet::new();
        // AVC inter frame
        set.observe(&tag(TagKind::Video, 0, &[0x27, 0x01, 0xff]));
        // keyframe but NALU packet, not a sequence header
        set.observe(&tag(TagKind::Video, 0, &[0x17, 0x01, 0xff]));
        // non-AVC codec
        set.observe(&tag(TagKind::Video, 0, &[0x12, 0x00]));
        // MP3 audio
        set.observe(&tag(TagKind::Audio, 0, &[0x2f, 0x00]));
        assert!(set.video().is_none());
        assert!(set.audio().is_none());
    }

    #[test]
    fn test_short_payload_never_qualifies() {
        let mut set = CodecHeaderSet::new();
        set.observe(&tag(TagKind::Video, 0, &[0x17]));
        set.observe(&tag(TagKind::Audio, 0, &[]));
        assert!(set.video().is_none());
        assert!(set.audio().is_none());
    }
}
