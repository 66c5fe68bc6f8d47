/// Fixed FLV tag header length (type + size + timestamp + stream id).
pub const TAG_HEADER_SIZE: usize = 11;

/// Length of the PreviousTagSize field trailing every tag.
pub const BACK_POINTER_SIZE: usize = 4;

/// Tag type codes that carry meaning for splitting; everything else is
/// passed through unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Audio,
    Video,
    ScriptData,
    Other(u8),
}

impl TagKind {
    pub fn from_type_byte(b: u8) -> Self {
        match b {
            8 => TagKind::Audio,
            9 => TagKind::Video,
            18 => TagKind::ScriptData,
            v => TagKind::Other(v),
        }
    }

    pub fn type_byte(&self) -> u8 {
        match self {
            TagKind::Audio => 8,
            TagKind::Video => 9,
            TagKind::ScriptData => 18,
            TagKind::Other(v) => *v,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, TagKind::Audio | TagKind::Video)
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TagKind::Audio => "Audio_8",
            TagKind::Video => "Video_9",
            TagKind::ScriptData => "ScriptData_18",
            TagKind::Other(v) => return write!(f, "Other_{v}"),
        };
        f.write_str(s)
    }
}

/// One unit of the FLV tag stream.
///
/// The payload is opaque to the splitter except for its first two bytes on
/// Audio/Video tags, which identify the codec family and packet subtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub timestamp: u32,
    pub stream_id: [u8; 3],
    pub payload: Vec<u8>,
}

pub const AVC_CODEC_ID: u8 = 7;
pub const AAC_SOUND_FORMAT: u8 = 10;
pub const SEQUENCE_HEADER_PACKET: u8 = 0;
pub const KEYFRAME_TYPE: u8 = 1;

/// Decoded first two bytes of a video tag payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoPacketHeader {
    pub frame_type: u8,
    pub codec_id: u8,
    pub packet_type: u8,
}

impl VideoPacketHeader {
    pub fn is_keyframe(&self) -> bool {
        self.frame_type == KEYFRAME_TYPE
    }

    pub fn is_avc_sequence_header(&self) -> bool {
        self.codec_id == AVC_CODEC_ID && self.packet_type == SEQUENCE_HEADER_PACKET
    }
}

/// Decoded first two bytes of an audio tag payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPacketHeader {
    pub sound_format: u8,
    pub packet_type: u8,
}

impl AudioPacketHeader {
    pub fn is_aac_sequence_header(&self) -> bool {
        self.sound_format == AAC_SOUND_FORMAT && self.packet_type == SEQUENCE_HEADER_PACKET
    }
}

impl Tag {
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// Total on-disk size of the tag excluding the trailing back-pointer.
    pub fn disk_size(&self) -> u32 {
        TAG_HEADER_SIZE as u32 + self.payload.len() as u32
    }

    /// Decode the video packet header, or `None` if this is not a video tag
    /// or the payload is shorter than two bytes. Under-length payloads are
    /// treated as "not a configuration tag", never as an out-of-range read.
    pub fn video_packet_header(&self) -> Option<VideoPacketHeader> {
        if self.kind != TagKind::Video || self.payload.len() < 2 {
            return None;
        }
        Some(VideoPacketHeader {
            frame_type: (self.payload[0] >> 4) & 0x0f,
            codec_id: self.payload[0] & 0x0f,
            packet_type: self.payload[1],
        })
    }

    /// Decode the audio packet header, with the same bounds rules as
    /// [`Tag::video_packet_header`].
    pub fn audio_packet_header(&self) -> Option<AudioPacketHeader> {
        if self.kind != TagKind::Audio || self.payload.len() < 2 {
            return None;
        }
        Some(AudioPacketHeader {
            sound_format: (self.payload[0] >> 4) & 0x0f,
            packet_type: self.payload[1],
        })
    }

    /// Serialize the tag as it appears on disk: 11-byte header, payload,
    /// and a recomputed 4-byte back-pointer equal to `11 + payload_size`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let size = self.payload.len() as u32;
        out.push(self.kind.type_byte());
        out.extend_from_slice(&size.to_be_bytes()[1..]);
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.stream_id);
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&self.disk_size().to_be_bytes());
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(TAG_HEADER_SIZE + self.payload.len() + BACK_POINTER_SIZE);
        self.encode_into(&mut out);
        out
    }
}
