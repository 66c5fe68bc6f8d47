use crate::flv::TagKind;

/// Per-session state for timestamp rebasing.
///
/// Sessions are created when a boundary marker is observed (implicitly for
/// session 1 at stream start) and closed when the next marker arrives or
/// the input ends.
#[derive(Debug)]
pub struct Session {
    pub index: u32,
    base_timestamp: Option<u32>,
    seen_keyframe: bool,
}

impl Session {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            base_timestamp: None,
            seen_keyframe: false,
        }
    }

    /// Sessions after the first need the captured codec headers replayed.
    pub fn needs_codec_headers(&self) -> bool {
        self.index > 1
    }

    pub fn base_timestamp(&self) -> Option<u32> {
        self.base_timestamp
    }

    pub fn seen_keyframe(&self) -> bool {
        self.seen_keyframe
    }

    pub fn mark_keyframe(&mut self) {
        self.seen_keyframe = true;
    }

    /// Rebase one tag timestamp against this session's base.
    ///
    /// Only Audio/Video tags carry meaningful timestamps; other kinds pass
    /// through unchanged. The first media tag fixes the base, and the
    /// subtraction is done in i64 so an out-of-order earlier timestamp
    /// clamps to 0 instead of wrapping.
    pub fn rebase(&mut self, kind: TagKind, timestamp: u32) -> u32 {
        if !kind.is_media() {
            return timestamp;
        }
        let base = *self.base_timestamp.get_or_insert(timestamp);
        (timestamp as i64 - base as i64).max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_media_tag_becomes_zero() {
        let mut session = Session::new(2);
        assert_eq!(session.rebase(TagKind::Video, 50000), 0);
        assert_eq!(session.base_timestamp(), Some(50000));
        assert_eq!(session.rebase(TagKind::Audio, 50033), 33);
        assert_eq!(session.rebase(TagKind::Video, 50133), 133);
    }

    #[test]
    fn test_out_of_order_tag_clamps_to_zero() {
        let mut session = Session::new(1);
        assert_eq!(session.rebase(TagKind::Video, 1000), 0);
        // interleaved audio arriving with an earlier timestamp
        assert_eq!(session.rebase(TagKind::Audio, 980), 0);
        assert_eq!(session.rebase(TagKind::Video, 1033), 33);
    }

    #[test]
    fn test_non_media_tags_pass_through_and_set_no_base() {
        let mut session = Session::new(1);
        assert_eq!(session.rebase(TagKind::ScriptData, 7777), 7777);
        assert_eq!(session.rebase(TagKind::Other(20), 1234), 1234);
        assert!(session.base_timestamp().is_none());
        assert_eq!(session.rebase(TagKind::Audio, 500), 0);
    }

    #[test]
    fn test_needs_codec_headers() {
        assert!(!Session::new(1).needs_codec_headers());
        assert!(Session::new(2).needs_codec_headers());
        assert!(Session::new(9).needs_codec_headers());
    }

    proptest! {
        #[test]
        fn prop_rebase_is_clamped_difference(base in any::<u32>(), ts in any::<u32>()) {
            let mut session = Session::new(1);
            session.rebase(TagKind::Video, base);
            let rebased = session.rebase(TagKind::Audio, ts);
            let expected = (ts as i64 - base as i64).max(0) as u32;
            prop_assert_eq!(rebased, expected);
        }
    }
}
