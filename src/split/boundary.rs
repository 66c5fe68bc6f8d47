use crate::flv::TagKind;

/// Watches the tag stream for ScriptData markers that delimit the embedded
/// recording sessions.
///
/// The first ScriptData tag in the file belongs to session 1 and is not a
/// boundary; every later one closes the current session and opens the next.
/// Detection depends only on the tag kind, never on the payload, so a
/// marker with a garbled body still counts.
#[derive(Debug, Default)]
pub struct BoundaryDetector {
    markers_seen: u32,
}

impl BoundaryDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one tag kind; returns true when it opens a new session.
    pub fn observe(&mut self, kind: TagKind) -> bool {
        if kind != TagKind::ScriptData {
            return false;
        }
        self.markers_seen += 1;
        self.markers_seen > 1
    }

    /// Total ScriptData markers seen so far.
    pub fn markers_seen(&self) -> u32 {
        self.markers_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_marker_is_not_a_boundary() {
        let mut detector = BoundaryDetector::new();
        assert!(!detector.observe(TagKind::Video));
        assert!(!detector.observe(TagKind::ScriptData));
        assert!(!detector.observe(TagKind::Audio));
        assert!(detector.observe(TagKind::ScriptData));
        assert!(detector.observe(TagKind::ScriptData));
        assert_eq!(detector.markers_seen(), 3);
    }

    #[test]
    fn test_non_script_tags_never_trigger() {
        let mut detector = BoundaryDetector::new();
        for kind in [TagKind::Audio, TagKind::Video, TagKind::Other(42)] {
            assert!(!detector.observe(kind));
        }
        assert_eq!(detector.markers_seen(), 0);
    }
}
