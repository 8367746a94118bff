use std::fmt;

/// Media kind of a record, derived from the Media Storage SOP Class UID
///
/// Decides whether a record is eligible for de-identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum MediaKind {
    /// Ultrasound Image Storage
    SingleImage,
    /// Ultrasound Multi-frame Image Storage
    MultiFrame,
    Other,
}

impl MediaKind {
    /// Returns simple name for display
    pub fn simple_name(&self) -> &'static str {
        match self {
            MediaKind::SingleImage => "image",
            MediaKind::MultiFrame => "multi",
            MediaKind::Other => "other",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Sub-kind of a record, derived from the SOP class description
///
/// Drives the redaction fallback and the output file label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum SubKind {
    Video,
    Secondary,
    Image,
}

impl SubKind {
    /// Label used as the output file name prefix
    pub fn label(&self) -> &'static str {
        match self {
            SubKind::Video => "video",
            SubKind::Secondary => "second",
            SubKind::Image => "image",
        }
    }
}

impl fmt::Display for SubKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Both classification signals of a record
///
/// The two kinds come from distinct signals and may disagree.
/// Eligibility looks at `media_kind`, naming looks at `sub_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Classification {
    pub media_kind: MediaKind,
    pub sub_kind: SubKind,
}

impl Classification {
    /// Creates a new Classification
    pub fn new(media_kind: MediaKind, sub_kind: SubKind) -> Self {
        Self {
            media_kind,
            sub_kind,
        }
    }

    /// Checks whether the record should be processed
    ///
    /// Single ultrasound images need region metadata, multi-frame
    /// ultrasound is always processed, everything else is skipped.
    pub fn is_eligible(&self, has_region_sequence: bool) -> bool {
        match self.media_kind {
            MediaKind::SingleImage => has_region_sequence,
            MediaKind::MultiFrame => true,
            MediaKind::Other => false,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.media_kind, self.sub_kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MediaKind::SingleImage, true, true)]
    #[case(MediaKind::SingleImage, false, false)]
    #[case(MediaKind::MultiFrame, false, true)]
    #[case(MediaKind::MultiFrame, true, true)]
    #[case(MediaKind::Other, true, false)]
    #[case(MediaKind::Other, false, false)]
    fn test_eligibility(#[case] kind: MediaKind, #[case] regions: bool, #[case] expected: bool) {
        let class = Classification::new(kind, SubKind::Image);
        assert_eq!(class.is_eligible(regions), expected);
    }

    #[test]
    fn test_sub_kind_labels() {
        assert_eq!(SubKind::Video.label(), "video");
        assert_eq!(SubKind::Secondary.label(), "second");
        assert_eq!(SubKind::Image.label(), "image");
    }

    #[test]
    fn test_display() {
        let class = Classification::new(MediaKind::MultiFrame, SubKind::Video);
        assert_eq!(class.to_string(), "multi/video");
    }
}
