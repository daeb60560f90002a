//! Keyword-based reading of a model's yes/no judgment.

/// Decides whether a model's free-text judgment is affirmative.
///
/// The judgment is affirmative when the lower-cased text contains any of the
/// markers. Anything else, including an empty reply, is negative. Parsing
/// never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordJudgment {
    markers: Vec<String>,
}

impl KeywordJudgment {
    /// Create a judgment from a list of affirmative markers.
    ///
    /// Markers are stored lower-cased; empty markers are dropped since they
    /// would match every reply.
    #[must_use]
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.as_ref().trim().to_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// The lower-cased affirmative markers.
    #[must_use]
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Returns `true` if `text` contains any affirmative marker, ignoring case.
    #[must_use]
    pub fn is_affirmative(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.markers.iter().any(|marker| text.contains(marker.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_any_marker_ignoring_case() {
        let judgment = KeywordJudgment::new(["yes", "Math"]);
        assert!(judgment.is_affirmative("YES, it is"));
        assert!(judgment.is_affirmative("This is a MATH question"));
        assert!(!judgment.is_affirmative("No."));
    }

    #[test]
    fn test_empty_reply_is_negative() {
        let judgment = KeywordJudgment::new(["yes"]);
        assert!(!judgment.is_affirmative(""));
    }

    #[test]
    fn test_blank_markers_are_dropped() {
        let judgment = KeywordJudgment::new(["", "  ", "safe"]);
        assert_eq!(judgment.markers(), ["safe".to_owned()]);
        assert!(!judgment.is_affirmative("nothing here"));
    }
}
