//! Checklist labels cut through the front wall above each toggle.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Checklist used when no labels are configured.
pub const DEFAULT_LABELS: [&str; 8] = [
    "COFFEE", "EMAIL", "CALENDAR", "STANDUP", "SECURITY", "BACKUPS", "TASKS", "READY",
];

/// Ordered label strings, index-aligned with toggle positions.
///
/// A sequence shorter than the toggle count is padded with generated
/// `ITEM N` labels; extra entries beyond the toggle count are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSequence {
    labels: Vec<String>,
}

impl LabelSequence {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// The labels exactly as configured.
    pub fn configured(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label applied to toggle `index`, falling back to `ITEM {index + 1}`.
    pub fn label_for(&self, index: usize) -> Cow<'_, str> {
        match self.labels.get(index) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(fallback_label(index)),
        }
    }

    /// Labels for the first `count` toggles, with fallbacks filled in.
    pub fn resolve(&self, count: usize) -> Vec<String> {
        (0..count).map(|i| self.label_for(i).into_owned()).collect()
    }
}

impl Default for LabelSequence {
    fn default() -> Self {
        Self::new(DEFAULT_LABELS)
    }
}

/// Generated label for a toggle without a configured one.
pub fn fallback_label(index: usize) -> String {
    format!("ITEM {}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_labels_align_with_toggles() {
        let labels = LabelSequence::default();
        assert_eq!(labels.label_for(0), "COFFEE");
        assert_eq!(labels.label_for(7), "READY");
        assert_eq!(labels.len(), 8);
    }

    #[test]
    fn test_short_sequence_is_padded() {
        let labels = LabelSequence::new(["POWER", "FAN"]);
        assert_eq!(
            labels.resolve(4),
            vec!["POWER", "FAN", "ITEM 3", "ITEM 4"]
        );
    }

    #[test]
    fn test_empty_sequence_is_all_fallback() {
        let labels = LabelSequence::new(Vec::<String>::new());
        assert!(labels.is_empty());
        assert_eq!(labels.label_for(0), "ITEM 1");
    }

    #[test]
    fn test_extra_labels_are_ignored() {
        let labels = LabelSequence::default();
        assert_eq!(labels.resolve(2), vec!["COFFEE", "EMAIL"]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let labels = LabelSequence::new(["A", "B"]);
        let json = serde_json::to_string(&labels).unwrap();
        assert_eq!(json, r#"["A","B"]"#);
    }

    proptest! {
        #[test]
        fn prop_fallback_beyond_configured(len in 0usize..12, index in 0usize..32) {
            let labels = LabelSequence::new((0..len).map(|i| format!("L{}", i)));
            let applied = labels.label_for(index);
            if index >= len {
                prop_assert_eq!(applied.as_ref(), format!("ITEM {}", index + 1));
            } else {
                prop_assert_eq!(applied.as_ref(), format!("L{}", index));
            }
        }
    }
}
