use std::fmt;

/// Discrete class id emitted by the fitted classifier.
pub type ClassId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    Good,
    Bad,
    Neutral,
}

impl SentimentLabel {
    /// Display order used by charts and listings.
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Good,
        SentimentLabel::Bad,
        SentimentLabel::Neutral,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SentimentLabel::Good => "Good",
            SentimentLabel::Bad => "Bad",
            SentimentLabel::Neutral => "Neutral",
        }
    }

    /// Fixed chart color as a CSS hex string.
    pub fn color_hex(self) -> &'static str {
        match self {
            SentimentLabel::Good => "#00ff00",
            SentimentLabel::Bad => "#ff0000",
            SentimentLabel::Neutral => "#ffff00",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Anything that can turn one comment into one label.
///
/// Implementations must be pure: the same text always yields the same label.
pub trait Classify: Send + Sync {
    fn classify(&self, text: &str) -> SentimentLabel;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelSpaceError {
    #[error("classifier reports no classes")]
    NoClasses,
    #[error("label {label} is mapped to class {class}, which the classifier never emits")]
    UnknownClass { class: ClassId, label: SentimentLabel },
}

/// Explicit class-id to label table.
///
/// Unmapped ids fall back to [`SentimentLabel::Neutral`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMap {
    entries: Vec<(ClassId, SentimentLabel)>,
    fallback: SentimentLabel,
}

impl Default for LabelMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl LabelMap {
    /// The label space the shipped model was trained on: 2 is good, 0 is bad.
    pub fn standard() -> Self {
        Self::empty()
            .with(2, SentimentLabel::Good)
            .with(0, SentimentLabel::Bad)
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            fallback: SentimentLabel::Neutral,
        }
    }

    /// Maps `class` to `label`, replacing any previous mapping for `class`.
    pub fn with(mut self, class: ClassId, label: SentimentLabel) -> Self {
        match self.entries.iter_mut().find(|(id, _)| *id == class) {
            Some(entry) => entry.1 = label,
            None => self.entries.push((class, label)),
        }
        self
    }

    pub fn label_for(&self, class: ClassId) -> SentimentLabel {
        self.entries
            .iter()
            .find(|(id, _)| *id == class)
            .map(|(_, label)| *label)
            .unwrap_or(self.fallback)
    }

    pub fn entries(&self) -> &[(ClassId, SentimentLabel)] {
        &self.entries
    }

    /// Checks that every mapped class is one the classifier can actually emit.
    pub fn validate(&self, classes: &[ClassId]) -> Result<(), LabelSpaceError> {
        if classes.is_empty() {
            return Err(LabelSpaceError::NoClasses);
        }
        for (class, label) in &self.entries {
            if !classes.contains(class) {
                return Err(LabelSpaceError::UnknownClass {
                    class: *class,
                    label: *label,
                });
            }
        }
        Ok(())
    }
}
