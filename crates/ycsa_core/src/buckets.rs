use crate::{Classify, SentimentLabel};

/// A single comment or chat message, exactly as received.
pub type Comment = String;

/// Comments grouped by label.
///
/// Buckets are disjoint by construction: [`CategorizedComments::push`] is the
/// only way in, and it appends to exactly one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorizedComments {
    good: Vec<Comment>,
    bad: Vec<Comment>,
    neutral: Vec<Comment>,
}

impl CategorizedComments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: SentimentLabel, comment: impl Into<Comment>) {
        self.bucket_mut(label).push(comment.into());
    }

    pub fn bucket(&self, label: SentimentLabel) -> &[Comment] {
        match label {
            SentimentLabel::Good => &self.good,
            SentimentLabel::Bad => &self.bad,
            SentimentLabel::Neutral => &self.neutral,
        }
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        self.bucket(label).len()
    }

    pub fn total(&self) -> usize {
        self.good.len() + self.bad.len() + self.neutral.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Moves every comment of `other` to the end of the matching bucket here.
    pub fn append(&mut self, mut other: CategorizedComments) {
        self.good.append(&mut other.good);
        self.bad.append(&mut other.bad);
        self.neutral.append(&mut other.neutral);
    }

    /// Buckets in display order.
    pub fn iter(&self) -> impl Iterator<Item = (SentimentLabel, &[Comment])> + '_ {
        SentimentLabel::ALL
            .into_iter()
            .map(move |label| (label, self.bucket(label)))
    }

    fn bucket_mut(&mut self, label: SentimentLabel) -> &mut Vec<Comment> {
        match label {
            SentimentLabel::Good => &mut self.good,
            SentimentLabel::Bad => &mut self.bad,
            SentimentLabel::Neutral => &mut self.neutral,
        }
    }
}

/// Classifies each comment in a single pass, keeping arrival order per bucket.
pub fn categorize<I, S>(comments: I, classifier: &dyn Classify) -> CategorizedComments
where
    I: IntoIterator<Item = S>,
    S: Into<Comment>,
{
    let mut categorized = CategorizedComments::new();
    for comment in comments {
        let comment = comment.into();
        let label = classifier.classify(&comment);
        categorized.push(label, comment);
    }
    categorized
}
