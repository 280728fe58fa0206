use ycsa_core::{
    categorize, format_bullets, CategorizedComments, Classify, SentimentChart, SentimentLabel,
};

/// Deterministic stand-in for the fitted model.
struct KeywordClassifier;

impl Classify for KeywordClassifier {
    fn classify(&self, text: &str) -> SentimentLabel {
        let lower = text.to_lowercase();
        if lower.contains("love") {
            SentimentLabel::Good
        } else if lower.contains("hate") {
            SentimentLabel::Bad
        } else {
            SentimentLabel::Neutral
        }
    }
}

fn sample() -> Vec<String> {
    [
        "I love this",
        "hate it",
        "first",
        "love love love",
        "meh",
        "I hate the audio",
        "LOVE the edit",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[test]
fn every_comment_lands_in_exactly_one_bucket() {
    let input = sample();
    let buckets = categorize(input.clone(), &KeywordClassifier);

    let counts: usize = SentimentLabel::ALL
        .into_iter()
        .map(|label| buckets.count(label))
        .sum();
    assert_eq!(counts, input.len());
    assert_eq!(buckets.total(), input.len());

    for comment in &input {
        let hits = buckets
            .iter()
            .filter(|(_, bucket)| bucket.contains(comment))
            .count();
        assert_eq!(hits, 1, "{comment} must appear in exactly one bucket");
    }
}

#[test]
fn buckets_keep_arrival_order() {
    let buckets = categorize(sample(), &KeywordClassifier);

    assert_eq!(
        buckets.bucket(SentimentLabel::Good),
        ["I love this", "love love love", "LOVE the edit"]
    );
    assert_eq!(
        buckets.bucket(SentimentLabel::Bad),
        ["hate it", "I hate the audio"]
    );
    assert_eq!(buckets.bucket(SentimentLabel::Neutral), ["first", "meh"]);
}

#[test]
fn duplicate_comments_are_kept() {
    let buckets = categorize(vec!["same", "same", "same"], &KeywordClassifier);
    assert_eq!(buckets.count(SentimentLabel::Neutral), 3);
}

#[test]
fn classification_is_repeatable() {
    let classifier = KeywordClassifier;
    for comment in sample() {
        assert_eq!(classifier.classify(&comment), classifier.classify(&comment));
    }
    assert_eq!(
        categorize(sample(), &classifier),
        categorize(sample(), &classifier)
    );
}

#[test]
fn empty_input_gives_empty_buckets_and_zero_chart() {
    let buckets = categorize(Vec::<String>::new(), &KeywordClassifier);
    assert!(buckets.is_empty());
    for label in SentimentLabel::ALL {
        assert!(buckets.bucket(label).is_empty());
    }

    let chart = SentimentChart::from_buckets(&buckets);
    assert_eq!(chart.total, 0);
    assert_eq!(chart.segments.len(), 3);
    for segment in &chart.segments {
        assert_eq!(segment.count, 0);
        assert_eq!(segment.percent, 0.0);
    }
}

#[test]
fn chart_segments_follow_bucket_sizes_and_colors() {
    let buckets = categorize(sample(), &KeywordClassifier);
    let chart = SentimentChart::from_buckets(&buckets);

    let labels: Vec<_> = chart.segments.iter().map(|s| s.label).collect();
    assert_eq!(labels, SentimentLabel::ALL.to_vec());

    let good = chart.segment(SentimentLabel::Good).unwrap();
    assert_eq!(good.count, 3);
    assert_eq!(good.color, "#00ff00");
    assert!((good.percent - 300.0 / 7.0).abs() < 1e-9);

    assert_eq!(chart.segment(SentimentLabel::Bad).unwrap().color, "#ff0000");
    assert_eq!(
        chart.segment(SentimentLabel::Neutral).unwrap().color,
        "#ffff00"
    );

    let sum: f64 = chart.segments.iter().map(|s| s.percent).sum();
    assert!((sum - 100.0).abs() < 1e-9);
}

#[test]
fn append_extends_each_bucket_in_order() {
    let mut first = CategorizedComments::new();
    first.push(SentimentLabel::Good, "a");
    let mut second = CategorizedComments::new();
    second.push(SentimentLabel::Good, "b");
    second.push(SentimentLabel::Bad, "c");

    first.append(second);
    assert_eq!(first.bucket(SentimentLabel::Good), ["a", "b"]);
    assert_eq!(first.bucket(SentimentLabel::Bad), ["c"]);
    assert_eq!(first.total(), 3);
}

#[test]
fn bullets_prefix_each_comment() {
    let comments = vec!["nice".to_string(), "great stream".to_string()];
    assert_eq!(format_bullets(&comments), "- nice\n- great stream");
    assert_eq!(format_bullets(&[]), "");
}
