use std::fmt;

use vader_sentiment::SentimentIntensityAnalyzer;

use crate::extractor::ReviewRecord;

/// Compound scores strictly above this are Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores strictly below this are Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold classifier over a compound score.
pub fn label(score: f64) -> SentimentLabel {
    SentimentLabel::from_score(score)
}

/// Score and label, always set together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub score: f64,
    pub label: SentimentLabel,
}

impl Sentiment {
    pub fn from_score(score: f64) -> Self {
        Sentiment {
            score,
            label: label(score),
        }
    }
}

/// Produces a compound polarity in [-1, 1] for a piece of text.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> f64;
}

/// VADER lexicon-and-rule analyzer.
pub struct VaderScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderScorer {
    pub fn new() -> Self {
        VaderScorer {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    fn compound(&self, text: &str) -> f64 {
        let scores = self.analyzer.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }
}

impl Default for VaderScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for VaderScorer {
    fn score(&self, text: &str) -> f64 {
        // "!" and "?" only amplify an existing valence; alone they score 0
        let unemphasized: String = text.chars().filter(|c| *c != '!' && *c != '?').collect();
        if unemphasized.trim().is_empty() {
            return 0.0;
        }
        let base = self.compound(&unemphasized);
        if base == 0.0 || unemphasized.len() == text.len() {
            return base;
        }
        self.compound(text)
    }
}

/// Annotates every record that has not been scored yet.
pub fn label_records<S: SentimentScorer + ?Sized>(scorer: &S, records: &mut [ReviewRecord]) {
    for record in records.iter_mut() {
        if record.sentiment.is_none() {
            record.sentiment = Some(Sentiment::from_score(scorer.score(&record.text)));
        }
    }
}
