use scraper::{ElementRef, Html, Selector};

use crate::sentiment::{Sentiment, SentimentLabel};

/// Primary review body pattern.
pub const PRIMARY_SELECTOR: &str = r#"span[data-hook="review-body"]"#;
/// Compatibility shim for older markup; never confirmed to trigger.
pub const FALLBACK_SELECTOR: &str = "div.review-text-content";

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRecord {
    pub category: String,
    pub text: String,
    pub sentiment: Option<Sentiment>,
}

impl ReviewRecord {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        ReviewRecord {
            category: category.into(),
            text: text.into(),
            sentiment: None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        self.sentiment.map(|s| s.score)
    }

    pub fn label(&self) -> Option<SentimentLabel> {
        self.sentiment.map(|s| s.label)
    }
}

pub struct Extractor {
    primary: Selector,
    fallback: Selector,
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            // Both selectors are constants that parse.
            primary: Selector::parse(PRIMARY_SELECTOR).unwrap(),
            fallback: Selector::parse(FALLBACK_SELECTOR).unwrap(),
        }
    }

    /// Reviews under the primary pattern, or under the fallback pattern if
    /// the primary matched nothing.
    pub fn extract(&self, html: &str, category: &str) -> Vec<ReviewRecord> {
        let document = Html::parse_document(html);

        let reviews = collect(&document, &self.primary, category);
        if !reviews.is_empty() {
            return reviews;
        }
        collect(&document, &self.fallback, category)
    }

    pub fn extract_primary(&self, html: &str, category: &str) -> Vec<ReviewRecord> {
        collect(&Html::parse_document(html), &self.primary, category)
    }

    pub fn extract_fallback(&self, html: &str, category: &str) -> Vec<ReviewRecord> {
        collect(&Html::parse_document(html), &self.fallback, category)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

fn collect(document: &Html, selector: &Selector, category: &str) -> Vec<ReviewRecord> {
    document
        .select(selector)
        .map(|element| ReviewRecord::new(category, visible_text(element)))
        .collect()
}

fn visible_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
