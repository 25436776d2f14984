use std::fs::File;
use std::path::Path;

use crate::error::ReportError;
use crate::extractor::ReviewRecord;
use crate::sentiment::SentimentLabel;

pub const CSV_HEADERS: [&str; 4] = ["Model", "Review", "Sentiment Score", "Sentiment Label"];

const PREVIEW_TEXT_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl LabelCounts {
    pub fn get(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Neutral => self.neutral,
            SentimentLabel::Negative => self.negative,
        }
    }

    fn bump(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }

    pub fn max(&self) -> usize {
        self.positive.max(self.neutral).max(self.negative)
    }
}

/// Per-category label counts, categories in first-seen order. Unscored
/// records are not counted.
pub fn label_counts(records: &[ReviewRecord]) -> Vec<(String, LabelCounts)> {
    let mut counts: Vec<(String, LabelCounts)> = Vec::new();
    for record in records {
        let idx = match counts.iter().position(|(c, _)| *c == record.category) {
            Some(idx) => idx,
            None => {
                counts.push((record.category.clone(), LabelCounts::default()));
                counts.len() - 1
            }
        };
        if let Some(label) = record.label() {
            counts[idx].1.bump(label);
        }
    }
    counts
}

/// Plain-text rendering of the first `rows` records.
pub fn preview_table(records: &[ReviewRecord], rows: usize) -> String {
    let shown = &records[..rows.min(records.len())];
    let model_width = shown
        .iter()
        .map(|r| r.category.chars().count())
        .chain(std::iter::once("Model".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:>3}  {:<model_width$}  {}", "", "Model", "Review");
    for (i, record) in shown.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!(
            "{:>3}  {:<model_width$}  {}",
            i,
            record.category,
            truncate(&record.text, PREVIEW_TEXT_WIDTH)
        ));
    }
    if records.len() > shown.len() {
        out.push_str(&format!("\n... {} more", records.len() - shown.len()));
    }
    out
}

fn truncate(text: &str, width: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= width {
        return flat;
    }
    let mut cut: String = flat.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

/// Writes one row per record under the fixed header. Unscored records get
/// empty score and label cells.
pub fn write_csv(path: &Path, records: &[ReviewRecord]) -> Result<(), ReportError> {
    let csv_err = |source: csv::Error| ReportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut csv_writer = csv::Writer::from_writer(file);

    csv_writer.write_record(CSV_HEADERS).map_err(csv_err)?;
    for record in records {
        let score = record.score().map(|s| s.to_string()).unwrap_or_default();
        let label = record.label().map(|l| l.as_str()).unwrap_or_default();
        csv_writer
            .write_record([record.category.as_str(), record.text.as_str(), score.as_str(), label])
            .map_err(csv_err)?;
    }
    csv_writer.flush().map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
