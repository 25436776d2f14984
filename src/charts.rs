use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use log::info;
use plotters::prelude::*;
use plotters::style::{FontFamily, FontStyle};
use regex::Regex;

use crate::error::ReportError;
use crate::extractor::ReviewRecord;
use crate::report::{label_counts, LabelCounts};
use crate::sentiment::SentimentLabel;

pub const BAR_CHART_FILE: &str = "sentiment_by_model.svg";

const CLOUD_SIZE: (u32, u32) = (800, 400);
const CLOUD_MAX_WORDS: usize = 80;
const CLOUD_MIN_FONT: f64 = 12.0;
const CLOUD_MAX_FONT: f64 = 64.0;
const CLOUD_MARGIN: i32 = 10;
const CLOUD_TOP: i32 = 44;

// Units per category on the bar chart x axis: gap, three bars two wide, gap.
const GROUP_WIDTH: i32 = 8;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "else",
    "ever", "few", "for", "from", "further", "get", "had", "has", "have", "having", "he", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "however", "i", "if", "in", "into",
    "is", "it", "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
    "of", "off", "on", "once", "only", "or", "other", "otherwise", "ought", "our", "ours",
    "ourselves", "out", "over", "own", "same", "shall", "she", "should", "so", "some", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "with", "would",
    "you", "your", "yours", "yourself", "yourselves",
];

fn chart_err<E: Display>(path: &Path) -> impl Fn(E) -> ReportError + '_ {
    move |e| ReportError::Chart {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

pub fn label_color(label: SentimentLabel) -> RGBColor {
    match label {
        SentimentLabel::Positive => RGBColor(180, 4, 38),
        SentimentLabel::Neutral => RGBColor(170, 170, 170),
        SentimentLabel::Negative => RGBColor(59, 76, 192),
    }
}

pub fn word_cloud_file(label: SentimentLabel) -> String {
    format!("wordcloud_{}.svg", label.as_str().to_lowercase())
}

/// Bar chart plus a word cloud per non-Neutral label that has words to show.
pub fn render_all(dir: &Path, records: &[ReviewRecord]) -> Result<Vec<PathBuf>, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    let counter = WordCounter::new();

    let bar_path = dir.join(BAR_CHART_FILE);
    draw_sentiment_bars(&bar_path, &label_counts(records))?;
    info!("Bar chart written to {:?}", bar_path);
    written.push(bar_path);

    for label in [SentimentLabel::Positive, SentimentLabel::Negative] {
        let text = records
            .iter()
            .filter(|r| r.label() == Some(label))
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let frequencies = counter.frequencies(&text);
        if frequencies.is_empty() {
            info!("No {} words to draw, skipping word cloud", label);
            continue;
        }

        let path = dir.join(word_cloud_file(label));
        draw_word_cloud(&path, &format!("{} Sentiment WordCloud", label), &frequencies)?;
        info!("Word cloud written to {:?}", path);
        written.push(path);
    }

    Ok(written)
}

/// Grouped bars: count of each label per category.
pub fn draw_sentiment_bars(path: &Path, counts: &[(String, LabelCounts)]) -> Result<(), ReportError> {
    let groups = counts.len().max(1) as i32;
    let width = (130 * groups as u32).max(800);
    let y_max = counts.iter().map(|(_, c)| c.max()).max().unwrap_or(0).max(1) as u32;

    let root = SVGBackend::new(path, (width, 500)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err(path))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Sentiment Analysis by Model",
            FontDesc::new(FontFamily::SansSerif, 24.0, FontStyle::Normal),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0..groups * GROUP_WIDTH, 0u32..y_max + 1)
        .map_err(chart_err(path))?;

    let names: Vec<&str> = counts.iter().map(|(c, _)| c.as_str()).collect();
    let x_fmt = |x: &i32| {
        if x % GROUP_WIDTH == GROUP_WIDTH / 2 {
            names
                .get((x / GROUP_WIDTH) as usize)
                .map(|s| s.to_string())
                .unwrap_or_default()
        } else {
            String::new()
        }
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels((groups * GROUP_WIDTH + 1) as usize)
        .x_label_formatter(&x_fmt)
        .y_desc("count")
        .x_desc("Model")
        .draw()
        .map_err(chart_err(path))?;

    for (slot, label) in SentimentLabel::ALL.into_iter().enumerate() {
        let color = label_color(label);
        chart
            .draw_series(counts.iter().enumerate().map(|(i, (_, c))| {
                let x0 = i as i32 * GROUP_WIDTH + 1 + slot as i32 * 2;
                Rectangle::new([(x0, 0u32), (x0 + 2, c.get(label) as u32)], color.filled())
            }))
            .map_err(chart_err(path))?
            .label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err(path))?;

    root.present().map_err(chart_err(path))?;
    Ok(())
}

/// Tokenizer for word clouds, compiled once per rendering pass.
pub struct WordCounter {
    word_re: Regex,
    stopwords: HashSet<&'static str>,
}

impl WordCounter {
    pub fn new() -> Self {
        WordCounter {
            // \w[\w']+ is a constant that parses.
            word_re: Regex::new(r"\w[\w']+").unwrap(),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Word counts, most frequent first, ties alphabetical. Stopwords and
    /// single characters are dropped; a trailing "'s" is folded away.
    pub fn frequencies(&self, text: &str) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for m in self.word_re.find_iter(text) {
            let lower = m.as_str().to_lowercase();
            let word = lower.strip_suffix("'s").unwrap_or(&lower).trim_matches('\'');
            if word.chars().count() < 2
                || self.stopwords.contains(word)
                || word.chars().all(|c| c.is_ascii_digit())
            {
                continue;
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }

        let mut frequencies: Vec<(String, usize)> = counts.into_iter().collect();
        frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        frequencies
    }
}

impl Default for WordCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Font size proportional to frequency relative to the most common word.
pub fn font_size(count: usize, max_count: usize) -> f64 {
    if max_count == 0 {
        return CLOUD_MIN_FONT;
    }
    let ratio = count as f64 / max_count as f64;
    CLOUD_MIN_FONT + (CLOUD_MAX_FONT - CLOUD_MIN_FONT) * ratio
}

/// Row-flow layout: words placed left to right, wrapping at the canvas edge,
/// stopping once the canvas is full.
pub fn layout_words(frequencies: &[(String, usize)], canvas: (u32, u32)) -> Vec<(String, (i32, i32), f64)> {
    let max_count = frequencies.first().map(|(_, c)| *c).unwrap_or(0);
    let right = canvas.0 as i32 - CLOUD_MARGIN;
    let bottom = canvas.1 as i32 - CLOUD_MARGIN;

    let mut placed = Vec::new();
    let (mut x, mut y) = (CLOUD_MARGIN, CLOUD_TOP);
    let mut line_height = 0;

    for (word, count) in frequencies.iter().take(CLOUD_MAX_WORDS) {
        let size = font_size(*count, max_count);
        let w = (word.chars().count() as f64 * size * 0.6).ceil() as i32;
        let h = (size * 1.2).ceil() as i32;

        if x + w > right && x > CLOUD_MARGIN {
            x = CLOUD_MARGIN;
            y += line_height;
            line_height = 0;
        }
        if y + h > bottom || x + w > right {
            break;
        }

        placed.push((word.clone(), (x, y), size));
        x += w + 8;
        line_height = line_height.max(h);
    }
    placed
}

pub fn draw_word_cloud(path: &Path, title: &str, frequencies: &[(String, usize)]) -> Result<(), ReportError> {
    const PALETTE: [RGBColor; 5] = [
        RGBColor(68, 1, 84),
        RGBColor(59, 82, 139),
        RGBColor(33, 145, 140),
        RGBColor(94, 201, 98),
        RGBColor(190, 160, 20),
    ];

    let root = SVGBackend::new(path, CLOUD_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err(path))?;

    let title_style = FontDesc::new(FontFamily::SansSerif, 22.0, FontStyle::Bold).color(&BLACK);
    root.draw(&Text::new(title.to_string(), (CLOUD_MARGIN, 8), title_style))
        .map_err(chart_err(path))?;

    for (i, (word, pos, size)) in layout_words(frequencies, CLOUD_SIZE).into_iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let style = FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal).color(&color);
        root.draw(&Text::new(word, pos, style))
            .map_err(chart_err(path))?;
    }

    root.present().map_err(chart_err(path))?;
    Ok(())
}
