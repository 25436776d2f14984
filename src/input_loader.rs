use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use log::{info, warn};
use serde::Deserialize;

use crate::error::TargetLoadError;

/// One product to track and the page its reviews live on.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    #[serde(rename = "Model", alias = "model", alias = "Category", alias = "category", alias = "Product", alias = "product")]
    pub category: String,
    #[serde(rename = "URL", alias = "url", alias = "Url", alias = "Source URL", alias = "source_url", alias = "Link", alias = "link")]
    pub source_url: String,
}

impl TargetSpec {
    pub fn new(category: impl Into<String>, source_url: impl Into<String>) -> Self {
        TargetSpec {
            category: category.into(),
            source_url: source_url.into(),
        }
    }
}

/// The reference instance: nine iPhone models and their review pages.
pub fn default_targets() -> Vec<TargetSpec> {
    [
        ("iPhone 14", "https://www.amazon.in/Apple-iPhone-14-128GB-Blue/dp/B0BDK62PDX"),
        ("iPhone 14 Pro", "https://www.amazon.com/Apple-iPhone-14-Pro-128GB/dp/B0BN95FRW9"),
        ("iPhone 14 Pro Max", "https://www.amazon.com/Apple-iPhone-14-Pro-Max/dp/B0BN93P98N"),
        ("iPhone 15", "https://www.amazon.in/Apple-iPhone-15-128-GB/dp/B0CHX1W1XY?th=1"),
        ("iPhone 15 Pro", "https://www.amazon.in/Apple-iPhone-15-Pro-128/dp/B0CHX2DRGV?th=1"),
        ("iPhone 15 Pro Max", "https://www.amazon.in/Apple-iPhone-Pro-Max-256/dp/B0CHWV2WYK"),
        ("iPhone 16", "https://www.amazon.in/iPhone-16-128-GB-Control/dp/B0DGJHBX5Y?th=1"),
        ("iPhone 16 Pro", "https://www.amazon.in/iPhone-16-Pro-128-GB/dp/B0DGJ7X1DX?th=1"),
        ("iPhone 16 Pro Max", "https://www.amazon.in/iPhone-16-Pro-Max-256/dp/B0DGHYDZR9?th=1"),
    ]
    .into_iter()
    .map(|(category, url)| TargetSpec::new(category, url))
    .collect()
}

/// Loads targets in file order from a CSV or Excel sheet.
pub fn load_targets<P: AsRef<Path>>(filename: P) -> Result<Vec<TargetSpec>, TargetLoadError> {
    let path_ref = filename.as_ref();

    if !path_ref.exists() {
        return Err(TargetLoadError::Missing(path_ref.to_path_buf()));
    }

    let is_excel = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "xlsx" || ext == "xls"
        });

    if is_excel {
        return load_excel(path_ref);
    }

    load_csv(path_ref)
}

fn load_csv(path: &Path) -> Result<Vec<TargetSpec>, TargetLoadError> {
    let csv_err = |source: csv::Error| TargetLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|e| csv_err(csv::Error::from(e)))?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut targets = Vec::new();
    for result in rdr.deserialize::<TargetSpec>() {
        let target = result.map_err(csv_err)?;
        if target.category.is_empty() || target.source_url.is_empty() {
            warn!("Skipping incomplete target row: {:?}", target);
            continue;
        }
        targets.push(target);
    }
    info!("Loaded {} targets from CSV {:?}", targets.len(), path);
    Ok(targets)
}

fn load_excel(path: &Path) -> Result<Vec<TargetSpec>, TargetLoadError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| TargetLoadError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;

    let worksheets = workbook.worksheets();
    let (_name, range) = worksheets
        .first()
        .ok_or_else(|| TargetLoadError::EmptyWorkbook(path.to_path_buf()))?;

    let mut category_idx = None;
    let mut url_idx = None;
    let mut targets = Vec::new();

    for (row_idx, row) in range.rows().enumerate() {
        if row_idx == 0 {
            for (col_idx, cell) in row.iter().enumerate() {
                let header = cell.to_string().to_lowercase();
                // "Product URL" names the url column, not the category
                if header.contains("url") || header.contains("link") {
                    url_idx = Some(col_idx);
                } else if header.contains("model") || header.contains("category") || header.contains("product") {
                    category_idx = Some(col_idx);
                }
            }
            if category_idx.is_none() {
                return Err(TargetLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: "Model",
                });
            }
            if url_idx.is_none() {
                return Err(TargetLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: "URL",
                });
            }
            continue;
        }

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .map(|c| c.to_string().trim().to_string())
                .unwrap_or_default()
        };
        let category = cell(category_idx);
        let source_url = cell(url_idx);

        if category.is_empty() || source_url.is_empty() {
            continue;
        }
        targets.push(TargetSpec { category, source_url });
    }

    info!("Loaded {} targets from Excel {:?}", targets.len(), path);
    Ok(targets)
}
