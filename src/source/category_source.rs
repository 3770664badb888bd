use std::path::PathBuf;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// Supplies the ordered list of search terms for one run.
pub trait CategorySource {
    /// `Ok(None)` means the source is not there yet (the run is skipped).
    /// A source that exists but cannot be read is an error.
    fn load(&self, platform: &str) -> Result<Option<Vec<String>>>;
}

/// Reads categories from a workbook with one sheet per platform: first
/// column, header row skipped.
#[derive(Debug, Clone)]
pub struct XlsxCategorySource {
    path: PathBuf,
}

impl XlsxCategorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CategorySource for XlsxCategorySource {
    fn load(&self, platform: &str) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            debug!("[SOURCE] {} does not exist yet", self.path.display());
            return Ok(None);
        }

        let mut workbook = open_workbook_auto(&self.path)?;
        if !workbook.sheet_names().iter().any(|name| name == platform) {
            return Err(AppError::CategorySource(format!(
                "{} has no sheet named {platform:?}",
                self.path.display()
            )));
        }
        let range = workbook.worksheet_range(platform)?;

        // calamine trims leading empty rows and columns, so positions are
        // offset by the range start rather than assumed to begin at A1.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let categories: Vec<String> = if start_col > 0 {
            Vec::new()
        } else {
            range
                .rows()
                .enumerate()
                .filter(|(i, _)| start_row as usize + i > 0)
                .filter_map(|(_, row)| row.first().and_then(cell_text))
                .collect()
        };

        if categories.is_empty() {
            return Err(AppError::CategorySource(format!(
                "sheet {platform:?} in {} lists no categories",
                self.path.display()
            )));
        }

        info!(
            platform,
            count = categories.len(),
            "[SOURCE] loaded {} categories from {}",
            categories.len(),
            self.path.display(),
        );
        Ok(Some(categories))
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
