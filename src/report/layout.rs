use crate::config::MAX_SHEET_NAME_LEN;
use crate::types::{CategoryResults, DiscountTier, ProductRecord};

pub const HEADERS: [&str; 4] = ["Title", "Price", "Original Price", "Discount"];

/// Characters Excel refuses in sheet names.
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub title: String,
    pub price: i64,
    pub original_price: i64,
    pub discount: u8,
    pub tier: DiscountTier,
}

impl From<&ProductRecord> for ReportRow {
    fn from(r: &ProductRecord) -> Self {
        Self {
            title: r.title().to_string(),
            price: r.price(),
            original_price: r.original_price(),
            discount: r.discount_percent(),
            tier: r.discount_tier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub name: String,
    pub rows: Vec<ReportRow>,
}

/// Everything the writer needs, decided up front so the formatting rules can
/// be checked without opening a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportLayout {
    pub sheets: Vec<SheetLayout>,
}

impl ReportLayout {
    /// One sheet per category. Two categories that truncate to the same sheet
    /// name (Excel compares case-insensitively) collide: the later one's rows
    /// replace the earlier one's.
    pub fn from_results(results: &CategoryResults) -> Self {
        let mut sheets: Vec<SheetLayout> = Vec::with_capacity(results.len());

        for (category, records) in results.iter() {
            let name = sheet_name(category);
            let rows = records.iter().map(ReportRow::from).collect();
            let key = name.to_lowercase();
            match sheets.iter_mut().find(|s| s.name.to_lowercase() == key) {
                Some(existing) => existing.rows = rows,
                None => sheets.push(SheetLayout { name, rows }),
            }
        }

        Self { sheets }
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Category name cut to Excel's 31-character limit, with forbidden
/// characters replaced by `_`. Excel also rejects a leading or trailing
/// apostrophe, so those become `_` after truncation.
pub fn sheet_name(category: &str) -> String {
    let mut chars: Vec<char> = category
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect();

    if chars.is_empty() {
        return "_".to_string();
    }
    if chars[0] == '\'' {
        chars[0] = '_';
    }
    if let Some(last) = chars.last_mut() {
        if *last == '\'' {
            *last = '_';
        }
    }
    chars.into_iter().collect()
}
