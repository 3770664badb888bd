use std::path::Path;

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook};
use tracing::info;

use super::layout::{ReportLayout, HEADERS};
use crate::config::REPORT_PREFIX;
use crate::error::{AppError, Result};
use crate::types::DiscountTier;

const TITLE_COLUMN_WIDTH: f64 = 80.0;
const DISCOUNT_COL: u16 = 3;

/// `amazon_products_<DD-MM-YY>_<HH-MM-SS>.xlsx`. `legacy_order` swaps the
/// time part to `HH-SS-MM`, the order older archives were written with.
pub fn report_file_name(at: NaiveDateTime, legacy_order: bool) -> String {
    let time_format = if legacy_order { "%H-%S-%M" } else { "%H-%M-%S" };
    format!(
        "{REPORT_PREFIX}_{}_{}.xlsx",
        at.format("%d-%m-%y"),
        at.format(time_format)
    )
}

/// Writes the layout as an `.xlsx` workbook. Only category sheets are
/// created, so the file never carries a default blank sheet.
pub fn write_report(layout: &ReportLayout, path: &Path) -> Result<()> {
    if layout.is_empty() {
        return Err(AppError::EmptyReport);
    }

    let medium = fill_format(DiscountTier::Medium);
    let high = fill_format(DiscountTier::High);

    let mut workbook = Workbook::new();
    let mut row_count = 0usize;

    for sheet in &layout.sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        worksheet.set_column_width(0, TITLE_COLUMN_WIDTH)?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (i, row) in sheet.rows.iter().enumerate() {
            let r = i as u32 + 1;
            worksheet.write_string(r, 0, &row.title)?;
            worksheet.write_number(r, 1, row.price as f64)?;
            worksheet.write_number(r, 2, row.original_price as f64)?;

            let discount = f64::from(row.discount);
            match row.tier {
                DiscountTier::Medium => {
                    worksheet.write_number_with_format(r, DISCOUNT_COL, discount, &medium)?
                }
                DiscountTier::High => {
                    worksheet.write_number_with_format(r, DISCOUNT_COL, discount, &high)?
                }
                DiscountTier::None => worksheet.write_number(r, DISCOUNT_COL, discount)?,
            };
        }
        row_count += sheet.rows.len();
    }

    workbook.save(path)?;
    info!(
        sheets = layout.sheets.len(),
        rows = row_count,
        "[REPORT] wrote {}",
        path.display(),
    );
    Ok(())
}

fn fill_format(tier: DiscountTier) -> Format {
    match tier.fill() {
        Some(rgb) => Format::new()
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(rgb)),
        None => Format::new(),
    }
}
