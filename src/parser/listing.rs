use scraper::{ElementRef, Html};
use tracing::debug;

use super::price::{original_price_text, parse_offscreen_price, parse_whole_price};
use super::selectors;
use crate::types::{Extracted, ProductRecord, MISSING_TITLE};

/// Raw per-card extraction before sentinels are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub title: Extracted<String>,
    pub price: Extracted<i64>,
    pub original_price: Extracted<i64>,
}

impl CardFields {
    pub fn extract(card: ElementRef<'_>) -> Self {
        let title = match card.select(&selectors::TITLE).next() {
            Some(e) => Extracted::Value(e.text().collect::<String>().trim().to_string()),
            None => Extracted::Missing,
        };

        let price = match card.select(&selectors::PRICE_WHOLE).next() {
            Some(e) => parse_whole_price(&e.text().collect::<String>()),
            None => Extracted::Missing,
        };

        let original_price = match original_price_text(card) {
            Some(text) => parse_offscreen_price(&text),
            None => Extracted::Missing,
        };

        Self { title, price, original_price }
    }

    pub fn into_record(self) -> ProductRecord {
        ProductRecord::new(
            self.title.value_or(MISSING_TITLE.to_string()),
            self.price.value_or(0),
            self.original_price.value_or(0),
        )
    }
}

/// Extracts every product card on one search results page.
///
/// Missing or malformed fields fall back to `"N/A"` / 0; this never fails.
pub fn parse_listing(html: &str) -> Vec<ProductRecord> {
    let document = Html::parse_document(html);

    document
        .select(&selectors::RESULT_CARD)
        .map(|card| {
            let fields = CardFields::extract(card);
            if !fields.price.is_value() || !fields.original_price.is_value() {
                debug!(
                    title = ?fields.title,
                    price = ?fields.price,
                    original_price = ?fields.original_price,
                    "[PARSE] card fell back to sentinel values"
                );
            }
            fields.into_record()
        })
        .collect()
}
