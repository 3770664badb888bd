use crate::config::discount_tiers;

/// Title used when a listing card carries no title element.
pub const MISSING_TITLE: &str = "N/A";

// ---------------------------------------------------------------------------
// Extraction results
// ---------------------------------------------------------------------------

/// Outcome of pulling one field out of a listing card.
///
/// Keeps the fallback path visible: callers collapse it to a sentinel with
/// [`Extracted::value_or`], tests and debug logs can still tell an absent
/// element from one whose text would not convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted<T> {
    Value(T),
    /// The element was not present in the card.
    Missing,
    /// The element was present but its text did not convert. Holds the raw text.
    Malformed(String),
}

impl<T> Extracted<T> {
    pub fn value_or(self, sentinel: T) -> T {
        match self {
            Extracted::Value(v) => v,
            Extracted::Missing | Extracted::Malformed(_) => sentinel,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Extracted::Value(_))
    }
}

// ---------------------------------------------------------------------------
// ProductRecord
// ---------------------------------------------------------------------------

/// One product scraped from a listing page. Fields are private so the discount
/// can only ever be derived from the two prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    title: String,
    price: i64,
    original_price: i64,
    discount_percent: u8,
}

impl ProductRecord {
    pub fn new(title: impl Into<String>, price: i64, original_price: i64) -> Self {
        Self {
            title: title.into(),
            price,
            original_price,
            discount_percent: discount_percent(price, original_price),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn original_price(&self) -> i64 {
        self.original_price
    }

    pub fn discount_percent(&self) -> u8 {
        self.discount_percent
    }

    pub fn discount_tier(&self) -> DiscountTier {
        DiscountTier::from_discount(self.discount_percent)
    }
}

/// `floor((original - price) / original * 100)` in exact integer arithmetic.
///
/// Zero unless both prices are positive. A current price above the original
/// clamps to zero, so the result always lies in `[0, 100]`.
pub fn discount_percent(price: i64, original_price: i64) -> u8 {
    if price <= 0 || original_price <= 0 || price >= original_price {
        return 0;
    }
    let pct = (original_price - price) as i128 * 100 / original_price as i128;
    pct.min(i128::from(discount_tiers::MAX)) as u8
}

// ---------------------------------------------------------------------------
// Discount tiers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountTier {
    /// discount < 50%
    None,
    /// 50% <= discount < 80%
    Medium,
    /// 80% <= discount <= 100%
    High,
}

impl DiscountTier {
    pub fn from_discount(discount: u8) -> Self {
        use crate::config::discount_tiers::*;
        if discount < MEDIUM_MIN {
            DiscountTier::None
        } else if discount < HIGH_MIN {
            DiscountTier::Medium
        } else if discount <= MAX {
            DiscountTier::High
        } else {
            DiscountTier::None
        }
    }

    /// RGB fill for the discount cell, if the tier is highlighted.
    pub fn fill(self) -> Option<u32> {
        match self {
            DiscountTier::None => None,
            DiscountTier::Medium => Some(discount_tiers::MEDIUM_FILL),
            DiscountTier::High => Some(discount_tiers::HIGH_FILL),
        }
    }
}

impl std::fmt::Display for DiscountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiscountTier::None => "none",
            DiscountTier::Medium => "medium",
            DiscountTier::High => "high",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// CategoryResults
// ---------------------------------------------------------------------------

/// Per-run aggregate: category name → records, in scrape order.
///
/// Built fresh for every run. Inserting a category a second time replaces its
/// records but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryResults {
    entries: Vec<(String, Vec<ProductRecord>)>,
}

impl CategoryResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: impl Into<String>, records: Vec<ProductRecord>) {
        let category = category.into();
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = records,
            None => self.entries.push((category, records)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, category: &str) -> Option<&[ProductRecord]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, records)| records.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ProductRecord])> {
        self.entries
            .iter()
            .map(|(name, records)| (name.as_str(), records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn record_count(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }
}
