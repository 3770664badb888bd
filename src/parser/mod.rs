pub mod listing;
pub mod price;

pub use listing::parse_listing;

// Selectors for search result markup
mod selectors {
    use scraper::Selector;
    use std::sync::LazyLock;

    fn parse(css: &str) -> Selector {
        Selector::parse(css).expect("static selector")
    }

    pub static RESULT_CARD: LazyLock<Selector> =
        LazyLock::new(|| parse(r#"div[data-component-type="s-search-result"]"#));

    pub static TITLE: LazyLock<Selector> =
        LazyLock::new(|| parse("span.a-size-medium.a-color-base.a-text-normal"));

    pub static PRICE_WHOLE: LazyLock<Selector> = LazyLock::new(|| parse("span.a-price-whole"));

    pub static OFFSCREEN_PRICE: LazyLock<Selector> = LazyLock::new(|| parse("span.a-offscreen"));
}
