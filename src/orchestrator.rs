use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::fetcher::{PageFetch, PageResponse};
use crate::parser::parse_listing;
use crate::types::{CategoryResults, ProductRecord};

/// Drives pagination for every category of a run.
///
/// Requests are strictly sequential and each one is followed by exactly one
/// `request_delay`, so the site never sees more than one request per delay.
pub struct Orchestrator<F> {
    fetcher: F,
    max_pages: u32,
    request_delay: Duration,
}

impl<F: PageFetch> Orchestrator<F> {
    pub fn new(fetcher: F, max_pages: u32, request_delay: Duration) -> Self {
        Self { fetcher, max_pages, request_delay }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Scrapes pages `1..=max_pages` for one search term. A failed page adds
    /// nothing and does not stop pagination.
    pub async fn scrape_category(&self, search_term: &str) -> Vec<ProductRecord> {
        let mut records = Vec::new();

        for page in 1..=self.max_pages {
            match self.fetcher.fetch_page(search_term, page).await {
                PageResponse::Success(body) => {
                    let parsed = parse_listing(&body);
                    info!(
                        category = search_term,
                        page,
                        records = parsed.len(),
                        "[SCRAPE] {search_term} page {page}: {} products",
                        parsed.len(),
                    );
                    records.extend(parsed);
                }
                PageResponse::Failed(reason) => {
                    warn!(
                        category = search_term,
                        page,
                        "[SCRAPE] Failed to retrieve page {page} for {search_term}: {reason}"
                    );
                }
            }
            sleep(self.request_delay).await;
        }

        records
    }

    /// Scrapes every category in source order into a fresh aggregate.
    pub async fn scrape_all(&self, categories: &[String]) -> CategoryResults {
        let mut results = CategoryResults::new();
        for category in categories {
            let records = self.scrape_category(category).await;
            info!(
                category = %category,
                records = records.len(),
                "[SCRAPE] {category}: {} products across {} pages",
                records.len(),
                self.max_pages,
            );
            results.insert(category.clone(), records);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchFailure;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Serves canned pages and records every request with its (paused) clock time.
    #[derive(Default)]
    struct FakeFetcher {
        pages: HashMap<(String, u32), PageResponse>,
        calls: Mutex<Vec<(String, u32, Instant)>>,
    }

    impl FakeFetcher {
        fn with_page(mut self, term: &str, page: u32, resp: PageResponse) -> Self {
            self.pages.insert((term.to_string(), page), resp);
            self
        }

        fn calls(&self) -> Vec<(String, u32, Instant)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PageFetch for FakeFetcher {
        async fn fetch_page(&self, search_term: &str, page: u32) -> PageResponse {
            self.calls
                .lock()
                .unwrap()
                .push((search_term.to_string(), page, Instant::now()));
            self.pages
                .get(&(search_term.to_string(), page))
                .cloned()
                .unwrap_or(PageResponse::Failed(FetchFailure::Status(503)))
        }
    }

    fn listing(titles: &[&str]) -> PageResponse {
        let cards: String = titles
            .iter()
            .map(|t| {
                format!(
                    r#"<div data-component-type="s-search-result"><span class="a-size-medium a-color-base a-text-normal">{t}</span><span class="a-price-whole">100</span></div>"#
                )
            })
            .collect();
        PageResponse::Success(format!("<html><body>{cards}</body></html>"))
    }

    fn titles(records: &[ProductRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn merges_pages_in_order() {
        let fetcher = FakeFetcher::default()
            .with_page("kettle", 1, listing(&["a", "b"]))
            .with_page("kettle", 2, listing(&["c"]));
        let orch = Orchestrator::new(fetcher, 2, Duration::from_secs(10));

        let records = orch.scrape_category("kettle").await;
        assert_eq!(titles(&records), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_page_is_skipped_and_pagination_continues() {
        let fetcher = FakeFetcher::default()
            .with_page("kettle", 1, listing(&["a"]))
            .with_page("kettle", 2, PageResponse::Failed(FetchFailure::Status(500)))
            .with_page("kettle", 3, listing(&["c"]));
        let orch = Orchestrator::new(fetcher, 3, Duration::from_secs(10));

        let records = orch.scrape_category("kettle").await;
        assert_eq!(titles(&records), vec!["a", "c"]);
        assert_eq!(orch.fetcher.calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn requests_are_spaced_by_one_delay() {
        let fetcher = FakeFetcher::default()
            .with_page("kettle", 1, listing(&["a"]))
            .with_page("kettle", 3, listing(&["c"]));
        let delay = Duration::from_secs(10);
        let orch = Orchestrator::new(fetcher, 3, delay);

        let started = Instant::now();
        orch.scrape_category("kettle").await;

        let calls = orch.fetcher.calls();
        let slack = Duration::from_millis(5);
        for pair in calls.windows(2) {
            let gap = pair[1].2 - pair[0].2;
            assert!(gap >= delay && gap < delay + slack, "gap={gap:?}");
        }
        // One delay after every page, including the failed one.
        let elapsed = Instant::now() - started;
        assert!(elapsed >= delay * 3 && elapsed < delay * 3 + slack, "elapsed={elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn scrape_all_keys_results_by_category_in_source_order() {
        let fetcher = FakeFetcher::default()
            .with_page("phones", 1, listing(&["p1"]))
            .with_page("laptops", 1, listing(&["l1", "l2"]));
        let orch = Orchestrator::new(fetcher, 1, Duration::from_secs(1));

        let categories = vec!["phones".to_string(), "laptops".to_string(), "tablets".to_string()];
        let results = orch.scrape_all(&categories).await;

        let names: Vec<&str> = results.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["phones", "laptops", "tablets"]);
        assert_eq!(results.get("laptops").map(titles), Some(vec!["l1", "l2"]));
        assert_eq!(results.get("tablets").map(|r| r.len()), Some(0));

        let requested: Vec<(String, u32)> = orch
            .fetcher
            .calls()
            .into_iter()
            .map(|(term, page, _)| (term, page))
            .collect();
        assert_eq!(
            requested,
            vec![
                ("phones".to_string(), 1),
                ("laptops".to_string(), 1),
                ("tablets".to_string(), 1),
            ]
        );
    }
}
