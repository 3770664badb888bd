use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use tracing::info;

use crate::archive;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::PageFetch;
use crate::orchestrator::Orchestrator;
use crate::report::{report_file_name, write_report, ReportLayout};
use crate::scheduler::{CycleOutcome, RunCycle};
use crate::source::CategorySource;

/// Category list → archive sweep → scrape → report → archive copy.
pub struct Pipeline<S, F> {
    source: S,
    orchestrator: Orchestrator<F>,
    platform: String,
    report_dir: PathBuf,
    archive_dir: PathBuf,
    retention: Duration,
    legacy_report_timestamp: bool,
}

impl<S: CategorySource, F: PageFetch> Pipeline<S, F> {
    pub fn new(cfg: &Config, source: S, fetcher: F) -> Self {
        Self {
            source,
            orchestrator: Orchestrator::new(fetcher, cfg.max_pages, cfg.request_delay()),
            platform: cfg.platform.clone(),
            report_dir: cfg.report_dir.clone(),
            archive_dir: cfg.archive_dir.clone(),
            retention: cfg.retention(),
            legacy_report_timestamp: cfg.legacy_report_timestamp,
        }
    }
}

impl<S: CategorySource, F: PageFetch> RunCycle for Pipeline<S, F> {
    async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let Some(categories) = self.source.load(&self.platform)? else {
            return Ok(CycleOutcome::SourceUnavailable);
        };

        archive::sweep(&self.archive_dir, self.retention)?;

        let results = self.orchestrator.scrape_all(&categories).await;
        info!(
            categories = results.len(),
            records = results.record_count(),
            "[PIPELINE] scrape finished"
        );

        let file_name = report_file_name(Local::now().naive_local(), self.legacy_report_timestamp);
        let report = self.report_dir.join(file_name);
        write_report(&ReportLayout::from_results(&results), &report)?;
        archive::copy_into(&report, &self.archive_dir)?;

        Ok(CycleOutcome::Completed {
            report,
            categories: results.len(),
            records: results.record_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::fetcher::PageResponse;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::fs::File;
    use std::path::Path;
    use std::time::SystemTime;

    struct FixedSource(Option<Vec<String>>);

    impl CategorySource for FixedSource {
        fn load(&self, _platform: &str) -> Result<Option<Vec<String>>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl CategorySource for BrokenSource {
        fn load(&self, platform: &str) -> Result<Option<Vec<String>>> {
            Err(AppError::CategorySource(format!("no sheet {platform}")))
        }
    }

    #[derive(Default)]
    struct CannedFetcher {
        bodies: HashMap<String, String>,
        calls: Cell<usize>,
    }

    impl PageFetch for CannedFetcher {
        async fn fetch_page(&self, search_term: &str, _page: u32) -> PageResponse {
            self.calls.set(self.calls.get() + 1);
            match self.bodies.get(search_term) {
                Some(body) => PageResponse::Success(body.clone()),
                None => PageResponse::Failed(crate::fetcher::FetchFailure::Status(404)),
            }
        }
    }

    fn card(title: &str, price: &str, original: &str) -> String {
        format!(
            r#"<div data-component-type="s-search-result">
                 <span class="a-size-medium a-color-base a-text-normal">{title}</span>
                 <span class="a-price-whole">{price}</span>
                 <span class="a-offscreen">₹{price}</span>
                 <span class="a-offscreen">₹{original}</span>
               </div>"#
        )
    }

    fn config(report_dir: &Path, archive_dir: &Path) -> Config {
        let report_dir = report_dir.display().to_string();
        let archive_dir = archive_dir.display().to_string();
        Config::from_lookup(|key| match key {
            "REPORT_DIR" => Some(report_dir.clone()),
            "ARCHIVE_DIR" => Some(archive_dir.clone()),
            "MAX_NUM_PAGE" => Some("1".to_string()),
            "REQUEST_DELAY_SECS" => Some("0".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn completed_cycle_writes_archives_and_sweeps() {
        let work = tempfile::tempdir().unwrap();
        let report_dir = work.path().join("reports");
        let archive_dir = work.path().join("archive");
        std::fs::create_dir_all(&report_dir).unwrap();
        std::fs::create_dir_all(&archive_dir).unwrap();

        let stale = archive_dir.join("amazon_products_old.xlsx");
        File::create(&stale)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(3 * 86_400))
            .unwrap();

        let mut bodies = HashMap::new();
        bodies.insert(
            "kettle".to_string(),
            format!("<html><body>{}{}</body></html>", card("Kettle", "350", "1,000"), card("Jug", "100", "1,000")),
        );
        let fetcher = CannedFetcher { bodies, ..Default::default() };
        let source = FixedSource(Some(vec!["kettle".to_string(), "toaster".to_string()]));

        let cfg = config(&report_dir, &archive_dir);
        let mut pipeline = Pipeline::new(&cfg, source, fetcher);
        let outcome = pipeline.run_cycle().await.unwrap();

        let (report, categories, records) = match outcome {
            CycleOutcome::Completed { report, categories, records } => (report, categories, records),
            other => panic!("expected a completed cycle, got {other:?}"),
        };
        assert_eq!(categories, 2);
        assert_eq!(records, 2);
        assert!(report.starts_with(&report_dir));
        assert!(report.exists());

        let file_name = report.file_name().unwrap();
        assert!(file_name.to_string_lossy().starts_with("amazon_products_"));
        assert!(archive_dir.join(file_name).exists());
        assert!(!stale.exists());
    }

    #[tokio::test]
    async fn unavailable_source_scrapes_nothing() {
        let work = tempfile::tempdir().unwrap();
        let cfg = config(work.path(), &work.path().join("archive"));
        let mut pipeline = Pipeline::new(&cfg, FixedSource(None), CannedFetcher::default());

        let outcome = pipeline.run_cycle().await.unwrap();
        assert_eq!(outcome, CycleOutcome::SourceUnavailable);
        assert_eq!(pipeline.orchestrator_calls(), 0);
        assert!(!work.path().join("archive").exists());
    }

    #[tokio::test]
    async fn source_errors_propagate() {
        let work = tempfile::tempdir().unwrap();
        let cfg = config(work.path(), &work.path().join("archive"));
        let mut pipeline = Pipeline::new(&cfg, BrokenSource, CannedFetcher::default());

        let err = pipeline.run_cycle().await.unwrap_err();
        assert!(matches!(err, AppError::CategorySource(_)), "got {err:?}");
    }

    impl<S> Pipeline<S, CannedFetcher> {
        fn orchestrator_calls(&self) -> usize {
            self.orchestrator.fetcher().calls.get()
        }
    }
}
